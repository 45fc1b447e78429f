use crate::bounding_volume::Aabb;
use crate::error::GeometryError;
use crate::math::{Point, Real, Vector};

/// A regular grid of scalar values over an axis-aligned box.
///
/// The box is split into `dims[0] × dims[1] × dims[2]` cells and the value of cell
/// `(i, j, k)` is stored at index `(i * dims[1] + j) * dims[2] + k` and sampled at the cell
/// center. Proximity queries interpret the values as a signed distance field: negative
/// inside, positive outside, the surface being the zero level set.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct VolumeGrid {
    bbox: Aabb,
    dims: [usize; 3],
    values: Vec<Real>,
}

impl Default for VolumeGrid {
    fn default() -> Self {
        VolumeGrid {
            bbox: Aabb::new(Point::origin(), Point::origin()),
            dims: [0; 3],
            values: Vec::new(),
        }
    }
}

impl VolumeGrid {
    /// A zero-filled grid.
    pub fn new(bbox: Aabb, dims: [usize; 3]) -> Self {
        VolumeGrid {
            bbox,
            dims,
            values: vec![0.0; dims[0] * dims[1] * dims[2]],
        }
    }

    /// A grid with the given values, which must contain exactly one value per cell.
    pub fn from_values(bbox: Aabb, dims: [usize; 3], values: Vec<Real>) -> Result<Self, GeometryError> {
        if values.len() != dims[0] * dims[1] * dims[2] {
            return Err(GeometryError::MalformedData(format!(
                "a {}x{}x{} grid needs {} values, got {}",
                dims[0],
                dims[1],
                dims[2],
                dims[0] * dims[1] * dims[2],
                values.len()
            )));
        }

        if !bbox.is_valid() {
            return Err(GeometryError::MalformedData(
                "the grid bounding box is inverted".to_string(),
            ));
        }

        Ok(VolumeGrid { bbox, dims, values })
    }

    /// The box covered by this grid.
    #[inline]
    pub fn bbox(&self) -> &Aabb {
        &self.bbox
    }

    /// The number of cells along each axis.
    #[inline]
    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    /// The flat value array.
    #[inline]
    pub fn values(&self) -> &[Real] {
        &self.values
    }

    /// The number of cells.
    #[inline]
    pub fn num_cells(&self) -> usize {
        self.values.len()
    }

    /// Does this grid have no cell?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Changes the box covered by this grid, keeping its values.
    pub fn set_bounds(&mut self, bbox: Aabb) -> Result<(), GeometryError> {
        if !bbox.is_valid() {
            return Err(GeometryError::MalformedData(
                "the grid bounding box is inverted".to_string(),
            ));
        }

        self.bbox = bbox;
        Ok(())
    }

    /// Changes the grid resolution. All values are reset to zero.
    pub fn resize(&mut self, dims: [usize; 3]) {
        self.dims = dims;
        self.values = vec![0.0; dims[0] * dims[1] * dims[2]];
    }

    /// Sets every cell to `value`.
    pub fn fill(&mut self, value: Real) {
        self.values.iter_mut().for_each(|v| *v = value);
    }

    /// Adds `dv` to every cell, which moves the zero level set.
    pub fn shift(&mut self, dv: Real) {
        self.values.iter_mut().for_each(|v| *v += dv);
    }

    /// The flat index of cell `(i, j, k)`.
    #[inline]
    pub fn linear_index(&self, i: usize, j: usize, k: usize) -> usize {
        (i * self.dims[1] + j) * self.dims[2] + k
    }

    /// The cell coordinates of a flat index.
    #[inline]
    pub fn cell_coords(&self, index: usize) -> [usize; 3] {
        let k = index % self.dims[2];
        let j = (index / self.dims[2]) % self.dims[1];
        let i = index / (self.dims[1] * self.dims[2]);
        [i, j, k]
    }

    fn checked_index(&self, i: usize, j: usize, k: usize) -> Result<usize, GeometryError> {
        for (c, n) in [i, j, k].into_iter().zip(self.dims) {
            GeometryError::check_index(c, n)?;
        }
        Ok(self.linear_index(i, j, k))
    }

    /// The value of cell `(i, j, k)`.
    pub fn get(&self, i: usize, j: usize, k: usize) -> Result<Real, GeometryError> {
        let id = self.checked_index(i, j, k)?;
        Ok(self.values[id])
    }

    /// Sets the value of cell `(i, j, k)`.
    pub fn set(&mut self, i: usize, j: usize, k: usize, value: Real) -> Result<(), GeometryError> {
        let id = self.checked_index(i, j, k)?;
        self.values[id] = value;
        Ok(())
    }

    /// The size of a cell along each axis.
    pub fn cell_size(&self) -> Vector<Real> {
        let extents = self.bbox.extents();
        Vector::new(
            extents.x / self.dims[0].max(1) as Real,
            extents.y / self.dims[1].max(1) as Real,
            extents.z / self.dims[2].max(1) as Real,
        )
    }

    /// The center of cell `(i, j, k)`, where its value is sampled.
    pub fn cell_center(&self, i: usize, j: usize, k: usize) -> Point<Real> {
        let h = self.cell_size();
        self.bbox.mins
            + Vector::new(
                (i as Real + 0.5) * h.x,
                (j as Real + 0.5) * h.y,
                (k as Real + 0.5) * h.z,
            )
    }

    /// The box covered by cell `(i, j, k)`.
    pub fn cell_aabb(&self, i: usize, j: usize, k: usize) -> Aabb {
        let h = self.cell_size();
        let mins = self.bbox.mins + Vector::new(i as Real * h.x, j as Real * h.y, k as Real * h.z);
        Aabb::new(mins, mins + h)
    }

    /// The cell containing `pt`, clamped to the grid.
    pub fn cell_containing(&self, pt: &Point<Real>) -> [usize; 3] {
        let h = self.cell_size();
        let mut result = [0; 3];

        for d in 0..3 {
            let u = if h[d] > 0.0 {
                ((pt[d] - self.bbox.mins[d]) / h[d]).floor()
            } else {
                0.0
            };
            result[d] = (u.max(0.0) as usize).min(self.dims[d].saturating_sub(1));
        }

        result
    }

    /// Per-axis sampling data of the trilinear interpolant: lower cell, upper cell, weight
    /// of the upper cell.
    fn axis_sample(&self, pt: &Point<Real>, d: usize) -> (usize, usize, Real) {
        let n = self.dims[d];
        let h = self.cell_size()[d];

        if n <= 1 || h <= 0.0 {
            return (0, 0, 0.0);
        }

        let u = (pt[d] - self.bbox.mins[d]) / h - 0.5;
        let i0 = (u.floor().max(0.0) as usize).min(n - 2);
        let t = (u - i0 as Real).clamp(0.0, 1.0);
        (i0, i0 + 1, t)
    }

    /// Trilinear interpolation of the cell-center values at `pt`.
    ///
    /// Outside the cell centers hull, the values of the border cells are extended constantly.
    pub fn interpolate(&self, pt: &Point<Real>) -> Real {
        if self.values.is_empty() {
            return Real::MAX;
        }

        let (i0, i1, tx) = self.axis_sample(pt, 0);
        let (j0, j1, ty) = self.axis_sample(pt, 1);
        let (k0, k1, tz) = self.axis_sample(pt, 2);

        let v = |i, j, k| self.values[self.linear_index(i, j, k)];
        let lerp = |a: Real, b: Real, t: Real| a + (b - a) * t;

        let c00 = lerp(v(i0, j0, k0), v(i1, j0, k0), tx);
        let c10 = lerp(v(i0, j1, k0), v(i1, j1, k0), tx);
        let c01 = lerp(v(i0, j0, k1), v(i1, j0, k1), tx);
        let c11 = lerp(v(i0, j1, k1), v(i1, j1, k1), tx);
        let c0 = lerp(c00, c10, ty);
        let c1 = lerp(c01, c11, ty);
        lerp(c0, c1, tz)
    }

    /// The gradient of the interpolated field at `pt`, by central differences.
    pub fn gradient(&self, pt: &Point<Real>) -> Vector<Real> {
        let h = self.cell_size();
        let mut grad = Vector::zeros();

        for d in 0..3 {
            if h[d] <= 0.0 {
                continue;
            }

            let step = h[d] * 0.5;
            let mut forward = *pt;
            let mut backward = *pt;
            forward[d] += step;
            backward[d] -= step;
            grad[d] = (self.interpolate(&forward) - self.interpolate(&backward)) / (2.0 * step);
        }

        grad
    }

    /// The signed distance to the zero level set estimated at `pt`.
    ///
    /// Inside the grid box this is the interpolated value. Outside, the value at the closest
    /// point of the box is increased by the distance to that point, which keeps the estimate
    /// a lower bound for fields that are 1-Lipschitz.
    pub fn signed_distance(&self, pt: &Point<Real>) -> Real {
        let clamped = self.bbox.clamp_local_point(pt);
        self.interpolate(&clamped) + na::distance(&clamped, pt)
    }

    /// The direction in which the signed distance increases the fastest at `pt`.
    pub fn distance_gradient(&self, pt: &Point<Real>) -> Vector<Real> {
        let clamped = self.bbox.clamp_local_point(pt);
        let outward = pt - clamped;

        if let Some(dir) = outward.try_normalize(crate::math::DEFAULT_EPSILON) {
            return dir;
        }

        self.gradient(pt)
    }

    /// Translates the grid box.
    pub fn translate(&mut self, t: &Vector<Real>) {
        self.bbox.mins += t;
        self.bbox.maxs += t;
    }

    /// Scales the grid box by positive per-axis factors, about the origin.
    pub fn scale(&mut self, s: &Vector<Real>) -> Result<(), GeometryError> {
        if s.iter().any(|x| *x <= 0.0) {
            return Err(GeometryError::InvalidParameter(
                "volume grids can only be scaled by positive factors".to_string(),
            ));
        }

        self.bbox.mins.coords.component_mul_assign(s);
        self.bbox.maxs.coords.component_mul_assign(s);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::VolumeGrid;
    use crate::bounding_volume::Aabb;
    use crate::math::{Point, Vector};

    fn plane_grid() -> VolumeGrid {
        // Values equal to `x - 0.5` sampled at the cell centers of the unit cube.
        let bbox = Aabb::new(Point::origin(), Point::new(1.0, 1.0, 1.0));
        let mut grid = VolumeGrid::new(bbox, [4, 3, 2]);
        for i in 0..4 {
            for j in 0..3 {
                for k in 0..2 {
                    let c = grid.cell_center(i, j, k);
                    grid.set(i, j, k, c.x - 0.5).unwrap();
                }
            }
        }
        grid
    }

    #[test]
    fn linear_fields_are_interpolated_exactly() {
        let grid = plane_grid();
        assert_relative_eq!(grid.interpolate(&Point::new(0.3, 0.4, 0.6)), -0.2, epsilon = 1.0e-12);
        assert_relative_eq!(grid.gradient(&Point::new(0.5, 0.5, 0.5)), Vector::x(), epsilon = 1.0e-12);
        assert_relative_eq!(grid.signed_distance(&Point::new(0.5, 3.0, 0.5)), 2.0, epsilon = 1.0e-12);
    }

    #[test]
    fn indexing_is_i_major() {
        let grid = plane_grid();
        assert_eq!(grid.linear_index(1, 2, 1), (1 * 3 + 2) * 2 + 1);
        assert_eq!(grid.cell_coords(grid.linear_index(3, 1, 0)), [3, 1, 0]);
        assert!(grid.get(4, 0, 0).is_err());
        assert!(VolumeGrid::from_values(*grid.bbox(), [2, 2, 2], vec![0.0; 7]).is_err());
    }
}
