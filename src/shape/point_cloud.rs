use crate::bounding_volume::Aabb;
use crate::error::GeometryError;
use crate::math::{Matrix, Point, Real, Vector};
use std::collections::BTreeMap;

/// Names of the properties holding per-point normals, rotated along with the points.
const NORMAL_PROPERTIES: [&str; 3] = ["normal_x", "normal_y", "normal_z"];

/// A point cloud with named scalar per-point properties and string settings.
///
/// Properties are stored column-wise: `properties[p][i]` is the value of the `p`-th property
/// for the `i`-th point. Every column always has exactly one value per point.
///
/// Two settings are interpreted by this crate: `width`/`height`, which mark a cloud as
/// structured (row-major image layout) for mesh reconstruction, and `radius`, the radius of
/// the balls the points stand for when ray-cast.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct PointCloud {
    points: Vec<Point<Real>>,
    property_names: Vec<String>,
    properties: Vec<Vec<Real>>,
    settings: BTreeMap<String, String>,
}

impl PointCloud {
    /// An empty point cloud without properties.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a point cloud without properties from a list of points.
    pub fn from_points(points: Vec<Point<Real>>) -> Self {
        PointCloud {
            points,
            ..Default::default()
        }
    }

    /// Creates a point cloud without properties from flattened coordinates.
    pub fn from_flat(coords: &[Real]) -> Result<Self, GeometryError> {
        let mut result = Self::new();
        result.set_points(coords)?;
        Ok(result)
    }

    /// The number of points.
    #[inline]
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Does this cloud contain no point?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The number of per-point properties.
    #[inline]
    pub fn num_properties(&self) -> usize {
        self.property_names.len()
    }

    /// The points of this cloud.
    #[inline]
    pub fn points(&self) -> &[Point<Real>] {
        &self.points
    }

    /// The point coordinates, flattened.
    pub fn flat_points(&self) -> Vec<Real> {
        self.points.iter().flat_map(|p| [p.x, p.y, p.z]).collect()
    }

    /// The property names, in column order.
    #[inline]
    pub fn property_names(&self) -> &[String] {
        &self.property_names
    }

    /// Replaces all the points from flattened coordinates.
    ///
    /// Property columns are resized to the new point count, new entries being zero.
    pub fn set_points(&mut self, coords: &[Real]) -> Result<(), GeometryError> {
        if coords.len() % 3 != 0 {
            return Err(GeometryError::MalformedData(
                "flattened point list must have a length multiple of 3".to_string(),
            ));
        }

        self.points = coords
            .chunks_exact(3)
            .map(|c| Point::new(c[0], c[1], c[2]))
            .collect();

        for column in &mut self.properties {
            column.resize(self.points.len(), 0.0);
        }

        Ok(())
    }

    /// Adds a point and returns its index. All its properties are zero.
    pub fn add_point(&mut self, pt: Point<Real>) -> usize {
        self.points.push(pt);
        self.properties.iter_mut().for_each(|column| column.push(0.0));
        self.points.len() - 1
    }

    /// Moves the `index`-th point.
    pub fn set_point(&mut self, index: usize, pt: Point<Real>) -> Result<(), GeometryError> {
        GeometryError::check_index(index, self.points.len())?;
        self.points[index] = pt;
        Ok(())
    }

    /// The `index`-th point.
    pub fn point(&self, index: usize) -> Result<Point<Real>, GeometryError> {
        GeometryError::check_index(index, self.points.len())?;
        Ok(self.points[index])
    }

    /// Adds a new property, zero for every existing point.
    pub fn add_property(&mut self, name: &str) -> Result<(), GeometryError> {
        self.add_property_with_values(name, vec![0.0; self.points.len()])
    }

    /// Adds a new property with one value per point.
    pub fn add_property_with_values(
        &mut self,
        name: &str,
        values: Vec<Real>,
    ) -> Result<(), GeometryError> {
        if self.property_index(name).is_some() {
            return Err(GeometryError::InvalidParameter(format!(
                "the property `{name}` already exists"
            )));
        }

        if values.len() != self.points.len() {
            return Err(GeometryError::MalformedData(format!(
                "property `{}` has {} values for {} points",
                name,
                values.len(),
                self.points.len()
            )));
        }

        self.property_names.push(name.to_string());
        self.properties.push(values);
        Ok(())
    }

    /// The column index of the property called `name`.
    pub fn property_index(&self, name: &str) -> Option<usize> {
        self.property_names.iter().position(|n| n == name)
    }

    fn named_property_index(&self, name: &str) -> Result<usize, GeometryError> {
        self.property_index(name)
            .ok_or_else(|| GeometryError::InvalidParameter(format!("unknown property `{name}`")))
    }

    /// Replaces every property value from a row-major list (all the properties of the first
    /// point, then of the second, etc.)
    pub fn set_properties(&mut self, values: &[Real]) -> Result<(), GeometryError> {
        let nprops = self.num_properties();

        if values.len() != nprops * self.points.len() {
            return Err(GeometryError::MalformedData(format!(
                "expected {} property values, got {}",
                nprops * self.points.len(),
                values.len()
            )));
        }

        for (i, row) in values.chunks_exact(nprops.max(1)).enumerate() {
            for (p, value) in row.iter().enumerate() {
                self.properties[p][i] = *value;
            }
        }

        Ok(())
    }

    /// Replaces the values of the `pindex`-th property.
    pub fn set_property_column(&mut self, pindex: usize, values: &[Real]) -> Result<(), GeometryError> {
        GeometryError::check_index(pindex, self.num_properties())?;

        if values.len() != self.points.len() {
            return Err(GeometryError::MalformedData(format!(
                "expected {} property values, got {}",
                self.points.len(),
                values.len()
            )));
        }

        self.properties[pindex].copy_from_slice(values);
        Ok(())
    }

    /// Sets the `pindex`-th property of the `index`-th point.
    pub fn set_property(&mut self, index: usize, pindex: usize, value: Real) -> Result<(), GeometryError> {
        GeometryError::check_index(index, self.points.len())?;
        GeometryError::check_index(pindex, self.num_properties())?;
        self.properties[pindex][index] = value;
        Ok(())
    }

    /// Sets the property called `name` of the `index`-th point.
    pub fn set_named_property(&mut self, index: usize, name: &str, value: Real) -> Result<(), GeometryError> {
        let pindex = self.named_property_index(name)?;
        self.set_property(index, pindex, value)
    }

    /// The `pindex`-th property of the `index`-th point.
    pub fn property(&self, index: usize, pindex: usize) -> Result<Real, GeometryError> {
        GeometryError::check_index(index, self.points.len())?;
        GeometryError::check_index(pindex, self.num_properties())?;
        Ok(self.properties[pindex][index])
    }

    /// The property called `name` of the `index`-th point.
    pub fn named_property(&self, index: usize, name: &str) -> Result<Real, GeometryError> {
        let pindex = self.named_property_index(name)?;
        self.property(index, pindex)
    }

    /// The values of the `pindex`-th property for all points.
    pub fn property_column(&self, pindex: usize) -> Result<&[Real], GeometryError> {
        GeometryError::check_index(pindex, self.num_properties())?;
        Ok(&self.properties[pindex])
    }

    /// The values of the property called `name` for all points.
    pub fn named_property_column(&self, name: &str) -> Result<&[Real], GeometryError> {
        let pindex = self.named_property_index(name)?;
        Ok(&self.properties[pindex])
    }

    /// Sets a string setting.
    pub fn set_setting(&mut self, key: &str, value: &str) {
        let _ = self.settings.insert(key.to_string(), value.to_string());
    }

    /// Reads a string setting.
    pub fn setting(&self, key: &str) -> Option<&str> {
        self.settings.get(key).map(|s| s.as_str())
    }

    /// All the settings of this cloud.
    pub fn settings(&self) -> &BTreeMap<String, String> {
        &self.settings
    }

    /// Parses a setting as a number, `None` if it is missing or not a number.
    pub(crate) fn numeric_setting(&self, key: &str) -> Option<Real> {
        self.setting(key).and_then(|s| s.trim().parse().ok())
    }

    /// The axis-aligned bounding box of the points.
    pub fn local_aabb(&self) -> Aabb {
        Aabb::from_points(&self.points)
    }

    /// Translates every point.
    pub fn translate(&mut self, t: &Vector<Real>) {
        self.points.iter_mut().for_each(|pt| *pt += t);
    }

    /// Applies the affine map `x -> linear * x + t` to every point.
    ///
    /// The `normal_x`, `normal_y`, `normal_z` properties, when all present, are transformed by
    /// the inverse transpose of `linear` and renormalized.
    pub fn transform(&mut self, linear: &Matrix<Real>, t: &Vector<Real>) {
        self.points
            .iter_mut()
            .for_each(|pt| *pt = Point::from(linear * pt.coords + t));

        let normal_ids = NORMAL_PROPERTIES.map(|name| self.property_index(name));
        if let [Some(nx), Some(ny), Some(nz)] = normal_ids {
            let normal_map = linear
                .try_inverse()
                .map(|inv| inv.transpose())
                .unwrap_or(*linear);

            for i in 0..self.points.len() {
                let n = Vector::new(
                    self.properties[nx][i],
                    self.properties[ny][i],
                    self.properties[nz][i],
                );
                let n = normal_map * n;
                let n = n.try_normalize(0.0).unwrap_or(n);
                self.properties[nx][i] = n.x;
                self.properties[ny][i] = n.y;
                self.properties[nz][i] = n.z;
            }
        }
    }

    /// Appends the points of `other` to this cloud.
    ///
    /// Both clouds must have the same property names, in the same order. Settings of `self`
    /// are kept.
    pub fn join(&mut self, other: &PointCloud) -> Result<(), GeometryError> {
        if self.property_names != other.property_names {
            return Err(GeometryError::MalformedData(format!(
                "cannot join point clouds with properties {:?} and {:?}",
                self.property_names, other.property_names
            )));
        }

        self.points.extend_from_slice(&other.points);
        for (column, other_column) in self.properties.iter_mut().zip(&other.properties) {
            column.extend_from_slice(other_column);
        }

        Ok(())
    }

    /// The row/column dimensions of a structured cloud, from its `width` and `height`
    /// settings.
    pub fn structured_dims(&self) -> Option<(usize, usize)> {
        let width = self.setting("width")?.trim().parse::<usize>().ok()?;
        let height = self.setting("height")?.trim().parse::<usize>().ok()?;

        if width * height == self.points.len() && width > 0 && height > 0 {
            Some((width, height))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod test {
    use super::PointCloud;
    use crate::math::{Matrix, Point, Vector};

    fn cloud() -> PointCloud {
        PointCloud::from_flat(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]).unwrap()
    }

    #[test]
    fn added_property_defaults_to_zero() {
        let mut pc = cloud();
        pc.add_property("intensity").unwrap();
        pc.set_named_property(1, "intensity", 3.0).unwrap();
        let n = pc.num_properties();
        pc.add_property("rgb").unwrap();

        assert_eq!(pc.num_properties(), n + 1);
        assert_eq!(pc.named_property_column("rgb").unwrap(), &[0.0, 0.0, 0.0]);
        assert_eq!(pc.named_property(1, "intensity").unwrap(), 3.0);
        assert!(pc.add_property("rgb").is_err());

        let idx = pc.add_point(Point::new(5.0, 5.0, 5.0));
        assert_eq!(pc.property(idx, 0).unwrap(), 0.0);
        assert!(pc.property(idx + 1, 0).is_err());
    }

    #[test]
    fn set_properties_is_row_major() {
        let mut pc = cloud();
        pc.add_property("a").unwrap();
        pc.add_property("b").unwrap();
        pc.set_properties(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(pc.property_column(0).unwrap(), &[1.0, 3.0, 5.0]);
        assert_eq!(pc.property_column(1).unwrap(), &[2.0, 4.0, 6.0]);
        assert!(pc.set_properties(&[1.0]).is_err());
    }

    #[test]
    fn join_requires_identical_properties() {
        let mut a = cloud();
        let mut b = cloud();
        b.add_property("rgb").unwrap();
        assert!(a.join(&b).is_err());
        assert_eq!(a.num_points(), 3);

        a.add_property("rgb").unwrap();
        a.join(&b).unwrap();
        assert_eq!(a.num_points(), 6);
        assert_eq!(a.named_property_column("rgb").unwrap().len(), 6);
    }

    #[test]
    fn normals_follow_rotations() {
        let mut pc = cloud();
        pc.add_property_with_values("normal_x", vec![1.0; 3]).unwrap();
        pc.add_property("normal_y").unwrap();
        pc.add_property("normal_z").unwrap();

        let rot = na::Rotation3::from_axis_angle(&Vector::z_axis(), std::f64::consts::FRAC_PI_2);
        let linear: Matrix<f64> = *rot.matrix();
        pc.transform(&linear, &Vector::zeros());

        assert_relative_eq!(pc.named_property(0, "normal_x").unwrap(), 0.0, epsilon = 1.0e-12);
        assert_relative_eq!(pc.named_property(0, "normal_y").unwrap(), 1.0, epsilon = 1.0e-12);
        assert_relative_eq!(pc.point(1).unwrap(), Point::new(0.0, 1.0, 0.0), epsilon = 1.0e-12);
    }
}
