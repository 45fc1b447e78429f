use crate::bounding_volume::Aabb;
use crate::error::GeometryError;
use crate::math::{Matrix, Point, Real, Vector};

/// The convex hull of a set of points.
///
/// Only the generating points are stored: they do not need to be hull vertices. The hull
/// polytope itself is a derived [`ConvexPolyhedron`](crate::shape::ConvexPolyhedron), built
/// lazily by the geometry acceleration cache.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct ConvexHull {
    points: Vec<Point<Real>>,
}

impl ConvexHull {
    /// The convex hull of `points`.
    pub fn new(points: Vec<Point<Real>>) -> Self {
        ConvexHull { points }
    }

    /// The convex hull of a flattened list of coordinates.
    pub fn from_flat(coords: &[Real]) -> Result<Self, GeometryError> {
        if coords.len() % 3 != 0 {
            return Err(GeometryError::MalformedData(
                "flattened point list must have a length multiple of 3".to_string(),
            ));
        }

        Ok(Self::new(
            coords
                .chunks_exact(3)
                .map(|c| Point::new(c[0], c[1], c[2]))
                .collect(),
        ))
    }

    /// The generating points.
    #[inline]
    pub fn points(&self) -> &[Point<Real>] {
        &self.points
    }

    /// The number of generating points.
    #[inline]
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Is the generating set empty?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Adds a generating point.
    pub fn add_point(&mut self, pt: Point<Real>) {
        self.points.push(pt);
    }

    /// The `index`-th generating point.
    pub fn point(&self, index: usize) -> Result<Point<Real>, GeometryError> {
        GeometryError::check_index(index, self.points.len())?;
        Ok(self.points[index])
    }

    /// The bounding box of the generating points.
    pub fn local_aabb(&self) -> Aabb {
        Aabb::from_points(&self.points)
    }

    /// Translates every generating point.
    pub fn translate(&mut self, t: &Vector<Real>) {
        self.points.iter_mut().for_each(|pt| *pt += t);
    }

    /// Applies the affine map `x -> linear * x + t` to every generating point.
    pub fn transform(&mut self, linear: &Matrix<Real>, t: &Vector<Real>) {
        self.points
            .iter_mut()
            .for_each(|pt| *pt = Point::from(linear * pt.coords + t));
    }
}
