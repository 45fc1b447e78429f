//! Axis Aligned Bounding Box.

use crate::bounding_volume::BoundingVolume;
use crate::math::{Isometry, Point, Real, Vector, DIM};
use na;

/// An Axis-Aligned Bounding Box.
///
/// The box is valid when `mins <= maxs` componentwise. An invalid box, as returned by
/// [`Aabb::new_invalid`], is the neutral element of [`BoundingVolume::merge`].
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct Aabb {
    /// The point with minimum coordinates.
    pub mins: Point<Real>,
    /// The point with maximum coordinates.
    pub maxs: Point<Real>,
}

impl Aabb {
    /// The vertex indices of each edge of this `Aabb`, taken from the `self.vertices()` array.
    pub const EDGES_VERTEX_IDS: [(usize, usize); 12] = [
        (0, 1),
        (1, 2),
        (3, 2),
        (0, 3),
        (4, 5),
        (5, 6),
        (7, 6),
        (4, 7),
        (0, 4),
        (1, 5),
        (2, 6),
        (3, 7),
    ];

    /// The vertex indices of each face of this `Aabb`, counter-clockwise when seen from
    /// outside the box.
    pub const FACES_VERTEX_IDS: [(usize, usize, usize, usize); 6] = [
        (1, 2, 6, 5),
        (0, 4, 7, 3),
        (2, 3, 7, 6),
        (0, 1, 5, 4),
        (4, 5, 6, 7),
        (0, 3, 2, 1),
    ];

    /// Creates a new Aabb.
    #[inline]
    pub fn new(mins: Point<Real>, maxs: Point<Real>) -> Aabb {
        Aabb { mins, maxs }
    }

    /// Creates an invalid `Aabb` with `mins` components set to `Real::MAX` and `maxs`components
    /// set to `-Real::MAX`.
    #[inline]
    pub fn new_invalid() -> Self {
        Self::new(
            Vector::repeat(Real::MAX).into(),
            Vector::repeat(-Real::MAX).into(),
        )
    }

    /// Creates a new `Aabb` from its center and its half-extents.
    #[inline]
    pub fn from_half_extents(center: Point<Real>, half_extents: Vector<Real>) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    /// Creates a new `Aabb` from a set of points. Invalid if `pts` is empty.
    pub fn from_points<'a, I>(pts: I) -> Self
    where
        I: IntoIterator<Item = &'a Point<Real>>,
    {
        let mut result = Aabb::new_invalid();

        for pt in pts {
            result.take_point(*pt);
        }

        result
    }

    /// Is `mins <= maxs` on every axis?
    #[inline]
    pub fn is_valid(&self) -> bool {
        na::partial_le(&self.mins, &self.maxs)
    }

    /// The center of this `Aabb`.
    #[inline]
    pub fn center(&self) -> Point<Real> {
        na::center(&self.mins, &self.maxs)
    }

    /// The half extents of this `Aabb`.
    #[inline]
    pub fn half_extents(&self) -> Vector<Real> {
        (self.maxs - self.mins) * 0.5
    }

    /// The extents of this `Aabb`.
    #[inline]
    pub fn extents(&self) -> Vector<Real> {
        self.maxs - self.mins
    }

    /// The volume of this `Aabb`.
    #[inline]
    pub fn volume(&self) -> Real {
        let extents = self.extents();
        extents.x * extents.y * extents.z
    }

    /// Half of the surface area of this `Aabb`.
    #[inline]
    pub fn half_area(&self) -> Real {
        let extents = self.extents();
        extents.x * (extents.y + extents.z) + extents.y * extents.z
    }

    /// The index of the axis along which this `Aabb` is the longest.
    #[inline]
    pub fn longest_axis(&self) -> usize {
        self.extents().imax()
    }

    /// Enlarges this `Aabb` so it also contains the point `pt`.
    pub fn take_point(&mut self, pt: Point<Real>) {
        self.mins = self.mins.coords.inf(&pt.coords).into();
        self.maxs = self.maxs.coords.sup(&pt.coords).into();
    }

    /// Computes the `Aabb` bounding `self` transformed by `m`.
    #[inline]
    pub fn transform_by(&self, m: &Isometry<Real>) -> Self {
        let ls_center = self.center();
        let center = m * ls_center;
        let ws_half_extents = m.rotation.to_rotation_matrix().matrix().abs() * self.half_extents();

        Aabb::new(center + (-ws_half_extents), center + ws_half_extents)
    }

    /// Does this AABB contain a point expressed in the same coordinate frame as `self`?
    #[inline]
    pub fn contains_local_point(&self, point: &Point<Real>) -> bool {
        for i in 0..DIM {
            if point[i] < self.mins[i] || point[i] > self.maxs[i] {
                return false;
            }
        }

        true
    }

    /// The point of this `Aabb` closest to `point`, which is `point` itself when inside.
    #[inline]
    pub fn clamp_local_point(&self, point: &Point<Real>) -> Point<Real> {
        point.coords.sup(&self.mins.coords).inf(&self.maxs.coords).into()
    }

    /// The (unsigned) distance from `point` to this `Aabb`, zero inside.
    #[inline]
    pub fn distance_to_local_point(&self, point: &Point<Real>) -> Real {
        let mins_point = self.mins - point;
        let point_maxs = point - self.maxs;
        let shift = mins_point.sup(&point_maxs).sup(&Vector::zeros());
        shift.norm()
    }

    /// Projects a point on the boundary of this `Aabb`.
    ///
    /// Returns the projection and whether `point` is inside. Inside points are projected on
    /// the closest face.
    pub fn project_local_point(&self, point: &Point<Real>) -> (Point<Real>, bool) {
        if !self.contains_local_point(point) {
            return (self.clamp_local_point(point), false);
        }

        let mins_point = point - self.mins;
        let maxs_point = self.maxs - point;
        let mut best = Real::MAX;
        let mut projection = *point;

        for i in 0..DIM {
            if mins_point[i] < best {
                best = mins_point[i];
                projection = *point;
                projection[i] = self.mins[i];
            }

            if maxs_point[i] < best {
                best = maxs_point[i];
                projection = *point;
                projection[i] = self.maxs[i];
            }
        }

        (projection, true)
    }

    /// The signed distance from `point` to the boundary of this `Aabb`, negative inside.
    pub fn signed_distance_to_local_point(&self, point: &Point<Real>) -> Real {
        let (proj, inside) = self.project_local_point(point);
        let dist = na::distance(&proj, point);

        if inside {
            -dist
        } else {
            dist
        }
    }

    /// The distance between this `Aabb` and another one, zero if they intersect.
    #[inline]
    pub fn distance_to_aabb(&self, other: &Aabb) -> Real {
        let gap1 = other.mins - self.maxs;
        let gap2 = self.mins - other.maxs;
        gap1.sup(&gap2).sup(&Vector::zeros()).norm()
    }

    /// Computes the vertices of this `Aabb`.
    #[inline]
    pub fn vertices(&self) -> [Point<Real>; 8] {
        [
            Point::new(self.mins.x, self.mins.y, self.mins.z),
            Point::new(self.maxs.x, self.mins.y, self.mins.z),
            Point::new(self.maxs.x, self.maxs.y, self.mins.z),
            Point::new(self.mins.x, self.maxs.y, self.mins.z),
            Point::new(self.mins.x, self.mins.y, self.maxs.z),
            Point::new(self.maxs.x, self.mins.y, self.maxs.z),
            Point::new(self.maxs.x, self.maxs.y, self.maxs.z),
            Point::new(self.mins.x, self.maxs.y, self.maxs.z),
        ]
    }
}

impl BoundingVolume for Aabb {
    #[inline]
    fn center(&self) -> Point<Real> {
        self.center()
    }

    #[inline]
    fn intersects(&self, other: &Aabb) -> bool {
        na::partial_le(&self.mins, &other.maxs) && na::partial_ge(&self.maxs, &other.mins)
    }

    #[inline]
    fn contains(&self, other: &Aabb) -> bool {
        na::partial_le(&self.mins, &other.mins) && na::partial_ge(&self.maxs, &other.maxs)
    }

    #[inline]
    fn merge(&mut self, other: &Aabb) {
        self.mins = self.mins.inf(&other.mins);
        self.maxs = self.maxs.sup(&other.maxs);
    }

    #[inline]
    fn merged(&self, other: &Aabb) -> Aabb {
        Aabb {
            mins: self.mins.inf(&other.mins),
            maxs: self.maxs.sup(&other.maxs),
        }
    }

    #[inline]
    fn loosen(&mut self, amount: Real) {
        assert!(amount >= 0.0, "The loosening margin must be positive.");
        self.mins += Vector::repeat(-amount);
        self.maxs += Vector::repeat(amount);
    }

    #[inline]
    fn loosened(&self, amount: Real) -> Aabb {
        assert!(amount >= 0.0, "The loosening margin must be positive.");
        Aabb {
            mins: self.mins + Vector::repeat(-amount),
            maxs: self.maxs + Vector::repeat(amount),
        }
    }
}
