//! Internal representation of proximity information shared by the query backends.

use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::error::GeometryError;
use crate::geometry::{Geometry, StoredGeometry};
use crate::math::{Isometry, Point, Real, Vector};
use crate::query::{DistanceQueryResult, DistanceQuerySettings};

/// Stored geometry data seen under a world pose and a margin.
#[derive(Copy, Clone)]
pub(crate) struct Posed<'a> {
    pub geom: &'a StoredGeometry,
    pub pos: Isometry<Real>,
    pub margin: Real,
}

impl<'a> Posed<'a> {
    pub fn new(geom: &'a StoredGeometry, pos: Isometry<Real>, margin: Real) -> Self {
        Posed { geom, pos, margin }
    }

    /// The world-space bounding box, margin included. Invalid if empty.
    pub fn world_aabb(&self) -> Aabb {
        let local = self.geom.local_aabb();
        if local.is_valid() {
            local.transform_by(&self.pos).loosened(self.margin)
        } else {
            local
        }
    }

    /// Calls `f` on each child of a group, composed with the pose and margin of the group.
    pub fn for_each_child(
        &self,
        children: &[Geometry],
        mut f: impl FnMut(usize, &Posed<'_>) -> Result<(), GeometryError>,
    ) -> Result<(), GeometryError> {
        for (i, child) in children.iter().enumerate() {
            let pos = self.pos * child.current_isometry();
            let margin = self.margin + child.collision_margin();
            child.with_stored(|stored| f(i, &Posed::new(stored, pos, margin)))??;
        }

        Ok(())
    }
}

/// Closest points (or deepest points) between two objects.
///
/// `normal` points from the first object toward the second one and `point2` is always
/// `point1 + normal * dist` up to rounding errors. A zero normal means it could not be
/// determined.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct Proximity {
    pub dist: Real,
    pub point1: Point<Real>,
    pub point2: Point<Real>,
    pub normal: Vector<Real>,
    pub elem1: Option<usize>,
    pub elem2: Option<usize>,
}

impl Proximity {
    pub fn new(dist: Real, point1: Point<Real>, point2: Point<Real>, normal: Vector<Real>) -> Self {
        Proximity {
            dist,
            point1,
            point2,
            normal,
            elem1: None,
            elem2: None,
        }
    }

    /// The proximity between two distinct points.
    pub fn between_points(point1: Point<Real>, point2: Point<Real>) -> Self {
        let delta = point2 - point1;
        let dist = delta.norm();
        let normal = if dist > 0.0 { delta / dist } else { Vector::zeros() };
        Proximity::new(dist, point1, point2, normal)
    }

    /// Exchanges the roles of both objects.
    pub fn flipped(self) -> Self {
        Proximity {
            dist: self.dist,
            point1: self.point2,
            point2: self.point1,
            normal: -self.normal,
            elem1: self.elem2,
            elem2: self.elem1,
        }
    }

    pub fn transform_by(self, pos: &Isometry<Real>) -> Self {
        Proximity {
            point1: pos * self.point1,
            point2: pos * self.point2,
            normal: pos * self.normal,
            ..self
        }
    }

    /// The proximity between the objects enlarged by `m1` and `m2`.
    pub fn padded(self, m1: Real, m2: Real) -> Self {
        Proximity {
            dist: self.dist - m1 - m2,
            point1: self.point1 + self.normal * m1,
            point2: self.point2 - self.normal * m2,
            ..self
        }
    }

    pub fn with_elem1(self, elem1: Option<usize>) -> Self {
        Proximity { elem1, ..self }
    }

    pub fn with_elem2(self, elem2: Option<usize>) -> Self {
        Proximity { elem2, ..self }
    }

    /// The public result of a distance query, with gradients derived from the normal.
    pub fn to_result(self) -> DistanceQueryResult {
        DistanceQueryResult {
            d: self.dist,
            has_closest_points: true,
            has_gradients: self.normal.norm_squared() > 0.0,
            cp1: self.point1,
            cp2: self.point2,
            grad1: -self.normal,
            grad2: self.normal,
            elem1: self.elem1,
            elem2: self.elem2,
        }
    }
}

/// Bounds and tolerances driving a distance backend.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct DistanceOptions {
    /// Only proximities with a distance strictly smaller than this are reported.
    pub max_dist: Real,
    pub rel_err: Real,
    pub abs_err: Real,
}

impl DistanceOptions {
    pub fn exact(max_dist: Real) -> Self {
        DistanceOptions {
            max_dist,
            rel_err: 0.0,
            abs_err: 0.0,
        }
    }

    pub fn from_settings(settings: &DistanceQuerySettings) -> Self {
        DistanceOptions {
            max_dist: settings.upper_bound,
            rel_err: settings.rel_err,
            abs_err: settings.abs_err,
        }
    }

    pub fn with_max_dist(self, max_dist: Real) -> Self {
        DistanceOptions { max_dist, ..self }
    }

    /// The options to use on the objects stripped of margins summing to `margins`, so that
    /// the error bounds still hold once the margins are added back.
    pub fn unpadded(self, margins: Real) -> Self {
        DistanceOptions {
            max_dist: self.max_dist + margins,
            rel_err: self.rel_err,
            abs_err: self.abs_err - margins * self.rel_err,
        }
    }

    /// The cost below which a subtree with the given distance lower bound must be explored.
    ///
    /// Pruning a subtree when this reaches the best distance found so far keeps the result
    /// within `true_dist * (1 + rel_err) + abs_err`.
    #[inline]
    pub fn prune_cost(&self, lower_bound: Real) -> Real {
        lower_bound * (1.0 + self.rel_err) + self.abs_err
    }
}
