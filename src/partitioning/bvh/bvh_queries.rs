use super::{Bvh, BvhNode};
use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::math::{Point, Real};
use crate::query::{Ray, RayCast};

impl Bvh {
    /// Iterates through all the leaves with an AABB intersecting the given `aabb`.
    pub fn intersect_aabb<'a>(&'a self, aabb: &'a Aabb) -> impl Iterator<Item = u32> + 'a {
        self.leaves(|node: &BvhNode| node.aabb().intersects(aabb))
    }

    /// Finds the leaf closest to `point` using the provided leaf distance function.
    ///
    /// The `primitive_check` maps a leaf index to its distance to `point` together with any
    /// extra data the caller needs. The `Real` argument given to that closure is the distance
    /// of the closest leaf found so far (or `max_distance` if none was found so far).
    pub fn project_point<T>(
        &self,
        point: &Point<Real>,
        max_distance: Real,
        primitive_check: impl FnMut(u32, Real) -> Option<(Real, T)>,
    ) -> Option<(u32, (Real, T))> {
        self.find_best(
            max_distance,
            |node: &BvhNode, _| node.aabb().distance_to_local_point(point),
            primitive_check,
        )
    }

    /// Casts a ray on this BVH using the provided leaf ray-cast function.
    ///
    /// The `primitive_check` delegates the ray-casting task to an external function that
    /// is assumed to map a leaf index to an actual geometry to cast a ray on. The `Real` argument
    /// given to that closure is the time of impact of the closest hit found so far (or is equal
    /// to `max_time_of_impact` if no hit was found so far).
    pub fn cast_ray(
        &self,
        ray: &Ray,
        max_time_of_impact: Real,
        primitive_check: impl FnMut(u32, Real) -> Option<Real>,
    ) -> Option<(u32, Real)> {
        self.find_best(
            max_time_of_impact,
            |node: &BvhNode, best_so_far| {
                node.aabb()
                    .cast_local_ray(ray, best_so_far, true)
                    .unwrap_or(Real::MAX)
            },
            primitive_check,
        )
    }
}
