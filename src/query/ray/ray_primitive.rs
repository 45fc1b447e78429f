use crate::bounding_volume::Aabb;
use crate::math::Real;
use crate::query::{ray_toi_with_ball, ray_toi_with_capsule, Ray, RayCast};
use crate::shape::{Primitive, Segment};

impl Primitive {
    /// Casts a ray on this primitive, fattened by `margin` if it is a point or a segment.
    ///
    /// Solid primitives (spheres and boxes) ignore the margin.
    pub fn cast_local_ray_with_margin(
        &self,
        ray: &Ray,
        max_time_of_impact: Real,
        solid: bool,
        margin: Real,
    ) -> Option<Real> {
        let toi = match self {
            Primitive::Point(p) => ray_toi_with_ball(p, margin, ray, solid).1,
            Primitive::Segment { a, b } => {
                ray_toi_with_capsule(&Segment::new(*a, *b), margin, ray, solid).1
            }
            Primitive::Sphere { center, radius } => ray_toi_with_ball(center, *radius, ray, solid).1,
            Primitive::Aabb { mins, maxs } => {
                return Aabb::new(*mins, *maxs).cast_local_ray(ray, max_time_of_impact, solid)
            }
        };

        toi.filter(|toi| *toi <= max_time_of_impact)
    }
}

impl RayCast for Primitive {
    #[inline]
    fn cast_local_ray(&self, ray: &Ray, max_time_of_impact: Real, solid: bool) -> Option<Real> {
        self.cast_local_ray_with_margin(ray, max_time_of_impact, solid, 0.0)
    }
}
