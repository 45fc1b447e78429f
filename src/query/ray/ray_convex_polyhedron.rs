use crate::math::Real;
use crate::query::{Ray, RayCast};
use crate::shape::ConvexPolyhedron;

impl RayCast for ConvexPolyhedron {
    /// Clips the ray against every face plane.
    ///
    /// Degenerate polyhedra enclose no volume and are never hit.
    fn cast_local_ray(&self, ray: &Ray, max_time_of_impact: Real, solid: bool) -> Option<Real> {
        if self.is_degenerate() {
            return None;
        }

        let mut tmin: Real = 0.0;
        let mut tmax: Real = Real::MAX;
        let mut origin_inside = true;

        for (face, normal) in self.faces().iter().zip(self.face_normals()) {
            if normal.norm_squared() == 0.0 {
                continue;
            }

            let dist = normal.dot(&(ray.origin - self.vertices()[face[0] as usize]));
            let denom = normal.dot(&ray.dir);

            if dist > 0.0 {
                origin_inside = false;
            }

            if denom == 0.0 {
                if dist > 0.0 {
                    return None;
                }
            } else {
                let t = -dist / denom;
                if denom < 0.0 {
                    tmin = tmin.max(t);
                } else {
                    tmax = tmax.min(t);
                }

                if tmin > tmax {
                    return None;
                }
            }
        }

        let toi = if origin_inside && !solid { tmax } else { tmin };
        (toi <= max_time_of_impact).then_some(toi)
    }
}

#[cfg(test)]
mod test {
    use crate::math::{Point, Real, Vector};
    use crate::query::{Ray, RayCast};
    use crate::shape::ConvexPolyhedron;

    fn unit_cube() -> ConvexPolyhedron {
        let mut pts = vec![];
        for i in 0..8 {
            pts.push(Point::new(
                (i & 1) as Real,
                ((i >> 1) & 1) as Real,
                ((i >> 2) & 1) as Real,
            ));
        }
        ConvexPolyhedron::from_points(&pts)
    }

    #[test]
    fn ray_convex_polyhedron() {
        let cube = unit_cube();
        let ray = Ray::new(Point::new(0.5, 0.5, -2.0), Vector::z());
        assert_relative_eq!(cube.cast_local_ray(&ray, Real::MAX, true).unwrap(), 2.0);

        let inside = Ray::new(Point::new(0.5, 0.5, 0.5), Vector::z());
        assert_eq!(cube.cast_local_ray(&inside, Real::MAX, true), Some(0.0));
        assert_relative_eq!(cube.cast_local_ray(&inside, Real::MAX, false).unwrap(), 0.5);

        let miss = Ray::new(Point::new(2.0, 0.5, -2.0), Vector::z());
        assert!(cube.cast_local_ray(&miss, Real::MAX, true).is_none());

        let away = Ray::new(Point::new(0.5, 0.5, -2.0), -Vector::z());
        assert!(cube.cast_local_ray(&away, Real::MAX, true).is_none());
    }
}
