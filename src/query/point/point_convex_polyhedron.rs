use crate::math::{Point, Real};
use crate::query::gjk;
use crate::query::{PointProjection, PointQuery};
use crate::shape::ConvexPolyhedron;

impl PointQuery for ConvexPolyhedron {
    fn project_local_point(&self, pt: &Point<Real>, solid: bool) -> PointProjection {
        if self.is_degenerate() {
            // No interior: project on the convex set spanned by the vertices.
            return match gjk::project_point(self, pt) {
                Some(proj) => PointProjection::new(false, proj),
                None => PointProjection::new(true, *pt),
            };
        }

        match self.max_face_distance(pt) {
            Some((dist, face)) if dist <= 0.0 => {
                if solid {
                    PointProjection::new(true, *pt)
                } else {
                    PointProjection::new(true, pt - *self.face_normals()[face] * dist)
                }
            }
            _ => {
                let proj = gjk::project_point(self, pt).unwrap_or_else(|| {
                    // GJK gave up on a point grazing the boundary.
                    self.closest_face_point(pt)
                });
                PointProjection::new(false, proj)
            }
        }
    }
}

impl ConvexPolyhedron {
    fn closest_face_point(&self, pt: &Point<Real>) -> Point<Real> {
        let mut best = (Real::MAX, *pt);

        for i in 0..self.faces().len() {
            let proj = self.face(i).project_local_point(pt, true).point;
            let dist = na::distance_squared(&proj, pt);
            if dist < best.0 {
                best = (dist, proj);
            }
        }

        best.1
    }
}

#[cfg(test)]
mod test {
    use crate::math::{Point, Real};
    use crate::query::PointQuery;
    use crate::shape::ConvexPolyhedron;

    fn unit_cube() -> ConvexPolyhedron {
        let mut pts = vec![];
        for i in 0..8 {
            let coord = |b: i32| if (i >> b) & 1 == 1 { 1.0 } else { 0.0 };
            pts.push(Point::new(coord(0), coord(1), coord(2)));
        }
        ConvexPolyhedron::from_points(&pts)
    }

    #[test]
    fn outside_point_projects_on_boundary() {
        let cube = unit_cube();
        let pt = Point::new(2.0, 0.5, 0.5);
        let proj = cube.project_local_point(&pt, false);
        assert!(!proj.is_inside);
        assert_relative_eq!(proj.point, Point::new(1.0, 0.5, 0.5), epsilon = 1.0e-6);
        assert_relative_eq!(cube.distance_to_local_point(&pt, false), 1.0, epsilon = 1.0e-6);
    }

    #[test]
    fn inside_point_has_negative_distance() {
        let cube = unit_cube();
        let pt = Point::new(0.5, 0.5, 0.8);
        let d: Real = cube.distance_to_local_point(&pt, false);
        assert_relative_eq!(d, -0.2, epsilon = 1.0e-9);
        assert!(cube.contains_local_point(&pt));
    }
}
