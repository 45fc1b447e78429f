use crate::math::{Point, Real, Vector};
use crate::query::{PointProjection, PointQuery};
use crate::shape::{Triangle, TrianglePointLocation};

impl PointQuery for Triangle {
    #[inline]
    fn project_local_point(&self, pt: &Point<Real>, _: bool) -> PointProjection {
        let (proj, _) = self.project_local_point_and_get_location(pt);
        PointProjection::new(relative_eq!(proj, *pt), proj)
    }
}

impl Triangle {
    /// Projects `pt` on this triangle and returns the feature it was projected on.
    pub fn project_local_point_and_get_location(
        &self,
        pt: &Point<Real>,
    ) -> (Point<Real>, TrianglePointLocation) {
        let a = self.a;
        let b = self.b;
        let c = self.c;

        let ab = b - a;
        let ac = c - a;
        let ap = pt - a;

        let ab_ap = ab.dot(&ap);
        let ac_ap = ac.dot(&ap);

        if ab_ap <= 0.0 && ac_ap <= 0.0 {
            // Voronoï region of `a`.
            return (a, TrianglePointLocation::OnVertex(0));
        }

        let bp = pt - b;
        let ab_bp = ab.dot(&bp);
        let ac_bp = ac.dot(&bp);

        if ab_bp >= 0.0 && ac_bp <= ab_bp {
            // Voronoï region of `b`.
            return (b, TrianglePointLocation::OnVertex(1));
        }

        let cp = pt - c;
        let ab_cp = ab.dot(&cp);
        let ac_cp = ac.dot(&cp);

        if ac_cp >= 0.0 && ab_cp <= ac_cp {
            // Voronoï region of `c`.
            return (c, TrianglePointLocation::OnVertex(2));
        }

        let bc = c - b;
        let n = ab.cross(&ac);

        let vc = n.dot(&ab.cross(&ap));
        if vc < 0.0 && ab_ap >= 0.0 && ab_bp <= 0.0 {
            // Voronoï region of `ab`.
            let v = ab_ap / ab.norm_squared();
            return (a + ab * v, TrianglePointLocation::OnEdge(0, [1.0 - v, v]));
        }

        let vb = -n.dot(&ac.cross(&cp));
        if vb < 0.0 && ac_ap >= 0.0 && ac_cp <= 0.0 {
            // Voronoï region of `ac`.
            let w = ac_ap / ac.norm_squared();
            return (a + ac * w, TrianglePointLocation::OnEdge(2, [1.0 - w, w]));
        }

        let va = n.dot(&bc.cross(&bp));
        if va < 0.0 && ac_bp - ab_bp >= 0.0 && ab_cp - ac_cp >= 0.0 {
            // Voronoï region of `bc`.
            let w = bc.dot(&bp) / bc.norm_squared();
            return (b + bc * w, TrianglePointLocation::OnEdge(1, [1.0 - w, w]));
        }

        // Voronoï region of the face.
        // NOTE: the denominator vanishes when the triangle is degenerate.
        if va + vb + vc != 0.0 {
            let denom = 1.0 / (va + vb + vc);
            let v = vb * denom;
            let w = vc * denom;
            return (
                a + ab * v + ac * w,
                TrianglePointLocation::OnFace([1.0 - v - w, v, w]),
            );
        }

        project_on_closest_edge(self, pt)
    }
}

fn project_on_closest_edge(tri: &Triangle, pt: &Point<Real>) -> (Point<Real>, TrianglePointLocation) {
    let mut best = (tri.a, TrianglePointLocation::OnVertex(0));
    let mut best_dist = Real::MAX;
    // Edge ids follow `TrianglePointLocation::OnEdge`: AB, BC, AC.
    let edges = [(tri.a, tri.b), (tri.b, tri.c), (tri.a, tri.c)];

    for (i, (p1, p2)) in edges.into_iter().enumerate() {
        let dir: Vector<Real> = p2 - p1;
        let sq_len = dir.norm_squared();
        let t = if sq_len > 0.0 {
            ((pt - p1).dot(&dir) / sq_len).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let proj = p1 + dir * t;
        let dist = na::distance_squared(&proj, pt);

        if dist < best_dist {
            best_dist = dist;
            best = (proj, TrianglePointLocation::OnEdge(i as u32, [1.0 - t, t]));
        }
    }

    best
}

#[cfg(test)]
mod test {
    use crate::math::{Point, Real};
    use crate::shape::{Triangle, TrianglePointLocation};

    fn tri() -> Triangle {
        Triangle::new(
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, 0.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
        )
    }

    #[test]
    fn project_on_each_feature() {
        let t = tri();

        let (p, loc) = t.project_local_point_and_get_location(&Point::new(-1.0, -1.0, 0.5));
        assert_eq!(p, t.a);
        assert!(matches!(loc, TrianglePointLocation::OnVertex(0)));

        let (p, loc) = t.project_local_point_and_get_location(&Point::new(0.5, -1.0, 0.0));
        assert_relative_eq!(p, Point::new(0.5, 0.0, 0.0));
        assert!(matches!(loc, TrianglePointLocation::OnEdge(0, _)));

        let (p, loc) = t.project_local_point_and_get_location(&Point::new(1.0, 1.0, 0.0));
        assert_relative_eq!(p, Point::new(0.5, 0.5, 0.0));
        assert!(matches!(loc, TrianglePointLocation::OnEdge(1, _)));

        let (p, loc) = t.project_local_point_and_get_location(&Point::new(0.25, 0.25, 3.0));
        assert_relative_eq!(p, Point::new(0.25, 0.25, 0.0));
        match loc {
            TrianglePointLocation::OnFace(bcoords) => {
                assert_relative_eq!(t.point_at(bcoords), p);
            }
            _ => panic!("expected a face projection"),
        }
    }

    #[test]
    fn project_on_degenerate_triangle() {
        let t = Triangle::new(
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, 0.0, 0.0),
            Point::new(2.0, 0.0, 0.0),
        );
        let (p, _) = t.project_local_point_and_get_location(&Point::new(1.5, 1.0, 0.0));
        assert_relative_eq!(p, Point::new(1.5, 0.0, 0.0));
        assert_relative_eq!(na::distance(&p, &Point::new(1.5, 1.0, 0.0)), 1.0 as Real);
    }
}
