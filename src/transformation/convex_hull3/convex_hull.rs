use super::{ConvexHullError, HullFacet};
use crate::bounding_volume::Aabb;
use crate::math::{Point, Real};
use crate::utils::support_point_id;
use std::collections::HashMap;

/// Computes the convex hull of a set of 3d points.
///
/// Returns the hull vertices and its outward-oriented triangles. Degenerate inputs (less
/// than four points, collinear or coplanar sets) yield an empty hull.
pub fn convex_hull(points: &[Point<Real>]) -> (Vec<Point<Real>>, Vec<[u32; 3]>) {
    try_convex_hull(points).unwrap_or_else(|err| {
        log::debug!("convex hull computation failed: {err}");
        (Vec::new(), Vec::new())
    })
}

/// Computes the convex hull of a set of 3d points, reporting degenerate inputs as errors.
pub fn try_convex_hull(
    points: &[Point<Real>],
) -> Result<(Vec<Point<Real>>, Vec<[u32; 3]>), ConvexHullError> {
    if points.len() < 4 {
        return Err(ConvexHullError::IncompleteInput);
    }

    if points.iter().any(|p| !p.coords.iter().all(|x| x.is_finite())) {
        return Err(ConvexHullError::NonFiniteInput);
    }

    // Work on centered and scaled points so the tolerance is scale-independent.
    let aabb = Aabb::from_points(points);
    let diag = aabb.extents().norm();
    if diag == 0.0 {
        return Err(ConvexHullError::Degenerate);
    }
    let center = aabb.center();
    let normalized: Vec<_> = points
        .iter()
        .map(|p| Point::from((p - center) / diag))
        .collect();
    let eps = 1.0e-10;

    let mut facets = initial_tetrahedron(&normalized, eps)?;
    let mut edge_to_facet: HashMap<(usize, usize), usize> = HashMap::new();
    for (fid, facet) in facets.iter().enumerate() {
        for edge in facet.edges() {
            let _ = edge_to_facet.insert(edge, fid);
        }
    }

    let used: Vec<usize> = facets.iter().flat_map(|f| f.pts).collect();
    for pid in 0..normalized.len() {
        if !used.contains(&pid) {
            assign_to_facets(pid, &normalized, &mut facets, 0..4, eps);
        }
    }

    let mut i = 0;
    while i < facets.len() {
        if !facets[i].valid || facets[i].outside_points.is_empty() {
            i += 1;
            continue;
        }

        let eye = facets[i].furthest_point;
        let visible = visible_facets(i, eye, &normalized, &facets, &edge_to_facet, eps);
        let horizon = horizon_edges(&visible, &facets, &edge_to_facet);

        if horizon.is_empty() {
            return Err(ConvexHullError::InternalError("empty horizon"));
        }

        let mut orphans = Vec::new();
        for fid in &visible {
            let facet = &mut facets[*fid];
            facet.valid = false;
            orphans.append(&mut facet.outside_points);
            for edge in facet.edges() {
                let _ = edge_to_facet.remove(&edge);
            }
        }

        let first_new = facets.len();
        for (a, b) in horizon {
            let facet = HullFacet::new(a, b, eye, &normalized);
            for edge in facet.edges() {
                let _ = edge_to_facet.insert(edge, facets.len());
            }
            facets.push(facet);
        }

        let num_facets = facets.len();
        for pid in orphans {
            if pid != eye {
                assign_to_facets(pid, &normalized, &mut facets, first_new..num_facets, eps);
            }
        }

        i += 1;
    }

    let mut remap = vec![u32::MAX; points.len()];
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for facet in facets.iter().filter(|f| f.valid) {
        let mut tri = [0; 3];
        for (k, pid) in facet.pts.iter().enumerate() {
            if remap[*pid] == u32::MAX {
                remap[*pid] = vertices.len() as u32;
                vertices.push(points[*pid]);
            }
            tri[k] = remap[*pid];
        }
        indices.push(tri);
    }

    Ok((vertices, indices))
}

fn initial_tetrahedron(points: &[Point<Real>], eps: Real) -> Result<Vec<HullFacet>, ConvexHullError> {
    let p0 = support_point_id(&-na::Vector3::x(), points).ok_or(ConvexHullError::Degenerate)?;

    let farthest = |score: &dyn Fn(&Point<Real>) -> Real| {
        let mut best = (0, -1.0);
        for (i, pt) in points.iter().enumerate() {
            let s = score(pt);
            if s > best.1 {
                best = (i, s);
            }
        }
        best
    };

    let (p1, d1) = farthest(&|pt| na::distance_squared(pt, &points[p0]));
    if d1 <= eps * eps {
        return Err(ConvexHullError::Degenerate);
    }

    let dir = (points[p1] - points[p0]).normalize();
    let (p2, d2) = farthest(&|pt| (pt - points[p0]).cross(&dir).norm_squared());
    if d2 <= eps * eps {
        return Err(ConvexHullError::Degenerate);
    }

    let normal = (points[p1] - points[p0])
        .cross(&(points[p2] - points[p0]))
        .normalize();
    let (p3, d3) = farthest(&|pt| normal.dot(&(pt - points[p0])).abs());
    if d3 <= eps {
        return Err(ConvexHullError::Degenerate);
    }

    // Orient the base so that the apex is below it.
    let (p1, p2) = if normal.dot(&(points[p3] - points[p0])) > 0.0 {
        (p2, p1)
    } else {
        (p1, p2)
    };

    Ok(vec![
        HullFacet::new(p0, p1, p2, points),
        HullFacet::new(p0, p3, p1, points),
        HullFacet::new(p1, p3, p2, points),
        HullFacet::new(p2, p3, p0, points),
    ])
}

fn assign_to_facets(
    pid: usize,
    points: &[Point<Real>],
    facets: &mut [HullFacet],
    candidates: impl IntoIterator<Item = usize>,
    eps: Real,
) {
    for fid in candidates {
        if !facets[fid].valid {
            continue;
        }

        let dist = facets[fid].distance_to_point(pid, points);
        if dist > eps {
            facets[fid].add_outside_point(pid, dist);
            return;
        }
    }

    // Points above no facet are inside the hull and dropped.
}

/// The connected set of facets that `eye` can see, starting from facet `start`.
fn visible_facets(
    start: usize,
    eye: usize,
    points: &[Point<Real>],
    facets: &[HullFacet],
    edge_to_facet: &HashMap<(usize, usize), usize>,
    eps: Real,
) -> Vec<usize> {
    let mut visible = vec![start];
    let mut stack = vec![start];

    while let Some(fid) = stack.pop() {
        for (a, b) in facets[fid].edges() {
            if let Some(&neighbor) = edge_to_facet.get(&(b, a)) {
                if !visible.contains(&neighbor)
                    && facets[neighbor].distance_to_point(eye, points) > eps
                {
                    visible.push(neighbor);
                    stack.push(neighbor);
                }
            }
        }
    }

    visible
}

/// The directed edges of the visible region whose opposite facet is not visible.
fn horizon_edges(
    visible: &[usize],
    facets: &[HullFacet],
    edge_to_facet: &HashMap<(usize, usize), usize>,
) -> Vec<(usize, usize)> {
    let mut horizon = Vec::new();

    for fid in visible {
        for (a, b) in facets[*fid].edges() {
            match edge_to_facet.get(&(b, a)) {
                Some(neighbor) if visible.contains(neighbor) => {}
                _ => horizon.push((a, b)),
            }
        }
    }

    horizon
}

#[cfg(test)]
mod test {
    use super::try_convex_hull;
    use crate::math::{Point, Real};
    use crate::shape::TriangleMesh;

    #[test]
    fn cube_with_interior_points() {
        let mut points = Vec::new();
        for i in 0..8 {
            points.push(Point::new(
                (i & 1) as Real,
                ((i >> 1) & 1) as Real,
                ((i >> 2) & 1) as Real,
            ));
        }
        points.push(Point::new(0.5, 0.5, 0.5));
        points.push(Point::new(0.2, 0.7, 0.4));

        let (vertices, indices) = try_convex_hull(&points).unwrap();
        assert_eq!(vertices.len(), 8);

        let mesh = TriangleMesh::new(vertices, indices).unwrap();
        assert!(mesh.is_watertight());
        assert_relative_eq!(mesh.volume(), 1.0, epsilon = 1.0e-9);
    }

    #[test]
    fn random_cloud_hull_contains_all_points() {
        let mut rng = oorandom::Rand64::new(42);
        let points: Vec<_> = (0..200)
            .map(|_| Point::new(rng.rand_float(), rng.rand_float(), rng.rand_float()))
            .collect();

        let (vertices, indices) = try_convex_hull(&points).unwrap();
        let mesh = TriangleMesh::new(vertices, indices).unwrap();
        assert!(mesh.is_watertight());

        for tri in mesh.triangles() {
            let n = tri.scaled_normal();
            for pt in &points {
                assert!(n.dot(&(pt - tri.a)) <= 1.0e-9);
            }
        }
    }

    #[test]
    fn coplanar_points_are_degenerate() {
        let points = [
            Point::origin(),
            Point::new(1.0, 0.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
            Point::new(1.0, 1.0, 0.0),
        ];
        assert!(try_convex_hull(&points).is_err());
    }
}
