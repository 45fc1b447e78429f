//! Point sampling of the other geometry representations.

use crate::math::Real;
use crate::shape::{ConvexPolyhedron, PointCloud, Primitive, Segment, TriangleMesh};
use crate::transformation::to_trimesh::{aabb_to_trimesh, sphere_to_trimesh};
use crate::transformation::utils;

const MAX_SUBDIV: u32 = 1024;

/// Samples the surface of a mesh: all its vertices, plus the points of a regular barycentric
/// lattice with spacing `spacing` strictly inside each triangle.
///
/// The number of samples of a triangle grows with its area.
pub fn trimesh_to_point_cloud(mesh: &TriangleMesh, spacing: Real) -> PointCloud {
    let mut points = mesh.vertices().to_vec();

    for tri in mesh.triangles() {
        let m = utils::subdivisions(tri.diameter(), spacing, 1, MAX_SUBDIV);
        let inv_m = 1.0 / m as Real;

        for i in 1..m {
            for j in 1..m - i {
                let u = i as Real * inv_m;
                let v = j as Real * inv_m;
                points.push(tri.point_at([u, v, 1.0 - u - v]));
            }
        }
    }

    log::debug!(
        "sampled {} points on a mesh of {} triangles",
        points.len(),
        mesh.num_triangles()
    );
    PointCloud::from_points(points)
}

/// Samples the boundary of a primitive, with points at most about `spacing` apart.
pub fn primitive_to_point_cloud(prim: &Primitive, spacing: Real) -> PointCloud {
    match prim {
        Primitive::Point(pt) => PointCloud::from_points(vec![*pt]),
        Primitive::Segment { a, b } => {
            let seg = Segment::new(*a, *b);
            let n = utils::subdivisions(seg.length(), spacing, 1, MAX_SUBDIV);
            let points = (0..=n).map(|i| seg.point_at(i as Real / n as Real)).collect();
            PointCloud::from_points(points)
        }
        Primitive::Sphere { center, radius } => {
            PointCloud::from_points(sphere_to_trimesh(center, *radius, spacing).vertices().to_vec())
        }
        Primitive::Aabb { mins, maxs } => trimesh_to_point_cloud(&aabb_to_trimesh(mins, maxs), spacing),
    }
}

/// The vertices of a convex polyhedron plus samples of its faces.
pub fn convex_polyhedron_to_point_cloud(poly: &ConvexPolyhedron, spacing: Real) -> PointCloud {
    trimesh_to_point_cloud(&poly.to_trimesh(), spacing)
}

#[cfg(test)]
mod test {
    use super::{primitive_to_point_cloud, trimesh_to_point_cloud};
    use crate::math::Point;
    use crate::shape::{Primitive, TriangleMesh};

    #[test]
    fn triangle_samples_stay_inside() {
        let mesh = TriangleMesh::new(
            vec![Point::origin(), Point::new(1.0, 0.0, 0.0), Point::new(0.0, 1.0, 0.0)],
            vec![[0, 1, 2]],
        )
        .unwrap();

        let coarse = trimesh_to_point_cloud(&mesh, 10.0);
        assert_eq!(coarse.num_points(), 3);

        let fine = trimesh_to_point_cloud(&mesh, 0.1);
        assert!(fine.num_points() > 50);
        for pt in fine.points() {
            assert!(pt.x >= 0.0 && pt.y >= 0.0 && pt.x + pt.y <= 1.0 + 1.0e-12);
            assert_eq!(pt.z, 0.0);
        }
    }

    #[test]
    fn segment_samples_include_both_ends() {
        let seg = Primitive::segment(Point::origin(), Point::new(1.0, 0.0, 0.0));
        let pc = primitive_to_point_cloud(&seg, 0.25);
        assert_eq!(pc.num_points(), 5);
        assert_eq!(pc.points()[4], Point::new(1.0, 0.0, 0.0));
    }
}
