//! Distance between a triangle mesh and other geometries, by branch-and-bound on its BVH.

use crate::math::{Isometry, Point, Real};
use crate::partitioning::{Bvh, BvhNode};
use crate::query::distance::distance_point::triangle_point;
use crate::query::distance::distance_point_cloud::closest_over_points;
use crate::query::distance::distance_primitive::triangle_primitive;
use crate::query::distance::distance_support_map::triangle_triangle;
use crate::query::proximity::{DistanceOptions, Proximity};
use crate::shape::{PointCloud, Primitive, TriangleMesh};

/// The triangle of `mesh` closest to `pt`, both expressed in the frame of the mesh.
pub(crate) fn mesh_point(
    mesh: &TriangleMesh,
    bvh: &Bvh,
    pt: &Point<Real>,
    opts: &DistanceOptions,
) -> Option<Proximity> {
    bvh.find_best(
        opts.max_dist,
        |node: &BvhNode, _| opts.prune_cost(node.aabb().distance_to_local_point(pt)),
        |i, best| {
            let prox = triangle_point(&mesh.triangle(i), pt).with_elem1(Some(i as usize));
            (prox.dist < best).then_some((prox.dist, prox))
        },
    )
    .map(|(_, (_, prox))| prox)
}

/// Distance between a mesh and a primitive placed by `pos12` in the frame of the mesh.
pub(crate) fn mesh_primitive(
    mesh: &TriangleMesh,
    bvh: &Bvh,
    prim: &Primitive,
    pos12: &Isometry<Real>,
    opts: &DistanceOptions,
) -> Option<Proximity> {
    let prim_aabb = prim.local_aabb().transform_by(pos12);
    // No triangle can be deeper inside the primitive than this.
    let max_depth = prim_aabb.half_extents().norm();

    bvh.find_best(
        opts.max_dist,
        |node: &BvhNode, _| {
            let dist = node.aabb().distance_to_aabb(&prim_aabb);
            opts.prune_cost(if dist > 0.0 { dist } else { -max_depth })
        },
        |i, best| {
            let prox = triangle_primitive(&mesh.triangle(i), prim, pos12, best)?;
            Some((prox.dist, prox.with_elem1(Some(i as usize))))
        },
    )
    .map(|(_, (_, prox))| prox)
}

/// Distance between the surfaces of two meshes, `mesh2` being placed by `pos12` in the frame
/// of `mesh1`.
pub(crate) fn mesh_mesh(
    mesh1: &TriangleMesh,
    bvh1: &Bvh,
    mesh2: &TriangleMesh,
    bvh2: &Bvh,
    pos12: &Isometry<Real>,
    opts: &DistanceOptions,
) -> Option<Proximity> {
    bvh1.find_best_pair(
        bvh2,
        pos12,
        opts.max_dist,
        |aabb1, aabb2| opts.prune_cost(aabb1.distance_to_aabb(aabb2)),
        |i, j, best| {
            let tri2 = mesh2.triangle(j).transformed(pos12);
            let prox = triangle_triangle(&mesh1.triangle(i), &tri2, best)?
                .with_elem1(Some(i as usize))
                .with_elem2(Some(j as usize));
            Some((prox.dist, prox))
        },
    )
    .map(|(_, (_, prox))| prox)
}

/// Distance between a mesh and the points of a cloud placed by `pos12` in its frame.
pub(crate) fn mesh_point_cloud(
    mesh: &TriangleMesh,
    bvh: &Bvh,
    pc: &PointCloud,
    pos12: &Isometry<Real>,
    opts: &DistanceOptions,
) -> Option<Proximity> {
    let points = pc.points();

    closest_over_points(points.len(), opts.max_dist, |j, bound| {
        let pt = pos12 * points[j];
        mesh_point(mesh, bvh, &pt, &opts.with_max_dist(bound)).map(|p| p.with_elem2(Some(j)))
    })
}

#[cfg(test)]
mod test {
    use super::{mesh_mesh, mesh_point, mesh_primitive};
    use crate::math::{Isometry, Point, Real, Vector};
    use crate::partitioning::Bvh;
    use crate::query::proximity::DistanceOptions;
    use crate::shape::{Primitive, TriangleMesh};

    fn unit_cube() -> TriangleMesh {
        let vertices = (0..8)
            .map(|i| Point::new((i & 1) as Real, ((i >> 1) & 1) as Real, ((i >> 2) & 1) as Real))
            .collect();
        let indices = vec![
            [0, 2, 1],
            [1, 2, 3],
            [4, 5, 6],
            [5, 7, 6],
            [0, 1, 4],
            [1, 5, 4],
            [2, 6, 3],
            [3, 6, 7],
            [0, 4, 2],
            [2, 4, 6],
            [1, 3, 5],
            [3, 7, 5],
        ];
        TriangleMesh::new(vertices, indices).unwrap()
    }

    fn bvh(mesh: &TriangleMesh) -> Bvh {
        Bvh::from_leaves(mesh.triangles().enumerate().map(|(i, t)| (i as u32, t.local_aabb())))
    }

    #[test]
    fn point_above_the_cube() {
        let mesh = unit_cube();
        let bvh = bvh(&mesh);
        let prox = mesh_point(&mesh, &bvh, &Point::new(0.5, 0.5, 3.0), &DistanceOptions::exact(Real::MAX)).unwrap();
        assert_relative_eq!(prox.dist, 2.0, epsilon = 1.0e-12);
        assert_relative_eq!(prox.point1.z, 1.0, epsilon = 1.0e-12);
    }

    #[test]
    fn sphere_next_to_the_cube() {
        let mesh = unit_cube();
        let bvh = bvh(&mesh);
        let ball = Primitive::sphere(Point::origin(), 0.25);
        let pos12 = Isometry::translation(2.0, 0.5, 0.5);
        let prox = mesh_primitive(&mesh, &bvh, &ball, &pos12, &DistanceOptions::exact(Real::MAX)).unwrap();
        assert_relative_eq!(prox.dist, 0.75, epsilon = 1.0e-12);
        assert_relative_eq!(prox.normal, Vector::x(), epsilon = 1.0e-12);
        assert!(prox.elem1.is_some());
    }

    #[test]
    fn stacked_cubes_are_separated_by_their_gap() {
        let mesh = unit_cube();
        let bvh = bvh(&mesh);
        let pos12 = Isometry::translation(0.2, 0.3, 1.5);
        let prox = mesh_mesh(&mesh, &bvh, &mesh, &bvh, &pos12, &DistanceOptions::exact(Real::MAX)).unwrap();
        assert_relative_eq!(prox.dist, 0.5, epsilon = 1.0e-6);
        assert!(mesh_mesh(&mesh, &bvh, &mesh, &bvh, &pos12, &DistanceOptions::exact(0.4)).is_none());
    }
}
