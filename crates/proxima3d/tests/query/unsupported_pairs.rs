use proxima3d::bounding_volume::Aabb;
use proxima3d::geometry::{Geometry, GeometryType, StoredGeometry};
use proxima3d::math::{Point, Vector};
use proxima3d::shape::{ConvexHull, Primitive, VolumeGrid};
use proxima3d::transformation::to_trimesh::aabb_to_trimesh;
use proxima3d::GeometryError;

fn unit_grid() -> VolumeGrid {
    let bbox = Aabb::new(Point::origin(), Point::new(1.0, 1.0, 1.0));
    VolumeGrid::new(bbox, [4, 4, 4])
}

#[test]
fn grid_mesh_collisions_are_rejected_without_side_effects() {
    let shared = StoredGeometry::new(aabb_to_trimesh(&Point::origin(), &Point::new(1.0, 1.0, 1.0)))
        .into_shared();
    let mesh = Geometry::reference(&shared);
    let grid = Geometry::from(unit_grid());

    let err = grid.collides(&mesh).unwrap_err();
    assert_eq!(
        err,
        GeometryError::UnsupportedOperation {
            op: "collides",
            type1: GeometryType::VolumeGrid,
            type2: Some(GeometryType::TriangleMesh),
        }
    );

    let cache_untouched = mesh
        .with_stored(|s| !s.cache().has_bvh() && s.version() == 0)
        .unwrap();
    assert!(cache_untouched);
}

#[test]
fn hulls_only_pair_with_hulls() {
    let points = vec![
        Point::origin(),
        Point::new(1.0, 0.0, 0.0),
        Point::new(0.0, 1.0, 0.0),
        Point::new(0.0, 0.0, 1.0),
    ];
    let hull = Geometry::from(ConvexHull::new(points.clone()));
    let ball = Geometry::from(Primitive::sphere(Point::new(3.0, 0.0, 0.0), 1.0));

    assert!(matches!(
        hull.collides(&ball),
        Err(GeometryError::UnsupportedOperation { .. })
    ));

    let mut other = Geometry::from(ConvexHull::new(points));
    other.set_current_isometry(proxima3d::math::Isometry::translation(3.0, 0.0, 0.0));
    assert_relative_eq!(hull.distance_simple(&other, 0.0, 0.0).unwrap(), 2.0, epsilon = 1.0e-6);
    assert_relative_eq!(
        hull.support(&Vector::new(1.0, 0.1, 0.1)).unwrap(),
        Point::new(1.0, 0.0, 0.0),
        epsilon = 1.0e-9
    );
    assert!(ball.support(&Vector::x()).is_err());
}

#[test]
fn hulls_with_interior_generators() {
    let mut points: Vec<_> = (0..8)
        .map(|c| Point::new((c & 1) as f64, ((c >> 1) & 1) as f64, ((c >> 2) & 1) as f64))
        .collect();
    points.push(Point::new(0.5, 0.5, 0.5));
    points.push(Point::new(0.2, 0.7, 0.4));

    let hull = Geometry::from(ConvexHull::new(points.clone()));
    assert_relative_eq!(
        hull.support(&Vector::new(1.0, 0.1, 0.2)).unwrap(),
        Point::new(1.0, 1.0, 1.0),
        epsilon = 1.0e-9
    );

    let mut other = Geometry::from(ConvexHull::new(points));
    other.set_current_isometry(proxima3d::math::Isometry::translation(3.0, 0.0, 0.0));
    assert_relative_eq!(hull.distance_simple(&other, 0.0, 0.0).unwrap(), 2.0, epsilon = 1.0e-6);

    let mesh = hull.convert(GeometryType::TriangleMesh, 0.0).unwrap().triangle_mesh().unwrap();
    assert_relative_eq!(mesh.volume(), 1.0, epsilon = 1.0e-9);
}
