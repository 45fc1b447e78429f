use proxima3d::geometry::{Geometry, GeometryType};
use proxima3d::math::Point;
use proxima3d::transformation::to_trimesh::aabb_to_trimesh;

#[test]
fn cube_survives_a_distance_field_round_trip() {
    let cube = Geometry::from(aabb_to_trimesh(&Point::origin(), &Point::new(1.0, 1.0, 1.0)));

    let grid = cube.convert(GeometryType::VolumeGrid, 0.1).unwrap();
    assert_eq!(grid.geometry_type(), Ok(Some(GeometryType::VolumeGrid)));

    let mesh = grid
        .convert(GeometryType::TriangleMesh, 0.0)
        .unwrap()
        .triangle_mesh()
        .unwrap();
    assert!(mesh.is_watertight());
    assert!((mesh.volume() - 1.0).abs() < 0.05, "volume: {}", mesh.volume());

    // The source is left untouched.
    assert_eq!(cube.geometry_type(), Ok(Some(GeometryType::TriangleMesh)));
}

#[test]
fn iso_levels_offset_the_surface() {
    let cube = Geometry::from(aabb_to_trimesh(&Point::origin(), &Point::new(1.0, 1.0, 1.0)));
    let grid = cube.convert(GeometryType::VolumeGrid, 0.1).unwrap();

    let inner = grid
        .convert(GeometryType::TriangleMesh, -0.2)
        .unwrap()
        .triangle_mesh()
        .unwrap();
    assert!(inner.is_watertight());
    assert!((inner.volume() - 0.216).abs() < 0.02, "volume: {}", inner.volume());

    let cloud = grid.convert(GeometryType::PointCloud, 0.0).unwrap();
    assert!(cloud.num_elements().unwrap() > 0);
}
