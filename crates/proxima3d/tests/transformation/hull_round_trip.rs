use proxima3d::geometry::{Geometry, GeometryType};
use proxima3d::math::{Point, Real};
use proxima3d::shape::Primitive;
use proxima3d::transformation::to_trimesh::aabb_to_trimesh;
use proxima3d::GeometryError;

#[test]
fn mesh_hull_mesh_keeps_the_hull_volume() {
    let mut rng = oorandom::Rand64::new(7);
    let points: Vec<_> = (0..100)
        .map(|_| {
            Point::new(
                rng.rand_float() as Real,
                rng.rand_float() as Real,
                rng.rand_float() as Real,
            )
        })
        .collect();
    let hull = Geometry::from(proxima3d::shape::ConvexHull::new(points));

    let mesh = hull.convert(GeometryType::TriangleMesh, 0.0).unwrap();
    let volume = mesh.triangle_mesh().unwrap().volume();
    assert!(volume > 0.0 && volume < 1.0);

    let back = mesh
        .convert(GeometryType::ConvexHull, 0.0)
        .unwrap()
        .convert(GeometryType::TriangleMesh, 0.0)
        .unwrap();
    assert_relative_eq!(back.triangle_mesh().unwrap().volume(), volume, epsilon = 1.0e-9);
}

#[test]
fn primitives_convert_to_every_representation() {
    let ball = Geometry::from(Primitive::sphere(Point::origin(), 1.0));

    let mesh = ball.convert(GeometryType::TriangleMesh, 0.1).unwrap().triangle_mesh().unwrap();
    assert!(mesh.is_watertight());
    let exact = 4.0 / 3.0 * std::f64::consts::PI;
    assert!((mesh.volume() - exact).abs() < 0.05 * exact);

    for target in [GeometryType::PointCloud, GeometryType::VolumeGrid, GeometryType::ConvexHull] {
        let converted = ball.convert(target, 0.0).unwrap();
        assert_eq!(converted.geometry_type(), Ok(Some(target)));
    }

    assert!(matches!(
        ball.convert(GeometryType::Group, 0.0),
        Err(GeometryError::UnsupportedConversion { .. })
    ));
}

#[test]
fn concave_meshes_decompose_into_hull_groups() {
    let mut mesh = aabb_to_trimesh(&Point::origin(), &Point::new(1.0, 1.0, 1.0));
    mesh.append(&aabb_to_trimesh(&Point::new(3.0, 0.0, 0.0), &Point::new(4.0, 1.0, 1.0)));
    let mesh = Geometry::from(mesh);

    let parts = mesh.convert(GeometryType::ConvexHull, 0.05).unwrap();
    assert_eq!(parts.geometry_type(), Ok(Some(GeometryType::Group)));
    assert_eq!(parts.num_elements().unwrap(), 2);

    let probe = Geometry::from(Primitive::point(Point::new(2.0, 0.5, 0.5)));
    assert!(matches!(
        probe.distance(&parts),
        Err(GeometryError::UnsupportedOperation { .. })
    ));
}
