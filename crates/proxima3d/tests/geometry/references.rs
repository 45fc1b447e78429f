use proxima3d::geometry::{Geometry, GeometryType, StoredGeometry};
use proxima3d::math::{Point, Vector};
use proxima3d::shape::{PointCloud, Primitive};
use proxima3d::GeometryError;

#[test]
fn references_alias_the_scene_data() {
    let shared = StoredGeometry::new(Primitive::sphere(Point::origin(), 1.0)).into_shared();
    let mut a = Geometry::reference(&shared);
    let b = Geometry::reference(&shared);
    assert!(!a.is_standalone());

    a.translate(&Vector::new(2.0, 0.0, 0.0)).unwrap();
    assert_eq!(
        b.primitive().unwrap(),
        Primitive::sphere(Point::new(2.0, 0.0, 0.0), 1.0)
    );

    // Cloning a reference gives a standalone copy that outlives the scene item.
    let c = b.clone();
    assert!(c.is_standalone());
    drop(shared);
    assert_eq!(a.distance_point(&Point::origin()), Err(GeometryError::DanglingReference));
    assert_eq!(b.geometry_type(), Err(GeometryError::DanglingReference));
    assert_eq!(c.geometry_type(), Ok(Some(GeometryType::Primitive)));
}

#[test]
fn point_cloud_properties_default_to_zero() {
    let mut pc = PointCloud::from_points(vec![Point::origin(), Point::new(1.0, 0.0, 0.0)]);
    pc.add_property("rgb").unwrap();
    assert_eq!(pc.num_properties(), 1);
    assert_eq!(pc.named_property_column("rgb").unwrap(), &[0.0, 0.0]);
    assert!(pc.add_property("rgb").is_err());

    let mut g = Geometry::from(pc);
    assert_eq!(g.geometry_type(), Ok(Some(GeometryType::PointCloud)));
    assert!(matches!(g.primitive(), Err(GeometryError::TypeMismatch { .. })));

    g.free();
    assert_eq!(g.geometry_type(), Ok(None));
    assert!(g.is_empty().unwrap());
}
