use proxima3d::geometry::Geometry;
use proxima3d::math::{Isometry, Point, Vector};
use proxima3d::query::DistanceQuerySettings;
use proxima3d::shape::Primitive;

#[test]
fn separated_then_overlapping_unit_spheres() {
    let a = Geometry::from(Primitive::sphere(Point::origin(), 1.0));
    let mut b = Geometry::from(Primitive::sphere(Point::new(3.0, 0.0, 0.0), 1.0));

    assert_relative_eq!(a.distance_simple(&b, 0.0, 0.0).unwrap(), 1.0, epsilon = 1.0e-9);
    assert!(!a.collides(&b).unwrap());

    b.set_current_isometry(Isometry::translation(-1.5, 0.0, 0.0));
    assert!(a.collides(&b).unwrap());
    assert_relative_eq!(a.distance_simple(&b, 0.0, 0.0).unwrap(), -0.5, epsilon = 1.0e-9);
}

#[test]
fn closest_points_and_gradients() {
    let a = Geometry::from(Primitive::sphere(Point::origin(), 1.0));
    let b = Geometry::from(Primitive::sphere(Point::new(0.0, 4.0, 0.0), 1.0));

    let res = a.distance(&b).unwrap();
    assert_relative_eq!(res.d, 2.0, epsilon = 1.0e-9);
    assert!(res.has_closest_points);
    assert_relative_eq!(res.cp1, Point::new(0.0, 1.0, 0.0), epsilon = 1.0e-9);
    assert_relative_eq!(res.cp2, Point::new(0.0, 3.0, 0.0), epsilon = 1.0e-9);

    if res.has_gradients {
        assert_relative_eq!(res.grad1, -Vector::y(), epsilon = 1.0e-9);
        assert_relative_eq!(res.grad2, Vector::y(), epsilon = 1.0e-9);
    }
}

#[test]
fn upper_bound_short_circuits() {
    let a = Geometry::from(Primitive::sphere(Point::origin(), 1.0));
    let b = Geometry::from(Primitive::sphere(Point::new(10.0, 0.0, 0.0), 1.0));

    let settings = DistanceQuerySettings {
        upper_bound: 5.0,
        ..Default::default()
    };
    let res = a.distance_ext(&b, &settings).unwrap();
    assert_eq!(res.d, 5.0);
    assert!(!res.has_closest_points);
}

#[test]
fn ray_hits_the_nearest_surface() {
    let mut a = Geometry::from(Primitive::sphere(Point::origin(), 1.0));
    a.set_current_isometry(Isometry::translation(0.0, 0.0, 5.0));

    let hit = a
        .ray_cast(&Point::origin(), &Vector::z())
        .unwrap()
        .expect("the ray should hit the sphere");
    assert_relative_eq!(hit, Point::new(0.0, 0.0, 4.0), epsilon = 1.0e-9);

    assert!(a.ray_cast(&Point::origin(), &-Vector::z()).unwrap().is_none());
    assert!(a.ray_cast(&Point::origin(), &Vector::zeros()).unwrap().is_none());
}
