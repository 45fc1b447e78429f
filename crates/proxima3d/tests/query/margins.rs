use proxima3d::geometry::Geometry;
use proxima3d::math::{Point, Real};
use proxima3d::shape::Primitive;

fn random_primitive(rng: &mut oorandom::Rand64) -> Primitive {
    let center = Point::new(
        rng.rand_float() * 10.0 - 5.0,
        rng.rand_float() * 10.0 - 5.0,
        rng.rand_float() * 10.0 - 5.0,
    );
    let size = 0.1 + rng.rand_float();

    if rng.rand_u64() % 2 == 0 {
        Primitive::sphere(center, size)
    } else {
        Primitive::aabb(center, center + proxima3d::math::Vector::repeat(size))
    }
}

#[test]
fn margins_never_increase_distances() {
    let mut rng = oorandom::Rand64::new(42);

    for _ in 0..200 {
        let mut a = Geometry::from(random_primitive(&mut rng));
        let b = Geometry::from(random_primitive(&mut rng));

        let mut last = a.distance_simple(&b, 0.0, 0.0).unwrap();
        for margin in [0.1, 0.5, 1.0] {
            a.set_collision_margin(margin).unwrap();
            let d = a.distance_simple(&b, 0.0, 0.0).unwrap();
            assert!(d <= last + 1.0e-6, "{d} > {last} with a margin of {margin}");
            last = d;
        }
    }
}

#[test]
fn sphere_margins_shift_distances_exactly() {
    let mut a = Geometry::from(Primitive::sphere(Point::origin(), 1.0));
    let b = Geometry::from(Primitive::sphere(Point::new(5.0, 0.0, 0.0), 1.0));

    a.set_collision_margin(0.75).unwrap();
    assert_relative_eq!(a.distance_simple(&b, 0.0, 0.0).unwrap(), 2.25, epsilon = 1.0e-9);
    assert!(a.within_distance(&b, 2.3).unwrap());
    assert!(!a.within_distance(&b, 2.2).unwrap());
    assert!(a.set_collision_margin(-1.0).is_err());
    assert_eq!(a.collision_margin(), 0.75);
    assert!(a.within_distance(&b, Real::NAN).is_err());
}
