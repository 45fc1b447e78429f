use std::thread;

use proxima3d::geometry::{Geometry, StoredGeometry};
use proxima3d::math::{Isometry, Point, Real};
use proxima3d::shape::Primitive;
use proxima3d::transformation::to_trimesh::aabb_to_trimesh;

fn unit_cube() -> proxima3d::shape::TriangleMesh {
    aabb_to_trimesh(&Point::origin(), &Point::new(1.0, 1.0, 1.0))
}

#[test]
fn cache_is_built_once_per_version() {
    let mut mesh = Geometry::from(unit_cube());
    let ball = Geometry::from(Primitive::sphere(Point::new(3.0, 0.5, 0.5), 1.0));

    assert_eq!(mesh.with_stored(|s| s.cache().num_builds()).unwrap(), 0);
    assert_relative_eq!(mesh.distance_simple(&ball, 0.0, 0.0).unwrap(), 1.0, epsilon = 1.0e-9);
    let builds = mesh.with_stored(|s| s.cache().num_builds()).unwrap();
    assert!(mesh.with_stored(|s| s.cache().has_bvh()).unwrap());

    for _ in 0..10 {
        let _ = mesh.distance_simple(&ball, 0.0, 0.0).unwrap();
        let _ = mesh.distance_point(&Point::new(0.5, 0.5, 2.0)).unwrap();
    }
    assert_eq!(mesh.with_stored(|s| s.cache().num_builds()).unwrap(), builds);

    // Moving the geometry keeps the cache, editing its data does not.
    mesh.set_current_isometry(Isometry::translation(0.0, 0.0, 1.0));
    let _ = mesh.distance_simple(&ball, 0.0, 0.0).unwrap();
    assert_eq!(mesh.with_stored(|s| s.cache().num_builds()).unwrap(), builds);

    mesh.set_current_isometry(Isometry::identity());
    mesh.scale(2.0).unwrap();
    assert!(!mesh.with_stored(|s| s.cache().has_bvh()).unwrap());
    assert_relative_eq!(mesh.distance_simple(&ball, 0.0, 0.0).unwrap(), 0.0, epsilon = 1.0e-9);
}

#[test]
fn concurrent_queries_share_one_build() {
    let sequential = Geometry::from(unit_cube());
    let _ = sequential.distance_point(&Point::new(0.5, 0.5, 3.0)).unwrap();
    let expected = sequential.with_stored(|s| s.cache().num_builds()).unwrap();

    let shared = StoredGeometry::new(unit_cube()).into_shared();
    let results: Vec<Real> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let shared = &shared;
                scope.spawn(move || {
                    let mesh = Geometry::reference(shared);
                    mesh.distance_point(&Point::new(0.5, 0.5, 2.0 + i as Real)).unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (i, d) in results.iter().enumerate() {
        assert_relative_eq!(*d, 1.0 + i as Real, epsilon = 1.0e-9);
    }

    let mesh = Geometry::reference(&shared);
    assert_eq!(mesh.with_stored(|s| s.cache().num_builds()).unwrap(), expected);
}
