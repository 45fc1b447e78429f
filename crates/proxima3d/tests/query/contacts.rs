use proxima3d::geometry::Geometry;
use proxima3d::math::{Point, Real};
use proxima3d::shape::{PointCloud, Primitive};

#[test]
fn sphere_contacts_are_symmetric() {
    let a = Geometry::from(Primitive::sphere(Point::origin(), 1.0));
    let b = Geometry::from(Primitive::sphere(Point::new(1.5, 0.0, 0.0), 1.0));

    let ab = a.contacts(&b, 0.0, 0.0, 0).unwrap();
    let ba = b.contacts(&a, 0.0, 0.0, 0).unwrap();

    assert_eq!(ab.len(), 1);
    assert_eq!(ba.len(), 1);
    assert_relative_eq!(ab.depths[0], 0.5, epsilon = 1.0e-9);
    assert_relative_eq!(ab.depths[0], ba.depths[0], epsilon = 1.0e-9);
    assert_relative_eq!(ab.normals[0], -ba.normals[0], epsilon = 1.0e-9);
    assert_relative_eq!(ab.points1[0], ba.points2[0], epsilon = 1.0e-9);
}

#[test]
fn padding_extends_the_contact_region() {
    let a = Geometry::from(Primitive::sphere(Point::origin(), 1.0));
    let b = Geometry::from(Primitive::sphere(Point::new(2.5, 0.0, 0.0), 1.0));

    assert!(a.contacts(&b, 0.0, 0.0, 0).unwrap().is_empty());
    let padded = a.contacts(&b, 0.3, 0.3, 0).unwrap();
    assert_eq!(padded.len(), 1);
    assert!(padded.depths[0] >= 0.0);

    assert!(a.contacts(&b, -0.1, 0.0, 0).is_err());
    assert!(a.contacts(&b, Real::NAN, 0.0, 0).is_err());
}

#[test]
fn clustering_bounds_the_contact_count() {
    let points = (0..10)
        .flat_map(|i| (0..10).map(move |j| Point::new(i as Real * 0.1, j as Real * 0.1, 0.0)))
        .collect();
    let cloud = Geometry::from(PointCloud::from_points(points));
    let ball = Geometry::from(Primitive::sphere(Point::new(0.45, 0.45, 0.5), 0.6));

    let all = cloud.contacts(&ball, 0.0, 0.0, 0).unwrap();
    assert!(all.len() > 4);

    let clustered = cloud.contacts(&ball, 0.0, 0.0, 4).unwrap();
    assert_eq!(clustered.len(), 4);

    // Clusters keep actual contacts, the deepest one included.
    let deepest = all.depths.iter().cloned().fold(0.0, Real::max);
    let clustered_deepest = clustered.depths.iter().cloned().fold(0.0, Real::max);
    assert_relative_eq!(deepest, clustered_deepest, epsilon = 1.0e-12);
    for (pt, elem) in clustered.points1.iter().zip(&clustered.elems1) {
        let i = elem.expect("point contacts carry their point index");
        assert_eq!(all.points1[all.elems1.iter().position(|e| *e == Some(i)).unwrap()], *pt);
    }
}
