use proxima3d::bounding_volume::Aabb;
use proxima3d::geometry::{Geometry, GeometryType};
use proxima3d::math::{Isometry, Point};
use proxima3d::shape::{PointCloud, Primitive, VolumeGrid};
use proxima3d::transformation::to_trimesh::aabb_to_trimesh;
use proxima3d::GeometryError;

#[test]
fn element_counts_per_variant() {
    let mesh = Geometry::from(aabb_to_trimesh(&Point::origin(), &Point::new(1.0, 1.0, 1.0)));
    assert_eq!(mesh.num_elements().unwrap(), 12);
    let tri = mesh.element(3).unwrap();
    assert_eq!(tri.geometry_type(), Ok(Some(GeometryType::TriangleMesh)));
    assert_eq!(tri.num_elements().unwrap(), 1);
    assert_eq!(
        mesh.element(12).unwrap_err(),
        GeometryError::InvalidIndex { index: 12, len: 12 }
    );

    let cloud = Geometry::from(PointCloud::from_points(vec![Point::origin(); 5]));
    assert_eq!(cloud.num_elements().unwrap(), 5);

    let grid = Geometry::from(VolumeGrid::new(
        Aabb::new(Point::origin(), Point::new(1.0, 2.0, 3.0)),
        [2, 3, 4],
    ));
    assert_eq!(grid.num_elements().unwrap(), 24);

    let sphere = Geometry::from(Primitive::sphere(Point::origin(), 1.0));
    assert_eq!(sphere.num_elements().unwrap(), 1);
    assert_eq!(Geometry::new().num_elements().unwrap(), 0);
}

#[test]
fn group_distances_report_the_closest_child() {
    let near = Geometry::from(Primitive::sphere(Point::new(3.0, 0.0, 0.0), 1.0));
    let mut far = Geometry::from(Primitive::sphere(Point::origin(), 1.0));
    far.set_current_isometry(Isometry::translation(10.0, 0.0, 0.0));

    let mut group = Geometry::from(vec![far, near]);
    assert_eq!(group.num_elements().unwrap(), 2);

    let ball = Geometry::from(Primitive::sphere(Point::origin(), 1.0));
    let res = ball.distance(&group).unwrap();
    assert_relative_eq!(res.d, 1.0, epsilon = 1.0e-9);
    assert_eq!(res.elem2, Some(1));

    group
        .set_element(1, Geometry::from(Primitive::point(Point::new(20.0, 0.0, 0.0))))
        .unwrap();
    assert_relative_eq!(ball.distance_simple(&group, 0.0, 0.0).unwrap(), 8.0, epsilon = 1.0e-9);

    let mut sphere = ball.clone();
    assert!(sphere.set_element(0, Geometry::new()).is_err());
}

#[test]
fn overlapping_group_children_report_the_deepest_penetration() {
    let ball = Geometry::from(Primitive::sphere(Point::origin(), 1.0));
    let group = Geometry::from(vec![
        Geometry::from(Primitive::sphere(Point::new(1.5, 0.0, 0.0), 1.0)),
        Geometry::from(Primitive::sphere(Point::new(0.5, 0.0, 0.0), 1.0)),
    ]);

    let res = ball.distance(&group).unwrap();
    assert_relative_eq!(res.d, -1.5, epsilon = 1.0e-9);
    assert_eq!(res.elem2, Some(1));

    let res = group.distance(&ball).unwrap();
    assert_relative_eq!(res.d, -1.5, epsilon = 1.0e-9);
    assert_eq!(res.elem1, Some(1));
}

#[test]
fn point_inside_overlapping_group_children() {
    let group = Geometry::from(vec![
        Geometry::from(Primitive::sphere(Point::new(0.5, 0.0, 0.0), 1.0)),
        Geometry::from(Primitive::sphere(Point::origin(), 2.0)),
    ]);

    assert_relative_eq!(group.distance_point(&Point::origin()).unwrap(), -2.0, epsilon = 1.0e-9);
    let res = group
        .distance_point_ext(&Point::origin(), &Default::default())
        .unwrap();
    assert_eq!(res.elem1, Some(1));
}
