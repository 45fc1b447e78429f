//! Conversions between geometry representations, and convex decomposition of meshes.

pub use self::convex_decomposition::convex_decomposition;
pub use self::convex_hull3::{convex_hull, try_convex_hull, ConvexHullError};
pub use self::to_point_cloud::{
    convex_polyhedron_to_point_cloud, primitive_to_point_cloud, trimesh_to_point_cloud,
};
pub use self::to_volume_grid::{primitive_to_volume_grid, trimesh_to_volume_grid};

use crate::error::GeometryError;
use crate::geometry::{Geometry, GeometryData, GeometryType};
use crate::math::Real;
use crate::shape::{ConvexHull, ConvexPolyhedron, PointCloud, Primitive};

mod convex_decomposition;
mod convex_hull3;
mod to_point_cloud;
pub mod to_trimesh;
mod to_volume_grid;
pub mod utils;

/// Default resolution of a primitive: a sixteenth of its largest extent.
fn primitive_resolution(prim: &Primitive, param: Real) -> Real {
    if param > 0.0 {
        return param;
    }

    let extent = prim.local_aabb().extents().max();
    if extent > 0.0 {
        extent / 16.0
    } else {
        1.0
    }
}

fn or_default(param: Real, default: impl FnOnce() -> Real) -> Real {
    if param > 0.0 {
        param
    } else {
        default()
    }
}

/// Converts geometry data to another representation.
///
/// The meaning of `param` depends on the conversion, `0.0` selecting a default:
///
/// * to a point cloud: the sample spacing.
/// * mesh or primitive to a volume grid: the cell size.
/// * mesh to a convex hull: the concavity tolerance of a convex decomposition. Zero gives the
///   hull of all the vertices, other values give a group of hulls.
/// * point cloud to a mesh: the maximum edge length (zero for unbounded).
/// * primitive to a mesh: the maximum edge length of curved surfaces.
/// * volume grid to a mesh or a point cloud: the iso-level, which may be negative.
///
/// Converting to the same type returns a copy.
pub fn convert(
    data: &GeometryData,
    target: GeometryType,
    param: Real,
) -> Result<GeometryData, GeometryError> {
    let source = data.geometry_type();

    if !param.is_finite() {
        return Err(GeometryError::InvalidParameter(format!(
            "conversion parameters must be finite, got {param}"
        )));
    }

    if source == target {
        return Ok(data.clone());
    }

    if param < 0.0 && source != GeometryType::VolumeGrid {
        return Err(GeometryError::InvalidParameter(format!(
            "converting a {source} to a {target} needs a non-negative parameter, got {param}"
        )));
    }

    log::debug!("converting a {source} to a {target} with parameter {param}");

    let result: GeometryData = match (data, target) {
        (GeometryData::TriangleMesh(mesh), GeometryType::PointCloud) => {
            let spacing = or_default(param, || mesh.average_triangle_diameter());
            trimesh_to_point_cloud(mesh, spacing).into()
        }
        (GeometryData::TriangleMesh(mesh), GeometryType::VolumeGrid) => {
            let cell_size = or_default(param, || mesh.average_triangle_diameter());
            trimesh_to_volume_grid(mesh, cell_size)?.into()
        }
        (GeometryData::TriangleMesh(mesh), GeometryType::ConvexHull) => {
            if param == 0.0 {
                ConvexHull::new(mesh.vertices().to_vec()).into()
            } else {
                let parts: Vec<_> = convex_decomposition(mesh, param)
                    .into_iter()
                    .map(Geometry::from)
                    .collect();
                parts.into()
            }
        }
        (GeometryData::PointCloud(pc), GeometryType::TriangleMesh) => {
            let max_edge = if param > 0.0 { param } else { Real::INFINITY };
            to_trimesh::point_cloud_to_trimesh(pc, max_edge)?.into()
        }
        (GeometryData::PointCloud(pc), GeometryType::ConvexHull) => {
            ConvexHull::new(pc.points().to_vec()).into()
        }
        (GeometryData::Primitive(prim), GeometryType::TriangleMesh) => {
            to_trimesh::primitive_to_trimesh(prim, primitive_resolution(prim, param)).into()
        }
        (GeometryData::Primitive(prim), GeometryType::PointCloud) => {
            primitive_to_point_cloud(prim, primitive_resolution(prim, param)).into()
        }
        (GeometryData::Primitive(prim), GeometryType::VolumeGrid) => {
            primitive_to_volume_grid(prim, primitive_resolution(prim, param))?.into()
        }
        (GeometryData::Primitive(prim), GeometryType::ConvexHull) => {
            let mesh = to_trimesh::primitive_to_trimesh(prim, primitive_resolution(prim, param));
            ConvexHull::new(mesh.vertices().to_vec()).into()
        }
        (GeometryData::VolumeGrid(grid), GeometryType::TriangleMesh) => {
            to_trimesh::volume_grid_to_trimesh(grid, param).into()
        }
        (GeometryData::VolumeGrid(grid), GeometryType::PointCloud) => {
            let mesh = to_trimesh::volume_grid_to_trimesh(grid, param);
            PointCloud::from_points(mesh.vertices().to_vec()).into()
        }
        (GeometryData::ConvexHull(hull), GeometryType::TriangleMesh) => {
            ConvexPolyhedron::from_points(hull.points()).to_trimesh().into()
        }
        (GeometryData::ConvexHull(hull), GeometryType::PointCloud) => {
            let poly = ConvexPolyhedron::from_points(hull.points());
            let spacing = if param > 0.0 { param } else { Real::INFINITY };
            convex_polyhedron_to_point_cloud(&poly, spacing).into()
        }
        _ => {
            return Err(GeometryError::UnsupportedConversion {
                from: source,
                to: target,
            })
        }
    };

    Ok(result)
}

#[cfg(test)]
mod test {
    use super::convert;
    use crate::error::GeometryError;
    use crate::geometry::{GeometryData, GeometryType};
    use crate::math::Point;
    use crate::shape::{Primitive, TriangleMesh};
    use crate::transformation::to_trimesh::aabb_to_trimesh;

    #[test]
    fn same_type_is_a_copy() {
        let data = GeometryData::from(Primitive::sphere(Point::origin(), 1.0));
        let copy = convert(&data, GeometryType::Primitive, 0.0).unwrap();
        assert_eq!(copy.geometry_type(), GeometryType::Primitive);
    }

    #[test]
    fn unsupported_conversions() {
        let data = GeometryData::from(Primitive::sphere(Point::origin(), 1.0));
        assert!(matches!(
            convert(&data, GeometryType::Group, 0.0),
            Err(GeometryError::UnsupportedConversion { .. })
        ));
        assert!(matches!(
            convert(&data, GeometryType::TriangleMesh, -1.0),
            Err(GeometryError::InvalidParameter(_))
        ));
        assert!(matches!(
            convert(&data, GeometryType::TriangleMesh, f64::NAN),
            Err(GeometryError::InvalidParameter(_))
        ));
    }

    #[test]
    fn cube_round_trip_through_a_hull() {
        let data = GeometryData::from(aabb_to_trimesh(&Point::origin(), &Point::new(1.0, 2.0, 3.0)));
        let hull = convert(&data, GeometryType::ConvexHull, 0.0).unwrap();
        let mesh = convert(&hull, GeometryType::TriangleMesh, 0.0).unwrap();
        match mesh {
            GeometryData::TriangleMesh(mesh) => {
                assert!(mesh.is_watertight());
                assert_relative_eq!(mesh.volume(), 6.0, epsilon = 1.0e-9);
            }
            _ => panic!("expected a mesh"),
        }

        let parts = convert(&data, GeometryType::ConvexHull, 0.1).unwrap();
        assert_eq!(parts.geometry_type(), GeometryType::Group);
    }

    #[test]
    fn open_meshes_have_no_distance_field() {
        let mesh = TriangleMesh::new(
            vec![Point::origin(), Point::new(1.0, 0.0, 0.0), Point::new(0.0, 1.0, 0.0)],
            vec![[0, 1, 2]],
        )
        .unwrap();
        let data = GeometryData::from(mesh);
        assert!(matches!(
            convert(&data, GeometryType::VolumeGrid, 0.1),
            Err(GeometryError::MalformedData(_))
        ));
    }
}
