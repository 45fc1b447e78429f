use crate::geometry::{Geometry, GeometryType};
use crate::shape::{ConvexHull, PointCloud, Primitive, TriangleMesh, VolumeGrid};

/// The data held by a geometry: exactly one of the six supported representations.
#[derive(Clone, Debug)]
pub enum GeometryData {
    /// A parametric primitive.
    Primitive(Primitive),
    /// A triangle mesh.
    TriangleMesh(TriangleMesh),
    /// A point cloud.
    PointCloud(PointCloud),
    /// A volume grid, interpreted as a signed distance field.
    VolumeGrid(VolumeGrid),
    /// The convex hull of a point set.
    ConvexHull(ConvexHull),
    /// Child geometries whose coordinates are local to the group.
    Group(Vec<Geometry>),
}

impl GeometryData {
    /// The variant held.
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            GeometryData::Primitive(_) => GeometryType::Primitive,
            GeometryData::TriangleMesh(_) => GeometryType::TriangleMesh,
            GeometryData::PointCloud(_) => GeometryType::PointCloud,
            GeometryData::VolumeGrid(_) => GeometryType::VolumeGrid,
            GeometryData::ConvexHull(_) => GeometryType::ConvexHull,
            GeometryData::Group(_) => GeometryType::Group,
        }
    }

    /// The number of elements: triangles, points, cells, hull points or children.
    ///
    /// A primitive is a single element.
    pub fn num_elements(&self) -> usize {
        match self {
            GeometryData::Primitive(_) => 1,
            GeometryData::TriangleMesh(m) => m.num_triangles(),
            GeometryData::PointCloud(pc) => pc.num_points(),
            GeometryData::VolumeGrid(g) => g.num_cells(),
            GeometryData::ConvexHull(h) => h.num_points(),
            GeometryData::Group(children) => children.len(),
        }
    }

    /// Does this data contain nothing a query could hit?
    ///
    /// Groups are empty when all their children are (dangling children count as empty).
    pub fn is_empty(&self) -> bool {
        match self {
            GeometryData::Primitive(_) => false,
            GeometryData::TriangleMesh(m) => m.is_empty(),
            GeometryData::PointCloud(pc) => pc.is_empty(),
            GeometryData::VolumeGrid(g) => g.is_empty(),
            GeometryData::ConvexHull(h) => h.is_empty(),
            GeometryData::Group(children) => children.iter().all(|c| c.is_empty().unwrap_or(true)),
        }
    }
}

macro_rules! impl_from_shape(
    ($($Shape: ident),*) => {$(
        impl From<$Shape> for GeometryData {
            fn from(shape: $Shape) -> Self {
                GeometryData::$Shape(shape)
            }
        }
    )*}
);

impl_from_shape!(Primitive, TriangleMesh, PointCloud, VolumeGrid, ConvexHull);

impl From<Vec<Geometry>> for GeometryData {
    fn from(children: Vec<Geometry>) -> Self {
        GeometryData::Group(children)
    }
}
