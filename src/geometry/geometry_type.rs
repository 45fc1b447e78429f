use std::fmt;
use std::str::FromStr;

use crate::error::GeometryError;

/// The variant held by a [`GeometryData`](crate::geometry::GeometryData).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum GeometryType {
    /// A [`Primitive`](crate::shape::Primitive).
    Primitive,
    /// A [`TriangleMesh`](crate::shape::TriangleMesh).
    TriangleMesh,
    /// A [`PointCloud`](crate::shape::PointCloud).
    PointCloud,
    /// A [`VolumeGrid`](crate::shape::VolumeGrid).
    VolumeGrid,
    /// A [`ConvexHull`](crate::shape::ConvexHull).
    ConvexHull,
    /// An ordered list of child geometries.
    Group,
}

impl GeometryType {
    /// All the geometry types.
    pub const ALL: [GeometryType; 6] = [
        GeometryType::Primitive,
        GeometryType::TriangleMesh,
        GeometryType::PointCloud,
        GeometryType::VolumeGrid,
        GeometryType::ConvexHull,
        GeometryType::Group,
    ];

    /// The name of this type.
    pub fn name(self) -> &'static str {
        match self {
            GeometryType::Primitive => "Primitive",
            GeometryType::TriangleMesh => "TriangleMesh",
            GeometryType::PointCloud => "PointCloud",
            GeometryType::VolumeGrid => "VolumeGrid",
            GeometryType::ConvexHull => "ConvexHull",
            GeometryType::Group => "Group",
        }
    }
}

impl fmt::Display for GeometryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GeometryType {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GeometryType::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| GeometryError::InvalidParameter(format!("unknown geometry type `{s}`")))
    }
}

#[cfg(test)]
mod test {
    use super::GeometryType;

    #[test]
    fn type_names_parse_back() {
        for t in GeometryType::ALL {
            assert_eq!(t.name().parse::<GeometryType>().unwrap(), t);
        }
        assert!("Mesh".parse::<GeometryType>().is_err());
    }
}
