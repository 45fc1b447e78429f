//! Errors reported by geometry accessors, queries and conversions.

use crate::geometry::GeometryType;

/// Errors that can occur while accessing, modifying, converting or querying a geometry.
///
/// Every fallible operation of this crate validates its inputs before doing any work, so an
/// error always leaves the operands exactly as they were before the call.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// The operation is not supported for this type, or this pair of types.
    #[error("operation `{op}` is not supported between {type1} and {}", .type2.map(|t| t.name()).unwrap_or("nothing"))]
    UnsupportedOperation {
        /// Name of the operation that was attempted.
        op: &'static str,
        /// Type of the first operand.
        type1: GeometryType,
        /// Type of the second operand, if the operation has one.
        type2: Option<GeometryType>,
    },
    /// No conversion algorithm exists from the source type to the target type.
    #[error("no conversion from {from} to {to}")]
    UnsupportedConversion {
        /// The source geometry type.
        from: GeometryType,
        /// The requested target type.
        to: GeometryType,
    },
    /// An accessor was called for a variant that is not the active one.
    #[error("expected a {expected} but the geometry holds {}", .found.map(|t| t.name()).unwrap_or("nothing"))]
    TypeMismatch {
        /// The variant the accessor works with.
        expected: GeometryType,
        /// The variant actually held, `None` for an empty geometry.
        found: Option<GeometryType>,
    },
    /// An element, point or property index is out of range.
    #[error("index {index} is out of range (length {len})")]
    InvalidIndex {
        /// The offending index.
        index: usize,
        /// The number of valid indices.
        len: usize,
    },
    /// Some data violates the invariants of its container.
    #[error("malformed data: {0}")]
    MalformedData(String),
    /// A scalar or name argument is out of its valid domain.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// The scene item aliased by a reference geometry no longer exists.
    #[error("the referenced geometry has been dropped")]
    DanglingReference,
}

impl GeometryError {
    pub(crate) fn unsupported(
        op: &'static str,
        type1: GeometryType,
        type2: Option<GeometryType>,
    ) -> Self {
        GeometryError::UnsupportedOperation { op, type1, type2 }
    }

    pub(crate) fn check_index(index: usize, len: usize) -> Result<(), Self> {
        if index < len {
            Ok(())
        } else {
            Err(GeometryError::InvalidIndex { index, len })
        }
    }
}
