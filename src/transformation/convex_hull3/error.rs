use crate::error::GeometryError;

/// Errors generated by the convex-hull calculation.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConvexHullError {
    /// Less than four points were given.
    #[error("Less than 4 points were given to the convex-hull algorithm.")]
    IncompleteInput,
    /// Some input coordinates are NaN or infinite.
    #[error("Input points contain non-finite coordinates.")]
    NonFiniteInput,
    /// All the input points lie on a line or a plane.
    #[error("Input points are almost collinear or coplanar.")]
    Degenerate,
    /// The horizon of a new point could not be computed.
    #[error("Internal error: {0}")]
    InternalError(&'static str),
}

impl From<ConvexHullError> for GeometryError {
    fn from(err: ConvexHullError) -> Self {
        GeometryError::MalformedData(err.to_string())
    }
}
