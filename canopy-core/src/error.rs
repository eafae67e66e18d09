/// Errors returned by point cloud operations. All of them are deterministic input-validation or
/// data-sufficiency failures, so none of them is worth retrying with the same input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Invalid search radius {0}, the radius must be a positive finite number")]
    InvalidRadius(f64),
    #[error("The input contains no points")]
    EmptyInput,
    #[error("No points would remain after filtering")]
    NoPointsRemaining,
    #[error("No ground points found")]
    NoGroundPoints,
    #[error("No points with the target classification found")]
    NoTargetPoints,
    #[error("No building points found")]
    NoBuildingPoints,
    #[error("Point attribute '{0}' is not present in the point cloud")]
    MissingField(&'static str),
    #[error("The operation was cancelled")]
    Cancelled,
}

/// Convenience alias used throughout canopy
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for building an `InvalidParameter` error from anything printable
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }
}
