//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`HomeChartError`] via `#[from]`.

/// Top-level error returned by application services.
#[derive(Debug, thiserror::Error)]
pub enum HomeChartError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("unauthorized: {0}")]
    Unauthorized(#[from] UnauthorizedError),

    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Invalid arguments supplied by a caller. Always raised before any partial
/// output is produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("bin count must be positive, got {0}")]
    InvalidBinCount(i64),

    #[error("bin count must be at most {max}, got {requested}")]
    TooManyBins { requested: i64, max: i64 },

    #[error("bin count is not an integer: {0}")]
    MalformedBinCount(String),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("timestamp out of range: {0}")]
    TimestampOutOfRange(i64),

    #[error("missing home id")]
    MissingHomeId,

    #[error("invalid home id: {0}")]
    InvalidHomeId(String),

    #[error("sensor name must not be empty")]
    EmptySensorName,

    #[error("reading value must be finite")]
    NonFiniteValue,

    #[error("malformed request body: {0}")]
    MalformedBody(String),
}

/// The caller could not be tied to a home.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnauthorizedError {
    #[error("no session")]
    MissingSession,

    #[error("session expired or unknown")]
    UnknownSession,
}
