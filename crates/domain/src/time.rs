//! Time and timestamp helpers.

use chrono::{DateTime, Utc};

use crate::error::ValidationError;

/// UTC timestamp used for reading times, chart ranges and session expiry.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Parse an RFC 3339 string into a UTC [`Timestamp`].
///
/// # Errors
///
/// Returns [`ValidationError::InvalidTimestamp`] when `value` is malformed.
pub fn parse_rfc3339(value: &str) -> Result<Timestamp, ValidationError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.to_utc())
        .map_err(|_| ValidationError::InvalidTimestamp(value.to_owned()))
}

/// Build a [`Timestamp`] from whole seconds since the Unix epoch.
///
/// # Errors
///
/// Returns [`ValidationError::TimestampOutOfRange`] when chrono cannot
/// represent the instant.
pub fn from_unix_seconds(seconds: i64) -> Result<Timestamp, ValidationError> {
    DateTime::from_timestamp(seconds, 0).ok_or(ValidationError::TimestampOutOfRange(seconds))
}
