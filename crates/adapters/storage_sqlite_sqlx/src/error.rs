//! Storage-specific error type wrapping sqlx errors.

use homechart_domain::error::HomeChartError;

/// Errors originating from the `SQLite` storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A query or connection failed.
    #[error("database error")]
    Database(#[from] sqlx::Error),

    /// Failed to run migrations.
    #[error("migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored row violates a domain invariant.
    #[error("invalid home id {0} stored in database")]
    InvalidHomeId(i64),
}

impl From<StorageError> for HomeChartError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}
