//! `SQLite` implementation of [`ReadingRepository`].
//!
//! Readings are stored with whole-second precision; recording a second
//! reading for the same home, sensor and second replaces the first.

use sqlx::SqlitePool;

use homechart_app::ports::ReadingRepository;
use homechart_domain::error::HomeChartError;
use homechart_domain::id::{HomeId, SensorName};
use homechart_domain::reading::Reading;
use homechart_domain::series::TimeSeries;
use homechart_domain::time::Timestamp;

use crate::error::StorageError;

const UPSERT: &str = r"
    INSERT INTO readings (home_id, sensor, recorded_at, value)
    VALUES (?, ?, ?, ?)
    ON CONFLICT (home_id, sensor, recorded_at) DO UPDATE SET value = excluded.value
";

const SELECT_SERIES: &str = r"
    SELECT recorded_at, value FROM readings
    WHERE home_id = ? AND sensor = ? AND recorded_at >= ? AND recorded_at <= ?
    ORDER BY recorded_at ASC
";

/// `SQLite`-backed reading repository.
pub struct SqliteReadingRepository {
    pool: SqlitePool,
}

impl SqliteReadingRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ReadingRepository for SqliteReadingRepository {
    async fn record(&self, reading: Reading) -> Result<Reading, HomeChartError> {
        sqlx::query(UPSERT)
            .bind(reading.home_id.get())
            .bind(reading.sensor.as_str())
            .bind(reading.recorded_at.timestamp())
            .bind(reading.value)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(reading)
    }

    async fn find_series(
        &self,
        home_id: HomeId,
        sensor: &SensorName,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<TimeSeries, HomeChartError> {
        let rows: Vec<(i64, f64)> = sqlx::query_as(SELECT_SERIES)
            .bind(home_id.get())
            .bind(sensor.as_str())
            .bind(from.timestamp())
            .bind(to.timestamp())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().collect())
    }
}
