//! Storage port: repository traits for persistence.

use std::future::Future;

use chrono::Duration;
use homechart_domain::error::HomeChartError;
use homechart_domain::id::{HomeId, SensorName, SessionToken};
use homechart_domain::reading::Reading;
use homechart_domain::series::TimeSeries;
use homechart_domain::time::Timestamp;

/// Source of sensor readings.
pub trait ReadingRepository {
    /// Persist a new reading.
    fn record(&self, reading: Reading)
    -> impl Future<Output = Result<Reading, HomeChartError>> + Send;

    /// Load the readings of `sensor` in `home_id` recorded within
    /// `[from, to]`, inclusive on both ends.
    ///
    /// The returned series is ascending with unique timestamps.
    fn find_series(
        &self,
        home_id: HomeId,
        sensor: &SensorName,
        from: Timestamp,
        to: Timestamp,
    ) -> impl Future<Output = Result<TimeSeries, HomeChartError>> + Send;
}

/// Server-side session attributes.
pub trait SessionStore {
    /// Open a session for `home_id`, valid for `ttl` from now.
    fn open_session(
        &self,
        home_id: HomeId,
        ttl: Duration,
    ) -> impl Future<Output = Result<SessionToken, HomeChartError>> + Send;

    /// Home bound to `token`, or `None` when the session is unknown or expired.
    fn home_for_session(
        &self,
        token: SessionToken,
    ) -> impl Future<Output = Result<Option<HomeId>, HomeChartError>> + Send;
}
