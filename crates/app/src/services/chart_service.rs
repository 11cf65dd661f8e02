//! Chart service: serves resampled sensor series to the chart front end.

use std::collections::BTreeMap;

use homechart_domain::error::HomeChartError;
use homechart_domain::id::{HomeId, SensorName};
use homechart_domain::reading::Reading;
use homechart_domain::resample::{calculate_bins, map_to_bins, to_milliseconds};
use homechart_domain::time::Timestamp;

use crate::ports::ReadingRepository;

/// Resampled values keyed by bin start in **milliseconds** since the epoch.
pub type ChartSeries = BTreeMap<i64, f64>;

/// Parameters of one chart query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartRequest {
    pub from: Timestamp,
    pub to: Timestamp,
    pub bins: i64,
}

/// Application service for chart data and reading ingestion.
pub struct ChartService<R> {
    repo: R,
}

impl<R: ReadingRepository> ChartService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Resample the readings of `sensor` onto `request.bins` evenly spaced
    /// bins covering `request.from..request.to`.
    ///
    /// The bin count is checked before the repository is queried. Bins that
    /// cannot be interpolated (no readings in range) hold `0.0`.
    ///
    /// # Errors
    ///
    /// Returns [`HomeChartError::Validation`] when `request.bins` is not in
    /// `1..=MAX_BINS`, or a storage error from the repository.
    ///
    /// [`MAX_BINS`]: homechart_domain::resample::MAX_BINS
    pub async fn resampled_series(
        &self,
        home_id: HomeId,
        sensor: &SensorName,
        request: ChartRequest,
    ) -> Result<ChartSeries, HomeChartError> {
        let bins = calculate_bins(request.from, request.to, request.bins)?;

        let (from, to) = if request.from <= request.to {
            (request.from, request.to)
        } else {
            (request.to, request.from)
        };
        let series = self.repo.find_series(home_id, sensor, from, to).await?;

        if series.is_empty() {
            tracing::warn!(%home_id, %sensor, %from, %to, "no readings in range, chart will be flat");
        }
        tracing::debug!(
            %home_id,
            %sensor,
            samples = series.len(),
            bins = bins.len(),
            width = bins.width(),
            "resampling series"
        );

        Ok(to_milliseconds(map_to_bins(&bins, &series)))
    }

    /// Store a reading after validating it.
    ///
    /// # Errors
    ///
    /// Returns [`HomeChartError::Validation`] for a non-finite value, or a
    /// storage error from the repository.
    pub async fn record_reading(&self, reading: Reading) -> Result<Reading, HomeChartError> {
        reading.validate()?;
        self.repo.record(reading).await
    }
}
