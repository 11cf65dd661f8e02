//! Chart resampling: maps an irregular [`TimeSeries`] onto a fixed number of
//! evenly spaced bins.
//!
//! The pipeline is:
//! 1. [`calculate_bins`] splits `[start, end)` into `count` equal slots.
//! 2. [`map_to_bins`] evaluates [`interpolate`] at the start of every slot,
//!    always against the full series.
//! 3. [`to_milliseconds`] rescales the keys for the charting front end.
//!
//! [`resample`] runs steps 1 and 2 in one call.
//!
//! A bin with no usable neighbours evaluates to `0.0`. Charts will show a
//! zero rather than a gap for such bins.

use std::collections::BTreeMap;

use crate::error::ValidationError;
use crate::series::TimeSeries;
use crate::time::Timestamp;

/// Largest accepted bin count. Larger requests are rejected before any bin
/// is allocated.
pub const MAX_BINS: i64 = 100_000;

/// Resampled values keyed by the bin start, in whole seconds.
pub type ResampledSeries = BTreeMap<i64, f64>;

/// Evenly spaced evaluation points covering a time range.
#[derive(Debug, Clone, PartialEq)]
pub struct BinSet {
    width: f64,
    points: Vec<f64>,
}

impl BinSet {
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Width of every bin, in (possibly fractional) seconds.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Exact evaluation points, in seconds.
    #[must_use]
    pub fn points(&self) -> &[f64] {
        &self.points
    }

    /// Bin starts truncated to whole seconds.
    pub fn timestamps(&self) -> impl Iterator<Item = i64> + '_ {
        self.points.iter().map(|&point| truncate(point))
    }
}

#[allow(clippy::cast_possible_truncation)]
fn truncate(point: f64) -> i64 {
    point as i64
}

/// Split the range between `start` and `end` into `count` equal bins.
///
/// The width is `|end - start| / count`, so the bins always advance forward
/// from `start` even when `end` precedes it. The last bin starts at
/// `start + (count - 1) * width`.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidBinCount`] when `count <= 0` and
/// [`ValidationError::TooManyBins`] when `count > MAX_BINS`.
#[allow(clippy::cast_precision_loss)]
pub fn calculate_bins(
    start: Timestamp,
    end: Timestamp,
    count: i64,
) -> Result<BinSet, ValidationError> {
    let bins = usize::try_from(count)
        .ok()
        .filter(|&bins| bins > 0)
        .ok_or(ValidationError::InvalidBinCount(count))?;
    if count > MAX_BINS {
        return Err(ValidationError::TooManyBins {
            requested: count,
            max: MAX_BINS,
        });
    }

    let start_second = start.timestamp();
    let interval = end.timestamp().abs_diff(start_second);
    let width = interval as f64 / count as f64;
    let origin = start_second as f64;

    let points = (0..bins).map(|i| origin + i as f64 * width).collect();
    Ok(BinSet { width, points })
}

/// Find the known timestamps bracketing `point`.
///
/// `timestamps` must be ascending. Returns:
/// - `None` when `timestamps` is empty or nothing can bracket `point`
///   (a `NaN` point),
/// - `(last, last)` when `point` is at or after the last timestamp,
/// - `(first, first)` when `point` precedes the first timestamp,
/// - otherwise `(previous, next)` where `next` is the first timestamp strictly
///   after `point`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn find_neighbours(point: f64, timestamps: &[i64]) -> Option<(i64, i64)> {
    let &last = timestamps.last()?;
    if point >= last as f64 {
        return Some((last, last));
    }

    let next = timestamps.iter().position(|&ts| ts as f64 - point > 0.0)?;
    let previous = if next == 0 {
        timestamps[0]
    } else {
        timestamps[next - 1]
    };
    Some((previous, timestamps[next]))
}

/// Estimate the value of `series` at `point` from its two neighbours.
///
/// Each neighbour is weighted by one minus its share of the distance between
/// the pair, which is plain linear interpolation for points inside the pair.
/// A degenerate pair (before the first or after the last sample) yields the
/// value at that sample. Returns `0.0` when the series cannot be interpolated.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn interpolate(point: f64, series: &TimeSeries) -> f64 {
    let Some((t0, t1)) = find_neighbours(point, series.timestamps()) else {
        return 0.0;
    };
    let (Some(v0), Some(v1)) = (series.get(t0), series.get(t1)) else {
        return 0.0;
    };
    if t0 == t1 {
        return v0;
    }

    let distance_one = (t0 as f64 - point).abs();
    let distance_two = (t1 as f64 - point).abs();
    let total = t1.abs_diff(t0) as f64;

    v0 * (1.0 - distance_one / total) + v1 * (1.0 - distance_two / total)
}

/// Interpolate `series` at every bin of `bins`.
///
/// Bins whose truncated starts coincide (widths under one second) collapse
/// into one entry holding the later bin's value.
#[must_use]
pub fn map_to_bins(bins: &BinSet, series: &TimeSeries) -> ResampledSeries {
    bins.points()
        .iter()
        .map(|&point| (truncate(point), interpolate(point, series)))
        .collect()
}

/// Resample `series` onto `count` bins between `start` and `end`.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidBinCount`] when `count <= 0`; nothing
/// is computed in that case.
pub fn resample(
    start: Timestamp,
    end: Timestamp,
    count: i64,
    series: &TimeSeries,
) -> Result<ResampledSeries, ValidationError> {
    let bins = calculate_bins(start, end, count)?;
    Ok(map_to_bins(&bins, series))
}

/// Multiply every key (seconds) by 1000 to get milliseconds. Values are kept.
///
/// Keys saturate at the `i64` bounds instead of overflowing.
pub fn to_milliseconds<V>(mapping: impl IntoIterator<Item = (i64, V)>) -> BTreeMap<i64, V> {
    mapping
        .into_iter()
        .map(|(seconds, value)| (seconds.saturating_mul(1000), value))
        .collect()
}
