//! Time series of raw readings keyed by Unix seconds.

use crate::reading::Reading;

/// Readings of a single sensor, keyed by whole seconds since the Unix epoch.
///
/// Timestamps are strictly ascending and unique. Building a series from
/// unordered samples sorts them and keeps the last value seen for a repeated
/// timestamp.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    timestamps: Vec<i64>,
    values: Vec<f64>,
}

impl TimeSeries {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Ascending timestamps of the series.
    #[must_use]
    pub fn timestamps(&self) -> &[i64] {
        &self.timestamps
    }

    /// Value recorded at exactly `timestamp`.
    #[must_use]
    pub fn get(&self, timestamp: i64) -> Option<f64> {
        self.timestamps
            .binary_search(&timestamp)
            .ok()
            .map(|idx| self.values[idx])
    }
}

impl FromIterator<(i64, f64)> for TimeSeries {
    fn from_iter<I: IntoIterator<Item = (i64, f64)>>(iter: I) -> Self {
        let mut samples: Vec<(i64, f64)> = iter.into_iter().collect();
        // stable sort keeps arrival order among equal timestamps
        samples.sort_by_key(|(ts, _)| *ts);

        let mut series = Self {
            timestamps: Vec::with_capacity(samples.len()),
            values: Vec::with_capacity(samples.len()),
        };
        for (ts, value) in samples {
            if series.timestamps.last() == Some(&ts) {
                if let Some(last) = series.values.last_mut() {
                    *last = value;
                }
            } else {
                series.timestamps.push(ts);
                series.values.push(value);
            }
        }
        series
    }
}

impl<'a> FromIterator<&'a Reading> for TimeSeries {
    fn from_iter<I: IntoIterator<Item = &'a Reading>>(iter: I) -> Self {
        iter.into_iter()
            .map(|reading| (reading.recorded_at.timestamp(), reading.value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_sort_samples_by_timestamp() {
        let series: TimeSeries = [(30, 3.0), (10, 1.0), (20, 2.0)].into_iter().collect();
        assert_eq!(series.timestamps(), &[10, 20, 30]);
        assert_eq!(series.get(20), Some(2.0));
    }

    #[test]
    fn should_keep_last_value_for_duplicate_timestamp() {
        let series: TimeSeries = [(10, 1.0), (10, 5.0), (5, 0.5)].into_iter().collect();
        assert_eq!(series.len(), 2);
        assert_eq!(series.get(10), Some(5.0));
    }

    #[test]
    fn should_return_none_for_unknown_timestamp() {
        let series: TimeSeries = [(10, 1.0)].into_iter().collect();
        assert_eq!(series.get(11), None);
    }

    #[test]
    fn should_be_empty_by_default() {
        let series = TimeSeries::new();
        assert!(series.is_empty());
        assert_eq!(series.timestamps(), &[] as &[i64]);
    }
}
