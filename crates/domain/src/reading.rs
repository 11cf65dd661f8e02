//! Sensor readings: single timestamped samples reported by a home.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::{HomeId, SensorName};
use crate::time::Timestamp;

/// One sample of one sensor at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    pub home_id: HomeId,
    pub sensor: SensorName,
    pub recorded_at: Timestamp,
    pub value: f64,
}

impl Reading {
    /// Create a builder for constructing a [`Reading`].
    #[must_use]
    pub fn builder() -> ReadingBuilder {
        ReadingBuilder::default()
    }

    /// Check the invariants a stored reading must hold.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NonFiniteValue`] for `NaN` or infinite values.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.value.is_finite() {
            Ok(())
        } else {
            Err(ValidationError::NonFiniteValue)
        }
    }
}

/// Step-by-step builder for [`Reading`].
#[derive(Debug, Default)]
pub struct ReadingBuilder {
    home_id: Option<HomeId>,
    sensor: Option<String>,
    recorded_at: Option<Timestamp>,
    value: f64,
}

impl ReadingBuilder {
    #[must_use]
    pub fn home_id(mut self, home_id: HomeId) -> Self {
        self.home_id = Some(home_id);
        self
    }

    #[must_use]
    pub fn sensor(mut self, sensor: impl Into<String>) -> Self {
        self.sensor = Some(sensor.into());
        self
    }

    #[must_use]
    pub fn recorded_at(mut self, recorded_at: Timestamp) -> Self {
        self.recorded_at = Some(recorded_at);
        self
    }

    #[must_use]
    pub fn value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    /// Consume the builder and return a validated [`Reading`].
    ///
    /// `recorded_at` defaults to now.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the home or sensor is missing, or
    /// when the value is not finite.
    pub fn build(self) -> Result<Reading, ValidationError> {
        let home_id = self.home_id.ok_or(ValidationError::MissingHomeId)?;
        let sensor = SensorName::new(self.sensor.unwrap_or_default())?;
        let reading = Reading {
            home_id,
            sensor,
            recorded_at: self.recorded_at.unwrap_or_else(crate::time::now),
            value: self.value,
        };
        reading.validate()?;
        Ok(reading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::from_unix_seconds;

    fn home() -> HomeId {
        HomeId::new(1).unwrap()
    }

    #[test]
    fn should_build_reading_with_all_fields() {
        let at = from_unix_seconds(1_700_000_000).unwrap();
        let reading = Reading::builder()
            .home_id(home())
            .sensor("kitchen.temperature")
            .recorded_at(at)
            .value(21.5)
            .build()
            .unwrap();

        assert_eq!(reading.home_id, home());
        assert_eq!(reading.sensor.as_str(), "kitchen.temperature");
        assert_eq!(reading.recorded_at, at);
        assert!((reading.value - 21.5).abs() < f64::EPSILON);
    }

    #[test]
    fn should_reject_reading_without_home() {
        let result = Reading::builder().sensor("kitchen.temperature").build();
        assert_eq!(result, Err(ValidationError::MissingHomeId));
    }

    #[test]
    fn should_reject_reading_without_sensor() {
        let result = Reading::builder().home_id(home()).build();
        assert_eq!(result, Err(ValidationError::EmptySensorName));
    }

    #[test]
    fn should_reject_nan_value() {
        let result = Reading::builder()
            .home_id(home())
            .sensor("kitchen.temperature")
            .value(f64::NAN)
            .build();
        assert_eq!(result, Err(ValidationError::NonFiniteValue));
    }

    #[test]
    fn should_serialize_with_camel_case_fields() {
        let reading = Reading::builder()
            .home_id(home())
            .sensor("hall.humidity")
            .recorded_at(from_unix_seconds(0).unwrap())
            .value(40.0)
            .build()
            .unwrap();

        let json = serde_json::to_value(&reading).unwrap();
        assert_eq!(json["homeId"], 1);
        assert_eq!(json["sensor"], "hall.humidity");
        assert_eq!(json["recordedAt"], "1970-01-01T00:00:00Z");
    }
}
