// Sensor reading domain models
use chrono::{DateTime, Utc};
use thiserror::Error;

/// The three sensors of the plant monitor. Each maps to one measurement
/// in the reading store and one value field within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    Temperature,
    Humidity,
    Moisture,
}

impl SensorKind {
    pub const ALL: [SensorKind; 3] = [
        SensorKind::Temperature,
        SensorKind::Humidity,
        SensorKind::Moisture,
    ];

    /// Stable identifier used in config files and API paths.
    pub fn id(&self) -> &'static str {
        match self {
            SensorKind::Temperature => "temperature",
            SensorKind::Humidity => "humidity",
            SensorKind::Moisture => "moisture",
        }
    }

    /// Measurement name in the reading store.
    pub fn measurement(&self) -> &'static str {
        match self {
            SensorKind::Temperature => "temp",
            SensorKind::Humidity => "humidity",
            SensorKind::Moisture => "moisture",
        }
    }

    /// Value field name within the measurement. The moisture sensor
    /// reports a percentage under a longer field name upstream.
    pub fn field(&self) -> &'static str {
        match self {
            SensorKind::Temperature => "temperature",
            SensorKind::Humidity => "humidity",
            SensorKind::Moisture => "moisture_percent",
        }
    }

    pub fn from_path(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.id() == segment)
    }
}

#[derive(Debug, Error)]
pub enum ReadingError {
    #[error("malformed timestamp: {raw}")]
    MalformedTimestamp { raw: String },
    #[error("non-numeric value: {raw}")]
    NonNumericValue { raw: String },
}

/// One row as it arrives from the reading store, before validation.
#[derive(Debug, Clone)]
pub struct RawReading {
    pub timestamp: String,
    pub value: serde_json::Value,
}

/// One validated sensor reading. Immutable once parsed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl Sample {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }
}

impl TryFrom<&RawReading> for Sample {
    type Error = ReadingError;

    fn try_from(raw: &RawReading) -> Result<Self, Self::Error> {
        let timestamp = DateTime::parse_from_rfc3339(&raw.timestamp)
            .map_err(|_| ReadingError::MalformedTimestamp {
                raw: raw.timestamp.clone(),
            })?
            .with_timezone(&Utc);

        let value = raw.value.as_f64().ok_or_else(|| ReadingError::NonNumericValue {
            raw: raw.value.to_string(),
        })?;

        Ok(Sample::new(timestamp, value))
    }
}

/// Validate a whole batch, rejecting the call on the first malformed row.
/// Silently skipping bad rows could mislead a health dashboard.
pub fn parse_readings(raw: &[RawReading]) -> Result<Vec<Sample>, ReadingError> {
    raw.iter().map(Sample::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_valid_reading() {
        let raw = RawReading {
            timestamp: "2026-08-14T09:30:00Z".to_string(),
            value: json!(23.5),
        };
        let sample = Sample::try_from(&raw).unwrap();
        assert_eq!(sample.value, 23.5);
        assert_eq!(sample.timestamp.to_rfc3339(), "2026-08-14T09:30:00+00:00");
    }

    #[test]
    fn test_parse_offset_timestamp_normalizes_to_utc() {
        let raw = RawReading {
            timestamp: "2026-08-14T11:30:00+02:00".to_string(),
            value: json!(50),
        };
        let sample = Sample::try_from(&raw).unwrap();
        assert_eq!(sample.timestamp.to_rfc3339(), "2026-08-14T09:30:00+00:00");
    }

    #[test]
    fn test_malformed_timestamp_rejected() {
        let raw = RawReading {
            timestamp: "yesterday-ish".to_string(),
            value: json!(1.0),
        };
        assert!(matches!(
            Sample::try_from(&raw),
            Err(ReadingError::MalformedTimestamp { .. })
        ));
    }

    #[test]
    fn test_non_numeric_value_rejected() {
        let raw = RawReading {
            timestamp: "2026-08-14T09:30:00Z".to_string(),
            value: json!("n/a"),
        };
        assert!(matches!(
            Sample::try_from(&raw),
            Err(ReadingError::NonNumericValue { .. })
        ));
    }

    #[test]
    fn test_batch_rejects_whole_call_on_one_bad_row() {
        let raw = vec![
            RawReading {
                timestamp: "2026-08-14T09:30:00Z".to_string(),
                value: json!(1.0),
            },
            RawReading {
                timestamp: "not-a-time".to_string(),
                value: json!(2.0),
            },
        ];
        assert!(parse_readings(&raw).is_err());
    }

    #[test]
    fn test_sensor_kind_from_path() {
        assert_eq!(
            SensorKind::from_path("moisture"),
            Some(SensorKind::Moisture)
        );
        assert_eq!(SensorKind::from_path("ph"), None);
    }
}
