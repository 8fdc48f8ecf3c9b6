#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Sensor reading domain types.
//!
//! This crate defines the canonical in-memory representation of a water
//! level reading as produced by the data-fetch layer. The risk field
//! engine and the selection controller both consume readings through these
//! types; neither ever mutates them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Nominal full-charge voltage for the Li-ion packs used by field sensors.
const LI_ION_FULL_VOLTAGE: f64 = 4.2;

/// A single water level measurement at a known position.
///
/// Readings are immutable snapshots: the engine reads positions and values
/// but never writes them back. Multiple readings may share a position (two
/// devices at the same site, or repeated captures from one device).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorReading {
    /// Numeric reading ID, unique within one fetch batch.
    pub id: u64,
    /// Device identifier as reported by the telemetry API, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lng: f64,
    /// Measured water level in meters.
    pub value: f64,
    /// Capture time of the measurement.
    pub captured_at: DateTime<Utc>,
    /// Sensor hardware type (e.g. "Ultrasonic", "Pressure", "Float").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensor_type: Option<String>,
    /// Remaining battery charge as a percentage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery_percent: Option<u8>,
}

/// Converts a raw battery voltage to a charge percentage.
///
/// Devices that do not report voltage are assumed fully charged, matching
/// how the telemetry layer fills missing battery fields.
#[must_use]
pub fn battery_percent_from_voltage(voltage: Option<f64>) -> u8 {
    let Some(voltage) = voltage else {
        return 100;
    };
    let percent = (voltage / LI_ION_FULL_VOLTAGE * 100.0).clamp(0.0, 100.0);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let rounded = percent.round() as u8;
    rounded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_voltage_reads_as_full() {
        assert_eq!(battery_percent_from_voltage(None), 100);
    }

    #[test]
    fn voltage_converts_and_clamps() {
        assert_eq!(battery_percent_from_voltage(Some(4.2)), 100);
        assert_eq!(battery_percent_from_voltage(Some(2.1)), 50);
        assert_eq!(battery_percent_from_voltage(Some(5.0)), 100);
        assert_eq!(battery_percent_from_voltage(Some(-0.3)), 0);
    }

    #[test]
    fn reading_deserializes_without_optional_fields() {
        let json = r#"{
            "id": 7,
            "lat": 1.03,
            "lng": 102.04,
            "value": 2.4,
            "capturedAt": "2026-08-01T06:30:00Z"
        }"#;
        let reading: SensorReading = serde_json::from_str(json).unwrap();
        assert_eq!(reading.id, 7);
        assert_eq!(reading.device_id, None);
        assert_eq!(reading.battery_percent, None);
        assert!((reading.value - 2.4).abs() < f64::EPSILON);
    }
}
