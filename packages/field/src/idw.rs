//! Inverse-distance weighted interpolation of sensor readings.
//!
//! Every lattice point gets the weighted average of all reading values,
//! with weights `1 / distance^power`. Distances are great-circle
//! (haversine) kilometers, the same metric the boundary coordinates use.

use flood_map_sensor_models::SensorReading;
use geo::{Coord, Distance, Haversine, Point};

use crate::grid::Lattice;

/// Default inverse-distance weighting exponent.
pub const DEFAULT_POWER: f64 = 2.0;

const METERS_PER_KILOMETER: f64 = 1000.0;

/// Rewrites every lattice value with the interpolated field.
///
/// Callers must ensure `readings` is non-empty; the pipeline's minimum
/// reading floor guarantees this before interpolation is attempted.
pub fn interpolate(lattice: &mut Lattice, readings: &[SensorReading], power: f64) {
    debug_assert!(
        !readings.is_empty(),
        "interpolation requires at least one reading"
    );
    lattice.fill_with(|position| value_at(position, readings, power));
}

/// Interpolated value at a single position.
///
/// A reading at exactly zero distance short-circuits: its value is taken
/// directly instead of dividing by a zero distance.
fn value_at(position: Coord<f64>, readings: &[SensorReading], power: f64) -> f64 {
    let grid_point = Point::from(position);
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;

    for reading in readings {
        let sensor_point = Point::new(reading.lng, reading.lat);
        let distance_km = Haversine.distance(grid_point, sensor_point) / METERS_PER_KILOMETER;

        if distance_km == 0.0 {
            return reading.value;
        }

        let weight = 1.0 / distance_km.powf(power);
        weighted_sum += reading.value * weight;
        total_weight += weight;
    }

    if total_weight > 0.0 {
        weighted_sum / total_weight
    } else {
        0.0
    }
}
