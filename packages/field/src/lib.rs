#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Spatial risk field engine.
//!
//! Turns a sparse set of point sensor readings into continuous classified
//! risk zones covering the monitoring boundary: a regular lattice is
//! sampled over the boundary's bounding box, every lattice point gets an
//! inverse-distance weighted value, contour bands are extracted between
//! the threshold breakpoints, and each band is clipped to the boundary.
//!
//! The pipeline is synchronous and pure: configuration is validated up
//! front, readings are passed in explicitly per recomputation, and each
//! recomputation fully replaces the previous zone set. Expected
//! conditions (too few readings, bands clipped away) are represented in
//! return values, never as errors.

pub mod clip;
pub mod grid;
pub mod idw;
pub mod isoband;

use flood_map_field_models::{AreaOfInterest, ConfigError, ThresholdTable, Zone};
use flood_map_sensor_models::SensorReading;

use crate::grid::Lattice;

/// Minimum number of readings required before interpolation is attempted.
///
/// With fewer readings the field is not meaningful; the pipeline reports
/// insufficient data and produces zero zones instead of fabricating a
/// surface.
pub const MIN_READINGS: usize = 3;

/// Validated configuration for the risk field pipeline.
///
/// Effectively immutable for the lifetime of a session; every
/// configuration error surfaces at construction, so recomputation never
/// fails on bad config.
#[derive(Debug, Clone)]
pub struct FieldConfig {
    boundary: AreaOfInterest,
    thresholds: ThresholdTable,
    cell_size_deg: f64,
    power: f64,
}

impl FieldConfig {
    /// Builds a pipeline configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidCellSize`] if `cell_size_deg` is not
    /// a positive finite number. The boundary and threshold table are
    /// already validated by their own constructors.
    pub fn new(
        boundary: AreaOfInterest,
        thresholds: ThresholdTable,
        cell_size_deg: f64,
    ) -> Result<Self, ConfigError> {
        if !cell_size_deg.is_finite() || cell_size_deg <= 0.0 {
            return Err(ConfigError::InvalidCellSize(cell_size_deg));
        }
        Ok(Self {
            boundary,
            thresholds,
            cell_size_deg,
            power: idw::DEFAULT_POWER,
        })
    }

    /// Overrides the inverse-distance weighting exponent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPower`] if `power` is not a positive
    /// finite number.
    pub fn with_power(mut self, power: f64) -> Result<Self, ConfigError> {
        if !power.is_finite() || power <= 0.0 {
            return Err(ConfigError::InvalidPower(power));
        }
        self.power = power;
        Ok(self)
    }

    /// The monitoring boundary.
    #[must_use]
    pub const fn boundary(&self) -> &AreaOfInterest {
        &self.boundary
    }

    /// The classification threshold table.
    #[must_use]
    pub const fn thresholds(&self) -> &ThresholdTable {
        &self.thresholds
    }

    /// Lattice cell size in degrees.
    #[must_use]
    pub const fn cell_size_deg(&self) -> f64 {
        self.cell_size_deg
    }

    /// Inverse-distance weighting exponent.
    #[must_use]
    pub const fn power(&self) -> f64 {
        self.power
    }
}

/// Result of one pipeline recomputation.
#[derive(Debug, Clone, PartialEq)]
pub enum RiskField {
    /// Fewer than [`MIN_READINGS`] readings were supplied; no zones were
    /// computed. Consumers should show "no zone data", not an error.
    InsufficientData,
    /// Classified zones clipped to the boundary, in band order.
    Zones(Vec<Zone>),
}

impl RiskField {
    /// The zones of this field; empty when data was insufficient.
    #[must_use]
    pub fn zones(&self) -> &[Zone] {
        match self {
            Self::InsufficientData => &[],
            Self::Zones(zones) => zones,
        }
    }

    /// Whether this recomputation was skipped for lack of readings.
    #[must_use]
    pub const fn is_insufficient_data(&self) -> bool {
        matches!(self, Self::InsufficientData)
    }
}

/// Runs the full pipeline as one pure, synchronous pass: lattice
/// sampling, interpolation, band extraction, clipping.
///
/// The readings slice is treated as a snapshot; nothing is cached between
/// calls. Use [`FieldEngine`] to reuse lattice positions across
/// recomputations.
///
/// # Errors
///
/// Returns a [`ConfigError`] only if lattice construction rejects the
/// cell size, which a config built through [`FieldConfig::new`] rules
/// out.
pub fn compute_risk_field(
    config: &FieldConfig,
    readings: &[SensorReading],
) -> Result<RiskField, ConfigError> {
    let mut lattice = Lattice::sample(config.boundary.bounding_rect(), config.cell_size_deg)?;
    Ok(compute_on_lattice(&mut lattice, config, readings))
}

/// Pipeline body shared by the pure entry point and the engine.
fn compute_on_lattice(
    lattice: &mut Lattice,
    config: &FieldConfig,
    readings: &[SensorReading],
) -> RiskField {
    if readings.len() < MIN_READINGS {
        log::debug!(
            "{} of {MIN_READINGS} required readings available, skipping interpolation",
            readings.len()
        );
        return RiskField::InsufficientData;
    }

    idw::interpolate(lattice, readings, config.power);
    let bands = isoband::extract_bands(lattice, &config.thresholds);
    let zones = clip::clip_to_boundary(bands, &config.boundary);

    log::debug!(
        "computed {} zones from {} readings over a {}x{} lattice",
        zones.len(),
        readings.len(),
        lattice.cols(),
        lattice.rows()
    );
    RiskField::Zones(zones)
}

/// Owns the lattice and the current zone set across recomputations.
///
/// Lattice positions depend only on the boundary and cell size, so they
/// are built once; each [`FieldEngine::recompute`] rewrites the values and
/// fully replaces the zone set.
#[derive(Debug, Clone)]
pub struct FieldEngine {
    config: FieldConfig,
    lattice: Lattice,
    field: RiskField,
}

impl FieldEngine {
    /// Builds an engine with an empty field.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if lattice construction rejects the cell
    /// size.
    pub fn new(config: FieldConfig) -> Result<Self, ConfigError> {
        let lattice = Lattice::sample(config.boundary.bounding_rect(), config.cell_size_deg)?;
        Ok(Self {
            config,
            lattice,
            field: RiskField::InsufficientData,
        })
    }

    /// Recomputes the field from a fresh snapshot of readings.
    ///
    /// The previous zone set is fully replaced; with fewer than
    /// [`MIN_READINGS`] readings it becomes empty.
    pub fn recompute(&mut self, readings: &[SensorReading]) -> &RiskField {
        self.field = compute_on_lattice(&mut self.lattice, &self.config, readings);
        &self.field
    }

    /// The current field.
    #[must_use]
    pub const fn field(&self) -> &RiskField {
        &self.field
    }

    /// The current zone set; empty until the first successful recompute.
    #[must_use]
    pub fn zones(&self) -> &[Zone] {
        self.field.zones()
    }

    /// The engine's configuration.
    #[must_use]
    pub const fn config(&self) -> &FieldConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use geo::{Area, Centroid, LineString};

    fn reading(id: u64, lat: f64, lng: f64, value: f64) -> SensorReading {
        SensorReading {
            id,
            device_id: None,
            lat,
            lng,
            value,
            captured_at: Utc::now(),
            sensor_type: None,
            battery_percent: None,
        }
    }

    fn unit_square_boundary() -> AreaOfInterest {
        AreaOfInterest::new(LineString::from(vec![
            (0.0, 0.0),
            (1.0, 0.0),
            (1.0, 1.0),
            (0.0, 1.0),
            (0.0, 0.0),
        ]))
        .unwrap()
    }

    /// South side low, north side high.
    fn corner_readings() -> Vec<SensorReading> {
        vec![
            reading(1, 0.0, 0.0, 0.0),
            reading(2, 0.0, 1.0, 0.0),
            reading(3, 1.0, 1.0, 10.0),
            reading(4, 1.0, 0.0, 10.0),
        ]
    }

    fn low_high_config() -> FieldConfig {
        let thresholds = ThresholdTable::new(&[0.0, 5.0, 10.0], &["low", "high"]).unwrap();
        FieldConfig::new(unit_square_boundary(), thresholds, 0.1).unwrap()
    }

    #[test]
    fn rejects_bad_cell_size_and_power() {
        let thresholds = ThresholdTable::new(&[0.0, 5.0], &["only"]).unwrap();
        assert_eq!(
            FieldConfig::new(unit_square_boundary(), thresholds.clone(), 0.0).unwrap_err(),
            ConfigError::InvalidCellSize(0.0)
        );
        let config = FieldConfig::new(unit_square_boundary(), thresholds, 0.1).unwrap();
        assert_eq!(
            config.with_power(-1.0).unwrap_err(),
            ConfigError::InvalidPower(-1.0)
        );
    }

    #[test]
    fn too_few_readings_yield_empty_zone_set() {
        let config = low_high_config();
        for count in 0..MIN_READINGS {
            let readings: Vec<SensorReading> = corner_readings().into_iter().take(count).collect();
            let field = compute_risk_field(&config, &readings).unwrap();
            assert!(field.is_insufficient_data(), "{count} readings");
            assert!(field.zones().is_empty());
        }
    }

    #[test]
    fn corner_gradient_splits_the_square_at_mid_latitude() {
        let config = low_high_config();
        let field = compute_risk_field(&config, &corner_readings()).unwrap();
        let zones = field.zones();

        assert_eq!(zones.len(), 2);
        assert_eq!(zones[0].category, "low");
        assert_eq!(zones[1].category, "high");

        let low_area = zones[0].geometry.unsigned_area();
        let high_area = zones[1].geometry.unsigned_area();

        // Roughly half the square each, and together the whole square.
        assert!((0.4..=0.6).contains(&low_area), "low area {low_area}");
        assert!((0.4..=0.6).contains(&high_area), "high area {high_area}");
        assert!(
            (low_area + high_area - 1.0).abs() < 0.01,
            "union area {}",
            low_area + high_area
        );

        // The low zone sits south of the high zone.
        let low_centroid = zones[0].geometry.centroid().unwrap();
        let high_centroid = zones[1].geometry.centroid().unwrap();
        assert!(low_centroid.y() < 0.5);
        assert!(high_centroid.y() > 0.5);
    }

    #[test]
    fn zones_partition_the_boundary() {
        let config = low_high_config();
        let field = compute_risk_field(&config, &corner_readings()).unwrap();

        let boundary_area = config.boundary().polygon().unsigned_area();
        let total: f64 = field
            .zones()
            .iter()
            .map(|zone| zone.geometry.unsigned_area())
            .sum();
        assert!(
            (total - boundary_area).abs() / boundary_area < 0.01,
            "zones cover {total} of {boundary_area}"
        );
    }

    #[test]
    fn engine_replaces_zone_set_on_each_recompute() {
        let mut engine = FieldEngine::new(low_high_config()).unwrap();
        assert!(engine.zones().is_empty());

        engine.recompute(&corner_readings());
        assert_eq!(engine.zones().len(), 2);

        // All-low readings collapse the field into a single zone.
        let flat = vec![
            reading(1, 0.0, 0.0, 1.0),
            reading(2, 1.0, 1.0, 1.0),
            reading(3, 1.0, 0.0, 1.0),
        ];
        engine.recompute(&flat);
        assert_eq!(engine.zones().len(), 1);
        assert_eq!(engine.zones()[0].category, "low");

        // Dropping below the floor empties the set without erroring.
        engine.recompute(&flat[..2]);
        assert!(engine.field().is_insufficient_data());
        assert!(engine.zones().is_empty());
    }
}
