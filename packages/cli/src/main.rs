#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! CLI tool for computing classified risk zones from sensor readings.
//!
//! Reads a JSON array of sensor readings and a boundary `GeoJSON`
//! (defaulting to the bundled Dayun monitoring area), runs the risk field
//! pipeline, and writes the resulting zones as a `GeoJSON`
//! `FeatureCollection` ready for a map frontend.

use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use flood_map_field::{FieldConfig, MIN_READINGS, compute_risk_field};
use flood_map_field_models::{AreaOfInterest, RiskLevel, ThresholdTable, to_feature_collection};
use flood_map_sensor_models::SensorReading;
use geojson::GeoJson;

/// Boundary of the Dayun monitoring area, bundled as the default area of
/// interest.
const DAYUN_BOUNDARY_GEOJSON: &str = include_str!("../assets/dayun_boundary.geojson");

#[derive(Parser)]
#[command(name = "flood_map_cli", about = "Risk zone generation tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute classified risk zones from sensor readings
    Zones {
        /// Path to a JSON array of sensor readings
        #[arg(long)]
        readings: PathBuf,
        /// Boundary GeoJSON path (defaults to the bundled monitoring area)
        #[arg(long)]
        boundary: Option<PathBuf>,
        /// Output GeoJSON path
        #[arg(long, default_value = "zones.geojson")]
        output: PathBuf,
        /// Lattice cell size in degrees
        #[arg(long, default_value_t = 0.01)]
        cell_size: f64,
        /// Comma-separated threshold breakpoints in meters
        /// (defaults to the water level risk table)
        #[arg(long)]
        breakpoints: Option<String>,
        /// Comma-separated category labels, one fewer than breakpoints
        #[arg(long)]
        labels: Option<String>,
    },
    /// Validate a boundary and threshold configuration without computing
    CheckConfig {
        /// Boundary GeoJSON path (defaults to the bundled monitoring area)
        #[arg(long)]
        boundary: Option<PathBuf>,
        /// Comma-separated threshold breakpoints in meters
        #[arg(long)]
        breakpoints: Option<String>,
        /// Comma-separated category labels, one fewer than breakpoints
        #[arg(long)]
        labels: Option<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Zones {
            readings,
            boundary,
            output,
            cell_size,
            breakpoints,
            labels,
        } => generate_zones(
            &readings,
            boundary.as_deref(),
            &output,
            cell_size,
            breakpoints.as_deref(),
            labels.as_deref(),
        ),
        Commands::CheckConfig {
            boundary,
            breakpoints,
            labels,
        } => check_config(boundary.as_deref(), breakpoints.as_deref(), labels.as_deref()),
    }
}

/// Runs the pipeline over file inputs and writes the zone collection.
fn generate_zones(
    readings_path: &std::path::Path,
    boundary_path: Option<&std::path::Path>,
    output_path: &std::path::Path,
    cell_size: f64,
    breakpoints: Option<&str>,
    labels: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let readings: Vec<SensorReading> = serde_json::from_str(&fs::read_to_string(readings_path)?)?;
    log::info!("loaded {} readings from {}", readings.len(), readings_path.display());

    let boundary = load_boundary(boundary_path)?;
    let thresholds = build_thresholds(breakpoints, labels)?;
    let config = FieldConfig::new(boundary, thresholds, cell_size)?;

    let field = compute_risk_field(&config, &readings)?;
    if field.is_insufficient_data() {
        log::warn!(
            "fewer than {MIN_READINGS} readings available, writing no zone data"
        );
    }

    let mut collection = to_feature_collection(field.zones());
    for (feature, zone) in collection.features.iter_mut().zip(field.zones()) {
        let Ok(level) = RiskLevel::from_str(&zone.category) else {
            continue;
        };
        if let Some(properties) = feature.properties.as_mut() {
            properties.insert("fill".to_owned(), serde_json::Value::from(level.color()));
        }
    }

    fs::write(output_path, GeoJson::from(collection).to_string())?;
    log::info!(
        "wrote {} zones to {}",
        field.zones().len(),
        output_path.display()
    );
    Ok(())
}

/// Validates inputs without running the pipeline.
fn check_config(
    boundary_path: Option<&std::path::Path>,
    breakpoints: Option<&str>,
    labels: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let boundary = load_boundary(boundary_path)?;
    let thresholds = build_thresholds(breakpoints, labels)?;

    let bbox = boundary.bounding_rect();
    log::info!(
        "boundary ok: {} vertices, bbox {:.4}x{:.4} degrees",
        boundary.polygon().exterior().0.len(),
        bbox.width(),
        bbox.height()
    );
    log::info!("thresholds ok: {} bands", thresholds.bands().len());
    println!("configuration is valid");
    Ok(())
}

fn load_boundary(
    path: Option<&std::path::Path>,
) -> Result<AreaOfInterest, Box<dyn std::error::Error>> {
    let boundary = match path {
        Some(path) => AreaOfInterest::from_geojson(&fs::read_to_string(path)?)?,
        None => AreaOfInterest::from_geojson(DAYUN_BOUNDARY_GEOJSON)?,
    };
    Ok(boundary)
}

/// Builds the threshold table from CLI arguments, defaulting to the
/// canonical water level table when no breakpoints are given.
fn build_thresholds(
    breakpoints: Option<&str>,
    labels: Option<&str>,
) -> Result<ThresholdTable, Box<dyn std::error::Error>> {
    let Some(breakpoints) = breakpoints else {
        return Ok(ThresholdTable::water_level_default());
    };
    let Some(labels) = labels else {
        return Err("--labels is required when --breakpoints is given".into());
    };

    let breakpoints = parse_breakpoints(breakpoints)?;
    let labels: Vec<&str> = labels.split(',').map(str::trim).collect();
    Ok(ThresholdTable::new(&breakpoints, &labels)?)
}

fn parse_breakpoints(csv: &str) -> Result<Vec<f64>, std::num::ParseFloatError> {
    csv.split(',').map(|part| part.trim().parse()).collect()
}
