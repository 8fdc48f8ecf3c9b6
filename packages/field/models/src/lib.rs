#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Risk field domain types.
//!
//! Defines the validated configuration inputs of the risk field engine
//! (monitoring boundary, threshold table) and its output (classified
//! zones). Validation happens at construction: a value of one of these
//! types is always well-formed, so the per-recomputation pipeline never
//! has to re-check configuration.

mod aoi;
mod threshold;
mod zone;

pub use aoi::AreaOfInterest;
pub use threshold::{RiskLevel, ThresholdBand, ThresholdTable, WATER_LEVEL_BREAKPOINTS};
pub use zone::{Zone, ZoneId, to_feature_collection};

use thiserror::Error;

/// Errors raised while validating engine configuration.
///
/// These are fatal and surface at setup time, before any recomputation
/// work runs. Expected per-recomputation conditions (too few readings,
/// empty clips) are represented in return values instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Lattice cell size must be a positive, finite number of degrees.
    #[error("cell size must be a positive number of degrees, got {0}")]
    InvalidCellSize(f64),

    /// Inverse-distance weighting exponent must be positive and finite.
    #[error("interpolation power must be a positive finite number, got {0}")]
    InvalidPower(f64),

    /// A threshold table needs at least two breakpoints to form a band.
    #[error("at least 2 threshold breakpoints are required, got {0}")]
    TooFewBreakpoints(usize),

    /// Threshold breakpoints must be finite.
    #[error("threshold breakpoint at index {index} is not finite")]
    NonFiniteBreakpoint {
        /// Position of the offending breakpoint.
        index: usize,
    },

    /// Threshold breakpoints must be strictly increasing.
    #[error("threshold breakpoints must be strictly increasing, violated at index {index}")]
    NonIncreasingBreakpoints {
        /// Position of the first breakpoint that fails to increase.
        index: usize,
    },

    /// One category label is required per consecutive breakpoint pair.
    #[error("{expected} category labels are required for {breakpoints} breakpoints, got {got}")]
    LabelCountMismatch {
        /// Number of breakpoints supplied.
        breakpoints: usize,
        /// Number of labels required (`breakpoints - 1`).
        expected: usize,
        /// Number of labels supplied.
        got: usize,
    },

    /// Boundary rings must repeat their first vertex as the last one.
    #[error("boundary ring must be closed (first and last vertices equal)")]
    UnclosedBoundary,

    /// Boundary rings need at least 4 vertices including the closing one.
    #[error("boundary ring needs at least 4 vertices including the closing one, got {0}")]
    BoundaryTooSmall(usize),

    /// Boundary vertices must be finite coordinates.
    #[error("boundary ring vertex at index {index} is not finite")]
    NonFiniteBoundaryVertex {
        /// Position of the offending vertex.
        index: usize,
    },

    /// Boundary rings must be simple (no self-intersections).
    #[error("boundary ring self-intersects near ({x}, {y})")]
    SelfIntersectingBoundary {
        /// Longitude of the detected intersection.
        x: f64,
        /// Latitude of the detected intersection.
        y: f64,
    },

    /// The boundary document could not be parsed into a polygon.
    #[error("boundary GeoJSON error: {message}")]
    BoundaryGeoJson {
        /// Description of what went wrong.
        message: String,
    },
}
