//! Threshold table and risk category taxonomy.
//!
//! A threshold table maps an ordered list of breakpoints to named category
//! labels, one per consecutive interval. Classification uses half-open
//! intervals `[low, high)` with an open-ended top interval; values below
//! the lowest breakpoint are absorbed by the lowest band.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::ConfigError;

/// Water level breakpoints in meters for the canonical risk table.
///
/// 0-2 Safe, 2-3.5 Warning, 3.5-5 Alert, 5-10 Critical.
pub const WATER_LEVEL_BREAKPOINTS: [f64; 5] = [0.0, 2.0, 3.5, 5.0, 10.0];

/// Canonical risk taxonomy for water level monitoring.
///
/// Threshold tables carry free-form string labels; this enum is the label
/// set used by the default water level table and by downstream styling.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    /// Water level below the warning threshold.
    Safe,
    /// Elevated water level worth watching.
    Warning,
    /// High water level requiring operator attention.
    Alert,
    /// Dangerous water level.
    Critical,
}

impl RiskLevel {
    /// Returns the numeric severity of this level, from 1 (safe) to 4.
    #[must_use]
    pub const fn severity(self) -> u8 {
        match self {
            Self::Safe => 1,
            Self::Warning => 2,
            Self::Alert => 3,
            Self::Critical => 4,
        }
    }

    /// Map styling color for this level.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Safe => "#22c55e",
            Self::Warning => "#f59e0b",
            Self::Alert => "#ef4444",
            Self::Critical => "#8b0000",
        }
    }

    /// Classifies a raw water level against the canonical breakpoints.
    #[must_use]
    pub fn from_water_level(level: f64) -> Self {
        if level >= WATER_LEVEL_BREAKPOINTS[3] {
            Self::Critical
        } else if level >= WATER_LEVEL_BREAKPOINTS[2] {
            Self::Alert
        } else if level >= WATER_LEVEL_BREAKPOINTS[1] {
            Self::Warning
        } else {
            Self::Safe
        }
    }

    /// Returns all variants of this enum, in ascending severity.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Safe, Self::Warning, Self::Alert, Self::Critical]
    }
}

/// One labelled interval between two consecutive breakpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdBand {
    /// Inclusive lower bound.
    pub lower: f64,
    /// Upper bound; exclusive for classification, except for the top band.
    pub upper: f64,
    /// Category label for values in this band.
    pub label: String,
}

/// An ordered, validated sequence of classification bands.
///
/// Constructed from strictly increasing finite breakpoints `b0 < … < bn`
/// and one label per consecutive pair. The top interval is open-ended for
/// classification purposes.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdTable {
    bands: Vec<ThresholdBand>,
}

impl ThresholdTable {
    /// Builds a table from breakpoints and per-interval labels.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if fewer than 2 breakpoints are given,
    /// any breakpoint is non-finite, the sequence is not strictly
    /// increasing, or the label count does not match the interval count.
    pub fn new(breakpoints: &[f64], labels: &[&str]) -> Result<Self, ConfigError> {
        if breakpoints.len() < 2 {
            return Err(ConfigError::TooFewBreakpoints(breakpoints.len()));
        }
        for (index, breakpoint) in breakpoints.iter().enumerate() {
            if !breakpoint.is_finite() {
                return Err(ConfigError::NonFiniteBreakpoint { index });
            }
        }
        for (index, pair) in breakpoints.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(ConfigError::NonIncreasingBreakpoints { index: index + 1 });
            }
        }
        let expected = breakpoints.len() - 1;
        if labels.len() != expected {
            return Err(ConfigError::LabelCountMismatch {
                breakpoints: breakpoints.len(),
                expected,
                got: labels.len(),
            });
        }

        let bands = breakpoints
            .windows(2)
            .zip(labels)
            .map(|(pair, label)| ThresholdBand {
                lower: pair[0],
                upper: pair[1],
                label: (*label).to_string(),
            })
            .collect();

        Ok(Self { bands })
    }

    /// The canonical water level table (meters), labelled with
    /// [`RiskLevel`] names.
    #[must_use]
    pub fn water_level_default() -> Self {
        let bands = RiskLevel::all()
            .iter()
            .zip(WATER_LEVEL_BREAKPOINTS.windows(2))
            .map(|(level, pair)| ThresholdBand {
                lower: pair[0],
                upper: pair[1],
                label: level.to_string(),
            })
            .collect();
        Self { bands }
    }

    /// The bands of this table, in ascending order.
    #[must_use]
    pub fn bands(&self) -> &[ThresholdBand] {
        &self.bands
    }

    /// Returns the label of the band containing `value`.
    ///
    /// Intervals are half-open `[low, high)`; the top interval is
    /// open-ended above, and values below the lowest breakpoint fall into
    /// the lowest band.
    #[must_use]
    pub fn classify(&self, value: f64) -> &str {
        match self.bands.iter().find(|band| value < band.upper) {
            Some(band) => &band.label,
            // Open-ended top interval.
            None => &self.bands[self.bands.len() - 1].label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_single_breakpoint() {
        assert_eq!(
            ThresholdTable::new(&[1.0], &[]).unwrap_err(),
            ConfigError::TooFewBreakpoints(1)
        );
    }

    #[test]
    fn rejects_non_increasing_breakpoints() {
        assert_eq!(
            ThresholdTable::new(&[0.0, 2.0, 2.0], &["a", "b"]).unwrap_err(),
            ConfigError::NonIncreasingBreakpoints { index: 2 }
        );
        assert_eq!(
            ThresholdTable::new(&[0.0, 3.0, 1.0], &["a", "b"]).unwrap_err(),
            ConfigError::NonIncreasingBreakpoints { index: 2 }
        );
    }

    #[test]
    fn rejects_non_finite_breakpoint() {
        assert_eq!(
            ThresholdTable::new(&[0.0, f64::INFINITY], &["a"]).unwrap_err(),
            ConfigError::NonFiniteBreakpoint { index: 1 }
        );
    }

    #[test]
    fn rejects_label_mismatch() {
        assert_eq!(
            ThresholdTable::new(&[0.0, 1.0, 2.0], &["only"]).unwrap_err(),
            ConfigError::LabelCountMismatch {
                breakpoints: 3,
                expected: 2,
                got: 1
            }
        );
    }

    #[test]
    fn classifies_half_open_intervals() {
        let table = ThresholdTable::water_level_default();
        assert_eq!(table.classify(0.0), "SAFE");
        assert_eq!(table.classify(1.99), "SAFE");
        // Breakpoint values belong to the upper band.
        assert_eq!(table.classify(2.0), "WARNING");
        assert_eq!(table.classify(3.5), "ALERT");
        assert_eq!(table.classify(5.0), "CRITICAL");
    }

    #[test]
    fn top_interval_is_open_ended() {
        let table = ThresholdTable::water_level_default();
        assert_eq!(table.classify(10.0), "CRITICAL");
        assert_eq!(table.classify(250.0), "CRITICAL");
    }

    #[test]
    fn underflow_falls_into_lowest_band() {
        let table = ThresholdTable::new(&[2.0, 4.0, 6.0], &["low", "high"]).unwrap();
        assert_eq!(table.classify(-3.0), "low");
        assert_eq!(table.classify(0.0), "low");
    }

    #[test]
    fn default_table_matches_water_level_helper() {
        let table = ThresholdTable::water_level_default();
        for level in [0.0, 1.5, 2.0, 3.4, 3.5, 4.9, 5.0, 9.0, 12.0] {
            assert_eq!(
                table.classify(level),
                RiskLevel::from_water_level(level).as_ref(),
                "divergence at water level {level}"
            );
        }
    }
}
