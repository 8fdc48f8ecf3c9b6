#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Interactive zone selection.
//!
//! Tracks which single zone, if any, is isolated on the map and exposes
//! the sensor readings associated with the selected zone's category.
//! Selection state only changes through explicit user actions (a zone
//! click or a background click) and through [`ZoneSelection::reconcile`]
//! after a recomputation invalidates a stale id.

use flood_map_field_models::{ThresholdTable, Zone, ZoneId};
use flood_map_sensor_models::SensorReading;

/// Current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionState {
    /// No zone is isolated; all zones are rendered.
    #[default]
    Unselected,
    /// One zone is isolated; only it is rendered.
    Selected(ZoneId),
}

/// Zone selection controller.
///
/// Lives for the session; there is no terminal state. Repeat clicks on
/// the selected zone keep it selected — only a background click clears.
#[derive(Debug, Clone, Default)]
pub struct ZoneSelection {
    state: SelectionState,
}

impl ZoneSelection {
    /// Creates a controller with nothing selected.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: SelectionState::Unselected,
        }
    }

    /// The current selection state.
    #[must_use]
    pub const fn state(&self) -> SelectionState {
        self.state
    }

    /// Handles a click on a zone.
    pub fn click_zone(&mut self, id: ZoneId) {
        log::debug!("{id} selected");
        self.state = SelectionState::Selected(id);
    }

    /// Handles a click on the map background.
    pub fn click_background(&mut self) {
        self.state = SelectionState::Unselected;
    }

    /// Drops a selection whose zone no longer exists.
    ///
    /// Call after every recomputation: zone ids are positional within one
    /// zone set, so a stale id must not survive into the next one.
    pub fn reconcile(&mut self, zones: &[Zone]) {
        if let SelectionState::Selected(id) = self.state {
            if !zones.iter().any(|zone| zone.id == id) {
                log::debug!("{id} no longer exists, clearing selection");
                self.state = SelectionState::Unselected;
            }
        }
    }

    /// The zones to render: all of them when unselected, only the
    /// matching zone when one is selected.
    #[must_use]
    pub fn visible_zones<'a>(&self, zones: &'a [Zone]) -> Vec<&'a Zone> {
        match self.state {
            SelectionState::Unselected => zones.iter().collect(),
            SelectionState::Selected(id) => {
                zones.iter().filter(|zone| zone.id == id).collect()
            }
        }
    }

    /// The readings whose category matches the selected zone's.
    ///
    /// Returns `None` when nothing is selected (distinct from an empty
    /// subset, which means the selected category has no readings).
    #[must_use]
    pub fn selected_readings<'a>(
        &self,
        zones: &[Zone],
        readings: &'a [SensorReading],
        thresholds: &ThresholdTable,
    ) -> Option<Vec<&'a SensorReading>> {
        let SelectionState::Selected(id) = self.state else {
            return None;
        };
        let zone = zones.iter().find(|zone| zone.id == id)?;
        Some(
            readings
                .iter()
                .filter(|reading| thresholds.classify(reading.value) == zone.category)
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use geo::MultiPolygon;

    fn zone(index: usize, lower: f64, upper: f64, category: &str) -> Zone {
        Zone {
            id: ZoneId(index),
            lower_bound: lower,
            upper_bound: upper,
            category: category.to_string(),
            geometry: MultiPolygon::new(Vec::new()),
        }
    }

    fn reading(id: u64, value: f64) -> SensorReading {
        SensorReading {
            id,
            device_id: None,
            lat: 1.0,
            lng: 102.0,
            value,
            captured_at: Utc::now(),
            sensor_type: None,
            battery_percent: None,
        }
    }

    fn two_zones() -> Vec<Zone> {
        vec![zone(0, 0.0, 5.0, "low"), zone(1, 5.0, 10.0, "high")]
    }

    fn low_high_table() -> ThresholdTable {
        ThresholdTable::new(&[0.0, 5.0, 10.0], &["low", "high"]).unwrap()
    }

    #[test]
    fn repeat_clicks_keep_the_zone_selected() {
        let mut selection = ZoneSelection::new();
        selection.click_zone(ZoneId(1));
        selection.click_zone(ZoneId(1));
        assert_eq!(selection.state(), SelectionState::Selected(ZoneId(1)));
    }

    #[test]
    fn background_click_clears() {
        let mut selection = ZoneSelection::new();
        selection.click_zone(ZoneId(0));
        selection.click_background();
        assert_eq!(selection.state(), SelectionState::Unselected);

        let zones = two_zones();
        let readings = [reading(1, 2.0)];
        assert!(
            selection
                .selected_readings(&zones, &readings, &low_high_table())
                .is_none()
        );
    }

    #[test]
    fn selection_isolates_one_zone() {
        let zones = two_zones();
        let mut selection = ZoneSelection::new();
        assert_eq!(selection.visible_zones(&zones).len(), 2);

        selection.click_zone(ZoneId(1));
        let visible = selection.visible_zones(&zones);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].category, "high");
    }

    #[test]
    fn selected_readings_follow_the_zone_category() {
        let zones = two_zones();
        let readings = [reading(1, 2.0), reading(2, 7.0), reading(3, 9.5)];
        let table = low_high_table();

        let mut selection = ZoneSelection::new();
        selection.click_zone(ZoneId(1));

        let subset = selection
            .selected_readings(&zones, &readings, &table)
            .unwrap();
        assert_eq!(subset.len(), 2);
        assert!(subset.iter().all(|reading| reading.value >= 5.0));

        // An empty subset is still a selection, not "no selection".
        selection.click_zone(ZoneId(0));
        let readings = [reading(4, 8.0)];
        let subset = selection
            .selected_readings(&zones, &readings, &table)
            .unwrap();
        assert!(subset.is_empty());
    }

    #[test]
    fn stale_selection_is_invalidated_by_reconcile() {
        let mut selection = ZoneSelection::new();
        selection.click_zone(ZoneId(1));

        // The next recomputation produced only one zone.
        let shrunk = vec![zone(0, 0.0, 5.0, "low")];
        selection.reconcile(&shrunk);
        assert_eq!(selection.state(), SelectionState::Unselected);
    }

    #[test]
    fn surviving_selection_is_kept_by_reconcile() {
        let mut selection = ZoneSelection::new();
        selection.click_zone(ZoneId(0));
        selection.reconcile(&two_zones());
        assert_eq!(selection.state(), SelectionState::Selected(ZoneId(0)));
    }
}
