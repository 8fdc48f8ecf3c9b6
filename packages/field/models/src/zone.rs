//! Classified risk zones.
//!
//! A zone is one threshold band's geometry after clipping to the
//! monitoring boundary. Zones are rebuilt from scratch on every
//! recomputation; ids are positional within one zone set and carry no
//! identity across recomputations.

use geo::MultiPolygon;
use geojson::feature::Id;
use geojson::{Feature, FeatureCollection, JsonObject, JsonValue};
use serde::{Deserialize, Serialize};

/// Identifier of a zone within a single recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneId(pub usize);

impl std::fmt::Display for ZoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "zone-{}", self.0)
    }
}

/// One classified risk zone.
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    /// Positional id within the current zone set.
    pub id: ZoneId,
    /// Lower bound of the source threshold band (meters).
    pub lower_bound: f64,
    /// Upper bound of the source threshold band (meters).
    pub upper_bound: f64,
    /// Category label from the threshold table.
    pub category: String,
    /// Clipped zone geometry. A band that crosses the boundary into
    /// disjoint pieces stays one zone with a multi-part geometry.
    pub geometry: MultiPolygon<f64>,
}

impl Zone {
    /// Human-readable interval label, e.g. `"0-2"`.
    #[must_use]
    pub fn interval_label(&self) -> String {
        format!("{}-{}", self.lower_bound, self.upper_bound)
    }

    /// Converts the zone into a GeoJSON feature.
    #[must_use]
    pub fn to_feature(&self) -> Feature {
        let mut properties = JsonObject::new();
        properties.insert("category".to_owned(), JsonValue::from(self.category.clone()));
        properties.insert("lowerBound".to_owned(), JsonValue::from(self.lower_bound));
        properties.insert("upperBound".to_owned(), JsonValue::from(self.upper_bound));
        properties.insert("range".to_owned(), JsonValue::from(self.interval_label()));

        Feature {
            bbox: None,
            geometry: Some(geojson::Geometry::new(geojson::Value::from(&self.geometry))),
            id: Some(Id::String(self.id.to_string())),
            properties: Some(properties),
            foreign_members: None,
        }
    }
}

/// Converts a zone set into a GeoJSON feature collection for rendering.
#[must_use]
pub fn to_feature_collection(zones: &[Zone]) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: zones.iter().map(Zone::to_feature).collect(),
        foreign_members: None,
    }
}
