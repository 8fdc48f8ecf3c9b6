//! Monitoring area boundary.
//!
//! The area of interest is a single closed polygon ring fixed for the
//! lifetime of a session. All validation happens here so clipping never
//! encounters a malformed boundary.

use geo::line_intersection::{LineIntersection, line_intersection};
use geo::{BoundingRect, Line, LineString, MultiPolygon, Polygon, Rect, coord};
use geojson::GeoJson;

use crate::ConfigError;

/// A validated monitoring area boundary.
///
/// Holds a simple (non-self-intersecting), closed exterior ring of lng/lat
/// vertices plus its precomputed bounding rectangle. Interior rings are
/// not supported; the monitored region is a single contiguous area.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaOfInterest {
    polygon: Polygon<f64>,
    bbox: Rect<f64>,
}

impl AreaOfInterest {
    /// Validates a closed ring and builds the boundary.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the ring is too small, not closed,
    /// contains non-finite coordinates, or self-intersects.
    pub fn new(ring: LineString<f64>) -> Result<Self, ConfigError> {
        if ring.0.len() < 4 {
            return Err(ConfigError::BoundaryTooSmall(ring.0.len()));
        }
        for (index, coord) in ring.0.iter().enumerate() {
            if !coord.x.is_finite() || !coord.y.is_finite() {
                return Err(ConfigError::NonFiniteBoundaryVertex { index });
            }
        }
        if !ring.is_closed() {
            return Err(ConfigError::UnclosedBoundary);
        }
        check_simple(&ring)?;

        let polygon = Polygon::new(ring, Vec::new());
        let bbox = polygon
            .bounding_rect()
            .unwrap_or_else(|| Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 0.0, y: 0.0 }));

        Ok(Self { polygon, bbox })
    }

    /// Parses a boundary from a GeoJSON document.
    ///
    /// Accepts a `FeatureCollection`, a `Feature`, or a bare `Geometry`;
    /// the first `Polygon` (or first part of a `MultiPolygon`) wins. Only
    /// the exterior ring is used.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the document does not parse, contains
    /// no polygon, or the polygon fails ring validation.
    pub fn from_geojson(doc: &str) -> Result<Self, ConfigError> {
        let geojson: GeoJson = doc
            .parse()
            .map_err(|e: geojson::Error| ConfigError::BoundaryGeoJson {
                message: e.to_string(),
            })?;
        let polygon = first_polygon(&geojson).ok_or_else(|| ConfigError::BoundaryGeoJson {
            message: "no polygon geometry found".to_string(),
        })?;
        Self::new(polygon.exterior().clone())
    }

    /// The boundary polygon.
    #[must_use]
    pub const fn polygon(&self) -> &Polygon<f64> {
        &self.polygon
    }

    /// Bounding rectangle of the boundary, used to size the sample lattice.
    #[must_use]
    pub const fn bounding_rect(&self) -> Rect<f64> {
        self.bbox
    }

    /// The boundary as a `MultiPolygon`, for boolean clipping.
    #[must_use]
    pub fn clip_mask(&self) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![self.polygon.clone()])
    }
}

/// Rejects rings whose non-adjacent segments touch or cross.
///
/// Adjacent segments share exactly one endpoint, which is fine; the first
/// and last segments of a closed ring are adjacent through the closing
/// vertex.
fn check_simple(ring: &LineString<f64>) -> Result<(), ConfigError> {
    let segments: Vec<Line<f64>> = ring.lines().collect();
    let count = segments.len();

    for i in 0..count {
        for j in (i + 1)..count {
            let adjacent = j == i + 1 || (i == 0 && j == count - 1);
            if adjacent {
                continue;
            }
            if let Some(hit) = line_intersection(segments[i], segments[j]) {
                let (x, y) = match hit {
                    LineIntersection::SinglePoint { intersection, .. } => {
                        (intersection.x, intersection.y)
                    }
                    LineIntersection::Collinear { intersection } => {
                        (intersection.start.x, intersection.start.y)
                    }
                };
                return Err(ConfigError::SelfIntersectingBoundary { x, y });
            }
        }
    }

    Ok(())
}

/// Finds the first polygon in a parsed GeoJSON document.
fn first_polygon(geojson: &GeoJson) -> Option<Polygon<f64>> {
    match geojson {
        GeoJson::FeatureCollection(collection) => collection
            .features
            .iter()
            .find_map(|feature| feature.geometry.as_ref().and_then(geometry_polygon)),
        GeoJson::Feature(feature) => feature.geometry.as_ref().and_then(geometry_polygon),
        GeoJson::Geometry(geometry) => geometry_polygon(geometry),
    }
}

/// Converts a GeoJSON geometry into a [`Polygon`], if it holds one.
fn geometry_polygon(geometry: &geojson::Geometry) -> Option<Polygon<f64>> {
    let geo_geom: geo::Geometry<f64> = geometry.clone().try_into().ok()?;
    match geo_geom {
        geo::Geometry::Polygon(polygon) => Some(polygon),
        geo::Geometry::MultiPolygon(multi) => multi.0.into_iter().next(),
        _ => None,
    }
}
