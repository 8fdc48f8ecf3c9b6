//! Clipping of extracted bands to the monitoring boundary.

use flood_map_field_models::{AreaOfInterest, Zone, ZoneId};
use geo::BooleanOps;

use crate::isoband::BandGeometry;

/// Intersects each band with the boundary and builds the zone set.
///
/// Bands whose intersection is empty are dropped. A band that crosses
/// the boundary into disjoint pieces stays one zone with a multi-part
/// geometry. Zone ids are positional within the returned set.
#[must_use]
pub fn clip_to_boundary(bands: Vec<BandGeometry>, boundary: &AreaOfInterest) -> Vec<Zone> {
    let mask = boundary.clip_mask();
    let mut zones = Vec::with_capacity(bands.len());

    for band in bands {
        let clipped = band.geometry.intersection(&mask);
        if clipped.0.is_empty() {
            log::debug!(
                "band {} [{}, {}] lies outside the boundary, dropping",
                band.category,
                band.lower,
                band.upper
            );
            continue;
        }
        zones.push(Zone {
            id: ZoneId(zones.len()),
            lower_bound: band.lower,
            upper_bound: band.upper,
            category: band.category,
            geometry: clipped,
        });
    }

    zones
}
