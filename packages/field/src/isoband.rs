//! Contour band extraction from the sample lattice.
//!
//! For each threshold band, collects the region of the lattice whose
//! interpolated values fall within the band. Each grid cell is split into
//! four triangles around its center (center value = mean of the corners);
//! a triangle's band fragment is found by clipping it against the lower
//! and upper levels with linear interpolation along edges. Linear
//! interpolation is exact per triangle, so there is no saddle ambiguity
//! to disambiguate. Fragments are merged into one multi-polygon per band.
//!
//! Band regions are geometrically closed on both sides, so neighboring
//! bands share boundaries exactly and their interiors never overlap.
//! Classification half-openness is handled by the threshold table, not
//! here.

use flood_map_field_models::{ThresholdBand, ThresholdTable};
use geo::algorithm::unary_union;
use geo::{Area, Coord, LineString, MultiPolygon, Polygon};

use crate::grid::Lattice;

/// One extracted contour band with its accumulated geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct BandGeometry {
    /// Inclusive lower bound of the band.
    pub lower: f64,
    /// Upper bound of the band.
    pub upper: f64,
    /// Category label from the threshold table.
    pub category: String,
    /// Union of all cell fragments for this band.
    pub geometry: MultiPolygon<f64>,
}

/// A lattice sample: position plus interpolated value.
type Vertex = (Coord<f64>, f64);

/// Which side of a level line to keep when clipping.
#[derive(Debug, Clone, Copy)]
enum Keep {
    AtOrAbove,
    AtOrBelow,
}

impl Keep {
    fn contains(self, value: f64, level: f64) -> bool {
        match self {
            Self::AtOrAbove => value >= level,
            Self::AtOrBelow => value <= level,
        }
    }
}

/// Extracts one geometry per threshold band that the lattice values
/// actually reach. Bands with no contributing cells are absent from the
/// output; band order follows the table.
#[must_use]
pub fn extract_bands(lattice: &Lattice, thresholds: &ThresholdTable) -> Vec<BandGeometry> {
    thresholds
        .bands()
        .iter()
        .filter_map(|band| {
            let fragments = band_fragments(lattice, band);
            if fragments.is_empty() {
                return None;
            }
            let geometry = unary_union(fragments.iter());
            if geometry.0.is_empty() {
                return None;
            }
            Some(BandGeometry {
                lower: band.lower,
                upper: band.upper,
                category: band.label.clone(),
                geometry,
            })
        })
        .collect()
}

/// Collects the per-cell polygon fragments of one band.
fn band_fragments(lattice: &Lattice, band: &ThresholdBand) -> Vec<Polygon<f64>> {
    let mut fragments = Vec::new();
    if lattice.cols() < 2 || lattice.rows() < 2 {
        return fragments;
    }

    for row in 0..lattice.rows() - 1 {
        for col in 0..lattice.cols() - 1 {
            cell_fragments(lattice, col, row, band, &mut fragments);
        }
    }

    fragments
}

/// Appends the fragments one cell contributes to a band.
fn cell_fragments(
    lattice: &Lattice,
    col: usize,
    row: usize,
    band: &ThresholdBand,
    fragments: &mut Vec<Polygon<f64>>,
) {
    let sw = sample(lattice, col, row);
    let se = sample(lattice, col + 1, row);
    let ne = sample(lattice, col + 1, row + 1);
    let nw = sample(lattice, col, row + 1);

    let corner_min = sw.1.min(se.1).min(ne.1).min(nw.1);
    let corner_max = sw.1.max(se.1).max(ne.1).max(nw.1);
    if corner_max < band.lower || corner_min > band.upper {
        return;
    }

    let center = cell_center(&[sw, se, ne, nw]);
    for triangle in [
        [sw, se, center],
        [se, ne, center],
        [ne, nw, center],
        [nw, sw, center],
    ] {
        if let Some(fragment) = triangle_fragment(&triangle, band.lower, band.upper) {
            fragments.push(fragment);
        }
    }
}

fn sample(lattice: &Lattice, col: usize, row: usize) -> Vertex {
    (lattice.position(col, row), lattice.value(col, row))
}

fn cell_center(corners: &[Vertex; 4]) -> Vertex {
    let x = corners.iter().map(|(coord, _)| coord.x).sum::<f64>() / 4.0;
    let y = corners.iter().map(|(coord, _)| coord.y).sum::<f64>() / 4.0;
    let value = corners.iter().map(|(_, value)| value).sum::<f64>() / 4.0;
    (Coord { x, y }, value)
}

/// Clips one triangle to `lower <= value <= upper`.
///
/// Returns `None` when the band region within the triangle is empty or
/// degenerate (a point or a line on a level).
fn triangle_fragment(triangle: &[Vertex; 3], lower: f64, upper: f64) -> Option<Polygon<f64>> {
    let kept = clip_at_level(triangle, lower, Keep::AtOrAbove);
    let kept = clip_at_level(&kept, upper, Keep::AtOrBelow);
    if kept.len() < 3 {
        return None;
    }

    let ring: Vec<Coord<f64>> = kept.into_iter().map(|(coord, _)| coord).collect();
    let fragment = Polygon::new(LineString::from(ring), Vec::new());
    if fragment.unsigned_area() == 0.0 {
        return None;
    }
    Some(fragment)
}

/// Sutherland-Hodgman pass against one interpolated level line.
fn clip_at_level(vertices: &[Vertex], level: f64, keep: Keep) -> Vec<Vertex> {
    let mut kept = Vec::with_capacity(vertices.len() + 2);

    for (index, &(coord, value)) in vertices.iter().enumerate() {
        let (next_coord, next_value) = vertices[(index + 1) % vertices.len()];
        let inside = keep.contains(value, level);
        let next_inside = keep.contains(next_value, level);

        if inside {
            kept.push((coord, value));
        }
        if inside != next_inside {
            kept.push(level_crossing((coord, value), (next_coord, next_value), level));
        }
    }

    kept
}

/// Point on the segment `a`-`b` where the value crosses `level`.
fn level_crossing(a: Vertex, b: Vertex, level: f64) -> Vertex {
    let t = (level - a.1) / (b.1 - a.1);
    let coord = Coord {
        x: a.0.x + t * (b.0.x - a.0.x),
        y: a.0.y + t * (b.0.y - a.0.y),
    };
    (coord, level)
}
