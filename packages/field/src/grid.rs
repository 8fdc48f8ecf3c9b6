//! Regular sample lattice over the boundary's bounding box.
//!
//! Positions are implicit (origin plus index times cell size), so only a
//! flat row-major value buffer is stored. The same lattice is reused
//! across recomputations while the boundary and cell size are unchanged;
//! only the values are rewritten.

use flood_map_field_models::ConfigError;
use geo::{Coord, Rect};

/// A regular lattice of scalar samples covering a bounding box.
///
/// Points are spaced `cell_size` degrees apart, ordered row-major from
/// south to north and west to east. Rows and columns cover the box
/// inclusive of its edges; the last row/column may extend slightly past
/// the max edge so coverage is guaranteed. The ordering is deterministic
/// for fixed inputs, so indexes are stable within one recomputation.
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    cols: usize,
    rows: usize,
    origin: Coord<f64>,
    cell_size: f64,
    values: Vec<f64>,
}

impl Lattice {
    /// Builds a lattice covering `bounds` at `cell_size` degree spacing.
    ///
    /// All values start at zero; callers overwrite them via
    /// [`Lattice::fill_with`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidCellSize`] if `cell_size` is not a
    /// positive finite number.
    pub fn sample(bounds: Rect<f64>, cell_size: f64) -> Result<Self, ConfigError> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(ConfigError::InvalidCellSize(cell_size));
        }

        let cols = span_points(bounds.width(), cell_size);
        let rows = span_points(bounds.height(), cell_size);

        Ok(Self {
            cols,
            rows,
            origin: bounds.min(),
            cell_size,
            values: vec![0.0; cols * rows],
        })
    }

    /// Number of columns (west to east).
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Number of rows (south to north).
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Spacing between neighboring points, in degrees.
    #[must_use]
    pub const fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Geographic position of the point at (`col`, `row`).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn position(&self, col: usize, row: usize) -> Coord<f64> {
        Coord {
            x: self.origin.x + col as f64 * self.cell_size,
            y: self.origin.y + row as f64 * self.cell_size,
        }
    }

    /// Sampled value at (`col`, `row`).
    #[must_use]
    pub fn value(&self, col: usize, row: usize) -> f64 {
        self.values[row * self.cols + col]
    }

    /// Rewrites every value by sampling `field` at each point, in
    /// row-major order (south to north, west to east).
    pub fn fill_with<F: FnMut(Coord<f64>) -> f64>(&mut self, mut field: F) {
        for row in 0..self.rows {
            for col in 0..self.cols {
                self.values[row * self.cols + col] = field(self.position(col, row));
            }
        }
    }

    /// Iterates all points with their values, in row-major order.
    pub fn points(&self) -> impl Iterator<Item = (Coord<f64>, f64)> + '_ {
        (0..self.rows).flat_map(move |row| {
            (0..self.cols).map(move |col| (self.position(col, row), self.value(col, row)))
        })
    }
}

/// Number of points needed to cover `span` at `step` spacing, inclusive
/// of both edges.
fn span_points(span: f64, step: f64) -> usize {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let intervals = (span / step).ceil() as usize;
    intervals + 1
}
