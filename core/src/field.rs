//! Complex field snapshots
//!
//! A field is a square `N × N` grid of complex values rebuilt from a packed
//! real-valued array. The packed layout is
//!
//! ```text
//! [ re(0) .. re(N²/2 - 1) | im(0) .. im(N²/2 - 1) | pad pad ]
//! ```
//!
//! The complex half is reshaped row-major into an `N/2 × N` block, stacked on
//! top of its row-reversed copy to give `N × N`, then transposed. The up/down
//! mirror is a storage convenience; nothing downstream relies on it.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::path::PathBuf;

use ndarray::{Array1, Array2, Axis};
use num_complex::Complex64;

use crate::error::{ExplorerError, Result};

/// Trailing entries of a packed array that carry no data
pub const PACKED_PADDING: usize = 2;

/// Length of the packed array for a grid of side `n`
pub fn packed_len(n: usize) -> usize {
    n * n + PACKED_PADDING
}

/// Square grid of complex samples
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    values: Array2<Complex64>,
}

impl Field {
    /// Wrap an existing square grid.
    pub fn from_array(values: Array2<Complex64>) -> Result<Self> {
        let (rows, cols) = values.dim();
        if rows != cols {
            return Err(ExplorerError::Config(format!(
                "field grid must be square, got {}x{}",
                rows, cols
            )));
        }
        Ok(Self { values })
    }

    /// All-zero field of side `n`
    pub fn zeros(n: usize) -> Self {
        Self { values: Array2::zeros((n, n)) }
    }

    /// Side length `N`
    pub fn size(&self) -> usize {
        self.values.nrows()
    }

    pub fn values(&self) -> &Array2<Complex64> {
        &self.values
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Complex64> {
        self.values.get((row, col)).copied()
    }

    /// `|z|` for every cell
    pub fn amplitude(&self) -> Array2<f64> {
        self.values.mapv(|z| z.norm())
    }

    /// `arg(z)` in `(-π, π]` for every cell
    pub fn phase(&self) -> Array2<f64> {
        self.values.mapv(|z| z.arg())
    }

    /// Minimum and maximum amplitude over the grid
    pub fn amplitude_range(&self) -> (f64, f64) {
        self.values.iter().map(|z| z.norm()).fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), a| (lo.min(a), hi.max(a)),
        )
    }

    /// Column `col`, i.e. `field[:, col]`
    pub fn column(&self, col: usize) -> Option<Array1<Complex64>> {
        (col < self.size()).then(|| self.values.index_axis(Axis(1), col).to_owned())
    }

    /// Row `row`, i.e. `field[row, :]`
    pub fn row(&self, row: usize) -> Option<Array1<Complex64>> {
        (row < self.size()).then(|| self.values.index_axis(Axis(0), row).to_owned())
    }
}

/// Rebuild an `n × n` field from its packed representation.
pub fn reconstruct(packed: &[f64], n: usize) -> Result<Field> {
    if n == 0 || n % 2 != 0 {
        return Err(ExplorerError::OddGridSize(n));
    }

    let expected = packed_len(n);
    if packed.len() != expected {
        return Err(ExplorerError::InvalidFieldLength {
            path: PathBuf::new(),
            expected,
            actual: packed.len(),
        });
    }

    let half_cells = n * n / 2;
    let half_rows = n / 2;
    let (real, rest) = packed.split_at(half_cells);
    let imag = &rest[..half_cells];

    // Cell (r, c) of the N/2 x N block.
    let block = |r: usize, c: usize| {
        let k = r * n + c;
        Complex64::new(real[k], imag[k])
    };

    // Stacked grid row `s` is block row `s` or, in the mirrored half, block
    // row `n - 1 - s`; the transpose swaps the indices.
    let values = Array2::from_shape_fn((n, n), |(i, j)| {
        let source_row = if j < half_rows { j } else { n - 1 - j };
        block(source_row, i)
    });

    Ok(Field { values })
}
