//! Cutline cursor state
//!
//! The cursor is the single source of truth for which 1-D slice of the
//! current field is displayed. Both line overlays (amplitude image, phase
//! image) and the slice plot read orientation and position from here; a drag
//! on either overlay writes here first and every view re-syncs from the
//! result, so the two overlays cannot drift apart.
//!
//! Positions are stored rounded to the nearest grid index (ties to even).
//! Out-of-range positions are kept as-is and yield no slice rather than a
//! clamped one, so a view can simply skip drawing.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::f64::consts::PI;
use std::fmt;

use log::trace;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::field::Field;

/// Slice orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Line at angle 0; the slice is a column `field[:, p]`
    Horizontal,

    /// Line at angle 90; the slice is a row `field[p, :]`
    Vertical,
}

impl Orientation {
    /// Line angle in degrees used by the overlays
    pub fn angle(self) -> f64 {
        match self {
            Self::Horizontal => 0.0,
            Self::Vertical => 90.0,
        }
    }

    /// Inverse of `angle`; any non-zero angle reads as vertical.
    pub fn from_angle(angle: f64) -> Self {
        if angle == 0.0 {
            Self::Horizontal
        } else {
            Self::Vertical
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Horizontal => write!(f, "horizontal"),
            Self::Vertical => write!(f, "vertical"),
        }
    }
}

/// One extracted slice, ready for plotting
#[derive(Debug, Clone, PartialEq)]
pub struct SliceData {
    /// Orientation the slice was taken with
    pub orientation: Orientation,

    /// Grid index of the slice
    pub index: usize,

    /// `|z|` along the slice
    pub amplitude: Array1<f64>,

    /// `arg(z)` along the slice
    pub phase: Array1<f64>,

    /// Abscissa: `N` evenly spaced samples over `[-π, π]`
    pub x_axis: Array1<f64>,
}

/// Abscissa shared by every slice of an `n`-sized field
pub fn slice_axis(n: usize) -> Array1<f64> {
    Array1::linspace(-PI, PI, n)
}

/// Orientation and position of the cutline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CursorState {
    orientation: Orientation,
    position: f64,
    revision: u64,
}

impl CursorState {
    /// Horizontal cursor at the midpoint of an `n`-sized grid
    pub fn centered(n: usize) -> Self {
        Self {
            orientation: Orientation::Horizontal,
            position: (n / 2) as f64,
            revision: 0,
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    /// Incremented on every mutation; lets polling views detect change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Flip orientation, keeping the numeric position.
    pub fn toggle_orientation(&mut self) {
        self.orientation = self.orientation.toggled();
        self.bump();
    }

    /// Move the cursor to the grid index nearest `pos`.
    pub fn set_position(&mut self, pos: f64) {
        self.position = pos.round_ties_even();
        self.bump();
    }

    /// Set position and orientation as a single change.
    pub fn update(&mut self, pos: f64, orientation: Orientation) {
        self.orientation = orientation;
        self.position = pos.round_ties_even();
        self.bump();
    }

    /// Grid index of the cursor, if it lies within `[0, n)`
    pub fn index(&self, n: usize) -> Option<usize> {
        if self.position.is_finite() && self.position >= 0.0 && self.position < n as f64 {
            Some(self.position as usize)
        } else {
            None
        }
    }

    /// Extract the slice under the cursor; `None` when out of range.
    pub fn slice(&self, field: &Field) -> Option<SliceData> {
        let n = field.size();
        let index = self.index(n)?;
        let line = match self.orientation {
            Orientation::Horizontal => field.column(index)?,
            Orientation::Vertical => field.row(index)?,
        };

        Some(SliceData {
            orientation: self.orientation,
            index,
            amplitude: line.mapv(|z| z.norm()),
            phase: line.mapv(|z| z.arg()),
            x_axis: slice_axis(n),
        })
    }

    fn bump(&mut self) {
        self.revision += 1;
        trace!(
            "Cursor now {} at {} (revision {})",
            self.orientation,
            self.position,
            self.revision
        );
    }
}
