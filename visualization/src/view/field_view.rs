//! Amplitude and phase images of the selected field
//!
//! Produces the two scalar grids drawn side by side: `|z|` with fixed levels
//! `(0, 1)` and `arg(z)` with levels `(-π, π)`. Colour mapping belongs to the
//! host toolkit; these images only expose values and levels through
//! `FieldDataSource`.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::f64::consts::PI;
use std::sync::Arc;

use log::debug;
use ndarray::Array2;

use spirals_core::{ExplorationSession, Field};

use crate::view::View;

/// Scalar grid consumed by an image renderer
pub trait FieldDataSource {
    /// Grid dimensions (rows, columns)
    fn dimensions(&self) -> (usize, usize);

    /// Value at a cell, `None` outside the grid
    fn value_at(&self, row: usize, col: usize) -> Option<f64>;

    /// Display levels (min, max) for the colour map
    fn levels(&self) -> (f64, f64);

    /// Optional label
    fn label(&self) -> Option<&str> {
        None
    }
}

/// Which scalar of the complex field an image shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    Amplitude,
    Phase,
}

impl ImageKind {
    /// Fixed display levels
    pub fn levels(self) -> (f64, f64) {
        match self {
            Self::Amplitude => (0.0, 1.0),
            Self::Phase => (-PI, PI),
        }
    }

    fn extract(self, field: &Field) -> Array2<f64> {
        match self {
            Self::Amplitude => field.amplitude(),
            Self::Phase => field.phase(),
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Amplitude => "abs",
            Self::Phase => "angle",
        }
    }
}

/// One scalar image of the field
#[derive(Debug, Clone)]
pub struct FieldImage {
    kind: ImageKind,
    values: Array2<f64>,
}

impl FieldImage {
    pub fn new(kind: ImageKind, field: &Field) -> Self {
        Self { kind, values: kind.extract(field) }
    }

    pub fn kind(&self) -> ImageKind {
        self.kind
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }
}

impl FieldDataSource for FieldImage {
    fn dimensions(&self) -> (usize, usize) {
        self.values.dim()
    }

    fn value_at(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get((row, col)).copied()
    }

    fn levels(&self) -> (f64, f64) {
        self.kind.levels()
    }

    fn label(&self) -> Option<&str> {
        Some(self.kind.label())
    }
}

/// Paired amplitude/phase images that follow the session selection
pub struct FieldView {
    amplitude: FieldImage,
    phase: FieldImage,
    shown: Arc<Field>,
    generation: u64,
}

impl FieldView {
    pub fn new(session: &ExplorationSession) -> Self {
        let field = Arc::clone(&session.selection().field);
        Self {
            amplitude: FieldImage::new(ImageKind::Amplitude, &field),
            phase: FieldImage::new(ImageKind::Phase, &field),
            shown: field,
            generation: 0,
        }
    }

    pub fn amplitude(&self) -> &FieldImage {
        &self.amplitude
    }

    pub fn phase(&self) -> &FieldImage {
        &self.phase
    }

    pub fn image(&self, kind: ImageKind) -> &FieldImage {
        match kind {
            ImageKind::Amplitude => &self.amplitude,
            ImageKind::Phase => &self.phase,
        }
    }
}

impl View for FieldView {
    fn name(&self) -> &str {
        "field"
    }

    fn refresh(&mut self, session: &ExplorationSession) {
        let field = &session.selection().field;
        if Arc::ptr_eq(field, &self.shown) {
            return;
        }

        self.amplitude = FieldImage::new(ImageKind::Amplitude, field);
        self.phase = FieldImage::new(ImageKind::Phase, field);
        self.shown = Arc::clone(field);
        self.generation += 1;
        debug!("Field images updated (generation {})", self.generation);
    }

    fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use num_complex::Complex64;

    #[test]
    fn test_images_expose_values_and_levels() {
        let values = Array2::from_shape_fn((2, 2), |(i, j)| Complex64::new(i as f64, j as f64));
        let field = Field::from_array(values).unwrap();

        let amplitude = FieldImage::new(ImageKind::Amplitude, &field);
        assert_eq!(amplitude.dimensions(), (2, 2));
        assert_abs_diff_eq!(amplitude.value_at(1, 1).unwrap(), 2f64.sqrt());
        assert_eq!(amplitude.value_at(2, 0), None);
        assert_eq!(amplitude.levels(), (0.0, 1.0));
        assert_eq!(amplitude.label(), Some("abs"));

        let phase = FieldImage::new(ImageKind::Phase, &field);
        assert_abs_diff_eq!(phase.value_at(0, 1).unwrap(), PI / 2.0);
        assert_eq!(phase.levels(), (-PI, PI));
    }
}
