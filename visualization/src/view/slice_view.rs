//! 1-D slice plots
//!
//! Two line series (amplitude and phase) over the `[-π, π]` abscissa. When
//! the cursor lies outside the grid the session reports no slice and the
//! previously drawn series stay on screen.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use glam::DVec2;
use log::trace;

use spirals_core::{ExplorationSession, Orientation, SliceData};

use crate::view::View;

/// Plotted points of one series
pub type Series = Vec<DVec2>;

/// Amplitude and phase slice plots
#[derive(Debug, Clone, Default)]
pub struct SliceView {
    amplitude: Series,
    phase: Series,
    orientation: Option<Orientation>,
    index: Option<usize>,
    generation: u64,
}

impl SliceView {
    pub fn new(session: &ExplorationSession) -> Self {
        let mut view = Self::default();
        view.refresh(session);
        view
    }

    pub fn amplitude(&self) -> &[DVec2] {
        &self.amplitude
    }

    pub fn phase(&self) -> &[DVec2] {
        &self.phase
    }

    /// Grid index of the series on screen
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn orientation(&self) -> Option<Orientation> {
        self.orientation
    }

    /// Replace the series with `slice`, or keep the current ones on `None`.
    pub fn apply(&mut self, slice: Option<SliceData>) {
        let Some(slice) = slice else {
            trace!("Cursor outside the grid; keeping previous slice");
            return;
        };

        self.amplitude = zip_series(&slice, slice.amplitude.iter());
        self.phase = zip_series(&slice, slice.phase.iter());
        self.orientation = Some(slice.orientation);
        self.index = Some(slice.index);
        self.generation += 1;
    }
}

fn zip_series<'a>(slice: &SliceData, values: impl Iterator<Item = &'a f64>) -> Series {
    slice
        .x_axis
        .iter()
        .zip(values)
        .map(|(&x, &y)| DVec2::new(x, y))
        .collect()
}

impl View for SliceView {
    fn name(&self) -> &str {
        "slice"
    }

    fn refresh(&mut self, session: &ExplorationSession) {
        self.apply(session.current_slice());
    }

    fn generation(&self) -> u64 {
        self.generation
    }
}
