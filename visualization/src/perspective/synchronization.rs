//! Cutline Overlay Synchronization
//!
//! Keeps the two draggable cutline overlays (one on the amplitude image, one
//! on the phase image) consistent with the session cursor and therefore with
//! the slice view.
//!
//! ## Consistency model
//!
//! Let `c` be the session cursor and `Lₐ`, `Lᵩ` the overlays. After every
//! handled interaction:
//!
//! 1. `Lₐ.angle = Lᵩ.angle = c.orientation.angle()`
//! 2. `Lₐ.value = Lᵩ.value = c.position`
//!
//! A drag on either overlay is written to the session first; both overlays
//! are then re-read from the cursor. Overlays never copy from each other.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use log::trace;
use serde::{Deserialize, Serialize};

use spirals_core::{CursorState, ExplorationSession, Orientation, SliceData};

/// Overlay identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverlayKind {
    Amplitude,
    Phase,
}

/// Infinite line drawn over a field image
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineOverlay {
    /// Image the line belongs to
    pub kind: OverlayKind,

    /// Line angle in degrees (0 horizontal, 90 vertical)
    pub angle: f64,

    /// Position along the axis perpendicular to the line
    pub value: f64,

    /// Whether the user may drag the line
    pub movable: bool,
}

impl LineOverlay {
    fn from_cursor(kind: OverlayKind, cursor: &CursorState) -> Self {
        Self {
            kind,
            angle: cursor.orientation().angle(),
            value: cursor.position(),
            movable: true,
        }
    }

    pub fn orientation(&self) -> Orientation {
        Orientation::from_angle(self.angle)
    }
}

/// Mediates overlay interactions through the session cursor
#[derive(Debug, Clone)]
pub struct CutlineSynchronizer {
    amplitude: LineOverlay,
    phase: LineOverlay,
    synced_revision: u64,
}

impl CutlineSynchronizer {
    pub fn new(cursor: &CursorState) -> Self {
        Self {
            amplitude: LineOverlay::from_cursor(OverlayKind::Amplitude, cursor),
            phase: LineOverlay::from_cursor(OverlayKind::Phase, cursor),
            synced_revision: cursor.revision(),
        }
    }

    pub fn overlay(&self, kind: OverlayKind) -> &LineOverlay {
        match kind {
            OverlayKind::Amplitude => &self.amplitude,
            OverlayKind::Phase => &self.phase,
        }
    }

    /// Cursor revision the overlays reflect
    pub fn synced_revision(&self) -> u64 {
        self.synced_revision
    }

    /// Whether the overlays lag behind the cursor
    pub fn is_stale(&self, cursor: &CursorState) -> bool {
        cursor.revision() != self.synced_revision
    }

    /// Handle a drag of overlay `source` to `value`.
    pub fn drag(&mut self, session: &mut ExplorationSession, source: OverlayKind, value: f64) -> Option<SliceData> {
        let orientation = self.overlay(source).orientation();
        trace!("{:?} overlay dragged to {}", source, value);
        let slice = session.reslice(value, orientation);
        self.sync_from(session.cursor());
        slice
    }

    /// Handle a click on either overlay: rotate the cutline in place.
    pub fn click(&mut self, session: &mut ExplorationSession) -> Option<SliceData> {
        let slice = session.rotate_cursor();
        self.sync_from(session.cursor());
        slice
    }

    /// Re-read both overlays from the cursor.
    pub fn sync_from(&mut self, cursor: &CursorState) {
        self.amplitude = LineOverlay::from_cursor(OverlayKind::Amplitude, cursor);
        self.phase = LineOverlay::from_cursor(OverlayKind::Phase, cursor);
        self.synced_revision = cursor.revision();
    }

    /// Check the consistency model against `cursor`.
    pub fn is_consistent_with(&self, cursor: &CursorState) -> bool {
        let angle = cursor.orientation().angle();
        let value = cursor.position();
        [self.amplitude, self.phase]
            .iter()
            .all(|line| line.angle == angle && line.value == value)
    }
}
