//! View adapters and shared view types
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod field_view;
pub mod info_panel;
pub mod scatter_view;
pub mod slice_view;

use glam::DVec2;
use thiserror::Error;

use spirals_core::{ExplorationSession, ExplorerError};

/// View-layer errors
#[derive(Error, Debug)]
pub enum ViewError {
    /// Failure reported by the core
    #[error(transparent)]
    Explorer(#[from] ExplorerError),

    /// Data range with zero or negative extent
    #[error("Degenerate view range: {0}")]
    DegenerateRange(String),

    /// Pointer sampling rate that is not a positive, finite frequency
    #[error("Invalid pointer rate: {0} Hz")]
    InvalidRate(f64),
}

/// Scene-space rectangle occupied by a view (pixels, y down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBounds {
    /// Top-left corner
    pub origin: DVec2,

    /// Width and height
    pub size: DVec2,
}

impl Default for ViewBounds {
    fn default() -> Self {
        Self {
            origin: DVec2::ZERO,
            size: DVec2::new(800.0, 600.0),
        }
    }
}

impl ViewBounds {
    pub fn new(origin: DVec2, size: DVec2) -> Self {
        Self { origin, size }
    }

    /// Whether a scene point lies inside the rectangle (edges included)
    pub fn contains(&self, point: DVec2) -> bool {
        let max = self.origin + self.size;
        point.x >= self.origin.x && point.y >= self.origin.y && point.x <= max.x && point.y <= max.y
    }

    /// Scene point expressed as `[0, 1]²` fractions of the rectangle
    pub fn normalized(&self, point: DVec2) -> DVec2 {
        (point - self.origin) / self.size
    }
}

/// Adapter that derives render data from the session
pub trait View {
    /// Human-readable view name for logs
    fn name(&self) -> &str;

    /// Re-read whatever this view shows from the session.
    fn refresh(&mut self, session: &ExplorationSession);

    /// Bumped each time refreshed data differs from what was shown
    fn generation(&self) -> u64;
}
