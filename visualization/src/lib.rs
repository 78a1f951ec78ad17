//! Spirals Explorer Visualization
//!
//! Presentation adapters observing an `ExplorationSession`. Nothing here
//! draws pixels: each view turns the session's read operations into
//! render-ready data (image grids with levels, plot series, overlay line
//! geometry, label text) for whatever toolkit hosts the explorer.
//!
//! Views never reference each other. The `perspective` layer drains the
//! session's event channel and refreshes only the views a change affects;
//! the cutline overlays always re-read the session cursor after a drag.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod interaction;
pub mod perspective;
pub mod view;

pub use interaction::{InputEvent, InteractionController, PointerRateLimiter};
pub use perspective::synchronization::{CutlineSynchronizer, LineOverlay, OverlayKind};
pub use perspective::Perspectives;
pub use view::{View, ViewBounds, ViewError};
