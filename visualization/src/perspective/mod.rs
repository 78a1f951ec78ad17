//! Coordinated set of explorer views
//!
//! Subscribes to the session once and routes each event to the views it
//! affects: a new selection refreshes images, slice, marker and label; a
//! cursor change refreshes overlays and slice only.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod synchronization;

use crossbeam_channel::Receiver;
use log::debug;

use spirals_core::{ExplorationSession, ExplorerEvent};

use crate::view::field_view::FieldView;
use crate::view::info_panel::InfoPanel;
use crate::view::scatter_view::ScatterView;
use crate::view::slice_view::SliceView;
use crate::view::{View, ViewBounds};

use self::synchronization::CutlineSynchronizer;

/// All views of one exploration window set
pub struct Perspectives {
    pub field: FieldView,
    pub slice: SliceView,
    pub scatter: ScatterView,
    pub info: InfoPanel,
    pub cutline: CutlineSynchronizer,
    events: Receiver<ExplorerEvent>,
}

impl Perspectives {
    /// Build every view from the session's current state and subscribe.
    pub fn attach(session: &mut ExplorationSession, scatter_bounds: ViewBounds) -> Self {
        let events = session.subscribe();
        let mut perspectives = Self {
            field: FieldView::new(session),
            slice: SliceView::new(session),
            scatter: ScatterView::new(session.table(), scatter_bounds),
            info: InfoPanel::default(),
            cutline: CutlineSynchronizer::new(session.cursor()),
            events,
        };
        perspectives.scatter.refresh(session);
        perspectives.info.refresh(session);
        perspectives
    }

    /// Drain pending events and refresh the affected views.
    ///
    /// Returns the number of events handled.
    pub fn pump(&mut self, session: &ExplorationSession) -> usize {
        let mut selection_changed = false;
        let mut cursor_changed = false;
        let mut handled = 0;

        for event in self.events.try_iter() {
            handled += 1;
            match event {
                ExplorerEvent::SelectionChanged { .. } => selection_changed = true,
                ExplorerEvent::CursorMoved { .. } | ExplorerEvent::CursorRotated { .. } => {
                    cursor_changed = true
                }
            }
        }

        if selection_changed {
            self.field.refresh(session);
            self.scatter.refresh(session);
            self.info.refresh(session);
        }
        if cursor_changed {
            self.cutline.sync_from(session.cursor());
        }
        if selection_changed || cursor_changed {
            self.slice.refresh(session);
        }

        if handled > 0 {
            debug!(
                "Handled {} events (selection: {}, cursor: {})",
                handled, selection_changed, cursor_changed
            );
        }
        handled
    }
}
