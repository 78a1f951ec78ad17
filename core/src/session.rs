//! Exploration session
//!
//! Top-level orchestrator owning the sample table, the field store, the
//! cursor and the current selection. Every operation runs synchronously on
//! the caller's thread; pointer events are expected to be rate-limited by
//! the presentation layer.
//!
//! Failure policy: a query that cannot complete (zero coordinate, missing or
//! malformed field file) returns its error and leaves the previous selection
//! in place, so a view never shows a half-updated state.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::sync::Arc;

use crossbeam_channel::Receiver;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::ExplorerConfig;
use crate::cursor::{CursorState, Orientation, SliceData};
use crate::error::Result;
use crate::field::Field;
use crate::store::FieldStore;
use crate::sync::{EventBus, ExplorerEvent};
use crate::table::{Sample, SampleTable};

/// The currently displayed sample and its field
#[derive(Debug, Clone)]
pub struct Selection {
    /// Row of the sample in the table
    pub index: usize,

    pub sample: Sample,

    pub field: Arc<Field>,
}

/// Scalar readout for the info panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionSummary {
    pub curve_id: usize,
    pub parameter1: f64,
    pub parameter2: f64,
    pub response: f64,
    pub field_amplitude_min: f64,
    pub field_amplitude_max: f64,
}

/// Single-threaded exploration state shared by all views
pub struct ExplorationSession {
    table: SampleTable,
    store: FieldStore,
    cursor: CursorState,
    selection: Selection,
    events: EventBus,
}

impl ExplorationSession {
    /// Load the configured table and display its first sample.
    pub fn initialize(config: &ExplorerConfig) -> Result<Self> {
        config.validate()?;
        let table = SampleTable::load(config)?;
        Self::with_table(table, config)
    }

    /// Start a session over a table that is already loaded.
    pub fn with_table(table: SampleTable, config: &ExplorerConfig) -> Result<Self> {
        let mut store = FieldStore::new(config)?;
        let sample = table.first().clone();
        let field = store.resolve(&sample)?;
        let cursor = CursorState::centered(field.size());

        info!(
            "Session started on {} samples; initial ({}, {})",
            table.len(),
            sample.parameter1,
            sample.parameter2
        );

        Ok(Self {
            table,
            store,
            cursor,
            selection: Selection { index: 0, sample, field },
            events: EventBus::new(),
        })
    }

    pub fn table(&self) -> &SampleTable {
        &self.table
    }

    pub fn cursor(&self) -> &CursorState {
        &self.cursor
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Observe selection and cursor changes.
    pub fn subscribe(&mut self) -> Receiver<ExplorerEvent> {
        self.events.subscribe()
    }

    /// Select the sample nearest to `(x, y)` and load its field.
    ///
    /// On error the previous selection is retained.
    pub fn select_nearest(&mut self, x: f64, y: f64) -> Result<&Selection> {
        let index = match self.table.nearest_index(x, y) {
            Ok(index) => index,
            Err(err) => {
                debug!("Ignoring query ({}, {}): {}", x, y, err);
                return Err(err);
            }
        };

        let sample = self.table.samples()[index].clone();
        let field = match self.store.resolve(&sample) {
            Ok(field) => field,
            Err(err) => {
                warn!("Keeping previous selection, field for row {} failed: {}", index, err);
                return Err(err);
            }
        };

        self.selection = Selection { index, sample, field };
        self.events.publish(ExplorerEvent::SelectionChanged { sample_index: index });
        Ok(&self.selection)
    }

    /// Move and orient the cutline, returning the new slice.
    pub fn reslice(&mut self, position: f64, orientation: Orientation) -> Option<SliceData> {
        self.cursor.update(position, orientation);
        self.events.publish(ExplorerEvent::CursorMoved {
            orientation: self.cursor.orientation(),
            position: self.cursor.position(),
        });
        self.current_slice()
    }

    /// Flip the cutline orientation in place, returning the new slice.
    pub fn rotate_cursor(&mut self) -> Option<SliceData> {
        self.cursor.toggle_orientation();
        self.events.publish(ExplorerEvent::CursorRotated {
            orientation: self.cursor.orientation(),
            position: self.cursor.position(),
        });
        self.current_slice()
    }

    pub fn current_field(&self) -> &Field {
        &self.selection.field
    }

    /// Slice of the current field under the cursor; `None` when out of range.
    pub fn current_slice(&self) -> Option<SliceData> {
        self.cursor.slice(&self.selection.field)
    }

    pub fn current_selection_summary(&self) -> SelectionSummary {
        let sample = &self.selection.sample;
        let (field_amplitude_min, field_amplitude_max) = self.selection.field.amplitude_range();
        SelectionSummary {
            curve_id: sample.curve_id,
            parameter1: sample.parameter1,
            parameter2: sample.parameter2,
            response: sample.response,
            field_amplitude_min,
            field_amplitude_max,
        }
    }
}
