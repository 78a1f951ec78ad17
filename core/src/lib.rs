//! Spirals Explorer Core
//!
//! Data-access and state-synchronization layer for exploring a precomputed
//! two-parameter family of simulated states. A pointer position over the
//! `(parameter1, parameter2)` scatter selects the nearest precomputed sample,
//! whose packed complex field is reconstructed on demand; a single cursor
//! (orientation + position) defines the 1-D slice shown by the slice view.
//!
//! ```text
//! pointer move ──► ExplorationSession::select_nearest
//!                    ├─► SampleTable::nearest
//!                    └─► FieldStore::resolve ──► Selection
//! cutline drag ──► ExplorationSession::reslice ──► CursorState ──► slice
//! ```
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod config;
pub mod cursor;
pub mod error;
pub mod field;
pub mod session;
pub mod store;
pub mod sync;
pub mod table;

pub use config::{ColumnNames, ExplorerConfig, TableVariant};
pub use cursor::{CursorState, Orientation, SliceData};
pub use error::{ExplorerError, Result};
pub use field::Field;
pub use session::{ExplorationSession, Selection, SelectionSummary};
pub use store::FieldStore;
pub use sync::{EventBus, ExplorerEvent};
pub use table::{Sample, SampleTable};
