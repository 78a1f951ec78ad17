//! Error taxonomy for the explorer core
//!
//! Start-up failures (`DataLoad`, `MissingColumn`, `InvalidRow`,
//! `EmptyTable`, `Config`) are fatal: no partial table is ever built.
//! Per-query failures (`FieldLoad`, `InvalidFieldLength`, `OddGridSize`,
//! `DegenerateQuery`) are reported to the caller while the session keeps its
//! previous selection.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Explorer error types with diagnostic context
#[derive(Error, Debug)]
pub enum ExplorerError {
    /// Table source unreadable or malformed
    #[error("Failed to load sample table {path}: {reason}")]
    DataLoad { path: PathBuf, reason: String },

    /// Table source lacks a required column
    #[error("Sample table is missing required column '{0}'")]
    MissingColumn(String),

    /// A table row could not be interpreted as a sample
    #[error("Invalid table row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },

    /// Table loaded without any sample
    #[error("Sample table contains no samples")]
    EmptyTable,

    /// Field archive unreadable or missing its record
    #[error("Failed to load field {path}: {reason}")]
    FieldLoad { path: PathBuf, reason: String },

    /// Packed array does not match `N*N + 2`
    #[error("Packed field {path} has {actual} values, expected {expected}")]
    InvalidFieldLength {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },

    /// Grid side length must be even and non-zero
    #[error("Grid size {0} is not a positive even number")]
    OddGridSize(usize),

    /// Nearest-neighbor query with a zero (or non-finite) coordinate
    #[error("Degenerate nearest-neighbor query at ({x}, {y})")]
    DegenerateQuery { x: f64, y: f64 },

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ExplorerError {
    /// Whether the error only invalidates the current query.
    ///
    /// Recoverable errors leave the session's selection untouched; the
    /// remaining variants abort start-up.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::FieldLoad { .. }
                | Self::InvalidFieldLength { .. }
                | Self::OddGridSize(_)
                | Self::DegenerateQuery { .. }
        )
    }
}

/// Result alias used throughout the core
pub type Result<T> = std::result::Result<T, ExplorerError>;
