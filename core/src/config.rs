//! Explorer configuration
//!
//! Replaces ambient module-level paths with an explicit configuration value
//! handed to `SampleTable::load` and `FieldStore::new`. Configurations are
//! plain serde structs and can be read from JSON.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ExplorerError, Result};

/// Maps a sigma value to the table file holding that variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableVariant {
    /// Variant selector
    pub sigma: f64,

    /// Table file name, relative to `ExplorerConfig::table_dir`
    pub file: String,
}

/// Column names expected in the table source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub parameter1: String,
    pub parameter2: String,
    pub response: String,
    pub path: String,
    pub curve: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            parameter1: "alphas".to_string(),
            parameter2: "vxs".to_string(),
            response: "Rs".to_string(),
            path: "paths".to_string(),
            curve: "curve".to_string(),
        }
    }
}

impl ColumnNames {
    /// All required columns in declaration order
    pub fn required(&self) -> [&str; 5] {
        [
            &self.parameter1,
            &self.parameter2,
            &self.response,
            &self.path,
            &self.curve,
        ]
    }
}

/// Configuration for an exploration session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Root directory for field archives; relative storage paths resolve here
    pub data_dir: PathBuf,

    /// Directory holding the table variants
    pub table_dir: PathBuf,

    /// Selected variant
    pub sigma: f64,

    /// Known table variants
    pub variants: Vec<TableVariant>,

    /// Field grid side length `N`
    pub grid_size: usize,

    /// Record key of the packed array inside each field archive
    pub field_key: String,

    /// Flip the sign of parameter2 on load
    pub negate_parameter2: bool,

    /// Capacity of the resolved-field LRU cache, 0 disables it
    pub field_cache_capacity: usize,

    /// Table column names
    pub columns: ColumnNames,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            table_dir: PathBuf::from("data"),
            sigma: 0.40,
            variants: vec![
                TableVariant { sigma: 0.40, file: "s0.4.dat".to_string() },
                TableVariant { sigma: 0.35, file: "s0.35.dat".to_string() },
            ],
            grid_size: 128,
            field_key: "X1".to_string(),
            negate_parameter2: false,
            field_cache_capacity: 16,
            columns: ColumnNames::default(),
        }
    }
}

impl ExplorerConfig {
    /// Configuration for a single table file, bypassing the variant map.
    pub fn for_table(table: impl AsRef<Path>, data_dir: impl Into<PathBuf>) -> Self {
        let table = table.as_ref();
        let file = table
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let table_dir = table
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let sigma = 0.0;

        Self {
            data_dir: data_dir.into(),
            table_dir,
            sigma,
            variants: vec![TableVariant { sigma, file }],
            ..Self::default()
        }
    }

    /// Dataset layout used by the spiral-wave simulations: sign-flipped
    /// `vxs` column and 128×128 fields under `X1`.
    pub fn spiral_preset(sigma: f64, table_dir: impl Into<PathBuf>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            table_dir: table_dir.into(),
            sigma,
            negate_parameter2: true,
            ..Self::default()
        }
    }

    /// Parse a configuration from a JSON string; missing keys take defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|err| ExplorerError::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let config: Self = serde_json::from_reader(BufReader::new(file))
            .map_err(|err| ExplorerError::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check structural constraints on the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.grid_size == 0 || self.grid_size % 2 != 0 {
            return Err(ExplorerError::OddGridSize(self.grid_size));
        }
        if self.field_key.is_empty() {
            return Err(ExplorerError::Config("field_key must not be empty".into()));
        }
        Ok(())
    }

    /// Path of the table file for the selected sigma.
    pub fn table_path(&self) -> Result<PathBuf> {
        self.variants
            .iter()
            .find(|variant| (variant.sigma - self.sigma).abs() < 1e-9)
            .map(|variant| self.table_dir.join(&variant.file))
            .ok_or_else(|| {
                ExplorerError::Config(format!("no table variant for sigma = {}", self.sigma))
            })
    }
}
