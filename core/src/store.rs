//! Field storage access
//!
//! Resolves a sample's storage path to a reconstructed `Field`. Archives are
//! NumPy `.npz` files holding the packed array under a fixed record key
//! (bare `.npy` files are accepted as well). Resolution performs one
//! synchronous read per call; an optional LRU cache keyed by storage path
//! returns the same `Field` without touching the disk.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fs::File;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, trace};
use lru::LruCache;
use ndarray::Array1;
use ndarray_npy::{read_npy, NpzReader};

use crate::config::ExplorerConfig;
use crate::error::{ExplorerError, Result};
use crate::field::{self, Field};
use crate::table::Sample;

/// Loads and reconstructs per-sample fields
pub struct FieldStore {
    /// Root for relative storage paths
    data_dir: PathBuf,

    /// Grid side length `N`
    grid_size: usize,

    /// Record key inside `.npz` archives
    field_key: String,

    /// Resolved fields keyed by absolute path
    cache: Option<LruCache<PathBuf, Arc<Field>>>,
}

impl FieldStore {
    pub fn new(config: &ExplorerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            data_dir: config.data_dir.clone(),
            grid_size: config.grid_size,
            field_key: config.field_key.clone(),
            cache: NonZeroUsize::new(config.field_cache_capacity).map(LruCache::new),
        })
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Number of cached fields
    pub fn cached(&self) -> usize {
        self.cache.as_ref().map_or(0, LruCache::len)
    }

    /// Drop every cached field.
    pub fn clear_cache(&mut self) {
        if let Some(cache) = self.cache.as_mut() {
            cache.clear();
        }
    }

    /// Absolute location of a storage path
    pub fn locate(&self, storage_path: &str) -> PathBuf {
        let path = Path::new(storage_path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }

    /// Read and reconstruct the field of `sample`.
    pub fn resolve(&mut self, sample: &Sample) -> Result<Arc<Field>> {
        let path = self.locate(&sample.storage_path);

        if let Some(field) = self.cache.as_mut().and_then(|cache| cache.get(&path)) {
            trace!("Field cache hit for {}", path.display());
            return Ok(Arc::clone(field));
        }

        let packed = self.read_packed(&path)?.into_raw_vec();
        let field = field::reconstruct(&packed, self.grid_size)
            .map_err(|err| match err {
                ExplorerError::InvalidFieldLength { expected, actual, .. } => {
                    ExplorerError::InvalidFieldLength { path: path.clone(), expected, actual }
                }
                other => other,
            })?;
        let field = Arc::new(field);

        debug!(
            "Resolved field {} ({}x{}) for ({}, {})",
            path.display(),
            self.grid_size,
            self.grid_size,
            sample.parameter1,
            sample.parameter2
        );

        if let Some(cache) = self.cache.as_mut() {
            cache.put(path, Arc::clone(&field));
        }
        Ok(field)
    }

    fn read_packed(&self, path: &Path) -> Result<Array1<f64>> {
        let load_error = |reason: String| ExplorerError::FieldLoad {
            path: path.to_path_buf(),
            reason,
        };

        if path.extension().is_some_and(|ext| ext == "npy") {
            return read_npy(path).map_err(|err| load_error(err.to_string()));
        }

        let file = File::open(path).map_err(|err| load_error(err.to_string()))?;
        let mut npz = NpzReader::new(file).map_err(|err| load_error(err.to_string()))?;

        // Writers differ on whether the `.npy` suffix is part of the name.
        let suffixed = format!("{}.npy", self.field_key);
        let name = npz
            .names()
            .map_err(|err| load_error(err.to_string()))?
            .into_iter()
            .find(|name| *name == self.field_key || *name == suffixed)
            .ok_or_else(|| load_error(format!("record '{}' not found", self.field_key)))?;

        npz.by_name(&name).map_err(|err| load_error(err.to_string()))
    }
}
