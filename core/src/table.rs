//! Precomputed sample table
//!
//! In-memory table of `(parameter1, parameter2, response, storage path,
//! curve id)` rows, loaded once at start-up and read-only afterwards.
//! Supports the relative-distance nearest-neighbor query that drives
//! selection, and per-curve retrieval for drawing the base scatter.
//!
//! # Nearest-neighbor metric
//! For a query `(x, y)` the selected sample minimises
//!
//! ```text
//! d(s) = (s.parameter1 / x - 1)² + (s.parameter2 / y - 1)²
//! ```
//!
//! which normalises axes of very different scale. The metric is undefined
//! for `x == 0` or `y == 0`; such queries fail with
//! `ExplorerError::DegenerateQuery`. Equal distances resolve to the sample
//! that occurs first in table order.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{ColumnNames, ExplorerConfig};
use crate::error::{ExplorerError, Result};

/// Tables at least this large are searched with rayon
const PARALLEL_THRESHOLD: usize = 4096;

/// One precomputed sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Curve (parameter sweep) this sample belongs to
    pub curve_id: usize,

    /// First parameter (alpha)
    pub parameter1: f64,

    /// Second parameter (vx)
    pub parameter2: f64,

    /// Scalar response recorded for the sample
    pub response: f64,

    /// Location of the packed field archive
    pub storage_path: String,
}

/// Row shape after projecting the configured column names onto fixed keys
#[derive(Debug, Deserialize)]
struct RawRow {
    parameter1: f64,
    parameter2: f64,
    response: f64,
    path: String,
    curve: i64,
}

/// Read-only table of samples
#[derive(Debug, Clone)]
pub struct SampleTable {
    samples: Vec<Sample>,
    curve_count: usize,
    /// Row indices per curve id, in table order
    curve_rows: BTreeMap<usize, Vec<usize>>,
    source: Option<PathBuf>,
}

impl SampleTable {
    /// Load the table variant selected by `config`.
    pub fn load(config: &ExplorerConfig) -> Result<Self> {
        let path = config.table_path()?;
        Self::from_csv_path(&path, &config.columns, config.negate_parameter2)
    }

    /// Load a CSV table from disk.
    pub fn from_csv_path(path: &Path, columns: &ColumnNames, negate_parameter2: bool) -> Result<Self> {
        let file = File::open(path).map_err(|err| ExplorerError::DataLoad {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;

        let mut table = Self::from_csv_reader(file, columns, negate_parameter2).map_err(|err| match err {
            ExplorerError::DataLoad { reason, .. } => ExplorerError::DataLoad {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        })?;
        table.source = Some(path.to_path_buf());

        info!(
            "Loaded {} samples in {} curves from {}",
            table.len(),
            table.curve_count,
            path.display()
        );
        Ok(table)
    }

    /// Parse a CSV table from any reader. Columns beyond the five required
    /// ones are ignored.
    pub fn from_csv_reader<R: Read>(reader: R, columns: &ColumnNames, negate_parameter2: bool) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|err| csv_load_error(&err))?
            .clone();
        let projected = project_headers(&headers, columns)?;

        let mut samples = Vec::new();
        for (index, record) in csv_reader.records().enumerate() {
            let record = record.map_err(|err| csv_load_error(&err))?;
            let raw: RawRow = record
                .deserialize(Some(&projected))
                .map_err(|err| ExplorerError::InvalidRow { row: index, reason: err.to_string() })?;

            if raw.curve < 0 {
                return Err(ExplorerError::InvalidRow {
                    row: index,
                    reason: format!("negative curve id {}", raw.curve),
                });
            }

            let parameter2 = if negate_parameter2 { -raw.parameter2 } else { raw.parameter2 };
            samples.push(Sample {
                curve_id: raw.curve as usize,
                parameter1: raw.parameter1,
                parameter2,
                response: raw.response,
                storage_path: raw.path,
            });
        }

        Self::from_samples(samples)
    }

    /// Build a table from samples already in memory.
    pub fn from_samples(samples: Vec<Sample>) -> Result<Self> {
        if samples.is_empty() {
            return Err(ExplorerError::EmptyTable);
        }

        let mut seen = HashSet::with_capacity(samples.len());
        for (index, sample) in samples.iter().enumerate() {
            let key = (sample.parameter1.to_bits(), sample.parameter2.to_bits());
            if !seen.insert(key) {
                warn!(
                    "Duplicate parameter pair ({}, {}) at row {}; first occurrence wins",
                    sample.parameter1, sample.parameter2, index
                );
            }
        }

        let mut curve_rows: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (index, sample) in samples.iter().enumerate() {
            curve_rows.entry(sample.curve_id).or_default().push(index);
        }
        let curve_count = curve_rows.keys().next_back().map_or(0, |max| max + 1);

        Ok(Self { samples, curve_count, curve_rows, source: None })
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// `max(curve_id) + 1`, fixed at load time
    pub fn curve_count(&self) -> usize {
        self.curve_count
    }

    /// File the table was read from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn get(&self, index: usize) -> Option<&Sample> {
        self.samples.get(index)
    }

    /// First sample in table order, used as the initial display
    pub fn first(&self) -> &Sample {
        // Construction rejects empty tables.
        &self.samples[0]
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Every `(parameter1, parameter2)` pair in insertion order
    pub fn all_points(&self) -> Vec<(f64, f64)> {
        self.samples.iter().map(|s| (s.parameter1, s.parameter2)).collect()
    }

    /// Samples of one curve in table order; empty for unknown curves.
    pub fn curve(&self, curve_id: usize) -> Vec<&Sample> {
        self.curve_rows
            .get(&curve_id)
            .map_or_else(Vec::new, |rows| self.rows(rows))
    }

    /// Non-empty curves in id order; unused ids in `0..curve_count` are skipped.
    pub fn curves(&self) -> impl Iterator<Item = (usize, Vec<&Sample>)> + '_ {
        self.curve_rows.iter().map(move |(&id, rows)| (id, self.rows(rows)))
    }

    fn rows(&self, rows: &[usize]) -> Vec<&Sample> {
        rows.iter().map(|&row| &self.samples[row]).collect()
    }

    /// Parameter1 column, for one curve or the whole table
    pub fn parameter1s(&self, curve_id: Option<usize>) -> Vec<f64> {
        self.column(curve_id, |s| s.parameter1)
    }

    /// Parameter2 column, for one curve or the whole table
    pub fn parameter2s(&self, curve_id: Option<usize>) -> Vec<f64> {
        self.column(curve_id, |s| s.parameter2)
    }

    /// Response column, for one curve or the whole table
    pub fn responses(&self, curve_id: Option<usize>) -> Vec<f64> {
        self.column(curve_id, |s| s.response)
    }

    /// Storage path column, for one curve or the whole table
    pub fn paths(&self, curve_id: Option<usize>) -> Vec<&str> {
        match curve_id {
            Some(id) => self.curve(id).into_iter().map(|s| s.storage_path.as_str()).collect(),
            None => self.samples.iter().map(|s| s.storage_path.as_str()).collect(),
        }
    }

    fn column<F>(&self, curve_id: Option<usize>, f: F) -> Vec<f64>
    where
        F: Fn(&Sample) -> f64,
    {
        match curve_id {
            Some(id) => self.curve(id).into_iter().map(f).collect(),
            None => self.samples.iter().map(f).collect(),
        }
    }

    /// Sample closest to `(x, y)` under the relative-distance metric.
    pub fn nearest(&self, x: f64, y: f64) -> Result<&Sample> {
        self.nearest_index(x, y).map(|index| &self.samples[index])
    }

    /// Table index of the sample closest to `(x, y)`.
    ///
    /// Always synchronous. Large tables are scanned on rayon's pool, but
    /// the call blocks until the reduction is done and leaves no work
    /// running afterwards.
    pub fn nearest_index(&self, x: f64, y: f64) -> Result<usize> {
        if x == 0.0 || y == 0.0 || !x.is_finite() || !y.is_finite() {
            return Err(ExplorerError::DegenerateQuery { x, y });
        }

        let distance = |(index, sample): (usize, &Sample)| {
            let d = relative_distance(sample, x, y);
            (if d.is_nan() { f64::INFINITY } else { d }, index)
        };

        let best = if self.samples.len() >= PARALLEL_THRESHOLD {
            self.samples
                .par_iter()
                .enumerate()
                .map(distance)
                .min_by(compare_candidates)
        } else {
            self.samples.iter().enumerate().map(distance).min_by(compare_candidates)
        };

        let (d, index) = best.ok_or(ExplorerError::EmptyTable)?;
        debug!("Nearest to ({}, {}) is row {} at distance {:.3e}", x, y, index, d);
        Ok(index)
    }
}

/// Relative squared distance between a sample and a query point
pub fn relative_distance(sample: &Sample, x: f64, y: f64) -> f64 {
    let dx = sample.parameter1 / x - 1.0;
    let dy = sample.parameter2 / y - 1.0;
    dx * dx + dy * dy
}

/// Orders `(distance, index)` so that equal distances prefer the lower index
fn compare_candidates(a: &(f64, usize), b: &(f64, usize)) -> Ordering {
    a.0.total_cmp(&b.0).then(a.1.cmp(&b.1))
}

/// Rename configured columns to the fixed `RawRow` keys; other columns
/// become blank and are skipped by deserialization.
fn project_headers(headers: &StringRecord, columns: &ColumnNames) -> Result<StringRecord> {
    for required in columns.required() {
        if !headers.iter().any(|h| h == required) {
            return Err(ExplorerError::MissingColumn(required.to_string()));
        }
    }

    let projected = headers
        .iter()
        .map(|header| {
            if header == columns.parameter1 {
                "parameter1"
            } else if header == columns.parameter2 {
                "parameter2"
            } else if header == columns.response {
                "response"
            } else if header == columns.path {
                "path"
            } else if header == columns.curve {
                "curve"
            } else {
                ""
            }
        })
        .collect();
    Ok(projected)
}

fn csv_load_error(err: &csv::Error) -> ExplorerError {
    ExplorerError::DataLoad {
        path: PathBuf::new(),
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(curve_id: usize, p1: f64, p2: f64) -> Sample {
        Sample {
            curve_id,
            parameter1: p1,
            parameter2: p2,
            response: p1 * p2,
            storage_path: format!("c{}/{}_{}.npz", curve_id, p1, p2),
        }
    }

    fn grid_table() -> SampleTable {
        SampleTable::from_samples(vec![
            sample(0, 1.0, 1.0),
            sample(0, 2.0, 2.0),
            sample(1, 4.0, 1.0),
            sample(1, 1.0, 4.0),
            sample(2, 10.0, 10.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_exact_self_match() {
        let table = grid_table();
        for s in table.samples() {
            let found = table.nearest(s.parameter1, s.parameter2).unwrap();
            assert_eq!(found, s);
            assert_eq!(relative_distance(found, s.parameter1, s.parameter2), 0.0);
        }
    }

    #[test]
    fn test_relative_metric_argmin() {
        // Query (3, 1.5):
        //   (1,1)  -> (1/3-1)^2 + (1/1.5-1)^2   = 0.4444 + 0.1111 = 0.5556
        //   (2,2)  -> (2/3-1)^2 + (2/1.5-1)^2   = 0.1111 + 0.1111 = 0.2222
        //   (4,1)  -> (4/3-1)^2 + (1/1.5-1)^2   = 0.1111 + 0.1111 = 0.2222
        //   (1,4)  -> 0.4444 + 2.7778           = 3.2222
        //   (10,10)-> 5.4444 + 32.1111          = 37.5556
        // (2,2) and (4,1) tie; (2,2) comes first.
        let table = grid_table();
        let found = table.nearest(3.0, 1.5).unwrap();
        assert_eq!((found.parameter1, found.parameter2), (2.0, 2.0));

        // Query (8, 2): (4,1) -> 0.25 + 0.25 = 0.5, (2,2) -> 0.5625 + 0 = 0.5625,
        // (10,10) -> 0.0625 + 16 = 16.0625.
        let found = table.nearest(8.0, 2.0).unwrap();
        assert_eq!((found.parameter1, found.parameter2), (4.0, 1.0));
    }

    #[test]
    fn test_scaled_query_changes_argmin() {
        // Scaling (3, 1.5) by 2 gives (6, 3): (4,1) -> 0.1111+0.4444,
        // (2,2) -> 0.4444+0.1111, (10,10) -> 0.4444+5.4444. Tie again, first wins.
        let table = grid_table();
        let found = table.nearest(6.0, 3.0).unwrap();
        assert_eq!((found.parameter1, found.parameter2), (2.0, 2.0));

        // (20, 20): (10,10) -> 0.25 + 0.25 = 0.5 beats (2,2) -> 0.81 + 0.81.
        let found = table.nearest(20.0, 20.0).unwrap();
        assert_eq!((found.parameter1, found.parameter2), (10.0, 10.0));
    }

    #[test]
    fn test_degenerate_queries() {
        let table = grid_table();
        assert!(matches!(table.nearest(0.0, 5.0), Err(ExplorerError::DegenerateQuery { .. })));
        assert!(matches!(table.nearest(5.0, 0.0), Err(ExplorerError::DegenerateQuery { .. })));
        assert!(matches!(table.nearest(f64::NAN, 1.0), Err(ExplorerError::DegenerateQuery { .. })));
    }

    #[test]
    fn test_negative_queries_are_valid() {
        let table = SampleTable::from_samples(vec![sample(0, 1.0, -1.0), sample(0, 2.0, -3.0)]).unwrap();
        let found = table.nearest(2.1, -2.9).unwrap();
        assert_eq!(found.parameter2, -3.0);
    }

    #[test]
    fn test_curve_retrieval() {
        let table = grid_table();
        assert_eq!(table.curve_count(), 3);
        let curve = table.curve(1);
        assert_eq!(curve.len(), 2);
        assert_eq!(curve[0].parameter1, 4.0);
        assert_eq!(curve[1].parameter1, 1.0);

        assert!(table.curve(table.curve_count()).is_empty());
        assert!(table.curve(100).is_empty());
        assert_eq!(table.curves().count(), 3);
    }

    #[test]
    fn test_sparse_curve_ids_are_grouped_once() {
        let far = 1_000_000_000_000;
        let table = SampleTable::from_samples(vec![
            sample(far, 1.0, 1.0),
            sample(0, 2.0, 2.0),
            sample(far, 3.0, 3.0),
        ])
        .unwrap();

        assert_eq!(table.curve_count(), far + 1);
        let curves: Vec<_> = table.curves().collect();
        assert_eq!(curves.len(), 2);
        assert_eq!(curves[0].0, 0);
        assert_eq!(curves[1].0, far);
        assert_eq!(curves[1].1.len(), 2);
        assert_eq!(curves[1].1[1].parameter1, 3.0);
        assert!(table.curve(far - 1).is_empty());
    }

    #[test]
    fn test_csv_path_records_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s0.4.dat");
        std::fs::write(&path, "alphas,vxs,Rs,paths,curve\n0.5,0.25,1.0,a.npz,0\n").unwrap();

        let table = SampleTable::from_csv_path(&path, &ColumnNames::default(), false).unwrap();
        assert_eq!(table.source(), Some(path.as_path()));
        assert!(SampleTable::from_samples(vec![sample(0, 1.0, 1.0)]).unwrap().source().is_none());
    }

    #[test]
    fn test_column_accessors() {
        let table = grid_table();
        assert_eq!(table.parameter1s(None), vec![1.0, 2.0, 4.0, 1.0, 10.0]);
        assert_eq!(table.parameter2s(Some(0)), vec![1.0, 2.0]);
        assert_eq!(table.responses(Some(2)), vec![100.0]);
        assert_eq!(table.paths(Some(5)), Vec::<&str>::new());
        assert_eq!(table.all_points()[4], (10.0, 10.0));
    }

    #[test]
    fn test_empty_table_rejected() {
        assert!(matches!(SampleTable::from_samples(Vec::new()), Err(ExplorerError::EmptyTable)));
    }

    #[test]
    fn test_csv_parsing_with_extra_columns() {
        let csv = ",alphas,vxs,Rs,paths,curve\n\
                   0,0.5,0.25,1.5,a.npz,0\n\
                   1,0.6,0.30,1.6,b.npz,0\n\
                   2,0.7,0.35,1.7,c.npz,2\n";
        let table = SampleTable::from_csv_reader(csv.as_bytes(), &ColumnNames::default(), true).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.curve_count(), 3);
        assert_eq!(table.get(1).unwrap().parameter2, -0.30);
        assert_eq!(table.get(2).unwrap().storage_path, "c.npz");
        assert!(table.curve(1).is_empty());
    }

    #[test]
    fn test_csv_missing_column() {
        let csv = "alphas,vxs,paths,curve\n0.5,0.25,a.npz,0\n";
        let result = SampleTable::from_csv_reader(csv.as_bytes(), &ColumnNames::default(), false);
        assert!(matches!(result, Err(ExplorerError::MissingColumn(ref c)) if c == "Rs"));
    }

    #[test]
    fn test_csv_negative_curve_rejected() {
        let csv = "alphas,vxs,Rs,paths,curve\n0.5,0.25,1.0,a.npz,-1\n";
        let result = SampleTable::from_csv_reader(csv.as_bytes(), &ColumnNames::default(), false);
        assert!(matches!(result, Err(ExplorerError::InvalidRow { row: 0, .. })));
    }

    #[test]
    fn test_parallel_path_matches_sequential_tie_break() {
        // (3, 3) and (1, 1) are equidistant from (2, 2); the earlier row wins
        // even when the table is large enough for the parallel search.
        let mut samples = vec![sample(0, 3.0, 3.0)];
        samples.extend((0..PARALLEL_THRESHOLD).map(|i| sample(1, 100.0 + i as f64, 100.0 + i as f64)));
        samples.push(sample(2, 1.0, 1.0));
        let table = SampleTable::from_samples(samples).unwrap();

        assert_eq!(table.nearest_index(2.0, 2.0).unwrap(), 0);
        assert_eq!(table.nearest_index(1.0, 1.0).unwrap(), PARALLEL_THRESHOLD + 1);
    }
}
