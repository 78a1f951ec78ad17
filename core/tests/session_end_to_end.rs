//! End-to-end exploration over on-disk fixtures
//!
//! Writes a CSV table and `.npz` field archives into a temporary directory,
//! then drives a session the way a presentation layer would.

use std::fs::{self, File};
use std::path::Path;

use approx::assert_abs_diff_eq;
use ndarray::Array1;
use ndarray_npy::NpzWriter;
use num_complex::Complex64;
use tempfile::tempdir;

use spirals_core::field::packed_len;
use spirals_core::{ExplorationSession, ExplorerConfig, ExplorerError, ExplorerEvent, Orientation};

const N: usize = 128;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn write_field(path: &Path, packed: &[f64]) {
    let mut npz = NpzWriter::new(File::create(path).unwrap());
    npz.add_array("X1", &Array1::from(packed.to_vec())).unwrap();
    npz.finish().unwrap();
}

fn write_fixture(root: &Path) -> ExplorerConfig {
    let fields = root.join("fields");
    fs::create_dir_all(fields.join("curve0")).unwrap();

    let mut unit = vec![0.0; packed_len(N)];
    unit[0] = 1.0;
    write_field(&fields.join("curve0/a.npz"), &unit);
    write_field(&fields.join("curve0/b.npz"), &vec![0.5; packed_len(N)]);
    write_field(&fields.join("c.npz"), &vec![0.0; packed_len(N)]);

    fs::write(
        root.join("s0.4.dat"),
        ",alphas,vxs,Rs,paths,curve\n\
         0,1.0,1.0,0.25,curve0/a.npz,0\n\
         1,2.0,2.0,0.50,curve0/b.npz,0\n\
         2,10.0,10.0,0.75,c.npz,1\n",
    )
    .unwrap();

    let json = format!(
        r#"{{
            "data_dir": {:?},
            "table_dir": {:?},
            "sigma": 0.4,
            "grid_size": {}
        }}"#,
        fields.to_string_lossy(),
        root.to_string_lossy(),
        N
    );
    let config_path = root.join("explorer.json");
    fs::write(&config_path, json).unwrap();
    ExplorerConfig::from_json_file(&config_path).unwrap()
}

#[test]
fn test_three_sample_exploration() {
    init_logging();
    let dir = tempdir().unwrap();
    let config = write_fixture(dir.path());
    let mut session = ExplorationSession::initialize(&config).unwrap();

    assert_eq!(session.table().len(), 3);
    assert_eq!(session.table().curve_count(), 2);
    assert!(session.table().curve(2).is_empty());

    // Initial display is the first row, with the reconstructed unit entry.
    let field = session.current_field();
    assert_eq!(field.size(), N);
    assert_eq!(field.get(0, 0), Some(Complex64::new(1.0, 0.0)));
    assert_eq!(field.get(0, N - 1), Some(Complex64::new(1.0, 0.0)));

    let selection = session.select_nearest(1.1, 1.1).unwrap();
    assert_eq!(selection.sample.storage_path, "curve0/a.npz");

    session.select_nearest(2.2, 1.9).unwrap();
    assert_eq!(session.selection().sample.storage_path, "curve0/b.npz");

    let err = session.select_nearest(0.0, 5.0).unwrap_err();
    assert!(matches!(err, ExplorerError::DegenerateQuery { .. }));
    assert_eq!(session.selection().sample.storage_path, "curve0/b.npz");
}

#[test]
fn test_cutline_follows_selection() {
    init_logging();
    let dir = tempdir().unwrap();
    let config = write_fixture(dir.path());
    let mut session = ExplorationSession::initialize(&config).unwrap();
    let events = session.subscribe();

    // Row 0 of the initial field holds the two unit entries.
    let slice = session.reslice(0.2, Orientation::Vertical).unwrap();
    assert_eq!(slice.index, 0);
    assert_abs_diff_eq!(slice.amplitude[0], 1.0);
    assert_abs_diff_eq!(slice.amplitude[N - 1], 1.0);
    assert_abs_diff_eq!(slice.amplitude.sum(), 2.0);
    assert_eq!(slice.x_axis.len(), N);

    // Column 0 only carries the (0, 0) entry.
    let slice = session.rotate_cursor().unwrap();
    assert_eq!(slice.orientation, Orientation::Horizontal);
    assert_abs_diff_eq!(slice.amplitude.sum(), 1.0);

    // Selecting a new sample keeps the cutline where it is.
    session.select_nearest(2.0, 2.0).unwrap();
    let slice = session.current_slice().unwrap();
    assert_eq!(slice.index, 0);
    assert_abs_diff_eq!(slice.amplitude[5], 0.5f64.hypot(0.5), epsilon = 1e-12);

    assert!(session.reslice(N as f64, Orientation::Horizontal).is_none());

    let received: Vec<_> = events.try_iter().collect();
    assert_eq!(received.len(), 4);
    assert_eq!(received[2], ExplorerEvent::SelectionChanged { sample_index: 1 });
}

#[test]
fn test_missing_table_is_fatal() {
    init_logging();
    let dir = tempdir().unwrap();
    let config = ExplorerConfig::for_table(dir.path().join("absent.csv"), dir.path());
    let result = ExplorationSession::initialize(&config);
    assert!(matches!(result, Err(ExplorerError::DataLoad { .. })));
}

#[test]
fn test_summary_matches_selection() {
    init_logging();
    let dir = tempdir().unwrap();
    let config = write_fixture(dir.path());
    let mut session = ExplorationSession::initialize(&config).unwrap();

    let summary = session.current_selection_summary();
    assert_eq!(summary.parameter1, 1.0);
    assert_abs_diff_eq!(summary.field_amplitude_min, 0.0);
    assert_abs_diff_eq!(summary.field_amplitude_max, 1.0);

    session.select_nearest(9.0, 11.0).unwrap();
    let summary = session.current_selection_summary();
    assert_eq!(summary.curve_id, 1);
    assert_eq!(summary.response, 0.75);
    assert_abs_diff_eq!(summary.field_amplitude_max, 0.0);
}
