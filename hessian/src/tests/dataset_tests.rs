use std::fs::File;
use std::io::Write;
use std::path::Path;

use super::reference_config;
use crate::config::DatasetKind;
use crate::dataset;
use crate::error::ExperimentError;

fn write_idx_images(path: &Path, images: &[&[u8]], rows: u32, cols: u32) {
    let mut file = File::create(path).unwrap();
    file.write_all(&2051u32.to_be_bytes()).unwrap();
    file.write_all(&(images.len() as u32).to_be_bytes()).unwrap();
    file.write_all(&rows.to_be_bytes()).unwrap();
    file.write_all(&cols.to_be_bytes()).unwrap();
    for image in images {
        file.write_all(image).unwrap();
    }
}

fn write_idx_labels(path: &Path, labels: &[u8]) {
    let mut file = File::create(path).unwrap();
    file.write_all(&2049u32.to_be_bytes()).unwrap();
    file.write_all(&(labels.len() as u32).to_be_bytes()).unwrap();
    file.write_all(labels).unwrap();
}

/// Writes a 3-train / 2-test fixture of 2x2 images into `dir`.
fn write_fixture(dir: &Path) {
    write_idx_images(
        &dir.join("train-images-idx3-ubyte"),
        &[&[0, 255, 0, 255], &[255, 255, 0, 0], &[10, 20, 30, 40]],
        2,
        2,
    );
    write_idx_labels(&dir.join("train-labels-idx1-ubyte"), &[0, 1, 2]);
    write_idx_images(
        &dir.join("t10k-images-idx3-ubyte"),
        &[&[1, 2, 3, 4], &[255, 0, 255, 0]],
        2,
        2,
    );
    write_idx_labels(&dir.join("t10k-labels-idx1-ubyte"), &[1, 0]);
}

fn mnist_config(dir: &Path) -> crate::config::ExperimentConfig {
    let mut config = reference_config();
    config.dataset = DatasetKind::Mnist;
    config.data_dir = dir.to_path_buf();
    config.train_samples = 3;
    config.test_samples = 2;
    config.input_dim = 2;
    config.classes = 3;
    config
}

#[test]
fn idx_files_load_and_project() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());

    let data = dataset::load(&mnist_config(dir.path())).unwrap();
    assert_eq!(data.train.inputs.shape(), (2, 3));
    assert_eq!(data.train.targets.shape(), (3, 3));
    assert_eq!(data.test.len(), 2);

    // Block average of [0, 255 | 0, 255] into two buckets, scaled to [0, 1].
    assert!((data.train.inputs[(0, 0)] - 0.5).abs() < 1e-12);
    assert!((data.train.inputs[(1, 0)] - 0.5).abs() < 1e-12);
    assert!((data.train.inputs[(0, 1)] - 1.0).abs() < 1e-12);
    assert!((data.train.inputs[(1, 1)] - 0.0).abs() < 1e-12);

    // Labels become one-hot columns.
    for n in 0..3 {
        assert_eq!(data.train.targets.column(n).sum(), 1.0);
    }
    assert_eq!(data.train.targets[(0, 0)], 1.0);
    assert_eq!(data.train.targets[(1, 1)], 1.0);
    assert_eq!(data.train.targets[(2, 2)], 1.0);
}

#[test]
fn oversized_request_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());

    let mut config = mnist_config(dir.path());
    config.train_samples = 5;
    match dataset::load(&config) {
        Err(ExperimentError::NotEnoughSamples {
            requested,
            available,
        }) => {
            assert_eq!(requested, 5);
            assert_eq!(available, 3);
        }
        other => panic!("expected NotEnoughSamples, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn bad_magic_is_a_format_error() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    // Overwrite the train images with a label-magic file.
    write_idx_labels(&dir.path().join("train-images-idx3-ubyte"), &[0, 1, 2]);

    assert!(matches!(
        dataset::load(&mnist_config(dir.path())),
        Err(ExperimentError::Format(_))
    ));
}

#[test]
fn implausible_image_header_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());

    // Corrupt header claiming u32::MAX^3 bytes; must fail before allocating.
    let mut file = File::create(dir.path().join("train-images-idx3-ubyte")).unwrap();
    file.write_all(&2051u32.to_be_bytes()).unwrap();
    for _ in 0..3 {
        file.write_all(&u32::MAX.to_be_bytes()).unwrap();
    }
    drop(file);

    assert!(matches!(
        dataset::load(&mnist_config(dir.path())),
        Err(ExperimentError::Format(_))
    ));
}

#[test]
fn missing_files_surface_io_errors() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        dataset::load(&mnist_config(dir.path())),
        Err(ExperimentError::Io(_))
    ));
}

#[test]
fn label_outside_class_range_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());

    let mut config = mnist_config(dir.path());
    config.classes = 2;
    assert!(matches!(
        dataset::load(&config),
        Err(ExperimentError::Format(_))
    ));
}

#[test]
fn gaussian_dataset_is_seeded() {
    let config = reference_config();
    let a = dataset::load(&config).unwrap();
    let b = dataset::load(&config).unwrap();
    assert_eq!(a.train.inputs, b.train.inputs);
    assert_eq!(a.train.targets, b.train.targets);

    let mut other = config;
    other.seed = 1;
    let c = dataset::load(&other).unwrap();
    assert_ne!(a.train.inputs, c.train.inputs);
}
