use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use nalgebra::{DMatrix, DVector};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::config::{DatasetKind, ExperimentConfig};
use crate::error::{ExperimentError, Result};

const IDX_IMAGE_MAGIC: u32 = 2051;
const IDX_LABEL_MAGIC: u32 = 2049;

/// Upper bound on bytes read from a single IDX file. Full MNIST is ~47 MB;
/// anything past this is a corrupt header, not a dataset.
const IDX_MAX_BYTES: usize = 1 << 30;

/// One split of the dataset: inputs as `input_dim x n`, one-hot targets as
/// `classes x n`, both column-per-example.
#[derive(Clone, Debug)]
pub struct Split {
    pub inputs: DMatrix<f64>,
    pub targets: DMatrix<f64>,
}

impl Split {
    pub fn len(&self) -> usize {
        self.inputs.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.ncols() == 0
    }
}

#[derive(Clone, Debug)]
pub struct Dataset {
    pub train: Split,
    pub test: Split,
}

/// Loads the configured dataset and returns fixed-size train/test splits.
pub fn load(config: &ExperimentConfig) -> Result<Dataset> {
    match config.dataset {
        DatasetKind::Mnist => load_mnist(config),
        DatasetKind::Gaussian => Ok(synthesize_gaussian(config)),
    }
}

fn load_mnist(config: &ExperimentConfig) -> Result<Dataset> {
    let dir = &config.data_dir;
    let train = load_idx_split(
        &dir.join("train-images-idx3-ubyte"),
        &dir.join("train-labels-idx1-ubyte"),
        config.train_samples,
        config,
    )?;
    let test = load_idx_split(
        &dir.join("t10k-images-idx3-ubyte"),
        &dir.join("t10k-labels-idx1-ubyte"),
        config.test_samples,
        config,
    )?;
    Ok(Dataset { train, test })
}

fn load_idx_split(
    images_path: &Path,
    labels_path: &Path,
    count: usize,
    config: &ExperimentConfig,
) -> Result<Split> {
    let (pixels, available, pixels_per_image) = read_idx_images(images_path)?;
    let labels = read_idx_labels(labels_path)?;

    if labels.len() != available {
        return Err(ExperimentError::Format(format!(
            "{} images but {} labels",
            available,
            labels.len()
        )));
    }
    if count > available {
        return Err(ExperimentError::NotEnoughSamples {
            requested: count,
            available,
        });
    }

    let mut inputs = DMatrix::zeros(config.input_dim, count);
    let mut targets = DMatrix::zeros(config.classes, count);
    for n in 0..count {
        let image = &pixels[n * pixels_per_image..(n + 1) * pixels_per_image];
        inputs.set_column(n, &project(image, config.input_dim));

        let label = labels[n] as usize;
        if label >= config.classes {
            return Err(ExperimentError::Format(format!(
                "label {} out of range for {} classes",
                label, config.classes
            )));
        }
        targets[(label, n)] = 1.0;
    }

    Ok(Split { inputs, targets })
}

/// Block-averages a flattened image down to `dim` components, scaled to [0,1].
fn project(pixels: &[u8], dim: usize) -> DVector<f64> {
    DVector::from_fn(dim, |i, _| {
        let start = i * pixels.len() / dim;
        let end = (i + 1) * pixels.len() / dim;
        let sum: f64 = pixels[start..end].iter().map(|&p| p as f64).sum();
        sum / (255.0 * (end - start) as f64)
    })
}

fn read_idx_images(path: &Path) -> Result<(Vec<u8>, usize, usize)> {
    let mut reader = BufReader::new(File::open(path)?);

    let magic = read_u32_be(&mut reader)?;
    if magic != IDX_IMAGE_MAGIC {
        return Err(ExperimentError::Format(format!(
            "bad image magic {:#x} in {}",
            magic,
            path.display()
        )));
    }
    let count = read_u32_be(&mut reader)? as usize;
    let rows = read_u32_be(&mut reader)? as usize;
    let cols = read_u32_be(&mut reader)? as usize;

    // Size the allocation from the header only after checking it is sane.
    let total = count
        .checked_mul(rows)
        .and_then(|v| v.checked_mul(cols))
        .filter(|&v| v <= IDX_MAX_BYTES)
        .ok_or_else(|| {
            ExperimentError::Format(format!(
                "implausible image header {}x{}x{} in {}",
                count,
                rows,
                cols,
                path.display()
            ))
        })?;

    let mut pixels = vec![0u8; total];
    reader.read_exact(&mut pixels)?;
    Ok((pixels, count, rows * cols))
}

fn read_idx_labels(path: &Path) -> Result<Vec<u8>> {
    let mut reader = BufReader::new(File::open(path)?);

    let magic = read_u32_be(&mut reader)?;
    if magic != IDX_LABEL_MAGIC {
        return Err(ExperimentError::Format(format!(
            "bad label magic {:#x} in {}",
            magic,
            path.display()
        )));
    }
    let count = read_u32_be(&mut reader)? as usize;
    if count > IDX_MAX_BYTES {
        return Err(ExperimentError::Format(format!(
            "implausible label count {} in {}",
            count,
            path.display()
        )));
    }

    let mut labels = vec![0u8; count];
    reader.read_exact(&mut labels)?;
    Ok(labels)
}

fn read_u32_be<R: Read>(reader: &mut R) -> Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_be_bytes(buf))
}

/// Seeded synthetic dataset: standard-normal inputs, uniform one-hot labels.
///
/// The rank measurements depend only on the data being in generic position,
/// so this provider reproduces the reference MNIST results without shipping
/// the IDX files.
fn synthesize_gaussian(config: &ExperimentConfig) -> Dataset {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let train = gaussian_split(config, config.train_samples, &mut rng);
    let test = gaussian_split(config, config.test_samples, &mut rng);
    Dataset { train, test }
}

fn gaussian_split(config: &ExperimentConfig, count: usize, rng: &mut StdRng) -> Split {
    let normal = Normal::new(0.0, 1.0).unwrap();
    let inputs = DMatrix::from_fn(config.input_dim, count, |_, _| normal.sample(rng));

    let mut targets = DMatrix::zeros(config.classes, count);
    for n in 0..count {
        let class = rng.gen_range(0..config.classes);
        targets[(class, n)] = 1.0;
    }
    Split { inputs, targets }
}
