use std::path::PathBuf;

use clap::ValueEnum;

use crate::error::{ExperimentError, Result};

/// Which dataset the provider loads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DatasetKind {
    /// MNIST images read from IDX files, block-averaged down to `input_dim`.
    Mnist,
    /// Seeded standard-normal inputs with uniformly random one-hot labels.
    Gaussian,
}

/// Weight initialization scheme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum InitScheme {
    /// N(0, 1/fan_in) entries.
    Gaussian,
    /// U(-a, a) with a = sqrt(3/fan_in), matching the Gaussian variance.
    Uniform,
    /// Random orthogonal rows/columns (QR of a standard-normal matrix).
    Orthogonal,
}

/// Loss family applied to the network output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LossKind {
    /// Half sum of squared errors.
    Squared,
    /// Negative target-weighted log-softmax.
    CrossEntropy,
    /// Sum of log-cosh of the residual.
    LogCosh,
}

/// Immutable experiment configuration, fixed before the pipeline runs and
/// passed by reference into each component.
#[derive(Clone, Debug)]
pub struct ExperimentConfig {
    pub train_samples: usize,
    pub test_samples: usize,
    pub input_dim: usize,
    pub hidden: Vec<usize>,
    pub classes: usize,
    pub batch_size: usize,
    pub seed: u64,
    pub dataset: DatasetKind,
    pub init: InitScheme,
    pub loss: LossKind,
    /// Directory holding the IDX files; only read for `DatasetKind::Mnist`.
    pub data_dir: PathBuf,
}

impl ExperimentConfig {
    /// Full width sequence `d_0 .. d_L`: input dim, hidden widths, classes.
    pub fn widths(&self) -> Vec<usize> {
        let mut widths = Vec::with_capacity(self.hidden.len() + 2);
        widths.push(self.input_dim);
        widths.extend_from_slice(&self.hidden);
        widths.push(self.classes);
        widths
    }

    /// Number of weight matrices.
    pub fn layer_count(&self) -> usize {
        self.hidden.len() + 1
    }

    pub fn validate(&self) -> Result<()> {
        if self.train_samples == 0 {
            return Err(ExperimentError::InvalidConfig(
                "train_samples must be positive".into(),
            ));
        }
        if self.batch_size == 0 {
            return Err(ExperimentError::InvalidConfig(
                "batch_size must be positive".into(),
            ));
        }
        if self.widths().iter().any(|&w| w == 0) {
            return Err(ExperimentError::InvalidConfig(
                "all layer widths must be positive".into(),
            ));
        }
        if self.loss == LossKind::CrossEntropy && self.classes < 2 {
            return Err(ExperimentError::InvalidConfig(
                "cross-entropy needs at least two classes".into(),
            ));
        }
        Ok(())
    }
}
