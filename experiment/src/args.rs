use std::path::PathBuf;

use clap::Parser;
use hessian::{DatasetKind, ExperimentConfig, InitScheme, LossKind};

#[derive(Parser, Debug, Clone)]
#[command(name = "Hessian Rank Experiment")]
#[command(version = "0.1.0")]
pub struct Args {
    /// Number of training samples to accumulate over.
    #[arg(long, default_value_t = 50)]
    pub train_samples: usize,

    /// Number of held-out test samples (reported loss only).
    #[arg(long, default_value_t = 10)]
    pub test_samples: usize,

    /// Input dimensionality after projection.
    #[arg(long, default_value_t = 25)]
    pub input_dim: usize,

    /// Hidden layer widths, comma separated.
    #[arg(long, value_delimiter = ',', default_value = "5,10")]
    pub hidden: Vec<usize>,

    /// Number of output classes.
    #[arg(long, default_value_t = 10)]
    pub classes: usize,

    /// Samples per accumulation batch.
    #[arg(long, default_value_t = 10)]
    pub batch_size: usize,

    /// Random seed for dataset and initialization.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Dataset to load.
    #[arg(long, value_enum, default_value = "gaussian")]
    pub dataset: DatasetKind,

    /// Weight initialization scheme.
    #[arg(long, value_enum, default_value = "gaussian")]
    pub init: InitScheme,

    /// Loss family.
    #[arg(long, value_enum, default_value = "squared")]
    pub loss: LossKind,

    /// Directory holding the MNIST IDX files.
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,
}

impl Args {
    pub fn into_config(self) -> ExperimentConfig {
        ExperimentConfig {
            train_samples: self.train_samples,
            test_samples: self.test_samples,
            input_dim: self.input_dim,
            hidden: self.hidden,
            classes: self.classes,
            batch_size: self.batch_size,
            seed: self.seed,
            dataset: self.dataset,
            init: self.init,
            loss: self.loss,
            data_dir: self.data_dir,
        }
    }
}
