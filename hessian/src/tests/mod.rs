use std::path::PathBuf;

use crate::config::{DatasetKind, ExperimentConfig, InitScheme, LossKind};

mod dataset_tests;
mod pipeline_tests;

/// The worked example from the reference run: 50 samples of dimension 25,
/// widths [5, 10], 10 classes, batch size 10.
pub fn reference_config() -> ExperimentConfig {
    ExperimentConfig {
        train_samples: 50,
        test_samples: 10,
        input_dim: 25,
        hidden: vec![5, 10],
        classes: 10,
        batch_size: 10,
        seed: 0,
        dataset: DatasetKind::Gaussian,
        init: InitScheme::Gaussian,
        loss: LossKind::Squared,
        data_dir: PathBuf::from("data"),
    }
}
