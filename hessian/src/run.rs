use nalgebra::DMatrix;

use crate::accumulate::{Accumulator, HessianSet};
use crate::bounds::{self, PredictedRanks};
use crate::config::ExperimentConfig;
use crate::dataset;
use crate::error::Result;
use crate::init;
use crate::network::LinearNet;
use crate::rank::numerical_rank;

/// Measured ranks of the accumulated matrices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeasuredRanks {
    pub covariance: usize,
    pub outer: usize,
    pub functional: usize,
    pub full: usize,
}

/// Everything the experiment reports: measured ranks next to the predicted
/// bounds, plus the losses of the freshly initialized network for context.
#[derive(Clone, Debug)]
pub struct Report {
    pub param_count: usize,
    pub effective_classes: usize,
    pub measured: MeasuredRanks,
    pub predicted: PredictedRanks,
    pub train_loss: f64,
    pub test_loss: f64,
}

/// Runs the whole pipeline: load data, initialize weights, accumulate the
/// covariance and Hessian matrices over batches, measure ranks, evaluate the
/// bounds. `on_batch(done, total)` is invoked after each accumulated batch.
pub fn run(config: &ExperimentConfig, mut on_batch: impl FnMut(usize, usize)) -> Result<Report> {
    config.validate()?;

    let data = dataset::load(config)?;
    log::info!(
        "Loaded {} train / {} test samples ({:?})",
        data.train.len(),
        data.test.len(),
        config.dataset
    );

    let widths = config.widths();
    // Distinct stream from the dataset seed so data and weights never share
    // draws.
    let weights = init::initialize(config.init, &widths, config.seed.wrapping_add(1));
    let net = LinearNet::new(weights);
    log::info!(
        "Initialized {:?} network {:?}, {} parameters",
        config.init,
        widths,
        net.param_count()
    );

    let set = accumulate(config, &net, &data.train.inputs, &data.train.targets, &mut on_batch);

    let measured = MeasuredRanks {
        covariance: numerical_rank(&set.covariance),
        outer: numerical_rank(&set.outer),
        functional: numerical_rank(&set.functional),
        full: numerical_rank(&set.full()),
    };

    let effective_classes = config.loss.effective_classes(config.classes);
    let predicted = bounds::predict(measured.covariance, effective_classes, &widths);

    let train_loss = config.loss.total(&net.forward(&data.train.inputs), &data.train.targets);
    let test_loss = if data.test.is_empty() {
        0.0
    } else {
        config.loss.total(&net.forward(&data.test.inputs), &data.test.targets)
    };

    Ok(Report {
        param_count: net.param_count(),
        effective_classes,
        measured,
        predicted,
        train_loss,
        test_loss,
    })
}

fn accumulate(
    config: &ExperimentConfig,
    net: &LinearNet,
    inputs: &DMatrix<f64>,
    targets: &DMatrix<f64>,
    on_batch: &mut impl FnMut(usize, usize),
) -> HessianSet {
    let n = inputs.ncols();
    let batch = config.batch_size;
    let total = (n + batch - 1) / batch;

    let mut acc = Accumulator::new(net, config.loss);
    let mut done = 0;
    for start in (0..n).step_by(batch) {
        let len = batch.min(n - start);
        let x = inputs.columns(start, len).into_owned();
        let y = targets.columns(start, len).into_owned();
        acc.add_batch(&x, &y);

        done += 1;
        on_batch(done, total);
    }
    acc.finish()
}
