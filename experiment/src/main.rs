mod args;

use std::error::Error;

use args::Args;
use clap::Parser;
use hessian::run::Report;
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;
use simplelog::{Config, SimpleLogger};

fn main() -> Result<(), Box<dyn Error>> {
    let args = init()?;
    let config = args.into_config();

    log::info!(
        "Validating Hessian rank bounds: {:?} loss, {:?} init, seed {}",
        config.loss,
        config.init,
        config.seed
    );

    let total_batches = (config.train_samples + config.batch_size - 1) / config.batch_size;
    let progress_bar = ProgressBar::new(total_batches as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template(" {spinner:.cyan} {pos}/{len} [{wide_bar:.cyan/blue}] {msg}")
            .unwrap(),
    );

    let report = hessian::run(&config, |done, _| {
        progress_bar.set_position(done as u64);
        progress_bar.set_message("accumulating Hessians");
    })?;
    progress_bar.finish_and_clear();

    log::info!(
        "Initial loss: train {:.6}, test {:.6}",
        report.train_loss,
        report.test_loss
    );
    print_comparison(&report);

    Ok(())
}

fn print_comparison(report: &Report) {
    println!();
    println!(
        "p = {} parameters, covariance rank r = {}, effective classes k = {}, q = {}, s = {}",
        report.param_count,
        report.measured.covariance,
        report.effective_classes,
        report.predicted.q,
        report.predicted.s
    );
    println!();
    println!("{:<24} {:>10} {:>10}", "matrix", "measured", "predicted");
    println!("{}", "-".repeat(46));
    for (name, measured, predicted) in [
        (
            "functional Hessian",
            report.measured.functional,
            report.predicted.functional,
        ),
        (
            "outer-product Hessian",
            report.measured.outer,
            report.predicted.outer,
        ),
        (
            "full loss Hessian",
            report.measured.full,
            report.predicted.full,
        ),
    ] {
        println!("{:<24} {:>10} {:>10}", name, measured, predicted);
    }
    println!();
}

fn init() -> Result<Args, Box<dyn Error>> {
    let args = Args::parse();
    SimpleLogger::init(LevelFilter::Info, Config::default())?;

    Ok(args)
}
