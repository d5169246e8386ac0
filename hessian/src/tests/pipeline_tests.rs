//! End-to-end runs of the pipeline against the closed-form predictions.

use super::reference_config;
use crate::bounds;
use crate::config::LossKind;
use crate::error::ExperimentError;
use crate::run::run;

#[test]
fn reference_run_reproduces_predicted_ranks() {
    let config = reference_config();
    let report = run(&config, |_, _| {}).unwrap();

    assert_eq!(report.param_count, 275);
    assert_eq!(report.measured.covariance, 25);

    // The worked example: measured = predicted = (175, 150, 250).
    assert_eq!(report.predicted.functional, 175);
    assert_eq!(report.predicted.outer, 150);
    assert_eq!(report.predicted.full, 250);

    assert_eq!(report.measured.functional, report.predicted.functional);
    assert_eq!(report.measured.outer, report.predicted.outer);
    assert_eq!(report.measured.full, report.predicted.full);
}

#[test]
fn reference_run_is_seed_stable() {
    let config = reference_config();
    let a = run(&config, |_, _| {}).unwrap();
    let b = run(&config, |_, _| {}).unwrap();
    assert_eq!(a.measured, b.measured);
    assert_eq!(a.train_loss, b.train_loss);
}

#[test]
fn cross_entropy_decrements_effective_classes() {
    let mut config = reference_config();
    config.loss = LossKind::CrossEntropy;
    let report = run(&config, |_, _| {}).unwrap();

    assert_eq!(report.effective_classes, 9);
    // q = min(25, 9, 5, 10) = 5, s = 9.
    assert_eq!(report.predicted.q, 5);
    assert_eq!(report.predicted.s, 9);
    assert_eq!(report.predicted.outer, 5 * (25 + 9 - 5));
    assert_eq!(report.predicted.functional, 2 * 5 * 15 + 2 * 5 * 9 - 3 * 25);
    assert_eq!(report.measured.outer, report.predicted.outer);
    assert_eq!(report.measured.functional, report.predicted.functional);
    assert_eq!(report.measured.full, report.predicted.full);
}

#[test]
fn log_cosh_matches_squared_error_bounds() {
    // Log-cosh has a full-rank output Hessian at a random initialization, so
    // its predicted and measured ranks coincide with the squared-error case.
    let mut config = reference_config();
    config.loss = LossKind::LogCosh;
    let report = run(&config, |_, _| {}).unwrap();

    assert_eq!(report.effective_classes, 10);
    assert_eq!(report.predicted.functional, 175);
    assert_eq!(report.predicted.outer, 150);
    assert_eq!(report.predicted.full, 250);
    assert_eq!(report.measured.functional, 175);
    assert_eq!(report.measured.outer, 150);
    assert_eq!(report.measured.full, 250);
}

#[test]
fn covariance_rank_saturates_at_sample_count() {
    // Fewer samples than input dimensions: r = n, and the bounds adapt.
    let mut config = reference_config();
    config.train_samples = 12;
    config.batch_size = 4;
    let report = run(&config, |_, _| {}).unwrap();

    assert_eq!(report.measured.covariance, 12);
    let expected = bounds::predict(12, 10, &config.widths());
    assert_eq!(report.predicted, expected);
}

#[test]
fn batch_callback_reports_progress() {
    let config = reference_config();
    let mut seen = Vec::new();
    run(&config, |done, total| seen.push((done, total))).unwrap();
    assert_eq!(seen, (1..=5).map(|i| (i, 5)).collect::<Vec<_>>());
}

#[test]
fn zero_batch_size_is_rejected() {
    let mut config = reference_config();
    config.batch_size = 0;
    match run(&config, |_, _| {}) {
        Err(ExperimentError::InvalidConfig(_)) => {}
        other => panic!("expected InvalidConfig, got {:?}", other.map(|r| r.measured)),
    }
}

#[test]
fn cross_entropy_needs_two_classes() {
    let mut config = reference_config();
    config.loss = LossKind::CrossEntropy;
    config.classes = 1;
    assert!(matches!(
        run(&config, |_, _| {}),
        Err(ExperimentError::InvalidConfig(_))
    ));
}
