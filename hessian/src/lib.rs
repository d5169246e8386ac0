//! Numerical validation of Hessian rank bounds for deep linear networks.
//!
//! A fully-connected *linear* network (no bias, no activation) trained under
//! squared-error, cross-entropy, or log-cosh loss has Hessian matrices whose
//! ranks admit closed-form upper bounds. This crate builds such a network,
//! assembles the exact loss Hessian, its outer-product (Gauss-Newton) part,
//! and its functional (curvature) part analytically, measures their numerical
//! ranks by singular-value thresholding, and compares them to the predicted
//! bounds.
//!
//! Because the network is linear, every second derivative has a closed form
//! in terms of prefix/suffix products of the weight matrices; no automatic
//! differentiation is involved. All arithmetic is `f64` — the rank estimates
//! are sensitive to small singular values and single precision is known to
//! corrupt them (see `tests::precision`).

pub mod accumulate;
pub mod bounds;
pub mod config;
pub mod dataset;
pub mod error;
pub mod init;
pub mod loss;
pub mod network;
pub mod rank;
pub mod run;

#[cfg(test)]
mod tests;

pub use config::{DatasetKind, ExperimentConfig, InitScheme, LossKind};
pub use error::ExperimentError;
pub use run::{run, Report};
