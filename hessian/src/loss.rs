//! Loss functionals and the pieces of their second-derivative structure the
//! Hessian accumulator needs: the gradient and Hessian of the scalar loss
//! with respect to the network *output*, per example. Everything with respect
//! to the parameters follows from these by the chain rule through the linear
//! network.

use nalgebra::{DMatrix, DVector};

use crate::config::LossKind;

impl LossKind {
    /// Total scalar loss over a batch of predictions/targets (columns).
    pub fn total(&self, preds: &DMatrix<f64>, targets: &DMatrix<f64>) -> f64 {
        match self {
            LossKind::Squared => 0.5 * (preds - targets).norm_squared(),
            LossKind::CrossEntropy => (0..preds.ncols())
                .map(|n| {
                    let f = preds.column(n);
                    let y = targets.column(n);
                    let max = f.max();
                    let lse = max + f.iter().map(|v| (v - max).exp()).sum::<f64>().ln();
                    y.iter().zip(f.iter()).map(|(yc, fc)| yc * (lse - fc)).sum::<f64>()
                })
                .sum(),
            LossKind::LogCosh => (preds - targets).iter().map(|&t| log_cosh(t)).sum(),
        }
    }

    /// Gradient of the per-example loss with respect to the output vector.
    pub fn output_gradient(&self, f: &DVector<f64>, y: &DVector<f64>) -> DVector<f64> {
        match self {
            LossKind::Squared => f - y,
            LossKind::CrossEntropy => softmax(f) - y,
            LossKind::LogCosh => (f - y).map(f64::tanh),
        }
    }

    /// Hessian of the per-example loss with respect to the output vector.
    pub fn output_hessian(&self, f: &DVector<f64>, y: &DVector<f64>) -> DMatrix<f64> {
        let k = f.nrows();
        match self {
            LossKind::Squared => DMatrix::identity(k, k),
            LossKind::CrossEntropy => {
                let p = softmax(f);
                DMatrix::from_diagonal(&p) - &p * p.transpose()
            }
            LossKind::LogCosh => {
                let sech_sq = (f - y).map(|t| 1.0 - f64::tanh(t).powi(2));
                DMatrix::from_diagonal(&sech_sq)
            }
        }
    }

    /// Class count entering the rank bounds. Softmax normalization removes
    /// one degree of freedom under cross-entropy.
    pub fn effective_classes(&self, classes: usize) -> usize {
        match self {
            LossKind::CrossEntropy => classes - 1,
            _ => classes,
        }
    }
}

fn softmax(f: &DVector<f64>) -> DVector<f64> {
    let max = f.max();
    let exp = f.map(|v| (v - max).exp());
    let sum = exp.sum();
    exp / sum
}

/// Numerically stable log(cosh(t)) for large |t|.
fn log_cosh(t: f64) -> f64 {
    let a = t.abs();
    a + (-2.0 * a).exp().ln_1p() - std::f64::consts::LN_2
}
