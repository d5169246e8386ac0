//! Closed-form upper bounds on the Hessian ranks of a deep linear network,
//! in terms of the input covariance rank `r`, the effective class count `k`,
//! and the layer widths.

/// Predicted ranks for the three Hessian matrices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PredictedRanks {
    pub outer: usize,
    pub functional: usize,
    pub full: usize,
    /// `min(r, k, hidden widths...)`.
    pub q: usize,
    /// `min(r, k)`.
    pub s: usize,
}

/// Evaluates the bound formulas for the width sequence `d_0 .. d_L`.
///
/// For cross-entropy the caller passes the already-decremented class count
/// (see [`crate::config::LossKind::effective_classes`]).
pub fn predict(r: usize, classes: usize, widths: &[usize]) -> PredictedRanks {
    let hidden = &widths[1..widths.len() - 1];
    let layers = (widths.len() - 1) as i64;

    let s = r.min(classes);
    let q = hidden.iter().copied().fold(s, usize::min);

    let (qi, si, ri, ki) = (q as i64, s as i64, r as i64, classes as i64);
    let hidden_sum: i64 = hidden.iter().map(|&w| w as i64).sum();

    let outer = qi * (ri + ki - qi);
    let functional = 2 * qi * hidden_sum + 2 * qi * si - layers * qi * qi;
    let full = functional + outer + qi * (qi - 2 * si);

    PredictedRanks {
        outer: outer as usize,
        functional: functional as usize,
        full: full as usize,
        q,
        s,
    }
}
