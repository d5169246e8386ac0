use nalgebra::DMatrix;

/// Numerical rank: singular values above the conventional relative tolerance
/// `max(nrows, ncols) * eps * sigma_max`. No custom tolerance is exposed.
pub fn numerical_rank(matrix: &DMatrix<f64>) -> usize {
    if matrix.is_empty() {
        return 0;
    }
    let singular_values = matrix.singular_values();
    let sigma_max = singular_values.max();
    if sigma_max == 0.0 {
        return 0;
    }

    let tol = matrix.nrows().max(matrix.ncols()) as f64 * f64::EPSILON * sigma_max;
    singular_values.iter().filter(|&&s| s > tol).count()
}
