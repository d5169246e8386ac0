use nalgebra::DMatrix;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::config::InitScheme;

/// Samples one weight matrix per layer, `widths[l+1] x widths[l]`, under the
/// chosen scheme. Deterministic for a fixed seed: a single `StdRng` is drawn
/// through in layer order.
pub fn initialize(scheme: InitScheme, widths: &[usize], seed: u64) -> Vec<DMatrix<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    widths
        .windows(2)
        .map(|pair| layer(scheme, pair[1], pair[0], &mut rng))
        .collect()
}

fn layer(scheme: InitScheme, rows: usize, cols: usize, rng: &mut StdRng) -> DMatrix<f64> {
    let fan_in = cols as f64;
    match scheme {
        InitScheme::Gaussian => {
            let normal = Normal::new(0.0, (1.0 / fan_in).sqrt()).unwrap();
            DMatrix::from_fn(rows, cols, |_, _| normal.sample(rng))
        }
        InitScheme::Uniform => {
            let bound = (3.0 / fan_in).sqrt();
            DMatrix::from_fn(rows, cols, |_, _| rng.gen_range(-bound..=bound))
        }
        InitScheme::Orthogonal => orthogonal(rows, cols, rng),
    }
}

/// Truncated Q factor of a random square Gaussian matrix, with the usual sign
/// fix so the distribution is Haar rather than biased by QR conventions.
fn orthogonal(rows: usize, cols: usize, rng: &mut StdRng) -> DMatrix<f64> {
    let n = rows.max(cols);
    let normal = Normal::new(0.0, 1.0).unwrap();
    let gaussian = DMatrix::from_fn(n, n, |_, _| normal.sample(rng));

    let qr = gaussian.qr();
    let r = qr.r();
    let mut q = qr.q();
    for j in 0..n {
        if r[(j, j)] < 0.0 {
            q.column_mut(j).neg_mut();
        }
    }
    q.view((0, 0), (rows, cols)).into_owned()
}
