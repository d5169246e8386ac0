//! Batch-wise accumulation of the input covariance and the two components of
//! the loss Hessian with respect to all parameters.
//!
//! The parameter vector concatenates the column-major vectorizations of the
//! weight matrices in layer order. With `b_l = W_{l-1} ... W_0 x` the input
//! to layer `l` and `A_l` the suffix product after it, the output Jacobian of
//! layer `l`'s block is `b_l^T (x) A_l`, which gives the outer-product
//! (generalized Gauss-Newton) blocks
//!
//!   H_O[l, m] = sum_n (b_l b_m^T) (x) (A_l^T L_n A_m)
//!
//! with `L_n` the loss Hessian at the output. The functional part collects
//! the second derivative of the network map against the output gradient
//! `g_n`; since each block is linear in its own weights the diagonal blocks
//! vanish, and for `l < m`
//!
//!   H_F[l, m] = sum_n b_l (x) (C_{l,m}^T (x) (A_m^T g_n)^T)
//!
//! with `C_{l,m}` the product of the weights strictly between the two layers.
//! The full Hessian is the sum of the two accumulated matrices; no
//! subtraction trick is needed because both parts are equally cheap in
//! closed form.

use nalgebra::DMatrix;

use crate::config::LossKind;
use crate::network::LinearNet;

/// The three matrices the experiment accumulates over batches.
#[derive(Clone, Debug)]
pub struct HessianSet {
    /// `d x d` sum of input outer products.
    pub covariance: DMatrix<f64>,
    /// `p x p` outer-product-of-gradients Hessian.
    pub outer: DMatrix<f64>,
    /// `p x p` functional (curvature) Hessian.
    pub functional: DMatrix<f64>,
}

impl HessianSet {
    /// Full loss Hessian. Equal to `outer + functional` by construction.
    pub fn full(&self) -> DMatrix<f64> {
        &self.outer + &self.functional
    }
}

/// Accumulates covariance and Hessian contributions batch by batch.
///
/// Summation is associative and commutative, so the final matrices do not
/// depend on batch order or size (up to floating-point rounding).
pub struct Accumulator<'a> {
    net: &'a LinearNet,
    loss: LossKind,
    suffix: Vec<DMatrix<f64>>,
    between: Vec<Vec<DMatrix<f64>>>,
    offsets: Vec<usize>,
    covariance: DMatrix<f64>,
    outer: DMatrix<f64>,
    functional: DMatrix<f64>,
}

impl<'a> Accumulator<'a> {
    pub fn new(net: &'a LinearNet, loss: LossKind) -> Self {
        let depth = net.depth();
        let input_dim = net.widths()[0];
        let p = net.param_count();

        // Parameter-only products are fixed for the whole run.
        let suffix = net.suffix_products();
        let between = (0..depth)
            .map(|l| ((l + 1)..depth).map(|m| net.between_product(l, m)).collect())
            .collect();

        Self {
            net,
            loss,
            suffix,
            between,
            offsets: net.block_offsets(),
            covariance: DMatrix::zeros(input_dim, input_dim),
            outer: DMatrix::zeros(p, p),
            functional: DMatrix::zeros(p, p),
        }
    }

    /// Adds one batch of examples (columns of `x` and `y`).
    pub fn add_batch(&mut self, x: &DMatrix<f64>, y: &DMatrix<f64>) {
        self.covariance += x * x.transpose();

        // Layer inputs for the whole batch: acts[l] = W_{l-1} ... W_0 x,
        // acts[depth] = network output.
        let depth = self.net.depth();
        let mut acts = Vec::with_capacity(depth + 1);
        acts.push(x.clone());
        for w in self.net.weights() {
            let next = w * acts.last().unwrap();
            acts.push(next);
        }

        for n in 0..x.ncols() {
            let f = acts[depth].column(n).into_owned();
            let target = y.column(n).into_owned();
            let grad = self.loss.output_gradient(&f, &target);
            let lam = self.loss.output_hessian(&f, &target);

            for l in 0..depth {
                let b_l = acts[l].column(n).into_owned();

                for m in l..depth {
                    let b_m = acts[m].column(n).into_owned();

                    // Outer-product part.
                    let data = &b_l * b_m.transpose();
                    let curvature = self.suffix[l].transpose() * &lam * &self.suffix[m];
                    let block = data.kronecker(&curvature);
                    self.add_block(Part::Outer, l, m, &block);

                    // Functional part: diagonal blocks are zero because the
                    // output is linear in each individual layer.
                    if m > l {
                        let u = self.suffix[m].transpose() * &grad;
                        let c = &self.between[l][m - l - 1];
                        let inner = c.transpose().kronecker(&u.transpose());
                        let block = b_l.kronecker(&inner);
                        self.add_block(Part::Functional, l, m, &block);
                    }
                }
            }
        }
    }

    /// Consumes the accumulator and returns the summed matrices.
    pub fn finish(self) -> HessianSet {
        HessianSet {
            covariance: self.covariance,
            outer: self.outer,
            functional: self.functional,
        }
    }

    fn add_block(&mut self, part: Part, l: usize, m: usize, block: &DMatrix<f64>) {
        let (ro, co) = (self.offsets[l], self.offsets[m]);
        let target = match part {
            Part::Outer => &mut self.outer,
            Part::Functional => &mut self.functional,
        };

        let mut view = target.view_mut((ro, co), block.shape());
        view += block;
        if m > l {
            // Mirror block; both parts are symmetric.
            let mut view = target.view_mut((co, ro), (block.ncols(), block.nrows()));
            view += block.transpose();
        }
    }
}

enum Part {
    Outer,
    Functional,
}
