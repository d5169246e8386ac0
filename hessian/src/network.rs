use nalgebra::DMatrix;

/// Fully-connected linear network: a stack of weight matrices applied by
/// successive multiplication, with no bias and no activation.
#[derive(Clone, Debug)]
pub struct LinearNet {
    weights: Vec<DMatrix<f64>>,
}

impl LinearNet {
    /// Panics if `weights` is empty; a network has at least one layer.
    pub fn new(weights: Vec<DMatrix<f64>>) -> Self {
        assert!(!weights.is_empty(), "a linear network needs at least one layer");
        Self { weights }
    }

    pub fn weights(&self) -> &[DMatrix<f64>] {
        &self.weights
    }

    /// Number of weight matrices.
    pub fn depth(&self) -> usize {
        self.weights.len()
    }

    /// Width sequence `d_0 .. d_L` recovered from the weight shapes.
    pub fn widths(&self) -> Vec<usize> {
        let mut widths = Vec::with_capacity(self.weights.len() + 1);
        widths.push(self.weights[0].ncols());
        widths.extend(self.weights.iter().map(|w| w.nrows()));
        widths
    }

    /// Total parameter count `p`.
    pub fn param_count(&self) -> usize {
        self.weights.iter().map(|w| w.len()).sum()
    }

    /// Offset of each layer's block in the column-major parameter vector.
    pub fn block_offsets(&self) -> Vec<usize> {
        let mut offsets = Vec::with_capacity(self.weights.len());
        let mut offset = 0;
        for w in &self.weights {
            offsets.push(offset);
            offset += w.len();
        }
        offsets
    }

    /// Applies every layer to a batch of column vectors. Pure.
    pub fn forward(&self, x: &DMatrix<f64>) -> DMatrix<f64> {
        self.weights.iter().fold(x.clone(), |h, w| w * h)
    }

    /// Suffix products `A_l = W_{L-1} ... W_{l+1}` for each layer `l`,
    /// mapping the output of layer `l` to the network output. `A_{L-1}` is
    /// the identity.
    pub fn suffix_products(&self) -> Vec<DMatrix<f64>> {
        let depth = self.weights.len();
        let classes = self.weights[depth - 1].nrows();
        let mut products = vec![DMatrix::zeros(0, 0); depth];

        let mut acc = DMatrix::<f64>::identity(classes, classes);
        for l in (0..depth).rev() {
            products[l] = acc.clone();
            acc = &acc * &self.weights[l];
        }
        products
    }

    /// Product `W_{m-1} ... W_{l+1}` between two layers, `l < m`, mapping the
    /// output of layer `l` to the input of layer `m`. Identity when they are
    /// adjacent.
    pub fn between_product(&self, l: usize, m: usize) -> DMatrix<f64> {
        debug_assert!(l < m && m < self.weights.len());
        let dim = self.weights[l].nrows();
        let mut acc = DMatrix::<f64>::identity(dim, dim);
        for j in (l + 1)..m {
            acc = &self.weights[j] * acc;
        }
        acc
    }
}
