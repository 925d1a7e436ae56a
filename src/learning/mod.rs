//! Information-maximization learning rule and cost estimator.
//!
//! # Gradient Derivation
//!
//! Around each sample the network is linearized through two maps:
//!
//! ```text
//! Phi = (diag(1/g') - K)^{-1}     sensitivity of output to drive
//! Chi = Phi · W                    effective input-to-output map
//! ```
//!
//! The mutual information between input and output is maximized by
//! ascending `0.5·log det(Chiᵀ·Chi)` plus a curvature correction from
//! the nonlinearity. Per sample the weight deltas are
//!
//! ```text
//! ΔW = Gammaᵀ + (Phiᵀ·c)·x0ᵀ
//! ΔK = (Chi·Gamma)ᵀ + (Phiᵀ·c)·s0ᵀ
//! ```
//!
//! with `Gamma = (Chiᵀ·Chi)^{-1}·Chiᵀ·Phi` and the per-output
//! curvature term `c_i = (Chi·Gamma)_{ii} · g''_i / g'_i³`. Deltas are
//! summed over the batch and applied scaled by `learning_rate / n`.
//!
//! A non-invertible matrix anywhere in the batch aborts the whole call
//! with no partial update: deltas accumulate in local buffers and only
//! touch `w`/`k` once every sample has succeeded.
//!
//! The recurrent matrix keeps a hard zero diagonal: the gradient may
//! propose self-coupling, but it is discarded after every update.

use crate::core::{InfomaxError, InfomaxResult, Network};
use crate::linalg;
use ndarray::{Array1, Array2, ArrayView1, Axis};

/// Per-sample linearization shared by the learning rule and the cost
/// estimator.
struct Linearization {
    /// `(diag(1/g') - K)^{-1}`, shape (outputs, outputs).
    phi: Array2<f64>,
    /// `Phi · W`, shape (outputs, inputs).
    chi: Array2<f64>,
}

/// Rank-1 outer product `a · bᵀ`.
fn outer(a: &Array1<f64>, b: ArrayView1<f64>) -> Array2<f64> {
    let col = a.view().insert_axis(Axis(1));
    let row = b.insert_axis(Axis(0));
    &col * &row
}

impl Network {
    /// Linearize the input-to-output map at one sample's activation
    /// slopes.
    fn linearize(&self, g_prime: ArrayView1<f64>) -> InfomaxResult<Linearization> {
        if g_prime.iter().any(|&v| v == 0.0) {
            return Err(InfomaxError::Singular(
                "Saturated unit: activation slope is zero".to_string(),
            ));
        }

        // Ginv - K, with Ginv the diagonal inverse-slope matrix.
        let mut ginv_minus_k = -&self.k;
        for i in 0..self.outputs() {
            ginv_minus_k[(i, i)] += 1.0 / g_prime[i];
        }

        let phi = linalg::invert(&ginv_minus_k).ok_or_else(|| {
            InfomaxError::Singular("Response matrix (Ginv - K) is not invertible".to_string())
        })?;
        let chi = phi.dot(&self.w);

        Ok(Linearization { phi, chi })
    }

    /// Apply one information-maximization update from a batch of input
    /// columns.
    ///
    /// No-op when both `learn_ff` and `learn_rec` are disabled. After
    /// any recurrent update the diagonal of `k` is forced back to zero
    /// (self-coupling is disallowed).
    ///
    /// # Errors
    /// `ShapeMismatch` on a malformed batch; `Singular` if any
    /// per-sample matrix is non-invertible, in which case neither `w`
    /// nor `k` is touched.
    pub fn learn(&mut self, x: &Array2<f64>) -> InfomaxResult<()> {
        if !self.config.learn_ff && !self.config.learn_rec {
            return Ok(());
        }

        let eval = self.evaluate(x)?;
        let n = x.ncols();
        let m = self.outputs();

        let mut delta_w = Array2::<f64>::zeros(self.w.dim());
        let mut delta_k = Array2::<f64>::zeros(self.k.dim());

        for j in 0..n {
            let gp = eval.g_prime.column(j);
            let gpp = eval.g_double_prime.column(j);

            let lin = self.linearize(gp)?;
            let gram = lin.chi.t().dot(&lin.chi);
            let gram_inv = linalg::invert(&gram).ok_or_else(|| {
                InfomaxError::Singular(
                    "Gram matrix Chi'Chi is not invertible (rank-deficient Chi)".to_string(),
                )
            })?;

            // Left-pseudo-inverse-style projector, shape (inputs, outputs).
            let projector = gram_inv.dot(&lin.chi.t()).dot(&lin.phi);
            let chi_proj = lin.chi.dot(&projector);

            // Curvature correction from the nonlinearity, one scalar
            // per output: diag(Chi·Gamma)_i · g''_i / g'_i^3.
            let curvature =
                Array1::from_shape_fn(m, |i| chi_proj[(i, i)] * gpp[i] / gp[i].powi(3));
            let drive_sens = lin.phi.t().dot(&curvature);

            delta_w += &projector.t();
            delta_w += &outer(&drive_sens, x.column(j));

            if self.config.learn_rec {
                delta_k += &chi_proj.t();
                delta_k += &outer(&drive_sens, eval.output.column(j));
            }
        }

        let eta = self.config.learning_rate / n as f64;
        if self.config.learn_ff {
            self.w = &self.w + eta * &delta_w;
        }
        if self.config.learn_rec {
            self.k = &self.k + eta * &delta_k;
            // Self-coupling is suppressed by design, whatever the
            // gradient proposed.
            self.k.diag_mut().fill(0.0);
        }

        Ok(())
    }

    /// Scalar proxy for the negative mutual information of the batch:
    /// `-0.5 · mean(log det(Chiᵀ·Chi))`.
    ///
    /// Diagnostic only; not used by the gradient. Deterministic for a
    /// fixed `(w, k, x)`.
    ///
    /// # Errors
    /// `ShapeMismatch` on a malformed batch; `Singular` if any sample's
    /// linearization is non-invertible or its Gram determinant is not
    /// strictly positive and finite.
    pub fn cost(&self, x: &Array2<f64>) -> InfomaxResult<f64> {
        let eval = self.evaluate(x)?;
        let n = x.ncols();

        let mut acc = 0.0_f64;
        for j in 0..n {
            let lin = self.linearize(eval.g_prime.column(j))?;
            let det = linalg::determinant(&lin.chi.t().dot(&lin.chi));
            if !det.is_finite() || det <= 0.0 {
                return Err(InfomaxError::Singular(format!(
                    "Gram determinant is not positive: {}",
                    det
                )));
            }
            acc += det.ln();
        }

        Ok(-0.5 * acc / n as f64)
    }
}
