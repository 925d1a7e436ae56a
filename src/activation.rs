//! Logistic activation and its derivatives.
//!
//! The learning rule linearizes the network around each sample, so the
//! first and second derivatives must stay algebraically consistent with
//! `g` itself. Both derivative functions therefore take the *value* of
//! `g` as input rather than recomputing the exponential:
//!
//! ```text
//! g(x)   = 1 / (1 + e^{-x})
//! g'(x)  = g(x) · (1 - g(x))
//! g''(x) = g'(x) · (1 - 2·g(x))
//! ```

use ndarray::{Array, Dimension};

/// Elementwise logistic function `g(x) = 1 / (1 + e^{-x})`.
pub fn logistic<D: Dimension>(x: &Array<f64, D>) -> Array<f64, D> {
    x.mapv(|v| 1.0 / (1.0 + (-v).exp()))
}

/// First derivative `g'`, computed from the activation value `g`.
pub fn logistic_deriv<D: Dimension>(g: &Array<f64, D>) -> Array<f64, D> {
    g.mapv(|v| v * (1.0 - v))
}

/// Second derivative `g''`, computed from `g` and `g'`.
pub fn logistic_second_deriv<D: Dimension>(
    g: &Array<f64, D>,
    g_deriv: &Array<f64, D>,
) -> Array<f64, D> {
    let mut out = g_deriv.clone();
    out.zip_mut_with(g, |d, &gv| *d *= 1.0 - 2.0 * gv);
    out
}
