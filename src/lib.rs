//! # Infomax (Overcomplete Recurrent Infomax Networks)
//!
//! An unsupervised-learning engine for a single neuron layer with more
//! outputs than inputs, optionally recurrently interconnected, trained
//! online to maximize the mutual information between its inputs and a
//! deterministic nonlinear encoding of them.
//!
//! ## Structure
//!
//! - [`core`] — network state, construction, evaluation, fixed-point solver
//! - [`learning`] — information-maximization gradient rule and cost estimator
//! - [`activation`] — logistic nonlinearity and its derivatives
//! - [`linalg`] — dense inversion/determinant helpers
//!
//! ## Model
//!
//! The layer's response to an input `x` is the self-consistent state
//!
//! ```text
//! s = g(W·x + K·s)
//! ```
//!
//! where `g` is the elementwise logistic function, `W` the feedforward
//! weights, and `K` the recurrent (lateral) weights. With `K = 0` this
//! collapses to a plain feedforward layer; otherwise a damped
//! fixed-point iteration approximates `s`.
//!
//! Learning linearizes the network around each sample and follows the
//! gradient of a log-determinant proxy for the mutual information
//! between input and output. [`Network::cost`] exposes the same proxy
//! as a scalar diagnostic.
//!
//! ## Quick Start
//!
//! ```rust
//! use infomax::Network;
//! use ndarray::array;
//!
//! // 2 inputs, 3 outputs, default configuration
//! let mut net = Network::new(2, 3).unwrap();
//!
//! let batch = array![[0.3, -0.1, 0.8], [0.5, 0.2, -0.4]];
//! let eval = net.evaluate(&batch).unwrap();
//! assert_eq!(eval.output.dim(), (3, 3));
//!
//! net.learn(&batch).unwrap();
//! let cost = net.cost(&batch).unwrap();
//! assert!(cost.is_finite());
//! ```

pub mod activation;
pub mod core;
pub mod learning;
pub mod linalg;

pub use crate::core::{Evaluation, FixedPoint, InfomaxError, InfomaxResult, Network};

/// Network configuration.
///
/// Learning-rate and solver settings are mutable for the lifetime of a
/// [`Network`]; dimensions are not (they are fixed at construction).
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Weight update step size (eta). Must be positive.
    pub learning_rate: f64,
    /// Whether `learn` updates the feedforward matrix `W`.
    pub learn_ff: bool,
    /// Whether `learn` updates the recurrent matrix `K`.
    pub learn_rec: bool,
    /// Iteration budget for the fixed-point solver.
    pub max_iterations: usize,
    /// Damping factor (alpha) of the fixed-point iteration, in (0, 1].
    pub step_size: f64,
    /// Convergence threshold on the max-norm solver residual.
    pub tolerance: f64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.01,
            learn_ff: true,
            learn_rec: false,
            max_iterations: 3000,
            step_size: 0.2,
            tolerance: 1e-8,
        }
    }
}
