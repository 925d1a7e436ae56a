//! Network kernel: state, construction, evaluation, and the recurrent
//! fixed-point solver.
//!
//! The network is a single overcomplete layer: `outputs >= inputs`,
//! feedforward weights `W` (outputs×inputs) and recurrent weights `K`
//! (outputs×outputs). Its response to an input column `x` is the
//! steady state of the continuous dynamics
//!
//! ```text
//! ds/dt = -s + g(W·x + K·s)
//! ```
//!
//! i.e. the self-consistent `s = g(W·x + K·s)`, approximated by a
//! damped fixed-point iteration when `K` is non-trivial. With `K = 0`
//! the response is simply `g(W·x)` and no iteration runs.

use crate::activation::{logistic, logistic_deriv, logistic_second_deriv};
use crate::NetworkConfig;
use ndarray::{Array1, Array2, Axis};
use ndarray_rand::rand_distr::StandardNormal;
use ndarray_rand::RandomExt;
use std::error::Error;
use std::fmt;

/// Error type for network operations.
#[derive(Debug, Clone)]
pub enum InfomaxError {
    /// Invalid dimensions or configuration at construction
    InvalidConfig(String),
    /// Batch or vector shape mismatch
    ShapeMismatch(String),
    /// Non-invertible matrix or degenerate determinant during
    /// gradient/cost computation
    Singular(String),
}

impl fmt::Display for InfomaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InfomaxError::InvalidConfig(msg) => write!(f, "Invalid config: {}", msg),
            InfomaxError::ShapeMismatch(msg) => write!(f, "Shape mismatch: {}", msg),
            InfomaxError::Singular(msg) => write!(f, "Singular matrix: {}", msg),
        }
    }
}

impl Error for InfomaxError {}

pub type InfomaxResult<T> = Result<T, InfomaxError>;

/// An overcomplete, optionally recurrent infomax layer.
///
/// # Weight Initialization
///
/// `W` entries are i.i.d. standard normal scaled by
/// `1/sqrt((inputs + outputs)/2)` to control initial drive variance;
/// `K` starts at zero (purely feedforward until recurrent learning is
/// enabled).
///
/// # Ownership
///
/// `w` and `k` are public: callers may inspect or overwrite them
/// directly for manual connectivity edits. Only [`Network::learn`]
/// enforces the zero-diagonal invariant on `k`; a directly assigned
/// `k` is taken as-is.
#[derive(Debug, Clone)]
pub struct Network {
    inputs: usize,
    outputs: usize,
    /// Learning-rate and solver settings, mutable at any time.
    pub config: NetworkConfig,
    /// Feedforward weights, shape (outputs, inputs).
    pub w: Array2<f64>,
    /// Recurrent (lateral) weights, shape (outputs, outputs).
    pub k: Array2<f64>,
}

/// Result of evaluating a batch of inputs.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Network responses, shape (outputs, n_samples).
    pub output: Array2<f64>,
    /// `g'` evaluated at the combined drive of each sample.
    pub g_prime: Array2<f64>,
    /// `g''` evaluated at the combined drive of each sample.
    pub g_double_prime: Array2<f64>,
    /// Diagnostic only: true when every sample's fixed-point solve met
    /// tolerance (trivially true on the feedforward path). A `false`
    /// here is not an error; the last iterates were used.
    pub converged: bool,
}

/// Result of a single fixed-point solve.
#[derive(Debug, Clone)]
pub struct FixedPoint {
    /// Best estimate of the self-consistent response.
    pub state: Array1<f64>,
    /// Whether the residual dropped below tolerance within budget.
    pub converged: bool,
    /// Number of damped updates performed.
    pub iterations: usize,
}

impl Network {
    /// Create a network with default configuration.
    ///
    /// # Errors
    /// `InvalidConfig` if `outputs < inputs` or `inputs == 0`.
    pub fn new(inputs: usize, outputs: usize) -> InfomaxResult<Self> {
        Self::with_config(inputs, outputs, NetworkConfig::default())
    }

    /// Create a network with an explicit configuration.
    ///
    /// # Errors
    /// `InvalidConfig` on undercomplete dimensions (`outputs < inputs`),
    /// zero inputs, non-positive `learning_rate` or `tolerance`,
    /// `step_size` outside `(0, 1]`, or a zero iteration budget.
    pub fn with_config(
        inputs: usize,
        outputs: usize,
        config: NetworkConfig,
    ) -> InfomaxResult<Self> {
        if inputs == 0 {
            return Err(InfomaxError::InvalidConfig(
                "Must have at least 1 input".to_string(),
            ));
        }
        if outputs < inputs {
            return Err(InfomaxError::InvalidConfig(format!(
                "Undercomplete network: outputs ({}) must be >= inputs ({})",
                outputs, inputs
            )));
        }
        if config.learning_rate <= 0.0 {
            return Err(InfomaxError::InvalidConfig(
                "Learning rate must be positive".to_string(),
            ));
        }
        if config.max_iterations == 0 {
            return Err(InfomaxError::InvalidConfig(
                "Solver iteration budget must be >= 1".to_string(),
            ));
        }
        if !(config.step_size > 0.0 && config.step_size <= 1.0) {
            return Err(InfomaxError::InvalidConfig(format!(
                "Step size must be in (0, 1], got {}",
                config.step_size
            )));
        }
        if config.tolerance <= 0.0 {
            return Err(InfomaxError::InvalidConfig(
                "Tolerance must be positive".to_string(),
            ));
        }

        // Xavier-style scaling: unit-normal entries over sqrt of the
        // mean layer dimension.
        let scale = 1.0 / ((inputs + outputs) as f64 / 2.0).sqrt();
        let w = Array2::<f64>::random((outputs, inputs), StandardNormal) * scale;
        let k = Array2::<f64>::zeros((outputs, outputs));

        Ok(Self {
            inputs,
            outputs,
            config,
            w,
            k,
        })
    }

    /// Input dimensionality (immutable after construction).
    pub fn inputs(&self) -> usize {
        self.inputs
    }

    /// Output dimensionality (immutable after construction).
    pub fn outputs(&self) -> usize {
        self.outputs
    }

    /// Validate an (inputs × n) batch.
    pub(crate) fn check_batch(&self, x: &Array2<f64>) -> InfomaxResult<()> {
        if x.nrows() != self.inputs {
            return Err(InfomaxError::ShapeMismatch(format!(
                "Input rows: expected {}, got {}",
                self.inputs,
                x.nrows()
            )));
        }
        if x.ncols() == 0 {
            return Err(InfomaxError::ShapeMismatch(
                "Input batch has no samples".to_string(),
            ));
        }
        Ok(())
    }

    /// Evaluate a batch of input columns.
    ///
    /// Returns the responses together with `g'` and `g''` at each
    /// sample's combined drive `W·x + K·s` (the learning rule needs
    /// both). Pure: depends only on `x`, `w`, `k`, and solver config.
    ///
    /// With `k` exactly zero the response is `g(W·x)` directly; the
    /// solver is only invoked per-sample when `k` is non-trivial.
    /// Solver non-convergence is never an error (see
    /// [`Evaluation::converged`]).
    ///
    /// # Errors
    /// `ShapeMismatch` if `x` is not (inputs × n) with `n >= 1`.
    pub fn evaluate(&self, x: &Array2<f64>) -> InfomaxResult<Evaluation> {
        self.check_batch(x)?;

        let (drive, converged) = if self.k.iter().all(|&v| v == 0.0) {
            (self.w.dot(x), true)
        } else {
            let mut drive = Array2::<f64>::zeros((self.outputs, x.ncols()));
            let mut all_converged = true;
            for (j, col) in x.axis_iter(Axis(1)).enumerate() {
                let h = self.w.dot(&col);
                let fp = self.solve_drive(&h);
                all_converged &= fp.converged;
                // Derivatives are taken at the combined drive, not at
                // the solver's internal argument.
                drive.column_mut(j).assign(&(&h + &self.k.dot(&fp.state)));
            }
            (drive, all_converged)
        };

        let output = logistic(&drive);
        let g_prime = logistic_deriv(&output);
        let g_double_prime = logistic_second_deriv(&output, &g_prime);

        Ok(Evaluation {
            output,
            g_prime,
            g_double_prime,
            converged,
        })
    }

    /// Solve `s = g(W·x + K·s)` for a single input vector.
    ///
    /// Damped Euler iteration: starting from `s = g(0)`, repeat
    /// `s ← α·g(h + K·s) + (1-α)·s` up to `max_iterations` times,
    /// stopping early once the max-norm gap between the undamped
    /// proposal and the damped state drops below tolerance. The last
    /// iterate is returned whether or not it converged.
    ///
    /// # Errors
    /// `ShapeMismatch` if `x` does not have `inputs` entries.
    pub fn fixed_point(&self, x: &Array1<f64>) -> InfomaxResult<FixedPoint> {
        if x.len() != self.inputs {
            return Err(InfomaxError::ShapeMismatch(format!(
                "Input length: expected {}, got {}",
                self.inputs,
                x.len()
            )));
        }
        Ok(self.solve_drive(&self.w.dot(x)))
    }

    /// Fixed-point iteration on a precomputed constant drive `h = W·x`.
    ///
    /// Fully deterministic given `h`, `k`, and config.
    fn solve_drive(&self, h: &Array1<f64>) -> FixedPoint {
        let alpha = self.config.step_size;
        // Initial condition: response to zero recurrent drive, g(0).
        let mut s = Array1::<f64>::from_elem(self.outputs, 0.5);

        for iter in 1..=self.config.max_iterations {
            let s1 = logistic(&(h + &self.k.dot(&s)));
            s = alpha * &s1 + (1.0 - alpha) * &s;

            let residual = (&s1 - &s)
                .iter()
                .fold(0.0_f64, |acc, v| acc.max(v.abs()));
            if residual < self.config.tolerance {
                return FixedPoint {
                    state: s,
                    converged: true,
                    iterations: iter,
                };
            }
        }

        FixedPoint {
            state: s,
            converged: false,
            iterations: self.config.max_iterations,
        }
    }
}
