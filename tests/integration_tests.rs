//! Integration tests for infomax network training.
//!
//! These tests verify end-to-end behavior:
//! - Construction invariants and the worked 2->3 evaluation example
//! - Feedforward/recurrent evaluation semantics
//! - Weight-update accounting and the zero-diagonal invariant
//! - Cost behavior under training

use approx::assert_abs_diff_eq;
use infomax::{Network, NetworkConfig};
use ndarray::{array, Array2};

/// Deterministic 2-input / 3-output network with hand-set weights.
fn small_net(config: NetworkConfig) -> Network {
    let mut net = Network::with_config(2, 3, config).unwrap();
    net.w = array![[1.0, 0.1], [0.2, 1.0], [0.5, 0.5]];
    net
}

#[test]
fn test_construction_contract() {
    // Every undercomplete pair is rejected.
    for (inputs, outputs) in [(2, 1), (4, 3), (7, 2)] {
        assert!(Network::new(inputs, outputs).is_err());
    }

    // Overcomplete and square succeed with the right shapes.
    let net = Network::new(3, 6).unwrap();
    assert_eq!(net.w.dim(), (6, 3));
    assert_eq!(net.k.dim(), (6, 6));
    assert!(net.k.iter().all(|&v| v == 0.0));
}

#[test]
fn test_worked_example_2_to_3() {
    // W = [[1,0],[0,1],[0.70711,0.70711]], x = (1,0):
    // output = sigmoid([1, 0, 0.70711]) ≈ [0.7311, 0.5000, 0.6698]
    let mut net = Network::new(2, 3).unwrap();
    net.w = array![[1.0, 0.0], [0.0, 1.0], [0.70711, 0.70711]];

    let x = array![[1.0], [0.0]];
    let eval = net.evaluate(&x).unwrap();

    assert_abs_diff_eq!(eval.output[(0, 0)], 0.7311, epsilon = 1e-4);
    assert_abs_diff_eq!(eval.output[(1, 0)], 0.5000, epsilon = 1e-4);
    assert_abs_diff_eq!(eval.output[(2, 0)], 0.6698, epsilon = 1e-4);
}

#[test]
fn test_feedforward_path_is_exact_and_pure() {
    let net = small_net(NetworkConfig::default());
    let x = array![[0.4, -0.7, 0.1], [-0.2, 0.5, 0.8]];

    let eval = net.evaluate(&x).unwrap();
    assert!(eval.converged);

    // k == 0: output is exactly g(W·x).
    let drive = net.w.dot(&x);
    for i in 0..3 {
        for j in 0..3 {
            let expected = 1.0 / (1.0 + (-drive[(i, j)]).exp());
            assert_eq!(eval.output[(i, j)], expected);
        }
    }

    // Pure function of (w, k, x): repeated calls are bitwise identical.
    let again = net.evaluate(&x).unwrap();
    assert_eq!(eval.output, again.output);
}

#[test]
fn test_solver_converges_in_one_iteration_for_zero_k() {
    let config = NetworkConfig {
        step_size: 1.0,
        ..NetworkConfig::default()
    };
    let net = small_net(config);

    let x = array![0.9, -0.3];
    let fp = net.fixed_point(&x).unwrap();
    assert!(fp.converged);
    assert_eq!(fp.iterations, 1);

    let drive = net.w.dot(&x);
    for i in 0..3 {
        let expected = 1.0 / (1.0 + (-drive[i]).exp());
        assert_abs_diff_eq!(fp.state[i], expected, epsilon = 1e-15);
    }
}

#[test]
fn test_diagonal_stays_zero_across_recurrent_training() {
    let config = NetworkConfig {
        learn_rec: true,
        learning_rate: 0.05,
        ..NetworkConfig::default()
    };
    let mut net = small_net(config);
    // Arbitrary prior k, dirty diagonal included.
    net.k = array![
        [0.2, 0.1, -0.1],
        [0.1, -0.3, 0.05],
        [-0.05, 0.1, 0.4]
    ];

    let x = array![[0.4, -0.7, 0.1, 0.9], [-0.2, 0.5, 0.8, -0.6]];
    for _ in 0..5 {
        net.learn(&x).unwrap();
        for i in 0..3 {
            assert_eq!(net.k[(i, i)], 0.0);
        }
    }
}

#[test]
fn test_learn_flags_gate_updates() {
    let x = array![[0.4, -0.7], [-0.2, 0.5]];

    // Both off: exact no-op.
    let mut frozen = small_net(NetworkConfig {
        learn_ff: false,
        learn_rec: false,
        ..NetworkConfig::default()
    });
    let (w0, k0) = (frozen.w.clone(), frozen.k.clone());
    frozen.learn(&x).unwrap();
    assert_eq!(frozen.w, w0);
    assert_eq!(frozen.k, k0);

    // Feedforward only: w moves, k does not.
    let mut ff_only = small_net(NetworkConfig::default());
    let k0 = ff_only.k.clone();
    ff_only.learn(&x).unwrap();
    assert_ne!(ff_only.w, array![[1.0, 0.1], [0.2, 1.0], [0.5, 0.5]]);
    assert_eq!(ff_only.k, k0);
}

#[test]
fn test_update_magnitude_scales_with_learning_rate() {
    // The batch delta does not depend on eta, so doubling the rate
    // must exactly double the applied update.
    let x = array![[0.4, -0.7, 0.1], [-0.2, 0.5, 0.8]];
    let w0 = array![[1.0, 0.1], [0.2, 1.0], [0.5, 0.5]];

    let mut a = small_net(NetworkConfig::default());
    let mut b = small_net(NetworkConfig {
        learning_rate: 0.02,
        ..NetworkConfig::default()
    });

    a.learn(&x).unwrap();
    b.learn(&x).unwrap();

    let da = &a.w - &w0;
    let db = &b.w - &w0;
    for i in 0..3 {
        for j in 0..2 {
            assert_abs_diff_eq!(db[(i, j)], 2.0 * da[(i, j)], epsilon = 1e-12);
        }
    }
}

#[test]
fn test_cost_is_deterministic_and_finite() {
    let net = small_net(NetworkConfig::default());
    let x = array![[0.4, -0.7, 0.1, 0.9], [-0.2, 0.5, 0.8, -0.6]];

    let c1 = net.cost(&x).unwrap();
    let c2 = net.cost(&x).unwrap();
    assert!(c1.is_finite());
    assert_eq!(c1, c2);
}

#[test]
fn test_training_reduces_cost_on_fixed_batch() {
    // Small-step gradient ascent on the log-det objective must lower
    // its negated proxy on the batch it is trained on.
    let config = NetworkConfig {
        learning_rate: 0.005,
        ..NetworkConfig::default()
    };
    let mut net = small_net(config);

    let x = array![
        [0.4, -0.7, 0.1, 0.9, -0.5, 0.3],
        [-0.2, 0.5, 0.8, -0.6, 0.7, -0.9]
    ];

    let initial = net.cost(&x).unwrap();
    for _ in 0..200 {
        net.learn(&x).unwrap();
    }
    let trained = net.cost(&x).unwrap();

    assert!(
        trained < initial,
        "cost should fall under training (initial: {}, trained: {})",
        initial,
        trained
    );
}

#[test]
fn test_recurrent_training_end_to_end() {
    let config = NetworkConfig {
        learn_rec: true,
        learning_rate: 0.002,
        ..NetworkConfig::default()
    };
    let mut net = small_net(config);

    let x = array![
        [0.4, -0.7, 0.1, 0.9, -0.5, 0.3],
        [-0.2, 0.5, 0.8, -0.6, 0.7, -0.9]
    ];

    for _ in 0..50 {
        net.learn(&x).unwrap();
    }

    // Lateral weights developed off-diagonal structure under a hard
    // zero diagonal.
    assert!(net.k.iter().any(|&v| v != 0.0));
    for i in 0..3 {
        assert_eq!(net.k[(i, i)], 0.0);
    }

    // The recurrent solver still settles on a self-consistent state.
    let fp = net.fixed_point(&array![0.4, -0.2]).unwrap();
    assert!(fp.converged);
    let eval = net.evaluate(&x).unwrap();
    assert!(eval.converged);
    assert!(net.cost(&x).unwrap().is_finite());
}

#[test]
fn test_shape_errors_surface_to_caller() {
    let mut net = small_net(NetworkConfig::default());
    let wrong = array![[1.0], [2.0], [3.0]];
    assert!(net.evaluate(&wrong).is_err());
    assert!(net.learn(&wrong).is_err());
    assert!(net.cost(&wrong).is_err());

    let empty = Array2::<f64>::zeros((2, 0));
    assert!(net.evaluate(&empty).is_err());
}
