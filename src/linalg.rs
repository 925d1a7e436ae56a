//! Dense inversion and determinant helpers.
//!
//! Network state lives in `ndarray`, which has no LU factorization of
//! its own. The learning rule and cost estimator invert small
//! per-sample matrices, so those are bridged through `nalgebra`'s
//! `DMatrix` for `try_inverse` and `determinant`.

use nalgebra::DMatrix;
use ndarray::Array2;

fn to_dmatrix(a: &Array2<f64>) -> DMatrix<f64> {
    // ndarray iterates in logical (row-major) order; DMatrix stores
    // column-major, hence from_row_iterator.
    DMatrix::from_row_iterator(a.nrows(), a.ncols(), a.iter().copied())
}

/// Invert a square matrix via LU. Returns `None` when singular.
pub fn invert(a: &Array2<f64>) -> Option<Array2<f64>> {
    debug_assert_eq!(a.nrows(), a.ncols());
    let inv = to_dmatrix(a).try_inverse()?;
    Some(Array2::from_shape_fn(a.dim(), |(i, j)| inv[(i, j)]))
}

/// Determinant of a square matrix.
pub fn determinant(a: &Array2<f64>) -> f64 {
    debug_assert_eq!(a.nrows(), a.ncols());
    to_dmatrix(a).determinant()
}
