//! Leverage (hat matrix diagonal).

use crate::inference::{compute_xtx_inverse, compute_xtx_inverse_augmented, quadratic_form_row};
use crate::solvers::RegressionError;
use crate::utils::with_intercept_column;
use faer::{Col, Mat};

/// Leverage values, the diagonal of H = X(X'X)⁻¹X'.
///
/// `x` holds the predictors only; with `with_intercept` a column of ones is
/// prepended before the projection is formed.
///
/// # Properties
/// - h_ii ∈ [0, 1]
/// - Σ h_ii = p (number of parameters)
pub fn compute_leverage(x: &Mat<f64>, with_intercept: bool) -> Result<Col<f64>, RegressionError> {
    let (design, xtx_inv) = if with_intercept {
        (with_intercept_column(x), compute_xtx_inverse_augmented(x))
    } else {
        (x.clone(), compute_xtx_inverse(x))
    };
    let xtx_inv = xtx_inv.map_err(|e| RegressionError::NumericalError(e.to_string()))?;

    Ok(Col::from_fn(design.nrows(), |i| {
        quadratic_form_row(&design, i, &xtx_inv).clamp(0.0, 1.0)
    }))
}

/// Indices with leverage above `threshold`, by default 2p/n.
pub fn high_leverage_points(leverage: &Col<f64>, n_params: usize, threshold: Option<f64>) -> Vec<usize> {
    let n = leverage.nrows();
    let cutoff = threshold.unwrap_or(2.0 * n_params as f64 / n as f64);

    leverage
        .iter()
        .enumerate()
        .filter(|(_, &h)| h > cutoff)
        .map(|(i, _)| i)
        .collect()
}
