//! Interval estimates for new observations.

use super::coefficient::t_critical;
use crate::core::{IntervalType, PredictionResult};
use crate::utils::with_intercept_column;
use faer::{Col, Mat};

/// Confidence or prediction intervals for the rows of `x_new`.
///
/// `xtx_inv` is (X_aug'X_aug)⁻¹ of the training design with the intercept
/// column first; each new row is augmented with a leading 1 before the
/// quadratic form x₀'(X'X)⁻¹x₀ is evaluated.
pub fn compute_prediction_intervals(
    x_new: &Mat<f64>,
    xtx_inv: &Mat<f64>,
    predictions: &Col<f64>,
    mse: f64,
    df: f64,
    confidence_level: f64,
    interval_type: IntervalType,
) -> PredictionResult {
    let n_new = x_new.nrows();

    if df <= 0.0 || !(mse >= 0.0) {
        let nan = Col::from_fn(n_new, |_| f64::NAN);
        return PredictionResult::with_intervals(predictions.clone(), nan.clone(), nan.clone(), nan);
    }

    let t_crit = t_critical(df, confidence_level);
    let x_aug = with_intercept_column(x_new);

    let se = Col::from_fn(n_new, |i| {
        let h = quadratic_form_row(&x_aug, i, xtx_inv);
        let var = match interval_type {
            IntervalType::Confidence => mse * h,
            IntervalType::Prediction => mse * (1.0 + h),
        };
        if var >= 0.0 {
            var.sqrt()
        } else {
            f64::NAN
        }
    });

    let lower = Col::from_fn(n_new, |i| predictions[i] - t_crit * se[i]);
    let upper = Col::from_fn(n_new, |i| predictions[i] + t_crit * se[i]);

    PredictionResult::with_intervals(predictions.clone(), lower, upper, se)
}

/// x_i' A x_i for row `i` of `x`.
pub(crate) fn quadratic_form_row(x: &Mat<f64>, i: usize, a: &Mat<f64>) -> f64 {
    let p = x.ncols();
    let mut h = 0.0;
    for r in 0..p {
        let mut ax = 0.0;
        for c in 0..p {
            ax += a[(r, c)] * x[(i, c)];
        }
        h += x[(i, r)] * ax;
    }
    h
}

/// (X_aug'X_aug)⁻¹ for the augmented design `[1 | X]`.
pub fn compute_xtx_inverse_augmented(x: &Mat<f64>) -> Result<Mat<f64>, &'static str> {
    let x_aug = with_intercept_column(x);
    let xtx_aug = x_aug.transpose() * &x_aug;
    compute_matrix_inverse(&xtx_aug)
}

/// (X'X)⁻¹ for a design without intercept column.
pub fn compute_xtx_inverse(x: &Mat<f64>) -> Result<Mat<f64>, &'static str> {
    let xtx = x.transpose() * x;
    compute_matrix_inverse(&xtx)
}

/// Inverse of a square matrix through QR and column-wise back-substitution.
///
/// Fails when a diagonal entry of R is negligible next to the largest one.
pub(crate) fn compute_matrix_inverse(matrix: &Mat<f64>) -> Result<Mat<f64>, &'static str> {
    let n = matrix.nrows();
    if n == 0 {
        return Err("Matrix is empty");
    }

    let qr = matrix.qr();
    let q = qr.compute_Q();
    let r = qr.R();

    let scale = (0..n).map(|i| r[(i, i)].abs()).fold(0.0, f64::max);
    if !(scale > 0.0) || (0..n).any(|i| r[(i, i)].abs() <= 1e-12 * scale) {
        return Err("Matrix is singular");
    }

    let qt = q.transpose();
    let mut inv = Mat::zeros(n, n);
    for col in 0..n {
        for i in (0..n).rev() {
            let mut sum = qt[(i, col)];
            for j in (i + 1)..n {
                sum -= r[(i, j)] * inv[(j, col)];
            }
            inv[(i, col)] = sum / r[(i, i)];
        }
    }

    Ok(inv)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quadratic_form_row() {
        let x = Mat::from_fn(1, 2, |_, j| (j + 1) as f64);
        let identity = Mat::from_fn(2, 2, |i, j| if i == j { 1.0 } else { 0.0 });

        // ||x₀||² = 1² + 2²
        assert!((quadratic_form_row(&x, 0, &identity) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_matrix_inverse() {
        let m = Mat::from_fn(2, 2, |i, j| match (i, j) {
            (0, 0) => 4.0,
            (0, 1) | (1, 0) => 2.0,
            _ => 3.0,
        });
        let inv = compute_matrix_inverse(&m).expect("invertible");
        let prod = &m * &inv;
        for i in 0..2 {
            for j in 0..2 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((prod[(i, j)] - expected).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn test_singular_matrix_is_rejected() {
        let m = Mat::from_fn(2, 2, |_, _| 1.0);
        assert!(compute_matrix_inverse(&m).is_err());
    }

    #[test]
    fn test_prediction_interval_wider_than_confidence() {
        let x = Mat::from_fn(6, 1, |i, _| i as f64);
        let xtx_inv = compute_xtx_inverse_augmented(&x).expect("invertible");
        let x_new = Mat::from_fn(3, 1, |i, _| i as f64 + 0.5);
        let predictions = Col::from_fn(3, |i| i as f64);

        let ci = compute_prediction_intervals(
            &x_new,
            &xtx_inv,
            &predictions,
            1.0,
            4.0,
            0.95,
            IntervalType::Confidence,
        );
        let pi = compute_prediction_intervals(
            &x_new,
            &xtx_inv,
            &predictions,
            1.0,
            4.0,
            0.95,
            IntervalType::Prediction,
        );

        for i in 0..3 {
            let ci_width = ci.upper[i] - ci.lower[i];
            let pi_width = pi.upper[i] - pi.lower[i];
            assert!(pi_width > ci_width);
            assert!(ci.lower[i] < predictions[i] && predictions[i] < ci.upper[i]);
        }
    }

    #[test]
    fn test_intervals_without_residual_df_are_nan() {
        let x_new = Mat::from_fn(2, 1, |i, _| i as f64);
        let xtx_inv = Mat::from_fn(2, 2, |i, j| if i == j { 1.0 } else { 0.0 });
        let predictions = Col::from_fn(2, |i| i as f64);

        let res = compute_prediction_intervals(
            &x_new,
            &xtx_inv,
            &predictions,
            1.0,
            0.0,
            0.95,
            IntervalType::Prediction,
        );
        assert!(res.lower.iter().all(|v| v.is_nan()));
        assert_eq!(res.fit[1], 1.0);
    }
}
