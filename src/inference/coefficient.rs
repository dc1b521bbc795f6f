//! Coefficient inference calculations.

use super::prediction::{compute_matrix_inverse, compute_xtx_inverse_augmented};
use faer::{Col, Mat};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Computes inference statistics for regression coefficients.
pub struct CoefficientInference;

impl CoefficientInference {
    /// Standard errors for a model without intercept.
    ///
    /// SE(β_j) = sqrt(σ² * (X'X)⁻¹_jj)
    pub fn standard_errors(x: &Mat<f64>, mse: f64) -> Result<Col<f64>, &'static str> {
        let xtx = x.transpose() * x;
        let xtx_inv = compute_matrix_inverse(&xtx)?;
        Ok(Col::from_fn(x.ncols(), |j| variance_to_se(mse * xtx_inv[(j, j)])))
    }

    /// Standard errors for the slopes and the intercept of a model with
    /// intercept, from the augmented design `[1 | X]`.
    ///
    /// Returns `(coefficient_se, intercept_se)`.
    pub fn standard_errors_with_intercept(
        x: &Mat<f64>,
        mse: f64,
    ) -> Result<(Col<f64>, f64), &'static str> {
        let xtx_aug_inv = compute_xtx_inverse_augmented(x)?;

        let se_intercept = variance_to_se(mse * xtx_aug_inv[(0, 0)]);
        let se_coef = Col::from_fn(x.ncols(), |j| {
            variance_to_se(mse * xtx_aug_inv[(j + 1, j + 1)])
        });

        Ok((se_coef, se_intercept))
    }

    /// t_j = β_j / SE(β_j)
    pub fn t_statistics(coefficients: &Col<f64>, std_errors: &Col<f64>) -> Col<f64> {
        Col::from_fn(coefficients.nrows(), |j| {
            let se = std_errors[j];
            if se.is_nan() || se == 0.0 {
                f64::NAN
            } else {
                coefficients[j] / se
            }
        })
    }

    /// Two-sided p-values, p_j = 2 * P(T > |t_j|) with T ~ t(df).
    pub fn p_values(t_statistics: &Col<f64>, df: f64) -> Col<f64> {
        let t_dist = student_t(df);
        Col::from_fn(t_statistics.nrows(), |j| {
            let t = t_statistics[j];
            match &t_dist {
                Some(dist) if !t.is_nan() => 2.0 * (1.0 - dist.cdf(t.abs())),
                _ => f64::NAN,
            }
        })
    }

    /// CI_j = β_j ± t_{α/2, df} * SE(β_j)
    pub fn confidence_intervals(
        coefficients: &Col<f64>,
        std_errors: &Col<f64>,
        df: f64,
        confidence_level: f64,
    ) -> (Col<f64>, Col<f64>) {
        let n = coefficients.nrows();
        let t_crit = t_critical(df, confidence_level);

        let margin = Col::from_fn(n, |j| t_crit * std_errors[j]);
        let lower = Col::from_fn(n, |j| coefficients[j] - margin[j]);
        let upper = Col::from_fn(n, |j| coefficients[j] + margin[j]);
        (lower, upper)
    }
}

/// Two-sided critical value of Student's t, NaN when `df` is not positive.
pub fn t_critical(df: f64, confidence_level: f64) -> f64 {
    let alpha = 1.0 - confidence_level;
    student_t(df).map_or(f64::NAN, |d| d.inverse_cdf(1.0 - alpha / 2.0))
}

fn student_t(df: f64) -> Option<StudentsT> {
    if df > 0.0 {
        StudentsT::new(0.0, 1.0, df).ok()
    } else {
        None
    }
}

fn variance_to_se(var: f64) -> f64 {
    if var >= 0.0 {
        var.sqrt()
    } else {
        f64::NAN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_t_statistics() {
        let coefficients = Col::from_fn(3, |i| (i + 1) as f64);
        let std_errors = Col::from_fn(3, |i| if i == 2 { 0.0 } else { 0.5 });

        let t_stats = CoefficientInference::t_statistics(&coefficients, &std_errors);

        assert!((t_stats[0] - 2.0).abs() < 1e-10);
        assert!((t_stats[1] - 4.0).abs() < 1e-10);
        assert!(t_stats[2].is_nan());
    }

    #[test]
    fn test_p_values_bounds() {
        let t_stats = Col::from_fn(3, |i| (i + 1) as f64);
        let p_vals = CoefficientInference::p_values(&t_stats, 10.0);

        for p in p_vals.iter() {
            assert!(*p >= 0.0 && *p <= 1.0);
        }
        assert!(p_vals[0] > p_vals[1] && p_vals[1] > p_vals[2]);
    }

    #[test]
    fn test_p_values_without_residual_df() {
        let t_stats = Col::from_fn(2, |_| 3.0);
        let p_vals = CoefficientInference::p_values(&t_stats, 0.0);
        assert!(p_vals.iter().all(|p| p.is_nan()));
    }

    #[test]
    fn test_t_critical_large_df_approaches_normal() {
        let t = t_critical(1e6, 0.95);
        assert!((t - 1.959964).abs() < 1e-3);
    }

    #[test]
    fn test_intercept_standard_errors() {
        // y = a + b x with x = 0..4 and σ² = 1:
        // Var(b) = 1 / Sxx = 1/10, Var(a) = 1/n + x̄²/Sxx = 0.2 + 0.4
        let x = Mat::from_fn(5, 1, |i, _| i as f64);
        let (se, se_int) =
            CoefficientInference::standard_errors_with_intercept(&x, 1.0).expect("invertible");

        assert!((se[0] - 0.1f64.sqrt()).abs() < 1e-10);
        assert!((se_int - 0.6f64.sqrt()).abs() < 1e-10);
    }
}
