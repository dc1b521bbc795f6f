//! Variance Inflation Factor (VIF) for multicollinearity detection.

use crate::core::RegressionOptions;
use crate::data::Dataset;
use crate::solvers::{check_feature_names, FittedRegressor, OlsRegressor, RegressionError, Regressor};
use crate::utils::{column, drop_column};
use faer::{Col, Mat};
use serde::{Deserialize, Serialize};

/// VIF of one predictor within a predictor set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VifEntry {
    pub feature: String,
    #[serde(with = "crate::utils::serde_float")]
    pub vif: f64,
}

/// Variance Inflation Factor for each predictor column.
///
/// VIF_j = 1 / (1 - R²_j), where R²_j is the uncentered R² of regressing
/// x_j on all other predictors without an intercept. Columns far from zero
/// therefore inflate each other even when their deviations are unrelated.
///
/// # Special cases
/// - A single predictor has no other predictors to explain it: NaN.
/// - An exactly collinear predictor has R²_j = 1: infinity.
/// - An all-zero column has no defined R²_j: NaN.
pub fn variance_inflation_factor(x: &Mat<f64>) -> Col<f64> {
    let n = x.nrows();
    let p = x.ncols();

    if p < 2 || n < 2 {
        return Col::from_fn(p, |_| f64::NAN);
    }

    let auxiliary = OlsRegressor::new(RegressionOptions::auxiliary());

    Col::from_fn(p, |j| {
        let x_other = drop_column(x, j);
        let y_j = column(x, j);

        match auxiliary.fit(&x_other, &y_j) {
            Ok(fitted) => {
                let total: f64 = y_j.iter().map(|v| v * v).sum();
                let sse: f64 = fitted.result().residuals.iter().map(|r| r * r).sum();
                if total == 0.0 {
                    return f64::NAN;
                }
                let r_squared = 1.0 - sse / total;
                if r_squared < 1.0 - 1e-14 {
                    1.0 / (1.0 - r_squared)
                } else {
                    f64::INFINITY
                }
            }
            Err(_) => f64::NAN,
        }
    })
}

/// Mean VIF across predictors; NaN as soon as any VIF is NaN.
pub fn mean_vif(vif: &Col<f64>) -> f64 {
    let p = vif.nrows();
    if p == 0 {
        return f64::NAN;
    }
    vif.iter().sum::<f64>() / p as f64
}

/// Per-feature VIF for the named dataset columns.
pub fn vif_table<S: AsRef<str>>(
    dataset: &Dataset,
    columns: &[S],
) -> Result<Vec<VifEntry>, RegressionError> {
    let x = dataset.design_matrix(columns)?;
    check_feature_names(&x, columns)?;
    let vif = variance_inflation_factor(&x);

    Ok(columns
        .iter()
        .zip(vif.iter())
        .map(|(name, &v)| VifEntry {
            feature: name.as_ref().to_string(),
            vif: v,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orthogonal_predictors() {
        // Balanced ±1 design with orthogonal columns.
        let x = Mat::from_fn(8, 2, |i, j| {
            let bit = (i >> j) & 1;
            if bit == 1 {
                1.0
            } else {
                -1.0
            }
        });
        let vif = variance_inflation_factor(&x);

        assert!((vif[0] - 1.0).abs() < 1e-10);
        assert!((vif[1] - 1.0).abs() < 1e-10);
        assert!((mean_vif(&vif) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_correlated_predictors() {
        let x = Mat::from_fn(20, 2, |i, j| {
            let t = i as f64;
            if j == 0 {
                t
            } else {
                t + ((i * 7) % 5) as f64
            }
        });
        let vif = variance_inflation_factor(&x);

        assert!(vif[0] > 1.5);
        assert!((vif[0] - vif[1]).abs() < 1e-8);
    }

    #[test]
    fn test_large_means_inflate_each_other() {
        // Deviations are nearly unrelated; the shared offset is not.
        let x = Mat::from_fn(40, 2, |i, j| {
            let t = i as f64;
            if j == 0 {
                70.0 + (t * 1.3).sin()
            } else {
                180.0 + 10.0 * (t * 0.7).cos()
            }
        });
        let vif = variance_inflation_factor(&x);

        let dot: f64 = (0..40).map(|i| x[(i, 0)] * x[(i, 1)]).sum();
        let ss0: f64 = (0..40).map(|i| x[(i, 0)].powi(2)).sum();
        let ss1: f64 = (0..40).map(|i| x[(i, 1)].powi(2)).sum();
        let expected = 1.0 / (1.0 - dot * dot / (ss0 * ss1));

        assert!(vif[0] > 100.0);
        assert!((vif[0] - expected).abs() < 1e-6 * expected);
        assert!((vif[1] - expected).abs() < 1e-6 * expected);
    }

    #[test]
    fn test_zero_column_is_nan() {
        let x = Mat::from_fn(10, 2, |i, j| if j == 0 { 0.0 } else { i as f64 });
        let vif = variance_inflation_factor(&x);
        assert!(vif[0].is_nan());
    }

    #[test]
    fn test_single_predictor_is_nan() {
        let x = Mat::from_fn(10, 1, |i, _| i as f64);
        let vif = variance_inflation_factor(&x);
        assert!(vif[0].is_nan());
        assert!(mean_vif(&vif).is_nan());
    }

    #[test]
    fn test_exact_collinearity_is_infinite() {
        let x = Mat::from_fn(10, 3, |i, j| match j {
            0 => i as f64,
            1 => ((i * 3) % 7) as f64,
            _ => 2.0 * i as f64 + ((i * 3) % 7) as f64,
        });
        let vif = variance_inflation_factor(&x);
        assert!(vif.iter().all(|v| v.is_infinite()));
    }
}
