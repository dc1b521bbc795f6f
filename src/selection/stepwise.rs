//! Partial F-test screening of predictors with Holm's step-down correction.

use crate::core::{OptionsError, RegressionOptions};
use crate::inference::partial_f_test;
use crate::solvers::{check_feature_names, FittedRegressor, OlsRegressor, RegressionError, Regressor};
use crate::utils::drop_column;
use faer::{Col, Mat};
use serde::{Deserialize, Serialize};

/// One row of the Holm table, in ascending p-value order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignificanceResult {
    pub feature: String,
    /// p-value of the partial F-test for dropping this feature.
    #[serde(with = "crate::utils::serde_float")]
    pub p_value: f64,
    /// Holm threshold alpha / (m - i) at this rank.
    #[serde(with = "crate::utils::serde_float")]
    pub threshold: f64,
    /// Accepted by the step-down procedure.
    pub significant: bool,
}

/// Select predictors whose removal significantly worsens the full fit.
///
/// Each predictor is tested by a partial F-test of the full model against
/// the model without it. The p-values are sorted ascending and walked with
/// Holm thresholds `alpha / (m - i)`; acceptance stops at the first p-value
/// above its threshold.
///
/// Returns the accepted features in p-value order and the full sorted table.
pub fn significant_features<S: AsRef<str>>(
    x: &Mat<f64>,
    y: &Col<f64>,
    names: &[S],
    alpha: f64,
) -> Result<(Vec<String>, Vec<SignificanceResult>), RegressionError> {
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(OptionsError::InvalidSignificanceLevel(alpha).into());
    }
    check_feature_names(x, names)?;

    let regressor = OlsRegressor::new(RegressionOptions {
        compute_inference: false,
        ..Default::default()
    });

    let full = regressor
        .fit(x, y)
        .map_err(|e| e.with_feature_names(names))?;

    let mut tests: Vec<(String, f64)> = Vec::with_capacity(x.ncols());
    for (j, name) in names.iter().enumerate() {
        let reduced = regressor.fit(&drop_column(x, j), y)?;
        let test = partial_f_test(full.result(), reduced.result());
        tests.push((name.as_ref().to_string(), test.p_value));
    }

    tests.sort_by(|a, b| a.1.total_cmp(&b.1));
    let table = holm_step_down(tests, alpha);
    let accepted = table
        .iter()
        .filter(|r| r.significant)
        .map(|r| r.feature.clone())
        .collect();

    Ok((accepted, table))
}

/// Apply Holm's procedure to `(feature, p_value)` pairs sorted ascending.
pub fn holm_step_down(sorted: Vec<(String, f64)>, alpha: f64) -> Vec<SignificanceResult> {
    let m = sorted.len();
    let mut rejecting = true;

    sorted
        .into_iter()
        .enumerate()
        .map(|(i, (feature, p_value))| {
            let threshold = alpha / (m - i) as f64;
            rejecting = rejecting && p_value <= threshold;
            SignificanceResult {
                feature,
                p_value,
                threshold,
                significant: rejecting,
            }
        })
        .collect()
}
