//! Fitted-model records for the presentation layer.

use crate::core::{
    IntervalType, OptionsError, PredictionResult, RegressionOptions, RegressionResult,
};
use crate::data::Dataset;
use crate::diagnostics::{
    compute_leverage, cooks_distance, diagnostic_series, high_leverage_points, influential_cooks,
    residual_outliers, studentized_residuals, DiagnosticSeries,
};
use crate::inference::compute_prediction_intervals;
use crate::solvers::{check_feature_names, FittedRegressor, OlsRegressor, RegressionError, Regressor};
use faer::{Col, Mat};
use serde::{Deserialize, Serialize};

/// Estimate and inference for one model term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoefficientEstimate {
    pub term: String,
    #[serde(with = "crate::utils::serde_float")]
    pub estimate: f64,
    #[serde(with = "crate::utils::serde_float")]
    pub std_error: f64,
    #[serde(with = "crate::utils::serde_float")]
    pub t_statistic: f64,
    #[serde(with = "crate::utils::serde_float")]
    pub p_value: f64,
    #[serde(with = "crate::utils::serde_float")]
    pub conf_low: f64,
    #[serde(with = "crate::utils::serde_float")]
    pub conf_high: f64,
}

/// An OLS model with intercept fit on one training sample, together with its
/// test-set quality and per-observation diagnostics.
///
/// Per-observation vectors (`residuals` through `cooks_distance`) follow the
/// training row order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedModel {
    pub features: Vec<String>,
    pub intercept: CoefficientEstimate,
    /// One entry per feature, in `features` order.
    pub coefficients: Vec<CoefficientEstimate>,
    #[serde(with = "crate::utils::serde_float")]
    pub confidence_level: f64,

    pub n_train: usize,
    pub n_test: usize,

    /// Training R².
    #[serde(with = "crate::utils::serde_float")]
    pub r_squared: f64,
    /// Training adjusted R².
    #[serde(with = "crate::utils::serde_float")]
    pub adj_r_squared: f64,
    /// Residual standard error on the training rows.
    #[serde(with = "crate::utils::serde_float")]
    pub residual_std_error: f64,
    /// R² of the test-set predictions.
    #[serde(with = "crate::utils::serde_float")]
    pub test_r_squared: f64,
    /// Root mean squared error of the test-set predictions.
    #[serde(with = "crate::utils::serde_float")]
    pub test_rmse: f64,

    #[serde(with = "crate::utils::serde_float")]
    pub f_statistic: f64,
    #[serde(with = "crate::utils::serde_float")]
    pub f_pvalue: f64,
    #[serde(with = "crate::utils::serde_float")]
    pub log_likelihood: f64,
    #[serde(with = "crate::utils::serde_float")]
    pub aic: f64,
    #[serde(with = "crate::utils::serde_float")]
    pub bic: f64,

    #[serde(with = "crate::utils::serde_float::seq")]
    pub residuals: Vec<f64>,
    #[serde(with = "crate::utils::serde_float::seq")]
    pub fitted_values: Vec<f64>,
    #[serde(with = "crate::utils::serde_float::seq")]
    pub leverage: Vec<f64>,
    #[serde(with = "crate::utils::serde_float::seq")]
    pub studentized_residuals: Vec<f64>,
    #[serde(with = "crate::utils::serde_float::seq")]
    pub cooks_distance: Vec<f64>,

    #[serde(with = "crate::utils::serde_float")]
    mse: f64,
    residual_df: usize,
    /// (X_aug'X_aug)⁻¹ of the training design, row-major.
    #[serde(with = "crate::utils::serde_float::nested")]
    xtx_inverse: Vec<Vec<f64>>,
}

/// Fit OLS with intercept on the training rows and score it on the test rows.
///
/// The intercept and coefficient inference are always computed; from
/// `options` only the confidence level and rank tolerance are used. A
/// collinear or constant predictor fails with
/// [`RegressionError::SingularFeatures`]. An empty test set yields NaN test
/// metrics.
pub fn fit<S: AsRef<str>>(
    x_train: &Mat<f64>,
    y_train: &Col<f64>,
    x_test: &Mat<f64>,
    y_test: &Col<f64>,
    names: &[S],
    options: &RegressionOptions,
) -> Result<FittedModel, RegressionError> {
    check_feature_names(x_train, names)?;
    check_feature_names(x_test, names)?;
    if x_test.nrows() != y_test.nrows() {
        return Err(RegressionError::DimensionMismatch {
            x_rows: x_test.nrows(),
            y_len: y_test.nrows(),
        });
    }

    let options = RegressionOptions {
        with_intercept: true,
        compute_inference: true,
        allow_aliased: false,
        ..options.clone()
    };
    options.validate()?;

    let fitted = OlsRegressor::new(options.clone())
        .fit(x_train, y_train)
        .map_err(|e| e.with_feature_names(names))?;
    let result = fitted.result();

    let leverage = compute_leverage(x_train, true)?;
    let studentized = studentized_residuals(&result.residuals, &leverage, result.mse);
    let cooks = cooks_distance(&result.residuals, &leverage, result.mse, result.n_parameters);

    let xtx_inverse = fitted
        .xtx_inverse()
        .map(to_rows)
        .ok_or_else(|| RegressionError::NumericalError("training design is not invertible".into()))?;

    Ok(FittedModel {
        features: names.iter().map(|n| n.as_ref().to_string()).collect(),
        intercept: intercept_estimate(result),
        coefficients: coefficient_estimates(result, names),
        confidence_level: options.confidence_level,
        n_train: x_train.nrows(),
        n_test: x_test.nrows(),
        r_squared: result.r_squared,
        adj_r_squared: result.adj_r_squared,
        residual_std_error: result.rmse,
        test_r_squared: fitted.score(x_test, y_test),
        test_rmse: fitted.rmse(x_test, y_test),
        f_statistic: result.f_statistic,
        f_pvalue: result.f_pvalue,
        log_likelihood: result.log_likelihood,
        aic: result.aic,
        bic: result.bic,
        residuals: result.residuals.iter().copied().collect(),
        fitted_values: result.fitted_values.iter().copied().collect(),
        leverage: leverage.iter().copied().collect(),
        studentized_residuals: studentized.iter().copied().collect(),
        cooks_distance: cooks.iter().copied().collect(),
        mse: result.mse,
        residual_df: result.residual_df(),
        xtx_inverse,
    })
}

/// [`fit`] on named columns of a train and a test dataset.
pub fn fit_datasets<S: AsRef<str>>(
    train: &Dataset,
    test: &Dataset,
    features: &[S],
    response: &str,
    options: &RegressionOptions,
) -> Result<FittedModel, RegressionError> {
    let x_train = train.design_matrix(features)?;
    let y_train = train.vector(response)?;
    let x_test = test.design_matrix(features)?;
    let y_test = test.vector(response)?;
    fit(&x_train, &y_train, &x_test, &y_test, features, options)
}

/// The four diagnostic panels of a fitted model.
pub fn diagnostics(model: &FittedModel, span: f64, iterations: usize) -> DiagnosticSeries {
    diagnostic_series(
        &model.fitted_values,
        &model.residuals,
        &model.studentized_residuals,
        &model.leverage,
        span,
        iterations,
    )
}

impl FittedModel {
    /// Number of parameters including the intercept.
    pub fn n_parameters(&self) -> usize {
        self.features.len() + 1
    }

    pub fn coefficient(&self, feature: &str) -> Option<&CoefficientEstimate> {
        self.coefficients.iter().find(|c| c.term == feature)
    }

    /// Point predictions for rows with the model's feature columns.
    pub fn predict(&self, x: &Mat<f64>) -> Result<Col<f64>, RegressionError> {
        check_feature_names(x, &self.features)?;
        Ok(Col::from_fn(x.nrows(), |i| {
            self.coefficients
                .iter()
                .enumerate()
                .fold(self.intercept.estimate, |acc, (j, c)| acc + c.estimate * x[(i, j)])
        }))
    }

    /// Point predictions for a dataset holding the model's feature columns.
    pub fn predict_dataset(&self, dataset: &Dataset) -> Result<Col<f64>, RegressionError> {
        let x = dataset.design_matrix(&self.features)?;
        self.predict(&x)
    }

    /// Predictions with confidence or prediction intervals at `level`.
    pub fn predict_with_interval(
        &self,
        x: &Mat<f64>,
        interval: IntervalType,
        level: f64,
    ) -> Result<PredictionResult, RegressionError> {
        if !(level > 0.0 && level < 1.0) {
            return Err(OptionsError::InvalidConfidenceLevel(level).into());
        }
        let predictions = self.predict(x)?;

        let p = self.xtx_inverse.len();
        let xtx_inv = Mat::from_fn(p, p, |i, j| self.xtx_inverse[i][j]);

        Ok(compute_prediction_intervals(
            x,
            &xtx_inv,
            &predictions,
            self.mse,
            self.residual_df as f64,
            level,
            interval,
        ))
    }

    /// Training rows with leverage above 2p/n.
    pub fn high_leverage(&self) -> Vec<usize> {
        high_leverage_points(&to_col(&self.leverage), self.n_parameters(), None)
    }

    /// Training rows with Cook's distance above 4/n.
    pub fn influential(&self) -> Vec<usize> {
        influential_cooks(&to_col(&self.cooks_distance), None)
    }

    /// Training rows with |studentized residual| above `threshold`.
    pub fn outliers(&self, threshold: f64) -> Vec<usize> {
        residual_outliers(&to_col(&self.studentized_residuals), threshold)
    }
}

fn to_rows(m: &Mat<f64>) -> Vec<Vec<f64>> {
    (0..m.nrows())
        .map(|i| (0..m.ncols()).map(|j| m[(i, j)]).collect())
        .collect()
}

fn to_col(values: &[f64]) -> Col<f64> {
    Col::from_fn(values.len(), |i| values[i])
}

fn intercept_estimate(result: &RegressionResult) -> CoefficientEstimate {
    let (conf_low, conf_high) = result
        .intercept_conf_interval
        .unwrap_or((f64::NAN, f64::NAN));
    CoefficientEstimate {
        term: "Intercept".to_string(),
        estimate: result.intercept.unwrap_or(f64::NAN),
        std_error: result.intercept_std_error.unwrap_or(f64::NAN),
        t_statistic: result.intercept_t_statistic.unwrap_or(f64::NAN),
        p_value: result.intercept_p_value.unwrap_or(f64::NAN),
        conf_low,
        conf_high,
    }
}

fn coefficient_estimates<S: AsRef<str>>(
    result: &RegressionResult,
    names: &[S],
) -> Vec<CoefficientEstimate> {
    let pick = |values: &Option<Col<f64>>, j: usize| values.as_ref().map_or(f64::NAN, |v| v[j]);

    names
        .iter()
        .enumerate()
        .map(|(j, name)| CoefficientEstimate {
            term: name.as_ref().to_string(),
            estimate: result.coefficients[j],
            std_error: pick(&result.std_errors, j),
            t_statistic: pick(&result.t_statistics, j),
            p_value: pick(&result.p_values, j),
            conf_low: pick(&result.conf_interval_lower, j),
            conf_high: pick(&result.conf_interval_upper, j),
        })
        .collect()
}
