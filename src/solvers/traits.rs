//! Core traits for regression estimators.

use crate::core::{IntervalType, OptionsError, PredictionResult, RegressionResult};
use crate::data::DataError;
use faer::{Col, Mat};
use std::collections::HashSet;
use thiserror::Error;

/// Errors that can occur during regression fitting and model selection.
#[derive(Debug, Error)]
pub enum RegressionError {
    #[error("dimension mismatch: X has {x_rows} rows but y has {y_len} elements")]
    DimensionMismatch { x_rows: usize, y_len: usize },

    #[error("{names} feature name(s) given for {columns} design column(s)")]
    FeatureNameMismatch { columns: usize, names: usize },

    #[error("insufficient observations: need at least {needed}, got {got}")]
    InsufficientObservations { needed: usize, got: usize },

    #[error("singular design matrix: predictor column(s) {columns:?} are collinear or constant")]
    SingularDesign { columns: Vec<usize> },

    #[error("singular design matrix: feature(s) {} are collinear or constant", .features.join(", "))]
    SingularFeatures { features: Vec<String> },

    #[error("feature set is empty")]
    EmptyFeatureSet,

    #[error("exhaustive search over {got} candidates exceeds the limit of {limit}")]
    TooManyCandidates { got: usize, limit: usize },

    #[error("feature `{0}` is listed more than once")]
    DuplicateFeature(String),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error("invalid options: {0}")]
    InvalidOptions(#[from] OptionsError),

    #[error("numerical error: {0}")]
    NumericalError(String),
}

impl RegressionError {
    /// Replace column indices in a singular-design error with feature names.
    pub fn with_feature_names<S: AsRef<str>>(self, names: &[S]) -> Self {
        match self {
            RegressionError::SingularDesign { columns } => RegressionError::SingularFeatures {
                features: columns
                    .iter()
                    .map(|&j| {
                        names
                            .get(j)
                            .map_or_else(|| format!("column {j}"), |n| n.as_ref().to_string())
                    })
                    .collect(),
            },
            other => other,
        }
    }
}

/// Check that `names` gives one distinct name per column of `x`.
pub(crate) fn check_feature_names<S: AsRef<str>>(
    x: &Mat<f64>,
    names: &[S],
) -> Result<(), RegressionError> {
    if names.len() != x.ncols() {
        return Err(RegressionError::FeatureNameMismatch {
            columns: x.ncols(),
            names: names.len(),
        });
    }
    if names.is_empty() {
        return Err(RegressionError::EmptyFeatureSet);
    }
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name.as_ref()) {
            return Err(RegressionError::DuplicateFeature(name.as_ref().to_string()));
        }
    }
    Ok(())
}

/// A regression estimator that can be fit to data.
///
/// Fitting returns a separate fitted model that can then make predictions.
pub trait Regressor {
    /// The type of the fitted model.
    type Fitted: FittedRegressor;

    /// Fit the model to the data.
    ///
    /// # Arguments
    /// * `x` - Design matrix of shape (n_samples, n_features), without intercept column
    /// * `y` - Target vector of length n_samples
    fn fit(&self, x: &Mat<f64>, y: &Col<f64>) -> Result<Self::Fitted, RegressionError>;
}

/// A fitted regression model that can make predictions.
pub trait FittedRegressor {
    /// Make predictions on new data with the same columns as the training design.
    fn predict(&self, x: &Mat<f64>) -> Col<f64>;

    /// Access the regression results (coefficients, statistics, etc.).
    fn result(&self) -> &RegressionResult;

    /// Get the coefficients (convenience method).
    fn coefficients(&self) -> &Col<f64> {
        &self.result().coefficients
    }

    /// Get the intercept (convenience method).
    fn intercept(&self) -> Option<f64> {
        self.result().intercept
    }

    /// Get the training R² (convenience method).
    fn r_squared(&self) -> f64 {
        self.result().r_squared
    }

    /// R² of the predictions on new data; NaN when `y` is empty.
    fn score(&self, x: &Mat<f64>, y: &Col<f64>) -> f64 {
        let predictions = self.predict(x);
        let n = y.nrows();
        if n == 0 {
            return f64::NAN;
        }

        let y_mean: f64 = y.iter().sum::<f64>() / n as f64;
        let tss: f64 = y.iter().map(|&yi| (yi - y_mean).powi(2)).sum();
        let rss: f64 = y
            .iter()
            .zip(predictions.iter())
            .map(|(&yi, &pi)| (yi - pi).powi(2))
            .sum();

        if tss == 0.0 {
            if rss == 0.0 {
                1.0
            } else {
                0.0
            }
        } else {
            1.0 - rss / tss
        }
    }

    /// Root mean squared prediction error on new data.
    fn rmse(&self, x: &Mat<f64>, y: &Col<f64>) -> f64 {
        let predictions = self.predict(x);
        let n = y.nrows();
        if n == 0 {
            return f64::NAN;
        }
        let sse: f64 = y
            .iter()
            .zip(predictions.iter())
            .map(|(&yi, &pi)| (yi - pi).powi(2))
            .sum();
        (sse / n as f64).sqrt()
    }

    /// Make predictions with confidence or prediction intervals.
    ///
    /// `interval = None` returns point predictions only.
    fn predict_with_interval(
        &self,
        x: &Mat<f64>,
        interval: Option<IntervalType>,
        level: f64,
    ) -> PredictionResult;
}
