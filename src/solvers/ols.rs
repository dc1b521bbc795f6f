//! Ordinary Least Squares regression solver.

use crate::core::{
    IntervalType, PredictionResult, RegressionOptions, RegressionOptionsBuilder, RegressionResult,
};
use crate::inference::{compute_prediction_intervals, compute_xtx_inverse_augmented, CoefficientInference};
use crate::solvers::traits::{FittedRegressor, RegressionError, Regressor};
use crate::utils::{center_columns, center_vector, detect_constant_columns, select_columns};
use faer::{Col, Mat};
use statrs::distribution::{ContinuousCDF, FisherSnedecor, StudentsT};

/// Absolute spread below which a predictor counts as constant.
const CONSTANT_TOLERANCE: f64 = 1e-10;

/// Ordinary Least Squares regression estimator.
///
/// Solves the centered least squares problem with a QR factorization. A
/// rank-deficient design (collinear or constant predictors, or fewer rows
/// than parameters) is rejected with [`RegressionError::SingularDesign`]
/// unless `allow_aliased` is set, in which case the aliased coefficients are
/// NaN and take no part in predictions.
///
/// # Example
///
/// ```rust,ignore
/// use bodyfat_analysis::solvers::{OlsRegressor, Regressor, FittedRegressor};
/// use faer::{Mat, Col};
///
/// let x = Mat::from_fn(100, 2, |i, j| ((i * (j + 3)) % 17) as f64);
/// let y = Col::from_fn(100, |i| 1.0 + 2.0 * x[(i, 0)] - x[(i, 1)]);
///
/// let fitted = OlsRegressor::builder().build().fit(&x, &y)?;
/// println!("R² = {}", fitted.r_squared());
/// ```
#[derive(Debug, Clone, Default)]
pub struct OlsRegressor {
    options: RegressionOptions,
}

impl OlsRegressor {
    /// Create a new OLS regressor with the given options.
    pub fn new(options: RegressionOptions) -> Self {
        Self { options }
    }

    /// Create a builder for configuring the regressor.
    pub fn builder() -> OlsRegressorBuilder {
        OlsRegressorBuilder::default()
    }

    /// Options this regressor fits with.
    pub fn options(&self) -> &RegressionOptions {
        &self.options
    }
}

impl Regressor for OlsRegressor {
    type Fitted = FittedOls;

    fn fit(&self, x: &Mat<f64>, y: &Col<f64>) -> Result<Self::Fitted, RegressionError> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        if x.nrows() != y.nrows() {
            return Err(RegressionError::DimensionMismatch {
                x_rows: x.nrows(),
                y_len: y.nrows(),
            });
        }

        if n_samples < 2 {
            return Err(RegressionError::InsufficientObservations {
                needed: 2,
                got: n_samples,
            });
        }

        let with_intercept = self.options.with_intercept;
        let n_params_full = n_features + usize::from(with_intercept);

        if n_params_full == 0 {
            return Err(RegressionError::EmptyFeatureSet);
        }

        // Fewer rows than parameters can never be full rank.
        if n_samples < n_params_full && !self.options.allow_aliased {
            return Err(RegressionError::InsufficientObservations {
                needed: n_params_full,
                got: n_samples,
            });
        }

        let constant_cols = if with_intercept {
            detect_constant_columns(x, CONSTANT_TOLERANCE)
        } else {
            vec![false; n_features]
        };

        let (coefficients, intercept, aliased, rank) = if with_intercept {
            let (x_centered, x_means) = center_columns(x);
            let (y_centered, y_mean) = center_vector(y);

            let (coefficients, aliased, rank) =
                self.solve_with_qr(&x_centered, &y_centered, &constant_cols);

            // intercept = y_mean - x_means' * coefficients
            let mut intercept = y_mean;
            for j in 0..n_features {
                if !aliased[j] {
                    intercept -= x_means[j] * coefficients[j];
                }
            }
            (coefficients, Some(intercept), aliased, rank)
        } else {
            let (coefficients, aliased, rank) = self.solve_with_qr(x, y, &constant_cols);
            (coefficients, None, aliased, rank)
        };

        if !self.options.allow_aliased && aliased.iter().any(|&a| a) {
            let columns = aliased
                .iter()
                .enumerate()
                .filter(|(_, &a)| a)
                .map(|(j, _)| j)
                .collect();
            return Err(RegressionError::SingularDesign { columns });
        }

        let fitted_values = Col::from_fn(n_samples, |i| {
            let mut pred = intercept.unwrap_or(0.0);
            for j in 0..n_features {
                if !aliased[j] {
                    pred += x[(i, j)] * coefficients[j];
                }
            }
            pred
        });
        let residuals = Col::from_fn(n_samples, |i| y[i] - fitted_values[i]);

        let n_params = rank + usize::from(with_intercept);
        let result = self.compute_statistics(
            x,
            y,
            coefficients,
            intercept,
            residuals,
            fitted_values,
            aliased,
            rank,
            n_params,
        );

        // (X_aug'X_aug)⁻¹ backs prediction intervals; aliased fits have none.
        let xtx_inverse = if with_intercept && !result.has_aliased() {
            compute_xtx_inverse_augmented(x).ok()
        } else {
            None
        };

        Ok(FittedOls {
            options: self.options.clone(),
            result,
            xtx_inverse,
        })
    }
}

impl OlsRegressor {
    /// Solve the least squares problem on the non-aliased columns.
    ///
    /// Columns are screened in their original order: a column whose
    /// component orthogonal to the already accepted columns is below
    /// `rank_tolerance` (relative to its own norm) is aliased, so the later
    /// of two collinear columns is the one dropped. The remaining full-rank
    /// block is solved with a Householder QR and back-substitution.
    ///
    /// Returns `(coefficients, aliased, rank)`; aliased coefficients are NaN.
    fn solve_with_qr(
        &self,
        x: &Mat<f64>,
        y: &Col<f64>,
        constant_cols: &[bool],
    ) -> (Col<f64>, Vec<bool>, usize) {
        let n_features = x.ncols();
        let aliased = screen_aliased_columns(x, constant_cols, self.options.rank_tolerance);
        let kept: Vec<usize> = (0..n_features).filter(|&j| !aliased[j]).collect();
        let rank = kept.len();

        if rank == 0 {
            return (Col::from_fn(n_features, |_| f64::NAN), aliased, 0);
        }

        let x_kept = select_columns(x, &kept);
        let qr = x_kept.qr();
        let q = qr.compute_Q();
        let r = qr.R();

        // Solve R * beta = Q' * y for the leading rank x rank block.
        let qty = q.transpose() * y;
        let mut beta_reduced = Col::zeros(rank);
        for i in (0..rank).rev() {
            let mut sum = qty[i];
            for j in (i + 1)..rank {
                sum -= r[(i, j)] * beta_reduced[j];
            }
            beta_reduced[i] = sum / r[(i, i)];
        }

        let mut coefficients = Col::from_fn(n_features, |_| f64::NAN);
        for (pos, &j) in kept.iter().enumerate() {
            coefficients[j] = beta_reduced[pos];
        }

        (coefficients, aliased, rank)
    }

    /// Compute sums of squares, fit statistics and optionally inference.
    #[allow(clippy::too_many_arguments)]
    fn compute_statistics(
        &self,
        x: &Mat<f64>,
        y: &Col<f64>,
        coefficients: Col<f64>,
        intercept: Option<f64>,
        residuals: Col<f64>,
        fitted_values: Col<f64>,
        aliased: Vec<bool>,
        rank: usize,
        n_params: usize,
    ) -> RegressionResult {
        let n = y.nrows();
        let nf = n as f64;

        let y_mean: f64 = y.iter().sum::<f64>() / nf;
        let sst: f64 = y.iter().map(|&yi| (yi - y_mean).powi(2)).sum();
        let sse: f64 = residuals.iter().map(|&r| r.powi(2)).sum();

        let r_squared = if sst > 0.0 {
            (1.0 - sse / sst).clamp(0.0, 1.0)
        } else if sse < 1e-10 {
            1.0
        } else {
            0.0
        };

        let df_total = (n - 1) as f64;
        let df_resid = n.saturating_sub(n_params) as f64;
        let adj_r_squared = if df_resid > 0.0 && df_total > 0.0 {
            1.0 - (1.0 - r_squared) * df_total / df_resid
        } else {
            f64::NAN
        };

        let mse = if df_resid > 0.0 { sse / df_resid } else { f64::NAN };
        let rmse = mse.sqrt();

        let df_model = n_params.saturating_sub(usize::from(intercept.is_some())) as f64;
        let f_statistic = if df_model > 0.0 && df_resid > 0.0 && mse > 0.0 {
            ((sst - sse) / df_model) / mse
        } else {
            f64::NAN
        };

        let f_pvalue = if f_statistic.is_finite() {
            FisherSnedecor::new(df_model, df_resid)
                .ok()
                .map_or(f64::NAN, |d| 1.0 - d.cdf(f_statistic))
        } else {
            f64::NAN
        };

        // Gaussian log-likelihood at the ML variance SSE / n.
        let log_likelihood = if sse > 0.0 {
            -0.5 * nf * (1.0 + (2.0 * std::f64::consts::PI).ln() + (sse / nf).ln())
        } else {
            f64::NAN
        };

        let k = n_params as f64;
        let aic = 2.0 * k - 2.0 * log_likelihood;
        let bic = k * nf.ln() - 2.0 * log_likelihood;

        let mut result = RegressionResult::empty(x.ncols(), n);
        result.coefficients = coefficients;
        result.intercept = intercept;
        result.residuals = residuals;
        result.fitted_values = fitted_values;
        result.rank = rank;
        result.n_parameters = n_params;
        result.aliased = aliased;
        result.sst = sst;
        result.sse = sse;
        result.r_squared = r_squared;
        result.adj_r_squared = adj_r_squared;
        result.mse = mse;
        result.rmse = rmse;
        result.f_statistic = f_statistic;
        result.f_pvalue = f_pvalue;
        result.log_likelihood = log_likelihood;
        result.aic = aic;
        result.bic = bic;
        result.confidence_level = self.options.confidence_level;

        if self.options.compute_inference && !result.has_aliased() {
            self.compute_inference(x, &mut result);
        }

        result
    }

    /// Compute standard errors, t-statistics, p-values and confidence intervals.
    ///
    /// Leaves the optional fields empty when the residual variance is undefined.
    fn compute_inference(&self, x: &Mat<f64>, result: &mut RegressionResult) {
        let df = result.residual_df() as f64;
        if df <= 0.0 || !result.mse.is_finite() {
            return;
        }

        let level = self.options.confidence_level;

        let (se, se_int) = if result.intercept.is_some() {
            match CoefficientInference::standard_errors_with_intercept(x, result.mse) {
                Ok((se, se_int)) => (se, Some(se_int)),
                Err(_) => return,
            }
        } else {
            match CoefficientInference::standard_errors(x, result.mse) {
                Ok(se) => (se, None),
                Err(_) => return,
            }
        };

        let t_stats = CoefficientInference::t_statistics(&result.coefficients, &se);
        let p_vals = CoefficientInference::p_values(&t_stats, df);
        let (ci_lower, ci_upper) =
            CoefficientInference::confidence_intervals(&result.coefficients, &se, df, level);

        result.std_errors = Some(se);
        result.t_statistics = Some(t_stats);
        result.p_values = Some(p_vals);
        result.conf_interval_lower = Some(ci_lower);
        result.conf_interval_upper = Some(ci_upper);

        if let (Some(intercept), Some(se_int)) = (result.intercept, se_int) {
            let t_int = if se_int > 0.0 {
                intercept / se_int
            } else {
                f64::NAN
            };

            let t_dist = StudentsT::new(0.0, 1.0, df).ok();
            let p_int = if t_int.is_finite() {
                t_dist.map_or(f64::NAN, |d| 2.0 * (1.0 - d.cdf(t_int.abs())))
            } else {
                f64::NAN
            };
            let t_crit = t_dist.map_or(f64::NAN, |d| d.inverse_cdf(1.0 - (1.0 - level) / 2.0));

            result.intercept_std_error = Some(se_int);
            result.intercept_t_statistic = Some(t_int);
            result.intercept_p_value = Some(p_int);
            result.intercept_conf_interval =
                Some((intercept - t_crit * se_int, intercept + t_crit * se_int));
        }
    }
}

/// Flag columns that lie (numerically) in the span of earlier columns.
///
/// Modified Gram-Schmidt with one re-orthogonalization pass.
fn screen_aliased_columns(x: &Mat<f64>, constant_cols: &[bool], tolerance: f64) -> Vec<bool> {
    let n = x.nrows();
    let mut basis: Vec<Vec<f64>> = Vec::new();
    let mut aliased = constant_cols.to_vec();

    for j in 0..x.ncols() {
        if aliased[j] {
            continue;
        }

        let mut v: Vec<f64> = (0..n).map(|i| x[(i, j)]).collect();
        let norm0 = v.iter().map(|a| a * a).sum::<f64>().sqrt();
        if norm0 < f64::MIN_POSITIVE {
            aliased[j] = true;
            continue;
        }

        for _ in 0..2 {
            for q in &basis {
                let dot: f64 = q.iter().zip(&v).map(|(a, b)| a * b).sum();
                for (vi, qi) in v.iter_mut().zip(q) {
                    *vi -= dot * qi;
                }
            }
        }

        let norm = v.iter().map(|a| a * a).sum::<f64>().sqrt();
        if norm <= tolerance * norm0 {
            aliased[j] = true;
        } else {
            basis.push(v.into_iter().map(|a| a / norm).collect());
        }
    }

    aliased
}

/// A fitted OLS regression model.
#[derive(Debug, Clone)]
pub struct FittedOls {
    options: RegressionOptions,
    result: RegressionResult,
    /// (X_aug'X_aug)⁻¹ for prediction intervals
    xtx_inverse: Option<Mat<f64>>,
}

impl FittedOls {
    /// Get the options used to fit this model.
    pub fn options(&self) -> &RegressionOptions {
        &self.options
    }

    /// (X_aug'X_aug)⁻¹ of the training design, when available.
    pub fn xtx_inverse(&self) -> Option<&Mat<f64>> {
        self.xtx_inverse.as_ref()
    }
}

impl FittedRegressor for FittedOls {
    fn predict(&self, x: &Mat<f64>) -> Col<f64> {
        let intercept = self.result.intercept.unwrap_or(0.0);
        Col::from_fn(x.nrows(), |i| {
            let mut pred = intercept;
            for j in 0..x.ncols() {
                if !self.result.aliased[j] {
                    pred += x[(i, j)] * self.result.coefficients[j];
                }
            }
            pred
        })
    }

    fn result(&self) -> &RegressionResult {
        &self.result
    }

    fn predict_with_interval(
        &self,
        x: &Mat<f64>,
        interval: Option<IntervalType>,
        level: f64,
    ) -> PredictionResult {
        let predictions = self.predict(x);

        match (interval, &self.xtx_inverse) {
            (None, _) => PredictionResult::point_only(predictions),
            (Some(interval_type), Some(xtx_inv)) => compute_prediction_intervals(
                x,
                xtx_inv,
                &predictions,
                self.result.mse,
                self.result.residual_df() as f64,
                level,
                interval_type,
            ),
            (Some(_), None) => {
                let n = x.nrows();
                let nan = Col::from_fn(n, |_| f64::NAN);
                PredictionResult::with_intervals(predictions, nan.clone(), nan.clone(), nan)
            }
        }
    }
}

/// Builder for `OlsRegressor`.
#[derive(Debug, Clone, Default)]
pub struct OlsRegressorBuilder {
    builder: RegressionOptionsBuilder,
}

impl OlsRegressorBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to include an intercept term.
    pub fn with_intercept(mut self, include: bool) -> Self {
        self.builder = self.builder.with_intercept(include);
        self
    }

    /// Set whether to compute inference statistics.
    pub fn compute_inference(mut self, compute: bool) -> Self {
        self.builder = self.builder.compute_inference(compute);
        self
    }

    /// Set the confidence level for confidence intervals.
    pub fn confidence_level(mut self, level: f64) -> Self {
        self.builder = self.builder.confidence_level(level);
        self
    }

    /// Set the rank tolerance for QR decomposition.
    pub fn rank_tolerance(mut self, tol: f64) -> Self {
        self.builder = self.builder.rank_tolerance(tol);
        self
    }

    /// Tolerate rank-deficient designs instead of failing.
    pub fn allow_aliased(mut self, allow: bool) -> Self {
        self.builder = self.builder.allow_aliased(allow);
        self
    }

    /// Build the OLS regressor.
    pub fn build(self) -> OlsRegressor {
        OlsRegressor::new(self.builder.build_unchecked())
    }
}
