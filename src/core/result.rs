//! Least squares fit results.

use faer::Col;

/// Complete result from a least squares fit on one training sample.
///
/// Contains coefficients, sums of squares, fit statistics, information
/// criteria and, when requested, coefficient inference.
#[derive(Debug, Clone)]
pub struct RegressionResult {
    // ========== Core Results ==========
    /// Estimated coefficients (excluding intercept).
    /// Aliased coefficients are NaN; only auxiliary fits can produce them.
    pub coefficients: Col<f64>,

    /// Intercept term (if model was fit with intercept).
    pub intercept: Option<f64>,

    /// Residuals (y - fitted_values).
    pub residuals: Col<f64>,

    /// Fitted values on the training data.
    pub fitted_values: Col<f64>,

    // ========== Rank Information ==========
    /// Numerical rank of the (centered) predictor matrix.
    pub rank: usize,

    /// Number of parameters (including intercept if present).
    pub n_parameters: usize,

    /// Number of observations.
    pub n_observations: usize,

    /// Which coefficients are aliased (perfectly collinear or constant).
    pub aliased: Vec<bool>,

    // ========== Sums of Squares ==========
    /// Total sum of squares around the response mean.
    pub sst: f64,

    /// Residual (error) sum of squares.
    pub sse: f64,

    // ========== Fit Statistics ==========
    /// Coefficient of determination (R²).
    pub r_squared: f64,

    /// Adjusted R².
    pub adj_r_squared: f64,

    /// Residual mean square SSE / (n - p).
    pub mse: f64,

    /// Residual standard error, sqrt(MSE).
    pub rmse: f64,

    /// F-statistic for overall model significance.
    pub f_statistic: f64,

    /// Upper-tail p-value of the F-statistic.
    pub f_pvalue: f64,

    // ========== Information Criteria ==========
    /// Gaussian log-likelihood at the ML variance estimate SSE / n.
    pub log_likelihood: f64,

    /// Akaike Information Criterion.
    pub aic: f64,

    /// Bayesian Information Criterion.
    pub bic: f64,

    // ========== Inference Statistics (Optional) ==========
    /// Standard errors of coefficients.
    pub std_errors: Option<Col<f64>>,

    /// Standard error of intercept.
    pub intercept_std_error: Option<f64>,

    /// t-statistics for coefficients.
    pub t_statistics: Option<Col<f64>>,

    /// t-statistic for intercept.
    pub intercept_t_statistic: Option<f64>,

    /// Two-sided p-values for coefficient significance tests.
    pub p_values: Option<Col<f64>>,

    /// Two-sided p-value for the intercept.
    pub intercept_p_value: Option<f64>,

    /// Lower bounds of coefficient confidence intervals.
    pub conf_interval_lower: Option<Col<f64>>,

    /// Upper bounds of coefficient confidence intervals.
    pub conf_interval_upper: Option<Col<f64>>,

    /// Intercept confidence interval (lower, upper).
    pub intercept_conf_interval: Option<(f64, f64)>,

    /// Confidence level used for intervals.
    pub confidence_level: f64,
}

impl RegressionResult {
    /// Create a new empty result (used internally by solvers).
    pub(crate) fn empty(n_features: usize, n_observations: usize) -> Self {
        Self {
            coefficients: Col::zeros(n_features),
            intercept: None,
            residuals: Col::zeros(n_observations),
            fitted_values: Col::zeros(n_observations),
            rank: 0,
            n_parameters: 0,
            n_observations,
            aliased: vec![false; n_features],
            sst: 0.0,
            sse: 0.0,
            r_squared: 0.0,
            adj_r_squared: f64::NAN,
            mse: f64::NAN,
            rmse: f64::NAN,
            f_statistic: f64::NAN,
            f_pvalue: f64::NAN,
            log_likelihood: f64::NAN,
            aic: f64::NAN,
            bic: f64::NAN,
            std_errors: None,
            intercept_std_error: None,
            t_statistics: None,
            intercept_t_statistic: None,
            p_values: None,
            intercept_p_value: None,
            conf_interval_lower: None,
            conf_interval_upper: None,
            intercept_conf_interval: None,
            confidence_level: 0.95,
        }
    }

    /// Residual degrees of freedom (n - p).
    pub fn residual_df(&self) -> usize {
        self.n_observations.saturating_sub(self.n_parameters)
    }

    /// Model degrees of freedom (p - 1 if intercept, else p).
    pub fn model_df(&self) -> usize {
        if self.intercept.is_some() {
            self.n_parameters.saturating_sub(1)
        } else {
            self.n_parameters
        }
    }

    /// Regression sum of squares (SSR = SST - SSE).
    pub fn ssr(&self) -> f64 {
        self.sst - self.sse
    }

    /// Mean square due to regression, SSR / (p - 1).
    pub fn msr(&self) -> f64 {
        let df = self.model_df();
        if df == 0 {
            f64::NAN
        } else {
            self.ssr() / df as f64
        }
    }

    /// Check if any coefficients are aliased.
    pub fn has_aliased(&self) -> bool {
        self.aliased.iter().any(|&a| a)
    }

    /// Get coefficient value, returning None for aliased coefficients.
    pub fn get_coefficient(&self, index: usize) -> Option<f64> {
        if index < self.coefficients.nrows() && !self.aliased[index] {
            Some(self.coefficients[index])
        } else {
            None
        }
    }
}
