//! Regression and analysis configuration.

use thiserror::Error;

/// Configuration options for least squares fits.
#[derive(Debug, Clone)]
pub struct RegressionOptions {
    /// Whether to include an intercept term (default: true).
    pub with_intercept: bool,
    /// Whether to compute standard errors and inference statistics (default: true).
    pub compute_inference: bool,
    /// Confidence level for confidence intervals (default: 0.95).
    pub confidence_level: f64,
    /// Relative tolerance below which a column counts as collinear with
    /// the columns before it.
    pub rank_tolerance: f64,
    /// Whether rank-deficient designs are tolerated (default: false).
    ///
    /// When false, a collinear or constant predictor makes the fit fail with
    /// [`RegressionError::SingularDesign`](crate::solvers::RegressionError).
    /// When true, aliased coefficients are reported as NaN and excluded from
    /// the fitted values.
    pub allow_aliased: bool,
}

impl Default for RegressionOptions {
    fn default() -> Self {
        Self {
            with_intercept: true,
            compute_inference: true,
            confidence_level: 0.95,
            rank_tolerance: 1e-7,
            allow_aliased: false,
        }
    }
}

/// Errors that can occur when validating options.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("confidence_level must be in (0, 1), got {0}")]
    InvalidConfidenceLevel(f64),
    #[error("significance_level must be in (0, 1), got {0}")]
    InvalidSignificanceLevel(f64),
    #[error("tolerance must be positive, got {0}")]
    InvalidTolerance(f64),
    #[error("anomaly threshold must be positive, got {0}")]
    InvalidAnomalyThreshold(f64),
    #[error("VIF threshold must be at least 1, got {0}")]
    InvalidVifThreshold(f64),
    #[error("LOWESS span must be in (0, 1], got {0}")]
    InvalidSpan(f64),
    #[error("test fraction must be in (0, 1), got {0}")]
    InvalidTestFraction(f64),
    #[error("max_subset_candidates must be in 1..=20, got {0}")]
    InvalidCandidateLimit(usize),
    #[error("Cook's distance cutoff must be positive, got {0}")]
    InvalidCooksCutoff(f64),
}

impl RegressionOptions {
    /// Create a new builder for regression options.
    pub fn builder() -> RegressionOptionsBuilder {
        RegressionOptionsBuilder::default()
    }

    /// Options for the auxiliary regressions behind VIF computations.
    ///
    /// These fit through the origin, tolerate aliasing and skip inference.
    pub fn auxiliary() -> Self {
        Self {
            with_intercept: false,
            compute_inference: false,
            allow_aliased: true,
            ..Default::default()
        }
    }

    /// Validate the options and return an error if invalid.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.confidence_level <= 0.0 || self.confidence_level >= 1.0 {
            return Err(OptionsError::InvalidConfidenceLevel(self.confidence_level));
        }
        if self.rank_tolerance <= 0.0 {
            return Err(OptionsError::InvalidTolerance(self.rank_tolerance));
        }
        Ok(())
    }
}

/// Builder for `RegressionOptions`.
#[derive(Debug, Clone, Default)]
pub struct RegressionOptionsBuilder {
    options: RegressionOptions,
}

impl RegressionOptionsBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to include an intercept term.
    pub fn with_intercept(mut self, include: bool) -> Self {
        self.options.with_intercept = include;
        self
    }

    /// Set whether to compute inference statistics.
    pub fn compute_inference(mut self, compute: bool) -> Self {
        self.options.compute_inference = compute;
        self
    }

    /// Set the confidence level for confidence intervals.
    pub fn confidence_level(mut self, level: f64) -> Self {
        self.options.confidence_level = level;
        self
    }

    /// Set the relative collinearity tolerance.
    pub fn rank_tolerance(mut self, tol: f64) -> Self {
        self.options.rank_tolerance = tol;
        self
    }

    /// Set whether rank-deficient designs are tolerated.
    pub fn allow_aliased(mut self, allow: bool) -> Self {
        self.options.allow_aliased = allow;
        self
    }

    /// Build and validate the options.
    pub fn build(self) -> Result<RegressionOptions, OptionsError> {
        self.options.validate()?;
        Ok(self.options)
    }

    /// Build the options without validation.
    pub fn build_unchecked(self) -> RegressionOptions {
        self.options
    }
}

/// Settings for an end-to-end analysis run.
///
/// Defaults reproduce the published dashboard: anomaly threshold 8, VIF
/// threshold 20, a 80/20 split seeded with 123, the five-predictor set for
/// the significance tests and the exhaustive search, and removal of rows
/// with Cook's distance above 0.5 before the final fit.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Significance level for the F-tests and the Holm procedure.
    pub significance_level: f64,
    /// Confidence level for coefficient intervals.
    pub confidence_level: f64,
    /// Absolute deviation above which a response is flagged.
    pub anomaly_threshold: f64,
    /// Maximum tolerated VIF in the multicollinearity reducer.
    pub vif_threshold: f64,
    /// Fraction of points used by each local LOWESS fit.
    pub lowess_span: f64,
    /// Number of LOWESS robustness iterations.
    pub lowess_iterations: usize,
    /// Fraction of rows held out for testing.
    pub test_fraction: f64,
    /// Seed for the train/test shuffle.
    pub split_seed: u64,
    /// Predictors for the overall F-test and the Holm procedure; empty
    /// means every candidate predictor of the data.
    pub screening_features: Vec<String>,
    /// Candidate predictors for the exhaustive subset search.
    pub subset_candidates: Vec<String>,
    /// Upper bound on the number of subset-search candidates.
    pub max_subset_candidates: usize,
    /// Relative collinearity tolerance passed to every fit.
    pub rank_tolerance: f64,
    /// Rows whose Cook's distance under the best subset exceeds this are
    /// dropped before the final fit. `None` disables the check.
    pub cooks_cutoff: Option<f64>,
    /// IDNO values always dropped before the final fit.
    pub excluded_ids: Vec<i64>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            significance_level: 0.05,
            confidence_level: 0.95,
            anomaly_threshold: 8.0,
            vif_threshold: 20.0,
            lowess_span: 2.0 / 3.0,
            lowess_iterations: 5,
            test_fraction: 0.2,
            split_seed: 123,
            screening_features: default_predictors(),
            subset_candidates: default_predictors(),
            max_subset_candidates: 12,
            rank_tolerance: 1e-7,
            cooks_cutoff: Some(0.5),
            excluded_ids: Vec::new(),
        }
    }
}

fn default_predictors() -> Vec<String> {
    ["AGE", "ADIPOSITY", "ABDOMEN", "CHEST", "THIGH"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl AnalysisOptions {
    /// Create a new builder for analysis options.
    pub fn builder() -> AnalysisOptionsBuilder {
        AnalysisOptionsBuilder::default()
    }

    /// Regression options derived from these analysis settings.
    pub fn regression_options(&self) -> RegressionOptions {
        RegressionOptions {
            confidence_level: self.confidence_level,
            rank_tolerance: self.rank_tolerance,
            ..Default::default()
        }
    }

    /// Validate the options and return an error if invalid.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.significance_level <= 0.0 || self.significance_level >= 1.0 {
            return Err(OptionsError::InvalidSignificanceLevel(
                self.significance_level,
            ));
        }
        if self.confidence_level <= 0.0 || self.confidence_level >= 1.0 {
            return Err(OptionsError::InvalidConfidenceLevel(self.confidence_level));
        }
        if !(self.anomaly_threshold > 0.0) {
            return Err(OptionsError::InvalidAnomalyThreshold(self.anomaly_threshold));
        }
        if !(self.vif_threshold >= 1.0) {
            return Err(OptionsError::InvalidVifThreshold(self.vif_threshold));
        }
        if !(self.lowess_span > 0.0 && self.lowess_span <= 1.0) {
            return Err(OptionsError::InvalidSpan(self.lowess_span));
        }
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(OptionsError::InvalidTestFraction(self.test_fraction));
        }
        if self.max_subset_candidates == 0 || self.max_subset_candidates > 20 {
            return Err(OptionsError::InvalidCandidateLimit(
                self.max_subset_candidates,
            ));
        }
        if self.rank_tolerance <= 0.0 {
            return Err(OptionsError::InvalidTolerance(self.rank_tolerance));
        }
        if let Some(cutoff) = self.cooks_cutoff {
            if !(cutoff > 0.0) {
                return Err(OptionsError::InvalidCooksCutoff(cutoff));
            }
        }
        Ok(())
    }
}

/// Builder for `AnalysisOptions`.
#[derive(Debug, Clone, Default)]
pub struct AnalysisOptionsBuilder {
    options: AnalysisOptions,
}

impl AnalysisOptionsBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the significance level for hypothesis tests.
    pub fn significance_level(mut self, alpha: f64) -> Self {
        self.options.significance_level = alpha;
        self
    }

    /// Set the confidence level for intervals.
    pub fn confidence_level(mut self, level: f64) -> Self {
        self.options.confidence_level = level;
        self
    }

    /// Set the anomaly deviation threshold.
    pub fn anomaly_threshold(mut self, threshold: f64) -> Self {
        self.options.anomaly_threshold = threshold;
        self
    }

    /// Set the VIF threshold for the reducer.
    pub fn vif_threshold(mut self, threshold: f64) -> Self {
        self.options.vif_threshold = threshold;
        self
    }

    /// Set the LOWESS span and robustness iterations.
    pub fn lowess(mut self, span: f64, iterations: usize) -> Self {
        self.options.lowess_span = span;
        self.options.lowess_iterations = iterations;
        self
    }

    /// Set the held-out test fraction.
    pub fn test_fraction(mut self, fraction: f64) -> Self {
        self.options.test_fraction = fraction;
        self
    }

    /// Set the train/test shuffle seed.
    pub fn split_seed(mut self, seed: u64) -> Self {
        self.options.split_seed = seed;
        self
    }

    /// Set the predictors for the overall F-test and the Holm procedure.
    pub fn screening_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.screening_features = features.into_iter().map(Into::into).collect();
        self
    }

    /// Set the candidate predictors for the exhaustive subset search.
    pub fn subset_candidates<I, S>(mut self, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.subset_candidates = candidates.into_iter().map(Into::into).collect();
        self
    }

    /// Set the upper bound on subset-search candidates.
    pub fn max_subset_candidates(mut self, limit: usize) -> Self {
        self.options.max_subset_candidates = limit;
        self
    }

    /// Set the relative collinearity tolerance.
    pub fn rank_tolerance(mut self, tol: f64) -> Self {
        self.options.rank_tolerance = tol;
        self
    }

    /// Set the Cook's distance cutoff for dropping influential rows.
    pub fn cooks_cutoff(mut self, cutoff: Option<f64>) -> Self {
        self.options.cooks_cutoff = cutoff;
        self
    }

    /// Set IDNO values dropped before the final fit.
    pub fn excluded_ids(mut self, ids: impl IntoIterator<Item = i64>) -> Self {
        self.options.excluded_ids = ids.into_iter().collect();
        self
    }

    /// Build and validate the options.
    pub fn build(self) -> Result<AnalysisOptions, OptionsError> {
        self.options.validate()?;
        Ok(self.options)
    }

    /// Build the options without validation.
    pub fn build_unchecked(self) -> AnalysisOptions {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = RegressionOptions::default();
        assert!(opts.with_intercept);
        assert!(opts.compute_inference);
        assert!(!opts.allow_aliased);
        assert!((opts.confidence_level - 0.95).abs() < 1e-10);
    }

    #[test]
    fn test_auxiliary_options() {
        let opts = RegressionOptions::auxiliary();
        assert!(opts.allow_aliased);
        assert!(!opts.compute_inference);
        assert!(!opts.with_intercept);
    }

    #[test]
    fn test_builder() {
        let opts = RegressionOptions::builder()
            .with_intercept(false)
            .rank_tolerance(1e-8)
            .build()
            .unwrap();

        assert!(!opts.with_intercept);
        assert!((opts.rank_tolerance - 1e-8).abs() < 1e-14);
    }

    #[test]
    fn test_validation_invalid_confidence_level() {
        let result = RegressionOptions::builder().confidence_level(1.0).build();
        assert!(matches!(
            result,
            Err(OptionsError::InvalidConfidenceLevel(_))
        ));
    }

    #[test]
    fn test_validation_invalid_tolerance() {
        let result = RegressionOptions::builder().rank_tolerance(0.0).build();
        assert!(matches!(result, Err(OptionsError::InvalidTolerance(_))));
    }

    #[test]
    fn test_analysis_defaults() {
        let opts = AnalysisOptions::default();
        assert!(opts.validate().is_ok());
        assert!((opts.anomaly_threshold - 8.0).abs() < 1e-12);
        assert!((opts.vif_threshold - 20.0).abs() < 1e-12);
        assert_eq!(opts.subset_candidates.len(), 5);
        assert_eq!(opts.screening_features, opts.subset_candidates);
        assert_eq!(opts.split_seed, 123);
        assert_eq!(opts.cooks_cutoff, Some(0.5));
        assert!(opts.excluded_ids.is_empty());
    }

    #[test]
    fn test_analysis_builder_validation() {
        let result = AnalysisOptions::builder().significance_level(0.0).build();
        assert!(matches!(
            result,
            Err(OptionsError::InvalidSignificanceLevel(_))
        ));

        let result = AnalysisOptions::builder().anomaly_threshold(-1.0).build();
        assert!(matches!(
            result,
            Err(OptionsError::InvalidAnomalyThreshold(_))
        ));

        let result = AnalysisOptions::builder().lowess(0.0, 3).build();
        assert!(matches!(result, Err(OptionsError::InvalidSpan(_))));

        let result = AnalysisOptions::builder().test_fraction(1.0).build();
        assert!(matches!(result, Err(OptionsError::InvalidTestFraction(_))));

        let result = AnalysisOptions::builder().max_subset_candidates(0).build();
        assert!(matches!(
            result,
            Err(OptionsError::InvalidCandidateLimit(0))
        ));

        let result = AnalysisOptions::builder().cooks_cutoff(Some(0.0)).build();
        assert!(matches!(result, Err(OptionsError::InvalidCooksCutoff(_))));
        assert!(AnalysisOptions::builder().cooks_cutoff(None).build().is_ok());
    }

    #[test]
    fn test_analysis_builder_candidates() {
        let opts = AnalysisOptions::builder()
            .subset_candidates(["AGE", "ABDOMEN"])
            .vif_threshold(10.0)
            .build()
            .unwrap();
        assert_eq!(opts.subset_candidates, vec!["AGE", "ABDOMEN"]);
        assert!((opts.regression_options().confidence_level - 0.95).abs() < 1e-12);
    }
}
