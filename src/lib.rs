//! Regression modeling for the body fat measurement study.
//!
//! The crate screens implausible responses against a published reference
//! formula, tests overall model significance, selects predictors with
//! Holm-corrected partial F-tests, prunes collinear predictors by VIF, runs
//! an exhaustive subset search and fits the final OLS model together with
//! its regression diagnostics. All entry points take the dataset explicitly.
//!
//! # Example
//!
//! ```rust,ignore
//! use bodyfat_analysis::prelude::*;
//!
//! let dataset = Dataset::from_columns(columns)?;
//! let report = run_analysis(&dataset, &AnalysisOptions::default())?;
//!
//! println!("flagged rows: {}", report.anomalies.len());
//! println!("best subset: {:?}", report.final_model.features);
//! println!("test RMSE = {}", report.final_model.test_rmse);
//! ```

pub mod anomaly;
pub mod core;
pub mod data;
pub mod diagnostics;
pub mod inference;
pub mod model;
pub mod pipeline;
pub mod selection;
pub mod solvers;
pub mod utils;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::anomaly::{clean_df, find_anomalies, predict_reference, AnomalyRecord};
    pub use crate::core::{
        AnalysisOptions, IntervalType, PredictionResult, RegressionOptions,
        RegressionOptionsBuilder, RegressionResult,
    };
    pub use crate::data::{schema, train_test_split, DataError, Dataset};
    pub use crate::diagnostics::{
        compute_leverage, cooks_distance, standardized_residuals, studentized_residuals,
        variance_inflation_factor, vif_table, DiagnosticSeries,
    };
    pub use crate::inference::{overall_f_test, partial_f_test, FTestSummary};
    pub use crate::model::{diagnostics, fit, BodyFatEstimator, FittedModel};
    pub use crate::pipeline::{run_analysis, AnalysisReport};
    pub use crate::selection::{
        fit_all_combinations, reduce_multicollinearity, significant_features, SignificanceResult,
        SubsetScore,
    };
    pub use crate::solvers::{FittedRegressor, OlsRegressor, RegressionError, Regressor};
}

pub use crate::core::{AnalysisOptions, RegressionOptions};
pub use crate::data::{DataError, Dataset};
pub use crate::pipeline::{run_analysis, AnalysisReport};
pub use crate::solvers::RegressionError;
