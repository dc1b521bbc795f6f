//! Core types for regression analysis.

mod options;
mod prediction;
mod result;

pub use options::{
    AnalysisOptions, AnalysisOptionsBuilder, OptionsError, RegressionOptions,
    RegressionOptionsBuilder,
};
pub use prediction::{IntervalType, PredictionResult};
pub use result::RegressionResult;
