//! Final-model fitting, prediction and the published estimator.

mod estimator;
mod fitted;

pub use estimator::{BodyFatEstimator, Estimate, EstimateError, MIN_ABDOMEN, MIN_AGE, Z_95};
pub use fitted::{diagnostics, fit, fit_datasets, CoefficientEstimate, FittedModel};
