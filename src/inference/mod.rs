//! Statistical inference: standard errors, p-values, intervals and F-tests.

mod coefficient;
mod prediction;

pub use coefficient::{t_critical, CoefficientInference};
pub use f_test::{overall_f_test, partial_f_test, FTestSummary, PartialFTest};
pub use prediction::{
    compute_prediction_intervals, compute_xtx_inverse, compute_xtx_inverse_augmented,
};

pub(crate) use prediction::quadratic_form_row;
