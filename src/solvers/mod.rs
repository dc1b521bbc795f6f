//! Least squares fitting and scatterplot smoothing.

mod lowess;
mod ols;
mod traits;

pub use lowess::{lowess, LowessFit, SmoothingError};
pub use ols::{FittedOls, OlsRegressor, OlsRegressorBuilder};
pub use traits::{FittedRegressor, RegressionError, Regressor};

pub(crate) use traits::check_feature_names;
