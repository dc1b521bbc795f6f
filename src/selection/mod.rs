//! Predictor selection: Holm-corrected partial F-tests, exhaustive subset
//! search and VIF-based reduction.

mod reduction;
mod stepwise;
mod subsets;

pub use reduction::reduce_multicollinearity;
pub use stepwise::{holm_step_down, significant_features, SignificanceResult};
pub use subsets::{fit_all_combinations, SubsetScore, MAX_CANDIDATES};
