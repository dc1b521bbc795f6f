//! Regression diagnostics (leverage, residuals, Cook's distance, VIF, plots).
//!
//! - **Leverage**: observations with unusual predictor values
//! - **Residuals**: standardized and internally studentized residuals
//! - **Influence**: Cook's distance
//! - **VIF**: variance inflation factors for multicollinearity
//! - **Plots**: the four classical diagnostic panels as plot-ready series
//!
//! # Example
//!
//! ```rust,ignore
//! use bodyfat_analysis::diagnostics::{compute_leverage, cooks_distance, studentized_residuals};
//!
//! let leverage = compute_leverage(&x, true)?;
//! let studentized = studentized_residuals(&residuals, &leverage, mse);
//! let cooks = cooks_distance(&residuals, &leverage, mse, n_params);
//! let influential = influential_cooks(&cooks, None);
//! ```

mod influence;
mod leverage;
mod plots;
mod residuals;
mod vif;

pub use influence::{cooks_distance, influential_cooks};
pub use leverage::{compute_leverage, high_leverage_points};
pub use plots::{diagnostic_series, normal_quantiles, DiagnosticSeries, PairedSeries, SmoothCurve};
pub use residuals::{residual_outliers, standardized_residuals, studentized_residuals};
pub use vif::{mean_vif, variance_inflation_factor, vif_table, VifEntry};
