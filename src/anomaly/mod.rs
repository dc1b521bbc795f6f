//! Screening of implausible body fat values against a published formula.

mod detector;
pub mod reference;

pub use detector::{clean_df, find_anomalies, AnomalyRecord};
pub use reference::predict_reference;
