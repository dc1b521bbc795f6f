//! The dashboard's analysis flow as a single call.

mod analysis;

pub use analysis::{run_analysis, AnalysisReport, ColumnSummary, ExcludedRow};
