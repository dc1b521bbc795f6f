//! In-memory tabular data, schema and exploratory statistics.
//!
//! The dataset is loaded once by the caller and passed by reference into
//! every modeling function; nothing in this crate holds it globally.

mod dataset;
pub mod schema;
mod split;
mod summary;

pub use dataset::{DataError, Dataset};
pub use split::train_test_split;
pub use summary::{
    correlation_matrix, summarize, zscore_outliers, CorrelationMatrix, SummaryStatistics,
};
