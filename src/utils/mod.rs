//! Shared numeric helpers.

mod matrix;
pub mod serde_float;

pub use matrix::{
    center_columns, center_vector, column, detect_constant_columns, drop_column, select_columns,
    with_intercept_column,
};
