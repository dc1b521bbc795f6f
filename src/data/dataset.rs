//! Column-oriented in-memory table.

use faer::{Col, Mat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised when a dataset does not have the expected shape or schema.
#[derive(Debug, Error, PartialEq)]
pub enum DataError {
    #[error("dataset is missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("column `{name}` has {got} rows, expected {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("column `{0}` appears more than once")]
    DuplicateColumn(String),

    #[error("identifier {id} in column `{column}` is not unique")]
    DuplicateIdentifier { column: String, id: i64 },

    #[error("column `{column}` has a non-finite value at row {row}")]
    NonFinite { column: String, row: usize },

    #[error("dataset has no rows")]
    Empty,

    #[error("row index {index} out of bounds for {n_rows} rows")]
    RowOutOfBounds { index: usize, n_rows: usize },

    #[error("test fraction must leave at least one row on each side, got {0}")]
    InvalidSplit(f64),
}

/// An ordered collection of observations sharing one schema.
///
/// Every column holds one `f64` per row. Column order is preserved as given,
/// which also fixes the order of features in design matrices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    names: Vec<String>,
    #[serde(with = "crate::utils::serde_float::nested")]
    columns: Vec<Vec<f64>>,
    n_rows: usize,
}

impl Dataset {
    /// Build a dataset from `(name, values)` pairs.
    ///
    /// All columns must have the same length and distinct names.
    pub fn from_columns<I, S>(columns: I) -> Result<Self, DataError>
    where
        I: IntoIterator<Item = (S, Vec<f64>)>,
        S: Into<String>,
    {
        let mut names: Vec<String> = Vec::new();
        let mut data: Vec<Vec<f64>> = Vec::new();
        let mut n_rows = None;

        for (name, values) in columns {
            let name = name.into();
            if names.contains(&name) {
                return Err(DataError::DuplicateColumn(name));
            }
            match n_rows {
                None => n_rows = Some(values.len()),
                Some(expected) if expected != values.len() => {
                    return Err(DataError::LengthMismatch {
                        name,
                        expected,
                        got: values.len(),
                    });
                }
                Some(_) => {}
            }
            names.push(name);
            data.push(values);
        }

        Ok(Self {
            names,
            columns: data,
            n_rows: n_rows.unwrap_or(0),
        })
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns.
    pub fn n_cols(&self) -> usize {
        self.names.len()
    }

    /// Returns true if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    /// Column names in schema order.
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// Whether a column with this name exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Values of one column.
    pub fn column(&self, name: &str) -> Result<&[f64], DataError> {
        self.position(name)
            .map(|j| self.columns[j].as_slice())
            .ok_or_else(|| DataError::MissingColumns(vec![name.to_string()]))
    }

    /// Fail unless every listed column is present, naming all that are missing.
    pub fn require_columns<S: AsRef<str>>(&self, required: &[S]) -> Result<(), DataError> {
        let missing: Vec<String> = required
            .iter()
            .map(AsRef::as_ref)
            .filter(|name| !self.has_column(name))
            .map(str::to_string)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(DataError::MissingColumns(missing))
        }
    }

    /// Stack the selected columns into an `n_rows × k` matrix.
    ///
    /// Non-finite entries are rejected so that every fit sees a fully
    /// numeric design.
    pub fn design_matrix<S: AsRef<str>>(&self, names: &[S]) -> Result<Mat<f64>, DataError> {
        self.require_columns(names)?;
        let cols: Vec<&[f64]> = names
            .iter()
            .map(|n| self.column(n.as_ref()))
            .collect::<Result<_, _>>()?;

        for (name, values) in names.iter().zip(cols.iter()) {
            if let Some(row) = values.iter().position(|v| !v.is_finite()) {
                return Err(DataError::NonFinite {
                    column: name.as_ref().to_string(),
                    row,
                });
            }
        }

        Ok(Mat::from_fn(self.n_rows, cols.len(), |i, j| cols[j][i]))
    }

    /// One column as a vector.
    pub fn vector(&self, name: &str) -> Result<Col<f64>, DataError> {
        let values = self.column(name)?;
        if let Some(row) = values.iter().position(|v| !v.is_finite()) {
            return Err(DataError::NonFinite {
                column: name.to_string(),
                row,
            });
        }
        Ok(Col::from_fn(values.len(), |i| values[i]))
    }

    /// New dataset containing only the given rows, in the given order.
    pub fn take_rows(&self, rows: &[usize]) -> Result<Self, DataError> {
        if let Some(&index) = rows.iter().find(|&&r| r >= self.n_rows) {
            return Err(DataError::RowOutOfBounds {
                index,
                n_rows: self.n_rows,
            });
        }
        Ok(Self {
            names: self.names.clone(),
            columns: self
                .columns
                .iter()
                .map(|c| rows.iter().map(|&r| c[r]).collect())
                .collect(),
            n_rows: rows.len(),
        })
    }

    /// New dataset keeping rows for which `keep(value)` holds on `column`.
    pub fn filter_rows<F>(&self, column: &str, keep: F) -> Result<Self, DataError>
    where
        F: Fn(f64) -> bool,
    {
        let values = self.column(column)?;
        let rows: Vec<usize> = (0..self.n_rows).filter(|&i| keep(values[i])).collect();
        self.take_rows(&rows)
    }

    /// New dataset containing only the selected columns.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Self, DataError> {
        self.require_columns(names)?;
        let mut columns = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            columns.push((name.to_string(), self.column(name)?.to_vec()));
        }
        Self::from_columns(columns)
    }

    /// Copy of this dataset with one column's values replaced.
    pub fn with_column(&self, name: &str, values: Vec<f64>) -> Result<Self, DataError> {
        let j = self
            .position(name)
            .ok_or_else(|| DataError::MissingColumns(vec![name.to_string()]))?;
        if values.len() != self.n_rows {
            return Err(DataError::LengthMismatch {
                name: name.to_string(),
                expected: self.n_rows,
                got: values.len(),
            });
        }
        let mut out = self.clone();
        out.columns[j] = values;
        Ok(out)
    }

    /// Map from identifier to row index, failing on duplicates.
    ///
    /// Identifiers are stored as floats and compared after rounding to the
    /// nearest integer.
    pub fn unique_ids(&self, id_column: &str) -> Result<HashMap<i64, usize>, DataError> {
        let ids = self.column(id_column)?;
        let mut index = HashMap::with_capacity(ids.len());
        for (row, &raw) in ids.iter().enumerate() {
            let id = raw.round() as i64;
            if index.insert(id, row).is_some() {
                return Err(DataError::DuplicateIdentifier {
                    column: id_column.to_string(),
                    id,
                });
            }
        }
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::from_columns(vec![
            ("IDNO", vec![1.0, 2.0, 3.0]),
            ("AGE", vec![23.0, 45.0, 61.0]),
            ("BODYFAT", vec![12.5, 20.1, 27.4]),
        ])
        .unwrap()
    }

    #[test]
    fn test_from_columns_shape() {
        let ds = sample();
        assert_eq!(ds.n_rows(), 3);
        assert_eq!(ds.n_cols(), 3);
        assert_eq!(ds.column_names(), &["IDNO", "AGE", "BODYFAT"]);
    }

    #[test]
    fn test_length_mismatch() {
        let err = Dataset::from_columns(vec![("A", vec![1.0, 2.0]), ("B", vec![1.0])])
            .unwrap_err();
        assert!(matches!(err, DataError::LengthMismatch { expected: 2, got: 1, .. }));
    }

    #[test]
    fn test_duplicate_column() {
        let err = Dataset::from_columns(vec![("A", vec![1.0]), ("A", vec![2.0])]).unwrap_err();
        assert_eq!(err, DataError::DuplicateColumn("A".into()));
    }

    #[test]
    fn test_require_columns_names_all_missing() {
        let err = sample()
            .require_columns(&["IDNO", "ADIPOSITY", "ABDOMEN"])
            .unwrap_err();
        assert_eq!(
            err,
            DataError::MissingColumns(vec!["ADIPOSITY".into(), "ABDOMEN".into()])
        );
        assert!(err.to_string().contains("ADIPOSITY, ABDOMEN"));
    }

    #[test]
    fn test_design_matrix_order() {
        let x = sample().design_matrix(&["BODYFAT", "AGE"]).unwrap();
        assert_eq!(x.nrows(), 3);
        assert_eq!(x.ncols(), 2);
        assert_eq!(x[(1, 0)], 20.1);
        assert_eq!(x[(1, 1)], 45.0);
    }

    #[test]
    fn test_design_matrix_rejects_nan() {
        let ds = Dataset::from_columns(vec![("A", vec![1.0, f64::NAN])]).unwrap();
        assert_eq!(
            ds.design_matrix(&["A"]).unwrap_err(),
            DataError::NonFinite {
                column: "A".into(),
                row: 1
            }
        );
    }

    #[test]
    fn test_take_and_filter_rows() {
        let ds = sample();
        let taken = ds.take_rows(&[2, 0]).unwrap();
        assert_eq!(taken.column("IDNO").unwrap(), &[3.0, 1.0]);

        let old = ds.filter_rows("AGE", |a| a > 40.0).unwrap();
        assert_eq!(old.n_rows(), 2);

        assert!(matches!(
            ds.take_rows(&[5]),
            Err(DataError::RowOutOfBounds { index: 5, .. })
        ));
    }

    #[test]
    fn test_with_column_preserves_others() {
        let ds = sample();
        let updated = ds.with_column("BODYFAT", vec![0.0, 0.0, 0.0]).unwrap();
        assert_eq!(updated.column("BODYFAT").unwrap(), &[0.0, 0.0, 0.0]);
        assert_eq!(updated.column("AGE").unwrap(), ds.column("AGE").unwrap());
    }

    #[test]
    fn test_unique_ids() {
        let ds = sample();
        let index = ds.unique_ids("IDNO").unwrap();
        assert_eq!(index[&2], 1);

        let dup = Dataset::from_columns(vec![("IDNO", vec![1.0, 1.0])]).unwrap();
        assert_eq!(
            dup.unique_ids("IDNO").unwrap_err(),
            DataError::DuplicateIdentifier {
                column: "IDNO".into(),
                id: 1
            }
        );
    }
}
