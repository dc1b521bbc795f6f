//! Exhaustive search over predictor subsets.

use crate::core::RegressionOptions;
use crate::diagnostics::{mean_vif, variance_inflation_factor};
use crate::solvers::{check_feature_names, FittedRegressor, OlsRegressor, RegressionError, Regressor};
use crate::utils::select_columns;
use faer::{Col, Mat};
use serde::{Deserialize, Serialize};

/// Largest candidate set the search accepts regardless of caller limits.
pub const MAX_CANDIDATES: usize = 20;

/// Score of one predictor subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsetScore {
    pub features: Vec<String>,
    /// Training R².
    #[serde(with = "crate::utils::serde_float")]
    pub r_squared: f64,
    /// Test-set root mean squared error.
    #[serde(with = "crate::utils::serde_float")]
    pub rmse: f64,
    /// Mean VIF of the subset on the training rows; NaN for one predictor.
    #[serde(with = "crate::utils::serde_float")]
    pub mean_vif: f64,
}

/// Fit OLS with intercept on every non-empty subset of the candidate columns.
///
/// Subsets are enumerated by size, then lexicographically by column index,
/// and the table is stably sorted by test RMSE ascending. `limit` bounds the
/// number of candidates (at most [`MAX_CANDIDATES`]) since the work doubles
/// with each one.
pub fn fit_all_combinations<S: AsRef<str>>(
    x_train: &Mat<f64>,
    x_test: &Mat<f64>,
    y_train: &Col<f64>,
    y_test: &Col<f64>,
    names: &[S],
    limit: usize,
) -> Result<Vec<SubsetScore>, RegressionError> {
    check_feature_names(x_train, names)?;
    check_feature_names(x_test, names)?;
    if x_test.nrows() != y_test.nrows() {
        return Err(RegressionError::DimensionMismatch {
            x_rows: x_test.nrows(),
            y_len: y_test.nrows(),
        });
    }
    if x_test.nrows() == 0 {
        return Err(RegressionError::InsufficientObservations { needed: 1, got: 0 });
    }

    let k = names.len();
    let limit = limit.min(MAX_CANDIDATES);
    if k > limit {
        return Err(RegressionError::TooManyCandidates { got: k, limit });
    }

    let regressor = OlsRegressor::new(RegressionOptions {
        compute_inference: false,
        ..Default::default()
    });

    let mut scores = Vec::with_capacity((1usize << k) - 1);
    for size in 1..=k {
        for subset in Combinations::new(k, size) {
            let features: Vec<String> = subset.iter().map(|&j| names[j].as_ref().to_string()).collect();
            let train = select_columns(x_train, &subset);
            let test = select_columns(x_test, &subset);

            let fitted = regressor
                .fit(&train, y_train)
                .map_err(|e| e.with_feature_names(&features))?;

            scores.push(SubsetScore {
                r_squared: fitted.r_squared(),
                rmse: fitted.rmse(&test, y_test),
                mean_vif: mean_vif(&variance_inflation_factor(&train)),
                features,
            });
        }
    }

    log::debug!("scored {} predictor subsets over {k} candidates", scores.len());

    scores.sort_by(|a, b| a.rmse.total_cmp(&b.rmse));
    Ok(scores)
}

/// r-element index combinations of 0..n in lexicographic order.
struct Combinations {
    n: usize,
    indices: Vec<usize>,
    done: bool,
}

impl Combinations {
    fn new(n: usize, r: usize) -> Self {
        Self {
            n,
            indices: (0..r).collect(),
            done: r > n,
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.done {
            return None;
        }
        let current = self.indices.clone();

        let r = self.indices.len();
        // Rightmost index that can still move right.
        match (0..r).rev().find(|&i| self.indices[i] < self.n - r + i) {
            Some(i) => {
                self.indices[i] += 1;
                for k in (i + 1)..r {
                    self.indices[k] = self.indices[k - 1] + 1;
                }
            }
            None => self.done = true,
        }

        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combinations_order() {
        let combos: Vec<Vec<usize>> = Combinations::new(4, 2).collect();
        assert_eq!(
            combos,
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3]
            ]
        );
        assert_eq!(Combinations::new(3, 3).count(), 1);
        assert_eq!(Combinations::new(2, 3).count(), 0);
    }

    fn data(n: usize, offset: usize) -> (Mat<f64>, Col<f64>) {
        let x = Mat::from_fn(n, 3, |i, j| {
            let t = (i + offset) as f64;
            match j {
                0 => t,
                1 => (((i + offset) * 7) % 11) as f64,
                _ => (((i + offset) * 5) % 13) as f64,
            }
        });
        let y = Col::from_fn(n, |i| 1.0 + 0.5 * x[(i, 0)] + 0.2 * x[(i, 2)] + 0.05 * ((i % 4) as f64));
        (x, y)
    }

    #[test]
    fn test_all_subsets_ranked() {
        let (x_train, y_train) = data(40, 0);
        let (x_test, y_test) = data(10, 40);

        let scores =
            fit_all_combinations(&x_train, &x_test, &y_train, &y_test, &["A", "B", "C"], 5)
                .expect("search");

        assert_eq!(scores.len(), 7);
        assert!(scores.windows(2).all(|w| w[0].rmse <= w[1].rmse));
        assert!(scores[0].features.contains(&"A".to_string()));

        let singles: Vec<&SubsetScore> = scores.iter().filter(|s| s.features.len() == 1).collect();
        assert!(singles.iter().all(|s| s.mean_vif.is_nan()));
    }

    #[test]
    fn test_candidate_limit() {
        let (x, y) = data(20, 0);
        let err = fit_all_combinations(&x, &x, &y, &y, &["A", "B", "C"], 2).unwrap_err();
        assert!(matches!(err, RegressionError::TooManyCandidates { got: 3, limit: 2 }));
    }
}
