//! Prediction types for interval estimation.

use faer::Col;
use serde::{Deserialize, Serialize};

/// Type of interval to compute around a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IntervalType {
    /// Interval for the mean response at x₀; covers coefficient uncertainty only.
    Confidence,

    /// Interval for a single new observation at x₀; adds the residual variance.
    #[default]
    Prediction,
}

/// Point predictions with optional interval bounds.
#[derive(Debug, Clone)]
pub struct PredictionResult {
    /// Point predictions.
    pub fit: Col<f64>,
    /// Lower bounds of the interval.
    pub lower: Col<f64>,
    /// Upper bounds of the interval.
    pub upper: Col<f64>,
    /// Standard errors of predictions.
    pub se: Col<f64>,
}

impl PredictionResult {
    /// Point predictions only; bounds collapse onto the fit and se is zero.
    pub fn point_only(fit: Col<f64>) -> Self {
        let n = fit.nrows();
        Self {
            lower: fit.clone(),
            upper: fit.clone(),
            se: Col::zeros(n),
            fit,
        }
    }

    /// Create a new prediction result with intervals.
    pub fn with_intervals(fit: Col<f64>, lower: Col<f64>, upper: Col<f64>, se: Col<f64>) -> Self {
        Self {
            fit,
            lower,
            upper,
            se,
        }
    }

    /// Number of predictions.
    pub fn len(&self) -> usize {
        self.fit.nrows()
    }

    /// Returns true if there are no predictions.
    pub fn is_empty(&self) -> bool {
        self.fit.nrows() == 0
    }

    /// `(fit, lower, upper)` for one prediction.
    pub fn row(&self, i: usize) -> (f64, f64, f64) {
        (self.fit[i], self.lower[i], self.upper[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_only_collapses_bounds() {
        let pred = PredictionResult::point_only(Col::from_fn(3, |i| i as f64));
        assert_eq!(pred.len(), 3);
        assert_eq!(pred.row(2), (2.0, 2.0, 2.0));
        assert_eq!(pred.se[1], 0.0);
    }

    #[test]
    fn test_default_interval_type() {
        assert_eq!(IntervalType::default(), IntervalType::Prediction);
    }
}
