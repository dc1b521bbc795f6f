//! Iterative VIF-based pruning of predictors.

use crate::core::OptionsError;
use crate::diagnostics::variance_inflation_factor;
use crate::solvers::{check_feature_names, RegressionError};
use crate::utils::drop_column;
use faer::Mat;

/// VIFs this close to the maximum (relatively) count as tied with it.
const TIE_TOLERANCE: f64 = 1e-9;

/// Drop the highest-VIF predictor until every VIF is at most `threshold`.
///
/// Stops early once a single predictor remains. When several predictors
/// share the maximum VIF the earliest in the current column order goes
/// first. Returns the surviving feature names in their original order.
pub fn reduce_multicollinearity<S: AsRef<str>>(
    x: &Mat<f64>,
    names: &[S],
    threshold: f64,
) -> Result<Vec<String>, RegressionError> {
    if !(threshold >= 1.0) {
        return Err(OptionsError::InvalidVifThreshold(threshold).into());
    }
    check_feature_names(x, names)?;

    let mut current = x.clone();
    let mut kept: Vec<String> = names.iter().map(|n| n.as_ref().to_string()).collect();

    while kept.len() > 1 {
        let vif = variance_inflation_factor(&current);

        let max = vif.iter().copied().filter(|v| !v.is_nan()).fold(f64::NEG_INFINITY, f64::max);
        let worst = vif
            .iter()
            .position(|&v| v == max || (max.is_finite() && max - v <= TIE_TOLERANCE * max))
            .map(|j| (j, max));

        match worst {
            Some((j, v)) if v > threshold => {
                log::debug!("dropping {} (VIF {v:.3})", kept[j]);
                current = drop_column(&current, j);
                kept.remove(j);
            }
            _ => break,
        }
    }

    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn design() -> Mat<f64> {
        // Columns 0 and 2 are nearly collinear; column 1 is unrelated.
        Mat::from_fn(30, 3, |i, j| {
            let t = i as f64;
            match j {
                0 => t,
                1 => ((i * 7) % 11) as f64,
                _ => t + 0.01 * ((i * 3) % 5) as f64,
            }
        })
    }

    #[test]
    fn test_drops_collinear_feature() {
        let kept = reduce_multicollinearity(&design(), &["A", "B", "C"], 10.0).expect("valid");
        assert_eq!(kept.len(), 2);
        assert!(kept.contains(&"B".to_string()));
    }

    #[test]
    fn test_high_threshold_keeps_everything() {
        let kept = reduce_multicollinearity(&design(), &["A", "B", "C"], 1e12).expect("valid");
        assert_eq!(kept, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_tie_drops_earliest_column() {
        // Two predictors always share one VIF value.
        let x = Mat::from_fn(20, 2, |i, j| i as f64 + if j == 1 { 0.5 * (i % 3) as f64 } else { 0.0 });
        let kept = reduce_multicollinearity(&x, &["FIRST", "SECOND"], 5.0).expect("valid");
        assert_eq!(kept, vec!["SECOND"]);
    }

    #[test]
    fn test_offset_measurements_are_pruned() {
        // Unrelated deviations around large means still alias each other.
        let x = Mat::from_fn(40, 2, |i, j| {
            let t = i as f64;
            if j == 0 {
                70.0 + 3.0 * (t * 1.3).sin()
            } else {
                180.0 + 30.0 * (t * 0.7).cos()
            }
        });
        let kept = reduce_multicollinearity(&x, &["HEIGHT", "WEIGHT"], 20.0).expect("valid");
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_invalid_threshold() {
        let err = reduce_multicollinearity(&design(), &["A", "B", "C"], 0.5).unwrap_err();
        assert!(matches!(err, RegressionError::InvalidOptions(_)));
    }
}
