//! Influence measures.

use faer::Col;

/// Cook's distance for each observation.
///
/// D_i = (e_i² / (p * MSE)) * (h_ii / (1 - h_ii)²), with p the number of
/// parameters including the intercept.
pub fn cooks_distance(
    residuals: &Col<f64>,
    leverage: &Col<f64>,
    mse: f64,
    n_params: usize,
) -> Col<f64> {
    let n = residuals.nrows();

    if mse <= 0.0 || !mse.is_finite() || n_params == 0 {
        return Col::from_fn(n, |_| f64::NAN);
    }

    Col::from_fn(n, |i| {
        let e_i = residuals[i];
        let h_ii = leverage[i];
        let one_minus_h = 1.0 - h_ii;
        if one_minus_h <= 1e-12 {
            return f64::NAN;
        }

        let d_i = (e_i * e_i / (n_params as f64 * mse)) * (h_ii / (one_minus_h * one_minus_h));
        if d_i.is_finite() {
            d_i.max(0.0)
        } else {
            f64::NAN
        }
    })
}

/// Indices with D_i above `threshold`, by default 4/n.
pub fn influential_cooks(cooks_d: &Col<f64>, threshold: Option<f64>) -> Vec<usize> {
    let n = cooks_d.nrows();
    let cutoff = threshold.unwrap_or(4.0 / n as f64);

    cooks_d
        .iter()
        .enumerate()
        .filter(|(_, &d)| d.is_finite() && d > cutoff)
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooks_distance_formula() {
        let e = Col::from_fn(2, |i| if i == 0 { 2.0 } else { 0.0 });
        let h = Col::from_fn(2, |_| 0.5);
        let d = cooks_distance(&e, &h, 1.0, 2);

        // (4 / 2) * (0.5 / 0.25)
        assert!((d[0] - 4.0).abs() < 1e-12);
        assert_eq!(d[1], 0.0);
    }

    #[test]
    fn test_cooks_distance_undefined_variance() {
        let e = Col::from_fn(3, |_| 1.0);
        let h = Col::from_fn(3, |_| 0.3);
        assert!(cooks_distance(&e, &h, 0.0, 2).iter().all(|d| d.is_nan()));
    }

    #[test]
    fn test_influential_cooks_default_cutoff() {
        let d = Col::from_fn(8, |i| if i == 5 { 0.9 } else { 0.01 });
        assert_eq!(influential_cooks(&d, None), vec![5]);
        assert_eq!(influential_cooks(&d, Some(1.0)), Vec::<usize>::new());
    }
}
