//! Standardized and studentized residuals.

use faer::Col;

/// Standardized residuals e_i / s, with s the residual standard error.
pub fn standardized_residuals(residuals: &Col<f64>, mse: f64) -> Col<f64> {
    if mse <= 0.0 || !mse.is_finite() {
        return Col::from_fn(residuals.nrows(), |i| {
            if residuals[i].abs() < 1e-14 {
                0.0
            } else {
                f64::NAN
            }
        });
    }

    let s = mse.sqrt();
    Col::from_fn(residuals.nrows(), |i| residuals[i] / s)
}

/// Internally studentized residuals e_i / (s * sqrt(1 - h_ii)).
///
/// A point with leverage 1 has an undefined studentized residual (NaN).
pub fn studentized_residuals(residuals: &Col<f64>, leverage: &Col<f64>, mse: f64) -> Col<f64> {
    let n = residuals.nrows();

    if mse <= 0.0 || !mse.is_finite() {
        return Col::from_fn(n, |_| f64::NAN);
    }

    let s = mse.sqrt();
    Col::from_fn(n, |i| {
        let one_minus_h = 1.0 - leverage[i];
        if one_minus_h > 1e-12 {
            residuals[i] / (s * one_minus_h.sqrt())
        } else {
            f64::NAN
        }
    })
}

/// Indices with |r_i| > threshold; NaN entries never qualify.
pub fn residual_outliers(studentized: &Col<f64>, threshold: f64) -> Vec<usize> {
    studentized
        .iter()
        .enumerate()
        .filter(|(_, &r)| r.abs() > threshold)
        .map(|(i, _)| i)
        .collect()
}
