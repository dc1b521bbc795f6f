//! Published BMI-and-age body fat formula used as the anomaly reference.
//!
//! These constants are fixed and independent of any fit on the study data;
//! the fitted estimator in [`crate::model::BodyFatEstimator`] keeps its own
//! constant set.

/// Constant term.
pub const INTERCEPT: f64 = 48.1;
/// Coefficient on 1 / BMI.
pub const INVERSE_BMI: f64 = -848.0;
/// Age coefficient of the base formula.
pub const AGE: f64 = 0.079;
/// Age adjustment for men.
pub const AGE_ADJUSTMENT: f64 = 0.05;
/// 1 / BMI adjustment for men.
pub const INVERSE_BMI_ADJUSTMENT: f64 = 39.0;

/// Reference body fat percentage for a given BMI (`ADIPOSITY`) and age.
///
/// Not finite when `adiposity` is zero.
pub fn predict_reference(adiposity: f64, age: f64) -> f64 {
    let inverse_bmi = 1.0 / adiposity;
    INTERCEPT
        + INVERSE_BMI * inverse_bmi
        + AGE * age
        + AGE_ADJUSTMENT * age
        + INVERSE_BMI_ADJUSTMENT * inverse_bmi
}
