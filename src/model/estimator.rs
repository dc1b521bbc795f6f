//! Two-predictor body fat estimator behind the estimation page.

use super::FittedModel;
use crate::data::schema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from [`BodyFatEstimator`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimateError {
    #[error("age {0} is below the validated minimum of 21 years")]
    AgeOutOfRange(f64),

    #[error("abdomen circumference {0} cm is below the validated minimum of 38 cm")]
    AbdomenOutOfRange(f64),

    #[error("estimator inputs must be finite")]
    NonFinite,

    #[error("model must use exactly the AGE and ABDOMEN predictors, got {0:?}")]
    UnsupportedModel(Vec<String>),
}

/// Youngest age the estimator was validated for.
pub const MIN_AGE: f64 = 21.0;
/// Smallest abdomen circumference (cm) the estimator accepts.
pub const MIN_ABDOMEN: f64 = 38.0;
/// Normal quantile for the approximate 95% band.
pub const Z_95: f64 = 1.96;

/// Point estimate with an approximate 95% band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub body_fat: f64,
    pub lower: f64,
    pub upper: f64,
    pub std_error: f64,
}

/// Linear model `intercept + age * AGE + abdomen * ABDOMEN`.
///
/// The band combines the coefficient standard errors as if independent:
/// se² = se_int² + (AGE * se_age)² + (ABDOMEN * se_abd)².
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyFatEstimator {
    pub intercept: f64,
    pub age: f64,
    pub abdomen: f64,
    pub intercept_se: f64,
    pub age_se: f64,
    pub abdomen_se: f64,
}

impl Default for BodyFatEstimator {
    fn default() -> Self {
        Self::published()
    }
}

impl BodyFatEstimator {
    /// Coefficients published with the study's final AGE + ABDOMEN model.
    pub const fn published() -> Self {
        Self {
            intercept: -31.8595,
            age: 0.0554,
            abdomen: 0.5281,
            intercept_se: 2.41157,
            age_se: 0.02644,
            abdomen_se: 0.02139,
        }
    }

    /// Take the coefficients of a model fit on AGE and ABDOMEN.
    pub fn from_model(model: &FittedModel) -> Result<Self, EstimateError> {
        let unsupported = || EstimateError::UnsupportedModel(model.features.clone());
        if model.features.len() != 2 {
            return Err(unsupported());
        }
        let age = model.coefficient(schema::AGE).ok_or_else(unsupported)?;
        let abdomen = model.coefficient(schema::ABDOMEN).ok_or_else(unsupported)?;

        Ok(Self {
            intercept: model.intercept.estimate,
            age: age.estimate,
            abdomen: abdomen.estimate,
            intercept_se: model.intercept.std_error,
            age_se: age.std_error,
            abdomen_se: abdomen.std_error,
        })
    }

    /// Estimate body fat percentage from age (years) and abdomen circumference (cm).
    pub fn estimate(&self, age: f64, abdomen: f64) -> Result<Estimate, EstimateError> {
        if !age.is_finite() || !abdomen.is_finite() {
            return Err(EstimateError::NonFinite);
        }
        if age < MIN_AGE {
            return Err(EstimateError::AgeOutOfRange(age));
        }
        if abdomen < MIN_ABDOMEN {
            return Err(EstimateError::AbdomenOutOfRange(abdomen));
        }

        let body_fat = self.intercept + self.age * age + self.abdomen * abdomen;
        let std_error = (self.intercept_se.powi(2)
            + (age * self.age_se).powi(2)
            + (abdomen * self.abdomen_se).powi(2))
        .sqrt();

        Ok(Estimate {
            body_fat,
            lower: body_fat - Z_95 * std_error,
            upper: body_fat + Z_95 * std_error,
            std_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_published_estimate() {
        let est = BodyFatEstimator::published()
            .estimate(40.0, 90.0)
            .expect("valid inputs");

        let expected = -31.8595 + 0.0554 * 40.0 + 0.5281 * 90.0;
        assert!((est.body_fat - expected).abs() < 1e-12);
        assert!((est.upper - est.body_fat - 1.96 * est.std_error).abs() < 1e-12);
        assert!(est.lower < est.body_fat);
    }

    #[test]
    fn test_rejects_out_of_range_inputs() {
        let estimator = BodyFatEstimator::default();
        assert_eq!(
            estimator.estimate(20.0, 90.0),
            Err(EstimateError::AgeOutOfRange(20.0))
        );
        assert_eq!(
            estimator.estimate(30.0, 37.5),
            Err(EstimateError::AbdomenOutOfRange(37.5))
        );
        assert_eq!(estimator.estimate(f64::NAN, 90.0), Err(EstimateError::NonFinite));
    }

    #[test]
    fn test_boundary_inputs_are_accepted() {
        assert!(BodyFatEstimator::default().estimate(MIN_AGE, MIN_ABDOMEN).is_ok());
    }
}
