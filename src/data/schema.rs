//! Column names of the body-fat measurement study.

use super::Dataset;

/// Row identifier.
pub const IDNO: &str = "IDNO";
/// Body fat percentage (response).
pub const BODYFAT: &str = "BODYFAT";
/// Underwater-weighing density the response was derived from.
pub const DENSITY: &str = "DENSITY";
/// Age in years.
pub const AGE: &str = "AGE";
/// Weight in pounds.
pub const WEIGHT: &str = "WEIGHT";
/// Height in inches.
pub const HEIGHT: &str = "HEIGHT";
/// Body mass index.
pub const ADIPOSITY: &str = "ADIPOSITY";
pub const NECK: &str = "NECK";
pub const CHEST: &str = "CHEST";
pub const ABDOMEN: &str = "ABDOMEN";
pub const HIP: &str = "HIP";
pub const THIGH: &str = "THIGH";
pub const KNEE: &str = "KNEE";
pub const ANKLE: &str = "ANKLE";
pub const BICEPS: &str = "BICEPS";
pub const FOREARM: &str = "FOREARM";
pub const WRIST: &str = "WRIST";

/// Full column set in file order.
pub const ALL_COLUMNS: [&str; 17] = [
    IDNO, BODYFAT, DENSITY, AGE, WEIGHT, HEIGHT, ADIPOSITY, NECK, CHEST, ABDOMEN, HIP, THIGH,
    KNEE, ANKLE, BICEPS, FOREARM, WRIST,
];

/// Columns that are never used as predictors.
const NON_PREDICTORS: [&str; 3] = [IDNO, BODYFAT, DENSITY];

/// Candidate predictor columns present in `dataset`, in column order.
pub fn candidate_predictors(dataset: &Dataset) -> Vec<String> {
    dataset
        .column_names()
        .iter()
        .filter(|name| !NON_PREDICTORS.contains(&name.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_predictors_skip_id_and_response() {
        let ds = Dataset::from_columns(vec![
            (IDNO, vec![1.0]),
            (BODYFAT, vec![12.0]),
            (DENSITY, vec![1.07]),
            (AGE, vec![30.0]),
            (ABDOMEN, vec![85.0]),
        ])
        .unwrap();

        assert_eq!(candidate_predictors(&ds), vec![AGE, ABDOMEN]);
    }
}
