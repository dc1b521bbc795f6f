//! Reference-model anomaly screening of the response column.

use super::reference::predict_reference;
use crate::data::{schema, DataError, Dataset};
use serde::{Deserialize, Serialize};

/// A row whose recorded body fat deviates from the reference formula by more
/// than the screening threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyRecord {
    pub id: i64,
    pub actual: f64,
    pub predicted: f64,
    /// |actual - predicted|
    pub deviation: f64,
}

/// Flag every row with |BODYFAT - reference(ADIPOSITY, AGE)| > `threshold`.
///
/// Records are returned in row order. Rows whose reference prediction is
/// not finite (zero BMI) are skipped. Fails naming every missing column
/// among IDNO, BODYFAT, ADIPOSITY and AGE.
pub fn find_anomalies(dataset: &Dataset, threshold: f64) -> Result<Vec<AnomalyRecord>, DataError> {
    dataset.require_columns(&[schema::IDNO, schema::BODYFAT, schema::ADIPOSITY, schema::AGE])?;

    let ids = dataset.column(schema::IDNO)?;
    let bodyfat = dataset.column(schema::BODYFAT)?;
    let adiposity = dataset.column(schema::ADIPOSITY)?;
    let age = dataset.column(schema::AGE)?;

    let mut anomalies = Vec::new();
    let mut skipped = 0usize;
    for row in 0..dataset.n_rows() {
        let predicted = predict_reference(adiposity[row], age[row]);
        let deviation = (bodyfat[row] - predicted).abs();
        if !deviation.is_finite() {
            skipped += 1;
            continue;
        }

        if deviation > threshold {
            anomalies.push(AnomalyRecord {
                id: ids[row].round() as i64,
                actual: bodyfat[row],
                predicted,
                deviation,
            });
        }
    }

    if skipped > 0 {
        log::debug!("anomaly screen skipped {skipped} row(s) without a finite reference value");
    }
    log::debug!(
        "anomaly screen flagged {} of {} rows at threshold {threshold}",
        anomalies.len(),
        dataset.n_rows()
    );

    Ok(anomalies)
}

/// Replace the response of every flagged row with its reference prediction.
///
/// Rows are matched on IDNO, which must be unique. Row order and all other
/// columns are preserved; anomalies whose identifier is absent are ignored.
pub fn clean_df(dataset: &Dataset, anomalies: &[AnomalyRecord]) -> Result<Dataset, DataError> {
    dataset.require_columns(&[schema::IDNO, schema::BODYFAT])?;
    let rows_by_id = dataset.unique_ids(schema::IDNO)?;

    let mut bodyfat = dataset.column(schema::BODYFAT)?.to_vec();
    let mut replaced = 0usize;
    for record in anomalies {
        match rows_by_id.get(&record.id) {
            Some(&row) => {
                bodyfat[row] = record.predicted;
                replaced += 1;
            }
            None => log::debug!("anomaly for unknown identifier {} ignored", record.id),
        }
    }
    log::debug!("cleaning replaced {replaced} response value(s)");

    dataset.with_column(schema::BODYFAT, bodyfat)
}
