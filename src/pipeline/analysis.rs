//! End-to-end analysis of a body fat dataset.

use crate::anomaly::{clean_df, find_anomalies, AnomalyRecord};
use crate::core::AnalysisOptions;
use crate::data::{
    correlation_matrix, schema, summarize, train_test_split, zscore_outliers, CorrelationMatrix,
    Dataset, SummaryStatistics,
};
use crate::diagnostics::{vif_table, DiagnosticSeries, VifEntry};
use crate::inference::{overall_f_test, FTestSummary};
use crate::model::{diagnostics, fit, fit_datasets, FittedModel};
use crate::selection::{
    fit_all_combinations, reduce_multicollinearity, significant_features, SignificanceResult,
    SubsetScore,
};
use crate::solvers::RegressionError;
use faer::{Col, Mat};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// |z| above which a value is listed in [`ColumnSummary::outliers`].
const ZSCORE_CUTOFF: f64 = 3.0;

/// Descriptive statistics of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub column: String,
    pub statistics: SummaryStatistics,
    /// Rows with |z| > 3.
    pub outliers: Vec<usize>,
}

/// A row left out of the final fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcludedRow {
    pub id: i64,
    /// Cook's distance under the best subset fit on every cleaned row.
    #[serde(with = "crate::utils::serde_float")]
    pub cooks_distance: f64,
    /// Listed in [`AnalysisOptions::excluded_ids`].
    pub configured: bool,
}

/// Everything the dashboard pages render, computed in one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Rows flagged against the reference formula.
    pub anomalies: Vec<AnomalyRecord>,
    /// Input with flagged responses replaced by their reference values.
    pub cleaned: Dataset,
    /// Response and candidate predictors of the cleaned data.
    pub summaries: Vec<ColumnSummary>,
    pub correlations: CorrelationMatrix,
    /// Overall F-test on the screening predictors.
    pub goodness_of_fit: FTestSummary,
    /// Holm table over the screening predictors.
    pub significance: Vec<SignificanceResult>,
    /// Predictors accepted by the Holm procedure.
    pub significant_features: Vec<String>,
    /// Predictors left after VIF reduction.
    pub reduced_features: Vec<String>,
    pub vif: Vec<VifEntry>,
    /// Subset search table, best (lowest test RMSE) first.
    pub subsets: Vec<SubsetScore>,
    /// Influential or configured rows dropped before the final fit.
    pub excluded: Vec<ExcludedRow>,
    /// Model refit on the best subset without the excluded rows.
    pub final_model: FittedModel,
    pub diagnostics: DiagnosticSeries,
}

/// Run the full analysis on `dataset`.
///
/// Anomalies are screened and cleaned first; every later stage works on the
/// cleaned data. The F-test and the Holm procedure use
/// [`AnalysisOptions::screening_features`]. The subset search runs over
/// [`AnalysisOptions::subset_candidates`], or over the Holm-accepted
/// predictors when that list is empty. Rows past the Cook's distance cutoff
/// under the best subset, and configured IDs, are dropped and the remainder
/// is split again for the final fit.
pub fn run_analysis(
    dataset: &Dataset,
    options: &AnalysisOptions,
) -> Result<AnalysisReport, RegressionError> {
    options.validate()?;
    dataset.require_columns(&[schema::IDNO, schema::BODYFAT, schema::ADIPOSITY, schema::AGE])?;
    dataset.require_columns(&options.screening_features)?;
    dataset.require_columns(&options.subset_candidates)?;

    let anomalies = find_anomalies(dataset, options.anomaly_threshold)?;
    let cleaned = clean_df(dataset, &anomalies)?;
    log::info!(
        "{} of {} rows flagged at threshold {}",
        anomalies.len(),
        dataset.n_rows(),
        options.anomaly_threshold
    );

    let predictors = schema::candidate_predictors(&cleaned);
    let x = cleaned.design_matrix(&predictors)?;
    let y = cleaned.vector(schema::BODYFAT)?;

    let mut summary_columns = vec![schema::BODYFAT.to_string()];
    summary_columns.extend(predictors.iter().cloned());
    let summaries = summary_columns
        .iter()
        .map(|column| {
            let values = cleaned.column(column)?;
            Ok(ColumnSummary {
                column: column.clone(),
                statistics: summarize(values)?,
                outliers: zscore_outliers(values, ZSCORE_CUTOFF),
            })
        })
        .collect::<Result<Vec<_>, RegressionError>>()?;
    let correlations = correlation_matrix(&cleaned, &summary_columns)?;

    let screening = if options.screening_features.is_empty() {
        predictors.clone()
    } else {
        options.screening_features.clone()
    };
    let x_screening = cleaned.design_matrix(&screening)?;
    let goodness_of_fit = overall_f_test(&x_screening, &y, options.significance_level)
        .map_err(|e| e.with_feature_names(&screening))?;
    let (accepted, significance) =
        significant_features(&x_screening, &y, &screening, options.significance_level)?;
    log::info!("Holm procedure accepted {accepted:?}");

    let reduced_features = reduce_multicollinearity(&x, &predictors, options.vif_threshold)?;
    let vif = vif_table(&cleaned, &predictors)?;

    let candidates = if options.subset_candidates.is_empty() {
        accepted.clone()
    } else {
        options.subset_candidates.clone()
    };
    if candidates.is_empty() {
        return Err(RegressionError::EmptyFeatureSet);
    }

    let (train, test) = train_test_split(&cleaned, options.test_fraction, options.split_seed)?;
    let subsets = fit_all_combinations(
        &train.design_matrix(&candidates)?,
        &test.design_matrix(&candidates)?,
        &train.vector(schema::BODYFAT)?,
        &test.vector(schema::BODYFAT)?,
        &candidates,
        options.max_subset_candidates,
    )?;

    let best = subsets.first().ok_or(RegressionError::EmptyFeatureSet)?;
    log::info!("best subset {:?} with test RMSE {:.4}", best.features, best.rmse);

    let excluded = influential_rows(&cleaned, &best.features, options)?;
    let (train, test) = if excluded.is_empty() {
        (train, test)
    } else {
        let dropped: HashSet<i64> = excluded.iter().map(|r| r.id).collect();
        log::info!("excluding IDNO {dropped:?} before the final fit");
        let retained =
            cleaned.filter_rows(schema::IDNO, |id| !dropped.contains(&(id.round() as i64)))?;
        train_test_split(&retained, options.test_fraction, options.split_seed)?
    };

    let final_model = fit_datasets(
        &train,
        &test,
        &best.features,
        schema::BODYFAT,
        &options.regression_options(),
    )?;
    let diagnostics = diagnostics(&final_model, options.lowess_span, options.lowess_iterations);

    Ok(AnalysisReport {
        anomalies,
        cleaned,
        summaries,
        correlations,
        goodness_of_fit,
        significance,
        significant_features: accepted,
        reduced_features,
        vif,
        subsets,
        excluded,
        final_model,
        diagnostics,
    })
}

/// Rows past the Cook's distance cutoff or listed by IDNO.
///
/// Distances come from `features` fit on every row of `data`.
fn influential_rows(
    data: &Dataset,
    features: &[String],
    options: &AnalysisOptions,
) -> Result<Vec<ExcludedRow>, RegressionError> {
    if options.cooks_cutoff.is_none() && options.excluded_ids.is_empty() {
        return Ok(Vec::new());
    }

    let model = fit(
        &data.design_matrix(features)?,
        &data.vector(schema::BODYFAT)?,
        &Mat::zeros(0, features.len()),
        &Col::zeros(0),
        features,
        &options.regression_options(),
    )?;
    let cutoff = options.cooks_cutoff.unwrap_or(f64::INFINITY);

    Ok(data
        .column(schema::IDNO)?
        .iter()
        .zip(&model.cooks_distance)
        .filter_map(|(&raw, &distance)| {
            let id = raw.round() as i64;
            let configured = options.excluded_ids.contains(&id);
            (configured || distance > cutoff).then_some(ExcludedRow {
                id,
                cooks_distance: distance,
                configured,
            })
        })
        .collect())
}
