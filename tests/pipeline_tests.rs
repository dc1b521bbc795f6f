//! End-to-end tests of the analysis pipeline.

use approx::assert_relative_eq;
use bodyfat_analysis::data::{schema, DataError};
use bodyfat_analysis::{run_analysis, AnalysisOptions, AnalysisReport, Dataset, RegressionError};

mod common;

fn study() -> Dataset {
    let ds = common::generate_bodyfat_dataset(252, 2024);
    common::with_bodyfat(&ds, &[(171, 0.0), (181, 1.9)])
}

#[test]
fn test_full_analysis_with_defaults() {
    let ds = study();
    let report = run_analysis(&ds, &AnalysisOptions::default()).expect("analysis runs");

    let ids: Vec<i64> = report.anomalies.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![172, 182]);
    let cleaned = report.cleaned.column(schema::BODYFAT).unwrap();
    assert_eq!(cleaned[171], report.anomalies[0].predicted);
    assert_eq!(report.cleaned.n_rows(), 252);

    // BODYFAT plus fourteen candidate predictors.
    assert_eq!(report.summaries.len(), 15);
    assert_eq!(report.summaries[0].column, schema::BODYFAT);
    assert!(report.summaries.iter().all(|s| s.statistics.count == 252));
    assert!(report
        .summaries
        .iter()
        .flat_map(|s| &s.outliers)
        .all(|&row| row < 252));
    assert_eq!(report.correlations.get(schema::BODYFAT, schema::BODYFAT), Some(1.0));

    // Screening runs on the five default predictors.
    assert!(report.goodness_of_fit.is_significant());
    assert_eq!(report.goodness_of_fit.df_model, 5);
    assert_eq!(report.significance.len(), 5);
    assert!(report.significant_features.iter().any(|f| f == schema::ABDOMEN));

    assert!(!report.reduced_features.is_empty());
    assert_eq!(report.vif.len(), 14);

    assert_eq!(report.subsets.len(), 31);
    assert!(report.subsets.windows(2).all(|w| w[0].rmse <= w[1].rmse));
    assert_eq!(report.final_model.features, report.subsets[0].features);
    assert!(report.excluded.is_empty());
    assert_eq!(report.final_model.n_train, 201);
    assert_eq!(report.final_model.n_test, 51);
    assert!((report.final_model.test_rmse - report.subsets[0].rmse).abs() < 1e-9);

    assert_eq!(report.diagnostics.residuals_vs_fitted.x.len(), 201);
    assert_eq!(report.diagnostics.normal_qq.x.len(), 201);
}

#[test]
fn test_analysis_is_deterministic() {
    let ds = study();
    let options = AnalysisOptions::default();
    let a = run_analysis(&ds, &options).unwrap();
    let b = run_analysis(&ds, &options).unwrap();

    assert_eq!(a.final_model.features, b.final_model.features);
    assert_eq!(a.final_model.test_rmse, b.final_model.test_rmse);
    assert_eq!(a.subsets, b.subsets);
}

#[test]
fn test_subset_search_falls_back_to_accepted_features() {
    let ds = study();
    let options = AnalysisOptions::builder()
        .subset_candidates(std::iter::empty::<&str>())
        .build()
        .unwrap();

    let report = run_analysis(&ds, &options).unwrap();
    let k = report.significant_features.len();
    assert_eq!(report.subsets.len(), (1 << k) - 1);
    assert!(report
        .final_model
        .features
        .iter()
        .all(|f| report.significant_features.contains(f)));
}

#[test]
fn test_screening_over_all_predictors() {
    let options = AnalysisOptions::builder()
        .screening_features(std::iter::empty::<&str>())
        .build()
        .unwrap();
    let report = run_analysis(&study(), &options).unwrap();

    assert_eq!(report.goodness_of_fit.df_model, 14);
    assert_eq!(report.significance.len(), 14);
}

#[test]
fn test_configured_ids_are_excluded_from_final_fit() {
    let options = AnalysisOptions::builder()
        .cooks_cutoff(None)
        .excluded_ids([40, 9999])
        .build()
        .unwrap();
    let report = run_analysis(&study(), &options).unwrap();

    assert_eq!(report.excluded.len(), 1);
    assert_eq!(report.excluded[0].id, 40);
    assert!(report.excluded[0].configured);
    assert!(report.excluded[0].cooks_distance >= 0.0);
    assert_eq!(report.final_model.n_train + report.final_model.n_test, 251);
    assert_eq!(report.cleaned.n_rows(), 252);
}

#[test]
fn test_influential_row_is_excluded_from_final_fit() {
    // One impossible waist measurement with an ordinary body fat reading.
    let ds = study();
    let mut abdomen = ds.column(schema::ABDOMEN).unwrap().to_vec();
    abdomen[100] = 300.0;
    let ds = ds.with_column(schema::ABDOMEN, abdomen).unwrap();

    let options = AnalysisOptions::builder()
        .subset_candidates([schema::ABDOMEN])
        .build()
        .unwrap();
    let report = run_analysis(&ds, &options).unwrap();

    let ids: Vec<i64> = report.excluded.iter().map(|r| r.id).collect();
    assert!(ids.contains(&101));
    assert!(report
        .excluded
        .iter()
        .all(|r| !r.configured && r.cooks_distance > 0.5));
    assert_eq!(
        report.final_model.n_train + report.final_model.n_test,
        252 - report.excluded.len()
    );

    let without = AnalysisOptions::builder()
        .subset_candidates([schema::ABDOMEN])
        .cooks_cutoff(None)
        .build()
        .unwrap();
    let kept = run_analysis(&ds, &without).unwrap();
    assert!(kept.excluded.is_empty());
    assert_eq!(kept.final_model.n_train + kept.final_model.n_test, 252);
}

#[test]
fn test_invalid_options_are_rejected() {
    let ds = study();
    let options = AnalysisOptions {
        vif_threshold: 0.5,
        ..Default::default()
    };

    assert!(matches!(
        run_analysis(&ds, &options),
        Err(RegressionError::InvalidOptions(_))
    ));
}

#[test]
fn test_missing_candidate_column_is_reported() {
    let ds = study();
    let options = AnalysisOptions::builder()
        .subset_candidates(["AGE", "WAIST"])
        .build()
        .unwrap();

    match run_analysis(&ds, &options) {
        Err(RegressionError::Data(DataError::MissingColumns(missing))) => {
            assert_eq!(missing, vec!["WAIST"]);
        }
        other => panic!("expected missing column, got {:?}", other.map(|r| r.final_model.features)),
    }
}

#[test]
fn test_report_serializes_to_json() {
    let report = run_analysis(&study(), &AnalysisOptions::default()).unwrap();
    let json = serde_json::to_value(&report).expect("serializable");

    assert!(json["final_model"]["coefficients"].is_array());
    assert_eq!(json["anomalies"].as_array().map(Vec::len), Some(2));
}

#[test]
fn test_report_json_round_trip_keeps_undefined_statistics() {
    let report = run_analysis(&study(), &AnalysisOptions::default()).unwrap();
    let json = serde_json::to_string(&report).expect("serializable");
    let restored: AnalysisReport = serde_json::from_str(&json).expect("deserializable");

    assert_eq!(restored.anomalies.len(), report.anomalies.len());
    for (a, b) in restored.anomalies.iter().zip(&report.anomalies) {
        assert_eq!(a.id, b.id);
        assert_relative_eq!(a.predicted, b.predicted, max_relative = 1e-14);
    }
    assert_eq!(restored.final_model.features, report.final_model.features);
    assert_eq!(restored.subsets.len(), report.subsets.len());
    for (a, b) in restored.subsets.iter().zip(&report.subsets) {
        assert_eq!(a.features, b.features);
        assert_eq!(a.mean_vif.is_nan(), b.mean_vif.is_nan());
        assert_relative_eq!(a.rmse, b.rmse, max_relative = 1e-14);
    }
    assert!(restored
        .subsets
        .iter()
        .any(|s| s.features.len() == 1 && s.mean_vif.is_nan()));
    assert_relative_eq!(
        restored.final_model.test_rmse,
        report.final_model.test_rmse,
        max_relative = 1e-14
    );
    assert_eq!(restored.cleaned.n_rows(), report.cleaned.n_rows());
}

