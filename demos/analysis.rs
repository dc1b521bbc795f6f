//! # Body Fat Analysis
//!
//! Runs the full analysis on a synthetic study with the body-fat schema:
//! anomaly screening, overall F-test, Holm selection, VIF reduction,
//! exhaustive subset search and the final AGE + ABDOMEN estimator.
//!
//! Run with: `cargo run --example analysis`

use bodyfat_analysis::anomaly::predict_reference;
use bodyfat_analysis::data::{schema, Dataset};
use bodyfat_analysis::model::BodyFatEstimator;
use bodyfat_analysis::{run_analysis, AnalysisOptions};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Body Fat Analysis ===\n");

    let dataset = synthetic_study(252)?;
    let report = run_analysis(&dataset, &AnalysisOptions::default())?;

    println!("--- Anomalies (threshold 8) ---\n");
    for a in &report.anomalies {
        println!(
            "  IDNO {:>3}: recorded {:>5.1}, reference {:>5.1}, |diff| {:>5.2}",
            a.id, a.actual, a.predicted, a.deviation
        );
    }

    let gof = &report.goodness_of_fit;
    println!("\n--- Goodness of fit (all predictors) ---\n");
    println!("  SST = {:.2}, SSE = {:.2}, SSR = {:.2}", gof.sst, gof.sse, gof.ssr);
    println!(
        "  F = {:.3} on ({}, {}) df, critical {:.3}, p = {:.3e}",
        gof.f_statistic, gof.df_model, gof.df_residual, gof.f_critical, gof.p_value
    );

    println!("\n--- Holm step-down ---\n");
    for row in &report.significance {
        println!(
            "  {:<10} p = {:.3e}  threshold = {:.4}  {}",
            row.feature,
            row.p_value,
            row.threshold,
            if row.significant { "kept" } else { "" }
        );
    }

    println!("\n--- VIF ---\n");
    for entry in &report.vif {
        println!("  {:<10} {:>8.2}", entry.feature, entry.vif);
    }
    println!("  after reduction: {:?}", report.reduced_features);

    println!("\n--- Best subsets (by test RMSE) ---\n");
    for score in report.subsets.iter().take(5) {
        println!(
            "  RMSE {:.3}  R² {:.3}  mean VIF {:>6.2}  {:?}",
            score.rmse, score.r_squared, score.mean_vif, score.features
        );
    }

    println!("\n--- Excluded before the final fit ---\n");
    for row in &report.excluded {
        println!("  IDNO {:>3}: Cook's D {:.3}", row.id, row.cooks_distance);
    }

    let model = &report.final_model;
    println!("\n--- Final model ---\n");
    println!(
        "  R² = {:.4} (test {:.4}), test RMSE = {:.3}, AIC = {:.1}",
        model.r_squared, model.test_r_squared, model.test_rmse, model.aic
    );
    for c in std::iter::once(&model.intercept).chain(&model.coefficients) {
        println!(
            "  {:<10} {:>9.4} ± {:.4}  [{:.4}, {:.4}]",
            c.term, c.estimate, c.std_error, c.conf_low, c.conf_high
        );
    }
    println!("  high leverage rows: {:?}", model.high_leverage());
    println!("  influential rows:   {:?}", model.influential());
    println!("  |t| > 2 residuals:  {:?}", model.outliers(2.0));

    println!("\n--- Estimator ---\n");
    let estimator = BodyFatEstimator::published();
    for (age, abdomen) in [(25.0, 80.0), (45.0, 95.0), (60.0, 110.0)] {
        let est = estimator.estimate(age, abdomen)?;
        println!(
            "  age {age:>4.0}, abdomen {abdomen:>5.1}: {:.1}% [{:.1}, {:.1}]",
            est.body_fat, est.lower, est.upper
        );
    }

    Ok(())
}

/// Study-shaped data with two implausible responses planted.
fn synthetic_study(n: usize) -> Result<Dataset, Box<dyn std::error::Error>> {
    let mut columns: Vec<Vec<f64>> = vec![Vec::with_capacity(n); schema::ALL_COLUMNS.len()];

    for i in 0..n {
        let t = i as f64;
        let wobble = |k: f64| (t * k).sin();

        let age = 45.0 + 20.0 * wobble(0.37);
        let height = 70.0 + 2.5 * wobble(1.11);
        let weight = 180.0 + 30.0 * wobble(0.73);
        let adiposity = 703.0 * weight / (height * height);
        let abdomen = 2.6 * adiposity + 25.0 + 5.0 * wobble(2.03);
        let mut bodyfat = predict_reference(adiposity, age) + 0.4 * (abdomen - 2.6 * adiposity - 25.0);
        if i == 171 {
            bodyfat = 0.0;
        } else if i == 181 {
            bodyfat = 1.9;
        }

        let row = [
            t + 1.0,
            bodyfat,
            495.0 / (bodyfat + 450.0),
            age,
            weight,
            height,
            adiposity,
            0.08 * weight + 23.0 + wobble(3.1),
            0.9 * abdomen + 15.0 + 3.0 * wobble(1.7),
            abdomen,
            0.4 * abdomen + 0.2 * weight + 27.0 + 2.0 * wobble(2.9),
            0.15 * weight + 32.0 + 2.0 * wobble(0.53),
            0.05 * weight + 29.5 + wobble(4.3),
            22.0 + wobble(5.7),
            0.06 * weight + 21.5 + 1.5 * wobble(6.1),
            28.5 + 1.2 * wobble(7.3),
            18.0 + 0.6 * wobble(8.9),
        ];
        for (column, value) in columns.iter_mut().zip(row) {
            column.push(value);
        }
    }

    Ok(Dataset::from_columns(
        schema::ALL_COLUMNS.iter().copied().zip(columns),
    )?)
}
