//! Plot-ready series for the four-panel regression diagnostic view.

use crate::solvers::{lowess, LowessFit};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

/// Smoothed trend line drawn over a scatter panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmoothCurve {
    #[serde(with = "crate::utils::serde_float::seq")]
    pub x: Vec<f64>,
    #[serde(with = "crate::utils::serde_float::seq")]
    pub y: Vec<f64>,
    /// False when smoothing failed and the raw points, sorted by x, stand in.
    pub smoothed: bool,
}

/// One scatter panel: paired points plus an optional trend line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairedSeries {
    #[serde(with = "crate::utils::serde_float::seq")]
    pub x: Vec<f64>,
    #[serde(with = "crate::utils::serde_float::seq")]
    pub y: Vec<f64>,
    pub smooth: Option<SmoothCurve>,
}

/// The four classical diagnostic panels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticSeries {
    /// Fitted values vs. raw residuals.
    pub residuals_vs_fitted: PairedSeries,
    /// Theoretical normal quantiles vs. sorted studentized residuals.
    pub normal_qq: PairedSeries,
    /// Fitted values vs. sqrt(|studentized residual|).
    pub scale_location: PairedSeries,
    /// Leverage vs. studentized residuals.
    pub residuals_vs_leverage: PairedSeries,
}

/// Standard normal quantiles at `n` evenly spaced probabilities in
/// [0.001, 0.999].
pub fn normal_quantiles(n: usize) -> Vec<f64> {
    const LO: f64 = 0.001;
    const HI: f64 = 0.999;

    let Ok(normal) = Normal::new(0.0, 1.0) else {
        return vec![f64::NAN; n];
    };

    (0..n)
        .map(|i| {
            let p = if n > 1 {
                LO + (HI - LO) * i as f64 / (n - 1) as f64
            } else {
                LO
            };
            normal.inverse_cdf(p)
        })
        .collect()
}

/// Build the diagnostic panels from per-observation fit quantities.
///
/// Scatter panels other than the Q-Q plot carry a LOWESS trend with span
/// `span` and `iterations` robustness passes. A smoothing failure is logged
/// and replaced by the raw series.
pub fn diagnostic_series(
    fitted: &[f64],
    residuals: &[f64],
    studentized: &[f64],
    leverage: &[f64],
    span: f64,
    iterations: usize,
) -> DiagnosticSeries {
    let sqrt_abs: Vec<f64> = studentized.iter().map(|r| r.abs().sqrt()).collect();

    let mut sample: Vec<f64> = studentized.iter().copied().filter(|r| !r.is_nan()).collect();
    sample.sort_by(f64::total_cmp);
    let theoretical = normal_quantiles(sample.len());

    DiagnosticSeries {
        residuals_vs_fitted: smoothed_panel("residuals vs fitted", fitted, residuals, span, iterations),
        normal_qq: PairedSeries {
            x: theoretical,
            y: sample,
            smooth: None,
        },
        scale_location: smoothed_panel("scale-location", fitted, &sqrt_abs, span, iterations),
        residuals_vs_leverage: smoothed_panel(
            "residuals vs leverage",
            leverage,
            studentized,
            span,
            iterations,
        ),
    }
}

fn smoothed_panel(panel: &str, x: &[f64], y: &[f64], span: f64, iterations: usize) -> PairedSeries {
    let smooth = match lowess(x, y, span, iterations) {
        Ok(LowessFit { x, y }) => SmoothCurve {
            x,
            y,
            smoothed: true,
        },
        Err(err) => {
            log::warn!("{panel}: {err}; falling back to the unsmoothed series");
            raw_curve(x, y)
        }
    };

    PairedSeries {
        x: x.to_vec(),
        y: y.to_vec(),
        smooth: Some(smooth),
    }
}

fn raw_curve(x: &[f64], y: &[f64]) -> SmoothCurve {
    let mut pairs: Vec<(f64, f64)> = x.iter().copied().zip(y.iter().copied()).collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
    SmoothCurve {
        x: pairs.iter().map(|p| p.0).collect(),
        y: pairs.iter().map(|p| p.1).collect(),
        smoothed: false,
    }
}
