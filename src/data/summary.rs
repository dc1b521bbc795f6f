//! Descriptive statistics for exploratory analysis.

use super::{DataError, Dataset};
use serde::{Deserialize, Serialize};

/// Descriptive statistics of one numeric column.
///
/// Variance and standard deviation are population moments; skewness and
/// kurtosis are the biased moment estimators, kurtosis reported as excess.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub count: usize,
    #[serde(with = "crate::utils::serde_float")]
    pub min: f64,
    #[serde(with = "crate::utils::serde_float")]
    pub q1: f64,
    #[serde(with = "crate::utils::serde_float")]
    pub median: f64,
    #[serde(with = "crate::utils::serde_float")]
    pub q3: f64,
    #[serde(with = "crate::utils::serde_float")]
    pub max: f64,
    #[serde(with = "crate::utils::serde_float")]
    pub range: f64,
    #[serde(with = "crate::utils::serde_float")]
    pub mean: f64,
    #[serde(with = "crate::utils::serde_float")]
    pub variance: f64,
    #[serde(with = "crate::utils::serde_float")]
    pub std_dev: f64,
    #[serde(with = "crate::utils::serde_float")]
    pub iqr: f64,
    #[serde(with = "crate::utils::serde_float")]
    pub skewness: f64,
    #[serde(with = "crate::utils::serde_float")]
    pub kurtosis: f64,
}

/// Pearson correlations between named columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major `k × k` coefficients.
    #[serde(with = "crate::utils::serde_float::nested")]
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Correlation between two named columns, if both are present.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[i][j])
    }
}

/// Percentile with linear interpolation between order statistics.
///
/// `sorted` must be non-empty and ascending; `q` is in [0, 1].
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Summarize a column of values. NaN entries are dropped first.
pub fn summarize(values: &[f64]) -> Result<SummaryStatistics, DataError> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return Err(DataError::Empty);
    }
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len() as f64;
    let mean = sorted.iter().sum::<f64>() / n;

    let (m2, m3, m4) = sorted.iter().fold((0.0, 0.0, 0.0), |(m2, m3, m4), &v| {
        let d = v - mean;
        let d2 = d * d;
        (m2 + d2, m3 + d2 * d, m4 + d2 * d2)
    });
    let (m2, m3, m4) = (m2 / n, m3 / n, m4 / n);

    let (skewness, kurtosis) = if m2 > 0.0 {
        (m3 / m2.powf(1.5), m4 / (m2 * m2) - 3.0)
    } else {
        (f64::NAN, f64::NAN)
    };

    let min = sorted[0];
    let max = sorted[sorted.len() - 1];
    let q1 = percentile(&sorted, 0.25);
    let q3 = percentile(&sorted, 0.75);

    Ok(SummaryStatistics {
        count: sorted.len(),
        min,
        q1,
        median: percentile(&sorted, 0.5),
        q3,
        max,
        range: max - min,
        mean,
        variance: m2,
        std_dev: m2.sqrt(),
        iqr: q3 - q1,
        skewness,
        kurtosis,
    })
}

/// Indices whose absolute z-score exceeds `cutoff`.
pub fn zscore_outliers(values: &[f64], cutoff: f64) -> Vec<usize> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let sd = (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64).sqrt();
    if sd <= 0.0 || !sd.is_finite() {
        return Vec::new();
    }

    values
        .iter()
        .enumerate()
        .filter(|(_, &v)| ((v - mean) / sd).abs() > cutoff)
        .map(|(i, _)| i)
        .collect()
}

fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len() as f64;
    let mean_a = a.iter().sum::<f64>() / n;
    let mean_b = b.iter().sum::<f64>() / n;

    let mut sab = 0.0;
    let mut saa = 0.0;
    let mut sbb = 0.0;
    for (&x, &y) in a.iter().zip(b) {
        let dx = x - mean_a;
        let dy = y - mean_b;
        sab += dx * dy;
        saa += dx * dx;
        sbb += dy * dy;
    }

    if saa > 0.0 && sbb > 0.0 {
        sab / (saa * sbb).sqrt()
    } else {
        f64::NAN
    }
}

/// Pearson correlation matrix of the selected columns.
pub fn correlation_matrix<S: AsRef<str>>(
    dataset: &Dataset,
    columns: &[S],
) -> Result<CorrelationMatrix, DataError> {
    dataset.require_columns(columns)?;
    let data: Vec<&[f64]> = columns
        .iter()
        .map(|c| dataset.column(c.as_ref()))
        .collect::<Result<_, _>>()?;

    let k = data.len();
    let mut values = vec![vec![0.0; k]; k];
    for i in 0..k {
        values[i][i] = if pearson(data[i], data[i]).is_nan() {
            f64::NAN
        } else {
            1.0
        };
        for j in (i + 1)..k {
            let r = pearson(data[i], data[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        columns: columns.iter().map(|c| c.as_ref().to_string()).collect(),
        values,
    })
}
