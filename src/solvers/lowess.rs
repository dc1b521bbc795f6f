//! LOWESS (locally weighted scatterplot smoothing).
//!
//! Cleveland's robust local linear smoother: every point is refit by a
//! tricube-weighted linear regression over its `ceil(frac * n)` nearest
//! neighbors, then reweighted by bisquare robustness weights computed from
//! the residuals of the previous pass.

use thiserror::Error;

/// Errors from the smoother. Callers in this crate recover from all of them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SmoothingError {
    #[error("LOWESS needs at least {needed} finite points, got {got}")]
    TooFewPoints { needed: usize, got: usize },

    #[error("LOWESS x values span a degenerate range")]
    DegenerateRange,

    #[error("LOWESS span must be in (0, 1], got {0}")]
    InvalidSpan(f64),

    #[error("LOWESS produced non-finite values")]
    NonFinite,
}

/// Smoothed curve, sorted by `x`.
#[derive(Debug, Clone, PartialEq)]
pub struct LowessFit {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl LowessFit {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

const MIN_POINTS: usize = 3;

/// Smooth `y` against `x`.
///
/// Pairs with a non-finite coordinate are ignored. `iterations` is the number
/// of robustifying passes after the initial fit.
pub fn lowess(x: &[f64], y: &[f64], frac: f64, iterations: usize) -> Result<LowessFit, SmoothingError> {
    if !(frac > 0.0 && frac <= 1.0) {
        return Err(SmoothingError::InvalidSpan(frac));
    }

    let mut points: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(&a, &b)| (a, b))
        .collect();

    let n = points.len();
    if n < MIN_POINTS {
        return Err(SmoothingError::TooFewPoints {
            needed: MIN_POINTS,
            got: n,
        });
    }

    points.sort_by(|a, b| a.0.total_cmp(&b.0));
    let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.1).collect();

    let range = xs[n - 1] - xs[0];
    if !(range > 0.0) {
        return Err(SmoothingError::DegenerateRange);
    }

    let k = ((frac * n as f64).ceil() as usize).clamp(2, n);
    let mut robustness = vec![1.0; n];
    let mut fitted = local_fit(&xs, &ys, &robustness, k, range);
    let y_scale = ys.iter().map(|v| v.abs()).sum::<f64>() / n as f64;

    for _ in 0..iterations {
        let abs_resid: Vec<f64> = ys.iter().zip(&fitted).map(|(a, b)| (a - b).abs()).collect();
        let scale = median(&abs_resid);
        // Residuals already negligible against the response.
        if !(scale > 1e-12 * y_scale) {
            break;
        }
        for (w, r) in robustness.iter_mut().zip(&abs_resid) {
            *w = bisquare(r / (6.0 * scale));
        }
        fitted = local_fit(&xs, &ys, &robustness, k, range);
    }

    if fitted.iter().any(|v| !v.is_finite()) {
        return Err(SmoothingError::NonFinite);
    }

    Ok(LowessFit { x: xs, y: fitted })
}

/// One pass of local linear fits over sorted `xs`.
fn local_fit(xs: &[f64], ys: &[f64], robustness: &[f64], k: usize, range: f64) -> Vec<f64> {
    let n = xs.len();
    let mut out = Vec::with_capacity(n);
    let mut left = 0;

    for i in 0..n {
        let xi = xs[i];
        // Slide the k-wide window while its far end is closer than its near end.
        while left + k < n && xi - xs[left] > xs[left + k] - xi {
            left += 1;
        }
        let right = left + k - 1;
        let h = (xi - xs[left]).max(xs[right] - xi);

        let mut sw = 0.0;
        let mut swx = 0.0;
        let mut swy = 0.0;
        let mut weights = Vec::with_capacity(k);
        for j in left..=right {
            let w = if h > 0.0 {
                tricube((xs[j] - xi).abs() / h)
            } else {
                1.0
            } * robustness[j];
            weights.push(w);
            sw += w;
            swx += w * xs[j];
            swy += w * ys[j];
        }

        if !(sw > 0.0) {
            out.push(ys[i]);
            continue;
        }

        let xm = swx / sw;
        let ym = swy / sw;
        let mut sxx = 0.0;
        let mut sxy = 0.0;
        for (offset, &w) in weights.iter().enumerate() {
            let j = left + offset;
            sxx += w * (xs[j] - xm).powi(2);
            sxy += w * (xs[j] - xm) * (ys[j] - ym);
        }

        let value = if sxx > 1e-12 * range * range * sw {
            ym + sxy / sxx * (xi - xm)
        } else {
            ym
        };
        out.push(value);
    }

    out
}

/// Tricube weight: (1 - u³)³ for u in [0, 1), 0 otherwise.
fn tricube(u: f64) -> f64 {
    if (0.0..1.0).contains(&u) {
        (1.0 - u.powi(3)).powi(3)
    } else {
        0.0
    }
}

/// Bisquare weight: (1 - u²)² for |u| < 1, 0 otherwise.
fn bisquare(u: f64) -> f64 {
    if u.abs() < 1.0 {
        (1.0 - u * u).powi(2)
    } else {
        0.0
    }
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    if n == 0 {
        f64::NAN
    } else if n % 2 == 1 {
        sorted[n / 2]
    } else {
        0.5 * (sorted[n / 2 - 1] + sorted[n / 2])
    }
}
