//! Common test utilities and data generators.
#![allow(dead_code)]

use bodyfat_analysis::anomaly::predict_reference;
use bodyfat_analysis::data::{schema, Dataset};
use faer::{Col, Mat};

/// Deterministic uniform noise in [-1, 1).
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((self.0 >> 33) as f64) / (u32::MAX as f64) * 2.0 - 1.0
    }
}

/// Generate a synthetic body-fat study with the full column schema.
///
/// BODYFAT follows the reference formula plus an abdomen effect and noise,
/// so no row deviates from the reference by more than about 3.5 points.
pub fn generate_bodyfat_dataset(n: usize, seed: u64) -> Dataset {
    let mut rng = Lcg(seed);
    let mut cols: Vec<Vec<f64>> = vec![Vec::with_capacity(n); schema::ALL_COLUMNS.len()];

    for i in 0..n {
        let age = 45.0 + 22.0 * rng.next();
        let height = 70.0 + 3.0 * rng.next();
        let weight = 180.0 + 35.0 * rng.next();
        let adiposity = 703.0 * weight / (height * height);
        let waist_noise = rng.next();
        let abdomen = 2.6 * adiposity + 25.0 + 6.0 * waist_noise;
        let bodyfat = predict_reference(adiposity, age) + 2.4 * waist_noise + 0.8 * rng.next();

        let row = [
            (i + 1) as f64,
            bodyfat,
            495.0 / (bodyfat + 450.0),
            age,
            weight,
            height,
            adiposity,
            0.08 * weight + 23.0 + rng.next(),
            0.9 * abdomen + 15.0 + 3.0 * rng.next(),
            abdomen,
            0.4 * abdomen + 0.2 * weight + 27.0 + 2.0 * rng.next(),
            0.15 * weight + 32.0 + 2.0 * rng.next(),
            0.05 * weight + 29.5 + rng.next(),
            22.0 + rng.next(),
            0.06 * weight + 21.5 + 1.5 * rng.next(),
            28.5 + 1.2 * rng.next(),
            18.0 + 0.6 * rng.next(),
        ];
        for (col, value) in cols.iter_mut().zip(row) {
            col.push(value);
        }
    }

    Dataset::from_columns(schema::ALL_COLUMNS.iter().copied().zip(cols))
        .expect("generated columns are consistent")
}

/// Overwrite BODYFAT at the given rows.
pub fn with_bodyfat(dataset: &Dataset, rows: &[(usize, f64)]) -> Dataset {
    let mut bodyfat = dataset.column(schema::BODYFAT).expect("BODYFAT").to_vec();
    for &(row, value) in rows {
        bodyfat[row] = value;
    }
    dataset
        .with_column(schema::BODYFAT, bodyfat)
        .expect("same length")
}

/// Generate simple linear data: y = x * beta + intercept + noise
pub fn generate_linear_data(
    n_samples: usize,
    n_features: usize,
    intercept: f64,
    noise_std: f64,
    seed: u64,
) -> (Mat<f64>, Col<f64>, Col<f64>) {
    let mut rng = Lcg(seed);
    let beta = Col::from_fn(n_features, |j| (j + 1) as f64);

    let mut x = Mat::zeros(n_samples, n_features);
    let mut y = Col::zeros(n_samples);
    for i in 0..n_samples {
        let mut yi = intercept;
        for j in 0..n_features {
            x[(i, j)] = rng.next();
            yi += x[(i, j)] * beta[j];
        }
        y[i] = yi + noise_std * rng.next();
    }

    (x, y, beta)
}

/// Three predictors where the second is exactly twice the first.
pub fn generate_collinear_data(n_samples: usize) -> (Mat<f64>, Col<f64>) {
    let x = Mat::from_fn(n_samples, 3, |i, j| match j {
        0 => i as f64,
        1 => 2.0 * i as f64,
        _ => ((i * 7) % 5) as f64,
    });
    let y = Col::from_fn(n_samples, |i| 1.0 + 2.0 * x[(i, 0)] + 3.0 * x[(i, 2)]);
    (x, y)
}

/// Approximate equality check for floating point values.
pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}
