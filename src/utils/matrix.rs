//! Matrix utility functions.

use faer::{Col, Mat};

/// Detect columns that are constant (zero variance).
pub fn detect_constant_columns(x: &Mat<f64>, tolerance: f64) -> Vec<bool> {
    let n_rows = x.nrows();
    if n_rows == 0 {
        return vec![true; x.ncols()];
    }

    (0..x.ncols())
        .map(|j| {
            let first = x[(0, j)];
            (1..n_rows).all(|i| (x[(i, j)] - first).abs() < tolerance)
        })
        .collect()
}

/// Center a matrix by subtracting column means.
pub fn center_columns(x: &Mat<f64>) -> (Mat<f64>, Col<f64>) {
    let n_rows = x.nrows();
    let means = Col::from_fn(x.ncols(), |j| {
        (0..n_rows).map(|i| x[(i, j)]).sum::<f64>() / n_rows as f64
    });
    let centered = Mat::from_fn(n_rows, x.ncols(), |i, j| x[(i, j)] - means[j]);
    (centered, means)
}

/// Center a vector by subtracting the mean.
pub fn center_vector(y: &Col<f64>) -> (Col<f64>, f64) {
    let n = y.nrows();
    let mean: f64 = y.iter().sum::<f64>() / n as f64;
    (Col::from_fn(n, |i| y[i] - mean), mean)
}

/// Prepend a column of ones: `[1 | X]`.
pub fn with_intercept_column(x: &Mat<f64>) -> Mat<f64> {
    Mat::from_fn(x.nrows(), x.ncols() + 1, |i, j| {
        if j == 0 {
            1.0
        } else {
            x[(i, j - 1)]
        }
    })
}

/// Copy of `x` restricted to the given columns, in the given order.
pub fn select_columns(x: &Mat<f64>, columns: &[usize]) -> Mat<f64> {
    Mat::from_fn(x.nrows(), columns.len(), |i, j| x[(i, columns[j])])
}

/// Copy of `x` without column `drop`.
pub fn drop_column(x: &Mat<f64>, drop: usize) -> Mat<f64> {
    let keep: Vec<usize> = (0..x.ncols()).filter(|&j| j != drop).collect();
    select_columns(x, &keep)
}

/// Column `j` of `x` as a vector.
pub fn column(x: &Mat<f64>, j: usize) -> Col<f64> {
    Col::from_fn(x.nrows(), |i| x[(i, j)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_constant_columns() {
        let x = Mat::from_fn(5, 3, |i, j| match j {
            0 => 1.0,
            1 => i as f64,
            _ => 2.0,
        });

        assert_eq!(detect_constant_columns(&x, 1e-10), vec![true, false, true]);
    }

    #[test]
    fn test_detect_constant_columns_empty() {
        let x = Mat::<f64>::zeros(0, 3);
        assert_eq!(detect_constant_columns(&x, 1e-10), vec![true; 3]);
    }

    #[test]
    fn test_center_columns() {
        let x = Mat::from_fn(4, 2, |i, j| (i + 1) as f64 * if j == 0 { 1.0 } else { 10.0 });
        let (centered, means) = center_columns(&x);

        assert!((means[0] - 2.5).abs() < 1e-10);
        assert!((means[1] - 25.0).abs() < 1e-10);
        for j in 0..2 {
            let sum: f64 = (0..4).map(|i| centered[(i, j)]).sum();
            assert!(sum.abs() < 1e-10);
        }
    }

    #[test]
    fn test_center_vector() {
        let y = Col::from_fn(4, |i| (i + 1) as f64);
        let (centered, mean) = center_vector(&y);

        assert!((mean - 2.5).abs() < 1e-10);
        assert!(centered.iter().sum::<f64>().abs() < 1e-10);
    }

    #[test]
    fn test_with_intercept_column() {
        let x = Mat::from_fn(3, 2, |i, j| (i * 2 + j) as f64);
        let aug = with_intercept_column(&x);
        assert_eq!(aug.ncols(), 3);
        for i in 0..3 {
            assert_eq!(aug[(i, 0)], 1.0);
            assert_eq!(aug[(i, 2)], x[(i, 1)]);
        }
    }

    #[test]
    fn test_select_and_drop_columns() {
        let x = Mat::from_fn(2, 4, |i, j| (10 * i + j) as f64);

        let picked = select_columns(&x, &[3, 1]);
        assert_eq!(picked[(1, 0)], 13.0);
        assert_eq!(picked[(1, 1)], 11.0);

        let dropped = drop_column(&x, 2);
        assert_eq!(dropped.ncols(), 3);
        assert_eq!(dropped[(0, 2)], 3.0);

        assert_eq!(column(&x, 1)[1], 11.0);
    }
}
