//! Matrix utility functions shared by the solvers and diagnostics.

use crate::solvers::RegressionError;
use faer::{Col, Mat};

/// Detect columns that are constant (zero variance).
pub fn detect_constant_columns(x: &Mat<f64>, tolerance: f64) -> Vec<bool> {
    let n_cols = x.ncols();
    let n_rows = x.nrows();

    if n_rows == 0 {
        return vec![true; n_cols];
    }

    let mut constant = vec![false; n_cols];

    for j in 0..n_cols {
        let first = x[(0, j)];
        let all_same = (1..n_rows).all(|i| (x[(i, j)] - first).abs() < tolerance);
        constant[j] = all_same;
    }

    constant
}

/// Center a matrix by subtracting column means.
pub fn center_columns(x: &Mat<f64>) -> (Mat<f64>, Col<f64>) {
    let n_rows = x.nrows();
    let n_cols = x.ncols();

    let mut means = Col::zeros(n_cols);
    let mut centered = Mat::zeros(n_rows, n_cols);

    for j in 0..n_cols {
        let sum: f64 = (0..n_rows).map(|i| x[(i, j)]).sum();
        means[j] = sum / n_rows as f64;

        for i in 0..n_rows {
            centered[(i, j)] = x[(i, j)] - means[j];
        }
    }

    (centered, means)
}

/// Center a vector by subtracting the mean.
pub fn center_vector(y: &Col<f64>) -> (Col<f64>, f64) {
    let n = y.nrows();
    let mean: f64 = y.iter().sum::<f64>() / n as f64;

    let centered = Col::from_fn(n, |i| y[i] - mean);

    (centered, mean)
}

/// Prepend a column of ones when `with_intercept` is set.
pub fn design_matrix(x: &Mat<f64>, with_intercept: bool) -> Mat<f64> {
    if with_intercept {
        Mat::from_fn(x.nrows(), x.ncols() + 1, |i, j| {
            if j == 0 {
                1.0
            } else {
                x[(i, j - 1)]
            }
        })
    } else {
        x.to_owned()
    }
}

/// Keep the columns whose flag is false (the non-aliased ones).
pub fn drop_columns(x: &Mat<f64>, dropped: &[bool]) -> Mat<f64> {
    let kept: Vec<usize> = (0..x.ncols()).filter(|&j| !dropped[j]).collect();
    Mat::from_fn(x.nrows(), kept.len(), |i, j| x[(i, kept[j])])
}

/// Inverse of a square matrix by QR decomposition.
///
/// Fails with `SingularMatrix` when a diagonal entry of R falls below `1e-10`
/// relative to the largest one.
pub fn invert(matrix: &Mat<f64>) -> Result<Mat<f64>, RegressionError> {
    let n = matrix.nrows();
    if n == 0 {
        return Ok(Mat::zeros(0, 0));
    }

    let qr = matrix.qr();
    let q = qr.compute_Q();
    let r = qr.R().to_owned();

    let scale = (0..n).map(|i| r[(i, i)].abs()).fold(0.0_f64, f64::max);
    if scale == 0.0 || (0..n).any(|i| r[(i, i)].abs() < 1e-10 * scale) {
        return Err(RegressionError::SingularMatrix);
    }

    // Solve R * X = Q' column by column
    let qt = q.transpose().to_owned();
    let mut inv = Mat::zeros(n, n);
    for col in 0..n {
        for i in (0..n).rev() {
            let mut sum = qt[(i, col)];
            for j in (i + 1)..n {
                sum -= r[(i, j)] * inv[(j, col)];
            }
            inv[(i, col)] = sum / r[(i, i)];
        }
    }

    Ok(inv)
}

/// (X'WX)⁻¹ for a design matrix and per-row weights.
pub fn weighted_cross_inverse(x: &Mat<f64>, weights: &[f64]) -> Result<Mat<f64>, RegressionError> {
    let p = x.ncols();
    let mut xtwx: Mat<f64> = Mat::zeros(p, p);
    for i in 0..x.nrows() {
        let w = weights[i];
        for j in 0..p {
            for k in 0..p {
                xtwx[(j, k)] += w * x[(i, j)] * x[(i, k)];
            }
        }
    }
    invert(&xtwx)
}

/// x_i' A x_i for row `i` of `x`.
pub fn row_quadratic_form(x: &Mat<f64>, i: usize, a: &Mat<f64>) -> f64 {
    let p = x.ncols();
    let mut total = 0.0;
    for j in 0..p {
        for k in 0..p {
            total += x[(i, j)] * a[(j, k)] * x[(i, k)];
        }
    }
    total
}
