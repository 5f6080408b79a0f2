//! Common test utilities and data generators.
#![allow(dead_code)]

use faer::{Col, Mat};
use tidy_regress::frame::Frame;

/// Generate simple linear data: y = x * beta + intercept + noise
pub fn generate_linear_data(
    n_samples: usize,
    n_features: usize,
    intercept: f64,
    noise_std: f64,
    seed: u64,
) -> (Mat<f64>, Col<f64>, Col<f64>) {
    // Simple deterministic "random" for reproducibility
    let mut rng_state = seed;
    let next_rand = |state: &mut u64| -> f64 {
        *state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
        ((*state >> 33) as f64) / (u32::MAX as f64) * 2.0 - 1.0
    };

    let mut x = Mat::zeros(n_samples, n_features);
    let mut y = Col::zeros(n_samples);
    let true_coefficients = Col::from_fn(n_features, |j| (j + 1) as f64);

    for i in 0..n_samples {
        let mut yi = intercept;
        for j in 0..n_features {
            x[(i, j)] = next_rand(&mut rng_state);
            yi += x[(i, j)] * true_coefficients[j];
        }
        yi += noise_std * next_rand(&mut rng_state);
        y[i] = yi;
    }

    (x, y, true_coefficients)
}

/// Generate data with collinear features (x2 = 2·x1).
pub fn generate_collinear_data(n_samples: usize) -> (Mat<f64>, Col<f64>) {
    let mut x = Mat::zeros(n_samples, 3);
    let mut y = Col::zeros(n_samples);

    for i in 0..n_samples {
        x[(i, 0)] = i as f64;
        x[(i, 1)] = 2.0 * i as f64; // Perfectly collinear with x0
        x[(i, 2)] = ((i * 7) % 5) as f64;
        y[i] = 1.0 + 2.0 * x[(i, 0)] + 3.0 * x[(i, 2)] + 0.1 * (i as f64).sin();
    }

    (x, y)
}

pub const TEN_X1: [f64; 10] = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
pub const TEN_X2: [f64; 10] = [2.5, 1.0, 4.0, 3.5, 6.0, 5.0, 8.5, 7.0, 9.0, 11.0];
pub const TEN_Y: [f64; 10] = [6.1, 6.9, 11.2, 12.0, 16.3, 16.8, 21.9, 21.2, 25.1, 29.4];

/// Ten rows of `y ≈ a + b·x1 + c·x2`.
pub fn ten_row_frame() -> Frame {
    Frame::new()
        .with_float("y", TEN_Y.to_vec())
        .and_then(|f| f.with_float("x1", TEN_X1.to_vec()))
        .and_then(|f| f.with_float("x2", TEN_X2.to_vec()))
        .expect("valid frame")
}

/// Count data for Poisson regression.
pub fn poisson_frame() -> Frame {
    let x: Vec<f64> = (0..20).map(|i| i as f64 / 5.0).collect();
    let y = vec![
        1.0, 0.0, 1.0, 2.0, 1.0, 3.0, 2.0, 4.0, 3.0, 5.0, 4.0, 7.0, 6.0, 9.0, 8.0, 12.0, 11.0,
        15.0, 14.0, 20.0,
    ];
    Frame::new()
        .with_float("count", y)
        .and_then(|f| f.with_float("dose", x))
        .expect("valid frame")
}

/// Solve the normal equations (X'X)β = X'y by Gaussian elimination with
/// partial pivoting. `x` must already contain any intercept column.
pub fn normal_equations(x: &Mat<f64>, y: &[f64]) -> Vec<f64> {
    let p = x.ncols();
    let n = x.nrows();
    let mut a = vec![vec![0.0; p + 1]; p];
    for r in 0..p {
        for c in 0..p {
            a[r][c] = (0..n).map(|i| x[(i, r)] * x[(i, c)]).sum();
        }
        a[r][p] = (0..n).map(|i| x[(i, r)] * y[i]).sum();
    }

    for col in 0..p {
        let pivot = (col..p)
            .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
            .expect("non-empty");
        a.swap(col, pivot);
        for row in (col + 1)..p {
            let factor = a[row][col] / a[col][col];
            for k in col..=p {
                a[row][k] -= factor * a[col][k];
            }
        }
    }

    let mut beta = vec![0.0; p];
    for r in (0..p).rev() {
        let tail: f64 = ((r + 1)..p).map(|c| a[r][c] * beta[c]).sum();
        beta[r] = (a[r][p] - tail) / a[r][r];
    }
    beta
}

/// Prepend a column of ones.
pub fn with_ones(x: &Mat<f64>) -> Mat<f64> {
    Mat::from_fn(x.nrows(), x.ncols() + 1, |i, j| {
        if j == 0 {
            1.0
        } else {
            x[(i, j - 1)]
        }
    })
}

/// Rows of `x` and `y` other than `skip`.
pub fn drop_row(x: &Mat<f64>, y: &Col<f64>, skip: usize) -> (Mat<f64>, Col<f64>) {
    let keep: Vec<usize> = (0..y.nrows()).filter(|&i| i != skip).collect();
    (
        Mat::from_fn(keep.len(), x.ncols(), |i, j| x[(keep[i], j)]),
        Col::from_fn(keep.len(), |i| y[keep[i]]),
    )
}
