//! Leverage (hat matrix diagonal) calculations.

use crate::solvers::RegressionError;
use crate::utils::{row_quadratic_form, weighted_cross_inverse};
use faer::{Col, Mat};

/// Leverage values from a design and a precomputed (X'WX)⁻¹.
///
/// h_ii = w_i · x_i'(X'WX)⁻¹x_i, clamped to [0, 1]. With unit weights this
/// is the diagonal of H = X(X'X)⁻¹X'.
pub fn leverage_from_inverse(design: &Mat<f64>, weights: &[f64], xtwx_inv: &Mat<f64>) -> Col<f64> {
    Col::from_fn(design.nrows(), |i| {
        (weights[i] * row_quadratic_form(design, i, xtwx_inv)).clamp(0.0, 1.0)
    })
}

/// Compute leverage values (diagonal of the weighted hat matrix).
///
/// `design` must hold only non-aliased columns, so X'WX is invertible.
///
/// # Properties
/// - h_ii ∈ [0, 1]
/// - Σ h_ii = p (number of estimated coefficients)
pub fn compute_leverage(design: &Mat<f64>, weights: &[f64]) -> Result<Col<f64>, RegressionError> {
    let inv = weighted_cross_inverse(design, weights)?;
    Ok(leverage_from_inverse(design, weights, &inv))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::design_matrix;

    #[test]
    fn test_leverage_bounds() {
        let x = Mat::from_fn(20, 2, |i, j| if j == 0 { i as f64 } else { (i as f64).cos() });
        let design = design_matrix(&x, true);
        let leverage = compute_leverage(&design, &[1.0; 20]).expect("full rank");

        for i in 0..leverage.nrows() {
            assert!(
                (0.0..=1.0).contains(&leverage[i]),
                "Leverage[{}] = {} should be in [0, 1]",
                i,
                leverage[i]
            );
        }
    }

    #[test]
    fn test_leverage_sum() {
        let x = Mat::from_fn(30, 2, |i, j| if j == 0 { i as f64 } else { (i as f64).sin() });
        let design = design_matrix(&x, true);
        let leverage = compute_leverage(&design, &[1.0; 30]).expect("full rank");

        let sum: f64 = leverage.iter().sum();
        assert!((sum - 3.0).abs() < 1e-8, "sum of leverage {} should be 3", sum);
    }

    #[test]
    fn test_weighted_leverage_sum() {
        let x = Mat::from_fn(12, 1, |i, _| i as f64);
        let design = design_matrix(&x, true);
        let weights: Vec<f64> = (0..12).map(|i| 0.5 + i as f64 * 0.1).collect();
        let leverage = compute_leverage(&design, &weights).expect("full rank");

        let sum: f64 = leverage.iter().sum();
        assert!((sum - 2.0).abs() < 1e-8);
    }

    #[test]
    fn test_extreme_point_has_high_leverage() {
        let mut x = Mat::from_fn(20, 1, |i, _| i as f64);
        x[(19, 0)] = 100.0;
        let design = design_matrix(&x, true);
        let leverage = compute_leverage(&design, &[1.0; 20]).expect("full rank");

        let max_other = (0..19).map(|i| leverage[i]).fold(0.0_f64, f64::max);
        assert!(leverage[19] > max_other);
        assert!(leverage[19] > 2.0 * 2.0 / 20.0);
    }

    #[test]
    fn test_collinear_design_is_singular() {
        let x = Mat::from_fn(10, 2, |i, j| (i as f64) * (j + 1) as f64);
        let design = design_matrix(&x, true);
        assert!(compute_leverage(&design, &[1.0; 10]).is_err());
    }
}
