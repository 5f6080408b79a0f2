//! Cook's distance.

use faer::Col;

/// Cook's distance for a linear model.
///
/// D_i = r_i² · h_ii / ((1 - h_ii) · p), with r_i the standardized residual.
pub fn cooks_distance(std_residuals: &Col<f64>, leverage: &Col<f64>, n_params: usize) -> Col<f64> {
    let n = std_residuals.nrows();
    if n_params == 0 {
        return Col::from_fn(n, |_| f64::NAN);
    }
    let p = n_params as f64;

    Col::from_fn(n, |i| {
        let h = leverage[i];
        let d = std_residuals[i].powi(2) * h / ((1.0 - h) * p);
        if d.is_finite() {
            d.max(0.0)
        } else {
            f64::NAN
        }
    })
}

/// Cook's distance for a GLM.
///
/// D_i = (r_P,i / (1 - h_ii))² · h_ii / (φ · p), with r_P the Pearson residual.
pub fn glm_cooks_distance(
    pearson: &Col<f64>,
    leverage: &Col<f64>,
    dispersion: f64,
    n_params: usize,
) -> Col<f64> {
    let n = pearson.nrows();
    if n_params == 0 || !(dispersion > 0.0) || !dispersion.is_finite() {
        return Col::from_fn(n, |_| f64::NAN);
    }
    let p = n_params as f64;

    Col::from_fn(n, |i| {
        let h = leverage[i];
        let d = (pearson[i] / (1.0 - h)).powi(2) * h / (dispersion * p);
        if d.is_finite() {
            d.max(0.0)
        } else {
            f64::NAN
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cooks_distance_non_negative() {
        let std_resid = Col::from_fn(20, |i| (i as f64 - 9.5) / 5.0);
        let leverage = Col::from_fn(20, |i| 0.1 + 0.02 * i as f64);
        let cooks = cooks_distance(&std_resid, &leverage, 3);

        for i in 0..cooks.nrows() {
            assert!(cooks[i] >= 0.0, "Cook's distance[{}] = {}", i, cooks[i]);
        }
    }

    #[test]
    fn test_linear_and_glm_forms_agree_for_gaussian() {
        // Gaussian: Pearson residual = e, φ = σ², r = e / (σ √(1-h))
        let e = Col::from_fn(6, |i| [0.4, -0.2, 0.9, -0.7, 0.1, -0.5][i]);
        let h = Col::from_fn(6, |i| [0.3, 0.2, 0.5, 0.25, 0.4, 0.35][i]);
        let sigma2 = 0.6_f64;
        let r = Col::from_fn(6, |i| e[i] / (sigma2 * (1.0 - h[i])).sqrt());

        let linear = cooks_distance(&r, &h, 2);
        let glm = glm_cooks_distance(&e, &h, sigma2, 2);
        for i in 0..6 {
            assert_relative_eq!(linear[i], glm[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_high_leverage_large_residual_dominates() {
        let mut pearson = Col::from_fn(20, |_| 0.1);
        let mut leverage = Col::from_fn(20, |_| 0.1);
        pearson[10] = 3.0;
        leverage[10] = 0.8;

        let cooks = glm_cooks_distance(&pearson, &leverage, 1.0, 2);
        let max_other = (0..20)
            .filter(|&i| i != 10)
            .map(|i| cooks[i])
            .fold(0.0_f64, f64::max);
        assert!(cooks[10] > 1.0);
        assert!(cooks[10] > 100.0 * max_other);
    }
}
