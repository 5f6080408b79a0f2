//! Standardized residuals and the leave-one-out residual scale.

use faer::Col;

/// 1 - h below which an observation is treated as fitted exactly.
const EXACT_FIT: f64 = 1e-10;

/// Standardized residuals: r_i / sqrt(scale · (1 - h_ii)).
///
/// For linear models `r` is the raw residual and `scale` is σ²; for GLMs `r`
/// is the deviance or Pearson residual and `scale` is the dispersion φ.
/// Observations with h_ii = 1 have no standardized residual (NaN).
pub fn standardized_residuals(residuals: &Col<f64>, leverage: &Col<f64>, scale: f64) -> Col<f64> {
    let n = residuals.nrows();

    if scale <= 0.0 || !scale.is_finite() {
        return Col::from_fn(n, |_| f64::NAN);
    }

    Col::from_fn(n, |i| {
        let one_minus_h = 1.0 - leverage[i];
        if one_minus_h <= EXACT_FIT {
            f64::NAN
        } else {
            residuals[i] / (scale * one_minus_h).sqrt()
        }
    })
}

/// Leave-one-out residual standard deviation, without refitting.
///
/// σ_(i) = σ · sqrt(((n - p) - e_i²/(σ²(1 - h_ii))) / (n - p - 1))
///
/// Returns `None` when n - p - 1 ≤ 0: no observation can be left out while
/// keeping a residual degree of freedom.
pub fn leave_one_out_sigma(
    residuals: &Col<f64>,
    leverage: &Col<f64>,
    sigma: f64,
    n_params: usize,
) -> Option<Col<f64>> {
    let n = residuals.nrows();
    if n <= n_params + 1 {
        return None;
    }
    let df_resid = (n - n_params) as f64;
    let sigma2 = sigma * sigma;

    Some(Col::from_fn(n, |i| {
        if !(sigma2 > 0.0) {
            return sigma;
        }
        let one_minus_h = 1.0 - leverage[i];
        let dropped = if one_minus_h <= EXACT_FIT {
            0.0
        } else {
            residuals[i] * residuals[i] / (sigma2 * one_minus_h)
        };
        sigma * ((df_resid - dropped).max(0.0) / (df_resid - 1.0)).sqrt()
    }))
}
