//! Prediction interval calculations.

use super::CoefficientInference;
use crate::core::{IntervalType, PredictionResult};
use crate::utils::row_quadratic_form;
use faer::{Col, Mat};

/// Computes confidence or prediction intervals for new data points.
///
/// # Arguments
/// * `design` - Design rows for the new points, restricted to the columns
///   `xtx_inv` was computed on (intercept column included if fitted)
/// * `xtx_inv` - (X'X)⁻¹ of the training design
/// * `predictions` - Point predictions for the new points
/// * `mse` - Residual variance estimate of the fitted model
/// * `df` - Residual degrees of freedom
/// * `confidence_level` - Confidence level (e.g., 0.95)
/// * `interval_type` - Confidence or Prediction interval
pub fn compute_prediction_intervals(
    design: &Mat<f64>,
    xtx_inv: &Mat<f64>,
    predictions: &Col<f64>,
    mse: f64,
    df: f64,
    confidence_level: f64,
    interval_type: IntervalType,
) -> PredictionResult {
    let n_new = design.nrows();

    if df <= 0.0 || mse <= 0.0 || !mse.is_finite() {
        let nan = Col::from_fn(n_new, |_| f64::NAN);
        return PredictionResult::with_intervals(predictions.clone(), nan.clone(), nan.clone(), nan);
    }

    let t_crit = CoefficientInference::t_critical(df, confidence_level);

    let mut se = Col::zeros(n_new);
    let mut lower = Col::zeros(n_new);
    let mut upper = Col::zeros(n_new);

    for i in 0..n_new {
        // h = x₀'(X'X)⁻¹x₀
        let h = row_quadratic_form(design, i, xtx_inv);

        // Interval variance; se stays the standard error of the mean
        let var_mean = mse * h;
        let var = match interval_type {
            IntervalType::Confidence => var_mean,
            IntervalType::Prediction => mse + var_mean,
        };

        se[i] = if var_mean >= 0.0 { var_mean.sqrt() } else { f64::NAN };
        let margin = t_crit * var.max(0.0).sqrt();
        lower[i] = predictions[i] - margin;
        upper[i] = predictions[i] + margin;
    }

    PredictionResult::with_intervals(predictions.clone(), lower, upper, se)
}
