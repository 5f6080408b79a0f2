//! Ordinary Least Squares regression solver.

use crate::core::{
    IntervalType, PredictionResult, RegressionOptions, RegressionOptionsBuilder, RegressionResult,
};
use crate::frame::{Frame, ModelFrame};
use crate::inference::{compute_prediction_intervals, CoefficientInference};
use crate::solvers::traits::{FittedRegressor, RegressionError, Regressor};
use crate::utils::{
    center_columns, center_vector, design_matrix, detect_constant_columns, drop_columns, invert,
    row_quadratic_form,
};
use faer::{Col, Mat};
use statrs::distribution::{ContinuousCDF, FisherSnedecor};
use std::f64::consts::PI;

/// Ordinary Least Squares regression estimator.
///
/// Uses QR decomposition with column pivoting to handle rank-deficient matrices.
/// Aliased (collinear) coefficients are set to NaN.
///
/// # Example
///
/// ```rust,ignore
/// use tidy_regress::solvers::{OlsRegressor, Regressor, FittedRegressor};
/// use faer::{Mat, Col};
///
/// let x = Mat::from_fn(100, 2, |i, j| (i + j) as f64);
/// let y = Col::from_fn(100, |i| 1.0 + 2.0 * i as f64);
///
/// let fitted = OlsRegressor::builder()
///     .with_intercept(true)
///     .build()
///     .fit(&x, &y)?;
///
/// println!("R² = {}", fitted.result().r_squared);
/// ```
#[derive(Debug, Clone)]
pub struct OlsRegressor {
    options: RegressionOptions,
}

impl OlsRegressor {
    /// Create a new OLS regressor with the given options.
    pub fn new(options: RegressionOptions) -> Self {
        Self { options }
    }

    /// Create a builder for configuring the regressor.
    pub fn builder() -> OlsRegressorBuilder {
        OlsRegressorBuilder::default()
    }

    /// Fit on named columns of a frame.
    ///
    /// Rows with a missing response or covariate are handled according to the
    /// configured `NaAction`; the dropped rows are recorded on the result.
    pub fn fit_frame(
        &self,
        frame: &Frame,
        response: &str,
        covariates: &[&str],
    ) -> Result<FittedOls, RegressionError> {
        let model_frame = ModelFrame::from_frame(
            frame,
            response,
            covariates,
            self.options.with_intercept,
            self.options.na_action,
        )?;
        self.fit_model_frame(model_frame)
    }

    fn fit_model_frame(&self, frame: ModelFrame) -> Result<FittedOls, RegressionError> {
        self.options.validate()?;

        let x = &frame.x;
        let y = &frame.y;
        let n_samples = x.nrows();
        let n_features = x.ncols();

        // Need at least 2 observations
        if n_samples < 2 {
            return Err(RegressionError::InsufficientObservations {
                needed: 2,
                got: n_samples,
            });
        }

        let n_params = if self.options.with_intercept {
            n_features + 1
        } else {
            n_features
        };
        if n_samples < n_params {
            return Err(RegressionError::InsufficientObservations {
                needed: n_params,
                got: n_samples,
            });
        }

        let constant_cols = detect_constant_columns(x, self.options.rank_tolerance);

        let (coefficients, intercept, aliased, rank) = if self.options.with_intercept {
            let (x_centered, x_means) = center_columns(x);
            let (y_centered, y_mean) = center_vector(y);

            let (coefficients, aliased, rank) =
                self.solve_with_qr(&x_centered, &y_centered, &constant_cols)?;

            // intercept = y_mean - x_means' * coefficients
            let mut intercept = y_mean;
            for j in 0..n_features {
                if !aliased[j] {
                    intercept -= x_means[j] * coefficients[j];
                }
            }
            (coefficients, Some(intercept), aliased, rank + 1)
        } else {
            // Without an intercept a constant column is an ordinary regressor
            let no_constant = vec![false; n_features];
            let (coefficients, aliased, rank) = self.solve_with_qr(x, y, &no_constant)?;
            if rank == 0 {
                return Err(RegressionError::AllFeaturesConstant);
            }
            (coefficients, None, aliased, rank)
        };

        let mut fitted_values = Col::zeros(n_samples);
        let mut residuals = Col::zeros(n_samples);
        for i in 0..n_samples {
            let mut pred = intercept.unwrap_or(0.0);
            for j in 0..n_features {
                if !aliased[j] {
                    pred += x[(i, j)] * coefficients[j];
                }
            }
            fitted_values[i] = pred;
            residuals[i] = y[i] - pred;
        }

        let mut result = self.compute_statistics(
            y,
            coefficients,
            intercept,
            residuals,
            fitted_values,
            aliased,
            rank,
        );
        result.na_info = Some(frame.na_info.clone());

        // (X'X)⁻¹ over the estimable design columns
        let design = drop_columns(
            &design_matrix(x, self.options.with_intercept),
            &result.design_aliased(),
        );
        let xtx_inverse = invert(&(design.transpose() * &design)).ok();
        if xtx_inverse.is_none() {
            log::debug!("cross-product matrix is singular; standard errors unavailable");
        }

        if self.options.compute_inference {
            if let Some(inv) = &xtx_inverse {
                self.compute_inference(inv, &mut result);
            }
        }

        Ok(FittedOls {
            options: self.options.clone(),
            result,
            frame,
            xtx_inverse,
        })
    }

    /// Solve the least squares problem using QR decomposition with column pivoting.
    fn solve_with_qr(
        &self,
        x: &Mat<f64>,
        y: &Col<f64>,
        constant_cols: &[bool],
    ) -> Result<(Col<f64>, Vec<bool>, usize), RegressionError> {
        let n_features = x.ncols();
        let n_samples = x.nrows();

        let mut aliased = constant_cols.to_vec();
        if n_features == 0 {
            return Ok((Col::zeros(0), aliased, 0));
        }

        let qr = x.col_piv_qr();
        let q = qr.compute_Q();
        let r = qr.R();
        let perm = qr.P();

        // perm_inv[j] = pivot position of original column j
        let perm_inv = perm.arrays().1;

        // Numerical rank from the R diagonal
        let mut rank = 0;
        for i in 0..n_features.min(n_samples) {
            if r[(i, i)].abs() > self.options.rank_tolerance {
                rank += 1;
            } else {
                break;
            }
        }

        if rank == 0 {
            let coefficients = Col::from_fn(n_features, |_| f64::NAN);
            return Ok((coefficients, vec![true; n_features], 0));
        }

        for j in 0..n_features {
            if constant_cols[j] || perm_inv[j] >= rank {
                aliased[j] = true;
            }
        }

        // Solve R * beta_perm = Q' * y for the non-aliased part
        let qty = q.transpose() * y;

        let mut beta_reduced = Col::zeros(rank);
        for i in (0..rank).rev() {
            let mut sum = qty[i];
            for j in (i + 1)..rank {
                sum -= r[(i, j)] * beta_reduced[j];
            }
            beta_reduced[i] = sum / r[(i, i)];
        }

        let coefficients = Col::from_fn(n_features, |j| {
            if aliased[j] {
                f64::NAN
            } else {
                beta_reduced[perm_inv[j]]
            }
        });

        Ok((coefficients, aliased, rank))
    }

    /// Compute fit statistics.
    #[allow(clippy::too_many_arguments)]
    fn compute_statistics(
        &self,
        y: &Col<f64>,
        coefficients: Col<f64>,
        intercept: Option<f64>,
        residuals: Col<f64>,
        fitted_values: Col<f64>,
        aliased: Vec<bool>,
        rank: usize,
    ) -> RegressionResult {
        let n = y.nrows();
        let n_features = coefficients.nrows();
        let n_params = rank;

        let rss: f64 = residuals.iter().map(|&r| r.powi(2)).sum();
        // Total sum of squares about the mean, or about zero without an intercept
        let center = if intercept.is_some() {
            y.iter().sum::<f64>() / n as f64
        } else {
            0.0
        };
        let tss: f64 = y.iter().map(|&yi| (yi - center).powi(2)).sum();

        let r_squared = if tss > 0.0 {
            (1.0 - rss / tss).clamp(0.0, 1.0)
        } else if rss < 1e-10 {
            1.0
        } else {
            0.0
        };

        let df_total = if intercept.is_some() { n - 1 } else { n } as f64;
        let df_resid = n.saturating_sub(n_params) as f64;
        let adj_r_squared = if df_resid > 0.0 && df_total > 0.0 {
            1.0 - (1.0 - r_squared) * df_total / df_resid
        } else {
            f64::NAN
        };

        let mse = if df_resid > 0.0 { rss / df_resid } else { f64::NAN };
        let rmse = mse.sqrt();

        let df_model = n_params.saturating_sub(usize::from(intercept.is_some())) as f64;
        let f_statistic = if df_model > 0.0 && df_resid > 0.0 && mse > 0.0 {
            ((tss - rss) / df_model) / mse
        } else {
            f64::NAN
        };
        let f_pvalue = if f_statistic.is_finite() {
            FisherSnedecor::new(df_model, df_resid).map_or(f64::NAN, |d| d.sf(f_statistic))
        } else {
            f64::NAN
        };

        // Gaussian log-likelihood at the ML variance RSS / n
        let log_likelihood = if rss > 0.0 {
            -0.5 * n as f64 * ((2.0 * PI * rss / n as f64).ln() + 1.0)
        } else {
            f64::NAN
        };

        // Coefficients plus the residual variance
        let k = (n_params + 1) as f64;
        let aic = 2.0 * k - 2.0 * log_likelihood;
        let bic = k * (n as f64).ln() - 2.0 * log_likelihood;

        let mut result = RegressionResult::empty(n_features, n);
        result.coefficients = coefficients;
        result.intercept = intercept;
        result.residuals = residuals;
        result.fitted_values = fitted_values;
        result.rank = rank;
        result.n_parameters = n_params;
        result.n_observations = n;
        result.aliased = aliased;
        result.r_squared = r_squared;
        result.adj_r_squared = adj_r_squared;
        result.mse = mse;
        result.rmse = rmse;
        result.f_statistic = f_statistic;
        result.f_pvalue = f_pvalue;
        result.aic = aic;
        result.bic = bic;
        result.log_likelihood = log_likelihood;
        result
    }

    /// Standard errors, t-statistics and p-values from (X'X)⁻¹.
    fn compute_inference(&self, xtx_inverse: &Mat<f64>, result: &mut RegressionResult) {
        let df = result.residual_df() as f64;
        if df <= 0.0 || !result.mse.is_finite() {
            return;
        }

        let active_se = CoefficientInference::standard_errors(xtx_inverse, result.mse);
        let design_aliased = result.design_aliased();
        let mut se = Vec::with_capacity(design_aliased.len());
        let mut next = 0;
        for &is_aliased in &design_aliased {
            if is_aliased {
                se.push(f64::NAN);
            } else {
                se.push(active_se[next]);
                next += 1;
            }
        }

        let beta = result.design_coefficients();
        let beta = Col::from_fn(beta.len(), |j| beta[j]);
        let se = Col::from_fn(se.len(), |j| se[j]);
        let t_stats = CoefficientInference::t_statistics(&beta, &se);
        let p_vals = CoefficientInference::p_values(&t_stats, df);

        let offset = usize::from(result.intercept.is_some());
        if offset == 1 {
            result.intercept_std_error = Some(se[0]);
            result.intercept_t_statistic = Some(t_stats[0]);
            result.intercept_p_value = Some(p_vals[0]);
        }
        let n_features = result.coefficients.nrows();
        result.std_errors = Some(Col::from_fn(n_features, |j| se[j + offset]));
        result.t_statistics = Some(Col::from_fn(n_features, |j| t_stats[j + offset]));
        result.p_values = Some(Col::from_fn(n_features, |j| p_vals[j + offset]));
    }
}

impl Regressor for OlsRegressor {
    type Fitted = FittedOls;

    fn fit(&self, x: &Mat<f64>, y: &Col<f64>) -> Result<Self::Fitted, RegressionError> {
        let frame = ModelFrame::from_matrix(
            x,
            y,
            self.options.with_intercept,
            self.options.na_action,
        )?;
        self.fit_model_frame(frame)
    }
}

/// A fitted OLS regression model.
#[derive(Debug, Clone)]
pub struct FittedOls {
    options: RegressionOptions,
    result: RegressionResult,
    frame: ModelFrame,
    /// (X'X)⁻¹ over the non-aliased design columns
    xtx_inverse: Option<Mat<f64>>,
}

impl FittedOls {
    /// Get the options used to fit this model.
    pub fn options(&self) -> &RegressionOptions {
        &self.options
    }

    /// Data the model was fit on.
    pub fn model_frame(&self) -> &ModelFrame {
        &self.frame
    }

    /// (X'X)⁻¹ over the non-aliased design columns, if it could be formed.
    pub fn xtx_inverse(&self) -> Option<&Mat<f64>> {
        self.xtx_inverse.as_ref()
    }

    /// Design matrix for covariates `x`, restricted to non-aliased columns.
    pub fn active_design(&self, x: &Mat<f64>) -> Mat<f64> {
        drop_columns(
            &design_matrix(x, self.options.with_intercept),
            &self.result.design_aliased(),
        )
    }

    /// Point predictions with the standard error of the mean response.
    pub fn predict_with_se(&self, x: &Mat<f64>) -> PredictionResult {
        let fit = self.predict(x);
        let design = self.active_design(x);
        let se = Col::from_fn(x.nrows(), |i| match &self.xtx_inverse {
            Some(inv) if self.result.mse.is_finite() => {
                let var = self.result.mse * row_quadratic_form(&design, i, inv);
                if var.is_nan() {
                    f64::NAN
                } else {
                    var.max(0.0).sqrt()
                }
            }
            _ => f64::NAN,
        });
        PredictionResult::with_se(fit, se)
    }

    /// Predictions with confidence or prediction intervals.
    ///
    /// Follows R's `predict(..., interval = "confidence" | "prediction")`.
    pub fn predict_with_interval(
        &self,
        x: &Mat<f64>,
        interval: IntervalType,
        level: f64,
    ) -> PredictionResult {
        let predictions = self.predict(x);
        match &self.xtx_inverse {
            Some(xtx_inv) => compute_prediction_intervals(
                &self.active_design(x),
                xtx_inv,
                &predictions,
                self.result.mse,
                self.result.residual_df() as f64,
                level,
                interval,
            ),
            None => {
                let nan = Col::from_fn(x.nrows(), |_| f64::NAN);
                PredictionResult::with_intervals(predictions, nan.clone(), nan.clone(), nan)
            }
        }
    }
}

impl FittedRegressor for FittedOls {
    fn predict(&self, x: &Mat<f64>) -> Col<f64> {
        let intercept = self.result.intercept.unwrap_or(0.0);
        Col::from_fn(x.nrows(), |i| {
            let mut pred = intercept;
            for j in 0..x.ncols() {
                if !self.result.aliased[j] {
                    pred += x[(i, j)] * self.result.coefficients[j];
                }
            }
            pred
        })
    }

    fn result(&self) -> &RegressionResult {
        &self.result
    }
}

/// Builder for `OlsRegressor`.
#[derive(Debug, Clone, Default)]
pub struct OlsRegressorBuilder {
    builder: RegressionOptionsBuilder,
}

impl OlsRegressorBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to include an intercept term.
    pub fn with_intercept(mut self, include: bool) -> Self {
        self.builder = self.builder.with_intercept(include);
        self
    }

    /// Set whether to compute inference statistics.
    pub fn compute_inference(mut self, compute: bool) -> Self {
        self.builder = self.builder.compute_inference(compute);
        self
    }

    /// Set the rank tolerance for QR decomposition.
    pub fn rank_tolerance(mut self, tol: f64) -> Self {
        self.builder = self.builder.rank_tolerance(tol);
        self
    }

    /// Set the missing value policy.
    pub fn na_action(mut self, action: crate::core::NaAction) -> Self {
        self.builder = self.builder.na_action(action);
        self
    }

    /// Build the OLS regressor. Options are validated when fitting.
    pub fn build(self) -> OlsRegressor {
        OlsRegressor::new(self.builder.build_unchecked())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_simple_fit() {
        let x = Mat::from_fn(5, 1, |i, _| i as f64);
        let y = Col::from_fn(5, |i| 2.0 + 3.0 * i as f64);

        let model = OlsRegressor::builder().with_intercept(true).build();
        let fitted = model.fit(&x, &y).expect("model should fit");

        assert!((fitted.coefficients()[0] - 3.0).abs() < 1e-10);
        assert!((fitted.intercept().expect("intercept exists") - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_predict() {
        let x = Mat::from_fn(5, 1, |i, _| i as f64);
        let y = Col::from_fn(5, |i| 2.0 + 3.0 * i as f64);

        let model = OlsRegressor::builder().with_intercept(true).build();
        let fitted = model.fit(&x, &y).expect("model should fit");

        let x_new = Mat::from_fn(2, 1, |i, _| (i + 10) as f64);
        let preds = fitted.predict(&x_new);

        assert!((preds[0] - (2.0 + 3.0 * 10.0)).abs() < 1e-10);
        assert!((preds[1] - (2.0 + 3.0 * 11.0)).abs() < 1e-10);
    }

    #[test]
    fn test_aliased_column_is_nan() {
        let x = Mat::from_fn(8, 2, |i, j| if j == 0 { i as f64 } else { 2.0 * i as f64 });
        let y = Col::from_fn(8, |i| 1.0 + 0.5 * i as f64 + ((i * 7) % 3) as f64 * 0.1);

        let fitted = OlsRegressor::builder().build().fit(&x, &y).expect("fit");
        let result = fitted.result();
        assert!(result.has_aliased());
        assert_eq!(result.rank, 2);
        assert_eq!(result.aliased.iter().filter(|&&a| a).count(), 1);
        let se = result.std_errors.as_ref().expect("inference");
        for j in 0..2 {
            assert_eq!(result.aliased[j], se[j].is_nan());
        }
    }

    #[test]
    fn test_slope_standard_error_closed_form() {
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let ys = [1.2, 1.9, 3.2, 3.8, 5.1, 6.3];
        let x = Mat::from_fn(6, 1, |i, _| xs[i]);
        let y = Col::from_fn(6, |i| ys[i]);
        let fitted = OlsRegressor::builder().build().fit(&x, &y).expect("fit");
        let result = fitted.result();

        let x_mean = xs.iter().sum::<f64>() / 6.0;
        let sxx: f64 = xs.iter().map(|v| (v - x_mean).powi(2)).sum();
        let se_slope = (result.mse / sxx).sqrt();
        let se = result.std_errors.as_ref().expect("inference");
        assert_relative_eq!(se[0], se_slope, epsilon = 1e-10);
    }
}
