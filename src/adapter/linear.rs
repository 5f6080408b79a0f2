//! `TidyModel` for least-squares fits.

use super::{
    check_level, estimable, finite, CoefficientMatrix, FitStatistics, GlanceCore,
    IntervalEstimate, ModelKind, Observations, TidyModel,
};
use crate::core::{GlmFamily, IntervalType, Link, PredictionResult, PredictionType, TidyError};
use crate::inference::CoefficientInference;
use crate::solvers::{FittedOls, FittedRegressor};
use faer::{Col, Mat};

fn missing_inference() -> TidyError {
    TidyError::ModelStateError(
        "model was fit without inference; refit with compute_inference(true)".to_string(),
    )
}

pub(super) fn check_covariates(x: &Mat<f64>, expected: usize) -> Result<(), TidyError> {
    if x.ncols() != expected {
        return Err(TidyError::DataMismatch(format!(
            "model has {} covariates but {} columns were supplied",
            expected,
            x.ncols()
        )));
    }
    Ok(())
}

impl TidyModel for FittedOls {
    fn kind(&self) -> ModelKind {
        ModelKind::Linear
    }

    fn coefficient_matrix(&self) -> Result<CoefficientMatrix, TidyError> {
        let result = self.result();
        let aliased = result.design_aliased();
        let std_errors = result.design_std_errors().ok_or_else(missing_inference)?;

        Ok(CoefficientMatrix {
            terms: estimable(&self.model_frame().term_names(), &aliased),
            estimates: estimable(&result.design_coefficients(), &aliased),
            std_errors: estimable(&std_errors, &aliased),
            statistics: result.design_statistics().map(|t| estimable(&t, &aliased)),
            p_values: result.design_p_values().map(|p| estimable(&p, &aliased)),
        })
    }

    fn conf_int(&self, level: f64) -> Result<IntervalEstimate, TidyError> {
        check_level(level)?;
        let coefs = self.coefficient_matrix()?;
        let k = coefs.len();
        let (lower, upper) = CoefficientInference::confidence_intervals(
            &Col::from_fn(k, |j| coefs.estimates[j]),
            &Col::from_fn(k, |j| coefs.std_errors[j]),
            self.result().residual_df() as f64,
            level,
        );

        Ok(IntervalEstimate {
            lower: lower.iter().copied().collect(),
            upper: upper.iter().copied().collect(),
            warnings: Vec::new(),
        })
    }

    fn link(&self) -> Option<Link> {
        Some(Link::Identity)
    }

    fn fit_statistics(&self) -> FitStatistics {
        let result = self.result();
        FitStatistics {
            log_lik: finite(result.log_likelihood),
            aic: finite(result.aic),
            bic: finite(result.bic),
            deviance: finite(result.rss()),
            df_residual: Some(result.residual_df()),
            null_deviance: None,
            df_null: None,
            nobs: Some(result.n_observations),
        }
    }

    fn glance_core(&self) -> GlanceCore {
        let result = self.result();
        GlanceCore {
            r_squared: finite(result.r_squared),
            adj_r_squared: finite(result.adj_r_squared),
            sigma: finite(result.rmse),
            statistic: finite(result.f_statistic),
            p_value: finite(result.f_pvalue),
            df: Some(result.model_df() as f64),
        }
    }

    fn observations(&self) -> Option<Observations<'_>> {
        let frame = self.model_frame();
        let result = self.result();
        Some(Observations {
            frame,
            design: self.active_design(&frame.x),
            mu: result.fitted_values.iter().copied().collect(),
            weights: vec![1.0; frame.nrows()],
            unscaled_cov: self.xtx_inverse(),
            scale: result.mse,
            family: GlmFamily::Gaussian,
            link: Link::Identity,
            n_params: result.n_parameters,
        })
    }

    fn predict(
        &self,
        x: &Mat<f64>,
        _pred_type: PredictionType,
    ) -> Result<PredictionResult, TidyError> {
        check_covariates(x, self.model_frame().covariates.len())?;
        Ok(self.predict_with_se(x))
    }

    fn prediction_interval(
        &self,
        x: &Mat<f64>,
        interval: IntervalType,
        level: f64,
    ) -> Result<PredictionResult, TidyError> {
        check_level(level)?;
        check_covariates(x, self.model_frame().covariates.len())?;
        Ok(self.predict_with_interval(x, interval, level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solvers::{OlsRegressor, Regressor};
    use approx::assert_relative_eq;

    fn fit() -> FittedOls {
        let x = Mat::from_fn(8, 1, |i, _| i as f64);
        let noise = [0.1, -0.2, 0.15, 0.0, -0.1, 0.2, -0.05, 0.1];
        let y = Col::from_fn(8, |i| 1.0 + 2.0 * i as f64 + noise[i]);
        OlsRegressor::builder().build().fit(&x, &y).expect("fit")
    }

    #[test]
    fn test_conf_int_brackets_estimate() {
        let model = fit();
        let coefs = model.coefficient_matrix().expect("coefficients");
        let ci = model.conf_int(0.95).expect("interval");

        assert_eq!(coefs.terms, vec!["(Intercept)", "x1"]);
        for j in 0..coefs.len() {
            assert!(ci.lower[j] < coefs.estimates[j] && coefs.estimates[j] < ci.upper[j]);
            assert_relative_eq!(
                coefs.estimates[j] - ci.lower[j],
                ci.upper[j] - coefs.estimates[j],
                epsilon = 1e-10
            );
        }
    }

    #[test]
    fn test_conf_int_rejects_bad_level() {
        assert!(matches!(
            fit().conf_int(1.5),
            Err(TidyError::InvalidOption(_))
        ));
    }

    #[test]
    fn test_no_inference_is_model_state_error() {
        let x = Mat::from_fn(6, 1, |i, _| i as f64);
        let y = Col::from_fn(6, |i| (i * i) as f64);
        let model = OlsRegressor::builder()
            .compute_inference(false)
            .build()
            .fit(&x, &y)
            .expect("fit");
        assert!(matches!(
            model.coefficient_matrix(),
            Err(TidyError::ModelStateError(_))
        ));
    }

    #[test]
    fn test_predict_checks_width() {
        let model = fit();
        let wide = Mat::from_fn(2, 3, |_, _| 1.0);
        assert!(matches!(
            TidyModel::predict(&model, &wide, PredictionType::Link),
            Err(TidyError::DataMismatch(_))
        ));
    }
}
