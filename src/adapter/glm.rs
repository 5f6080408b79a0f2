//! `TidyModel` for IRLS-fitted GLMs.

use super::linear::check_covariates;
use super::{
    check_level, estimable, finite, CoefficientMatrix, FitStatistics, GlanceCore,
    IntervalEstimate, ModelKind, Observations, TidyModel,
};
use crate::core::{Link, PredictionResult, PredictionType, TidyError, TidyWarning};
use crate::solvers::{FittedGlm, FittedRegressor, ProfileSettings};
use faer::Mat;

impl TidyModel for FittedGlm {
    fn kind(&self) -> ModelKind {
        ModelKind::Generalized
    }

    fn coefficient_matrix(&self) -> Result<CoefficientMatrix, TidyError> {
        let result = self.result();
        let aliased = result.design_aliased();
        let std_errors = result.design_std_errors().ok_or_else(|| {
            TidyError::ModelStateError(
                "model was fit without inference; refit with compute_inference(true)".to_string(),
            )
        })?;

        Ok(CoefficientMatrix {
            terms: estimable(&self.model_frame().term_names(), &aliased),
            estimates: estimable(&result.design_coefficients(), &aliased),
            std_errors: estimable(&std_errors, &aliased),
            statistics: result.design_statistics().map(|t| estimable(&t, &aliased)),
            p_values: result.design_p_values().map(|p| estimable(&p, &aliased)),
        })
    }

    /// Profile-likelihood bounds, computed quietly.
    fn conf_int(&self, level: f64) -> Result<IntervalEstimate, TidyError> {
        check_level(level)?;
        let aliased = self.result().design_aliased();
        let terms = estimable(&self.model_frame().term_names(), &aliased);
        let bounds = estimable(
            &self.profile_conf_int(level, &ProfileSettings::default().quiet(true))?,
            &aliased,
        );

        let mut warnings = Vec::new();
        for (term, b) in terms.iter().zip(&bounds) {
            if b.lower_fallback {
                warnings.push(
                    TidyWarning::ProfileFallback {
                        term: term.clone(),
                        side: "lower",
                    }
                    .emit(),
                );
            }
            if b.upper_fallback {
                warnings.push(
                    TidyWarning::ProfileFallback {
                        term: term.clone(),
                        side: "upper",
                    }
                    .emit(),
                );
            }
        }

        Ok(IntervalEstimate {
            lower: bounds.iter().map(|b| b.lower).collect(),
            upper: bounds.iter().map(|b| b.upper).collect(),
            warnings,
        })
    }

    fn link(&self) -> Option<Link> {
        Some(FittedGlm::link(self))
    }

    fn fit_statistics(&self) -> FitStatistics {
        let result = self.result();
        FitStatistics {
            log_lik: finite(result.log_likelihood),
            aic: finite(result.aic),
            bic: finite(result.bic),
            deviance: finite(self.deviance),
            df_residual: Some(self.df_residual()),
            null_deviance: finite(self.null_deviance),
            df_null: Some(self.df_null()),
            nobs: Some(result.n_observations),
        }
    }

    fn glance_core(&self) -> GlanceCore {
        GlanceCore::default()
    }

    fn observations(&self) -> Option<Observations<'_>> {
        let frame = self.model_frame();
        let result = self.result();
        Some(Observations {
            frame,
            design: self.active_design(&frame.x),
            mu: result.fitted_values.iter().copied().collect(),
            weights: self.working_weights().to_vec(),
            unscaled_cov: self.xtwx_inverse(),
            scale: self.dispersion,
            family: self.family(),
            link: FittedGlm::link(self),
            n_params: result.n_parameters,
        })
    }

    fn predict(
        &self,
        x: &Mat<f64>,
        pred_type: PredictionType,
    ) -> Result<PredictionResult, TidyError> {
        check_covariates(x, self.model_frame().covariates.len())?;
        Ok(self.predict_with_se(x, pred_type))
    }
}
