//! `TidyModel` for ARIMA fits.

use super::{
    check_level, finite, CoefficientMatrix, FitStatistics, GlanceCore, IntervalEstimate,
    ModelKind, Observations, TidyModel,
};
use crate::core::{Link, PredictionResult, PredictionType, TidyError};
use crate::inference::CoefficientInference;
use crate::solvers::FittedArima;
use faer::{Col, Mat};

impl TidyModel for FittedArima {
    fn kind(&self) -> ModelKind {
        ModelKind::TimeSeries
    }

    fn coefficient_matrix(&self) -> Result<CoefficientMatrix, TidyError> {
        Ok(CoefficientMatrix {
            terms: self.terms().to_vec(),
            estimates: self.estimates().to_vec(),
            std_errors: self.std_errors(),
            statistics: None,
            p_values: None,
        })
    }

    fn conf_int(&self, level: f64) -> Result<IntervalEstimate, TidyError> {
        check_level(level)?;
        let estimates = self.estimates();
        let se = self.std_errors();
        let k = estimates.len();
        let (lower, upper) = CoefficientInference::wald_intervals(
            &Col::from_fn(k, |j| estimates[j]),
            &Col::from_fn(k, |j| se[j]),
            level,
        );

        Ok(IntervalEstimate {
            lower: lower.iter().copied().collect(),
            upper: upper.iter().copied().collect(),
            warnings: Vec::new(),
        })
    }

    fn link(&self) -> Option<Link> {
        None
    }

    fn fit_statistics(&self) -> FitStatistics {
        FitStatistics {
            log_lik: finite(self.log_likelihood()),
            aic: finite(self.aic()),
            bic: finite(self.bic()),
            nobs: Some(self.nobs()),
            ..FitStatistics::default()
        }
    }

    fn glance_core(&self) -> GlanceCore {
        GlanceCore {
            sigma: finite(self.sigma2().sqrt()),
            ..GlanceCore::default()
        }
    }

    fn observations(&self) -> Option<Observations<'_>> {
        None
    }

    fn predict(
        &self,
        _x: &Mat<f64>,
        _pred_type: PredictionType,
    ) -> Result<PredictionResult, TidyError> {
        Err(TidyError::UnsupportedOperation {
            operation: "predict",
            variant: self.kind().name(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solvers::ArimaOrder;
    use approx::assert_relative_eq;

    #[test]
    fn test_normal_approximation_interval() {
        let model = FittedArima::new(
            ArimaOrder::new(1, 0, 1).term_names(false),
            vec![0.5, -0.3],
            Mat::from_fn(2, 2, |i, j| if i == j { 0.04 } else { 0.0 }),
            2.0,
            -100.0,
            80,
        )
        .expect("valid fit");

        let ci = model.conf_int(0.95).expect("interval");
        let z = CoefficientInference::z_critical(0.95);
        assert_relative_eq!(ci.lower[0], 0.5 - z * 0.2, epsilon = 1e-12);
        assert_relative_eq!(ci.upper[1], -0.3 + z * 0.2, epsilon = 1e-12);
        assert!(model.link().is_none());
        assert!(model.observations().is_none());
    }
}
