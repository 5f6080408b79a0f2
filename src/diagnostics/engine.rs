//! Per-observation diagnostics for a fitted model's training rows.

use super::glm_residuals::{deviance_residuals, pearson_residuals, residuals_of_type};
use super::influence::{cooks_distance, glm_cooks_distance};
use super::leverage::{compute_leverage, leverage_from_inverse};
use super::residuals::{leave_one_out_sigma, standardized_residuals};
use crate::adapter::{Capabilities, ModelKind, Observations, TidyModel};
use crate::core::{ResidualType, TidyError};
use faer::Col;

/// Diagnostic columns for the training rows.
///
/// A column is `None` when the model variant does not produce it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationDiagnostics {
    /// Residuals of the requested type.
    pub resid: Vec<f64>,
    pub hat: Option<Vec<f64>>,
    /// Leave-one-out residual standard deviation.
    pub sigma: Option<Vec<f64>>,
    pub cooksd: Option<Vec<f64>>,
    pub std_resid: Option<Vec<f64>>,
}

fn to_vec(col: &Col<f64>) -> Vec<f64> {
    col.iter().copied().collect()
}

/// Compute residuals, leverage and influence measures on the training rows.
///
/// Which columns are produced is decided by the model's capability entry.
/// Leverage uses the (X'WX)⁻¹ stored at fit time when available.
pub fn observation_diagnostics<M: TidyModel + ?Sized>(
    model: &M,
    residual_type: ResidualType,
) -> Result<ObservationDiagnostics, TidyError> {
    let caps = model.capabilities();
    match model.observations() {
        Some(obs) if caps.augment => diagnostics_for(caps, &obs, residual_type),
        _ => Err(TidyError::UnsupportedOperation {
            operation: "augment",
            variant: caps.kind.name(),
        }),
    }
}

/// Diagnostics from an already extracted training view.
pub fn diagnostics_for(
    caps: &Capabilities,
    obs: &Observations<'_>,
    residual_type: ResidualType,
) -> Result<ObservationDiagnostics, TidyError> {
    let y = &obs.frame.y;
    let mu = Col::from_fn(obs.mu.len(), |i| obs.mu[i]);
    if y.nrows() != mu.nrows() {
        return Err(TidyError::ModelStateError(format!(
            "model holds {} responses but {} fitted values",
            y.nrows(),
            mu.nrows()
        )));
    }
    let resid = residuals_of_type(residual_type, y, &mu, obs.family, obs.link);

    let mut out = ObservationDiagnostics {
        resid: to_vec(&resid),
        ..ObservationDiagnostics::default()
    };
    if !(caps.hat || caps.sigma || caps.cooksd || caps.std_resid) {
        return Ok(out);
    }

    let hat = match obs.unscaled_cov {
        Some(inv) => leverage_from_inverse(&obs.design, &obs.weights, inv),
        None => compute_leverage(&obs.design, &obs.weights)?,
    };
    let linear = caps.kind == ModelKind::Linear;

    // Linear: e / (σ√(1-h)). GLM: deviance (or Pearson) residual / √(φ(1-h)).
    let std_resid = if linear {
        let raw = Col::from_fn(y.nrows(), |i| y[i] - mu[i]);
        standardized_residuals(&raw, &hat, obs.scale)
    } else {
        let base = match residual_type {
            ResidualType::Pearson => pearson_residuals(y, &mu, obs.family),
            _ => deviance_residuals(y, &mu, obs.family),
        };
        standardized_residuals(&base, &hat, obs.scale)
    };

    if caps.cooksd {
        let cooks = if linear {
            cooks_distance(&std_resid, &hat, obs.n_params)
        } else {
            let pearson = pearson_residuals(y, &mu, obs.family);
            glm_cooks_distance(&pearson, &hat, obs.scale, obs.n_params)
        };
        out.cooksd = Some(to_vec(&cooks));
    }

    if caps.sigma {
        let raw = Col::from_fn(y.nrows(), |i| y[i] - mu[i]);
        out.sigma = leave_one_out_sigma(&raw, &hat, obs.scale.sqrt(), obs.n_params)
            .map(|s| to_vec(&s));
        if out.sigma.is_none() {
            log::debug!(
                "omitting .sigma: {} observations leave no residual df after dropping one of {} parameters",
                y.nrows(),
                obs.n_params
            );
        }
    }

    if caps.std_resid {
        out.std_resid = Some(to_vec(&std_resid));
    }
    if caps.hat {
        out.hat = Some(to_vec(&hat));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solvers::{GlmRegressor, OlsRegressor, Regressor};
    use approx::assert_relative_eq;
    use faer::Mat;

    #[test]
    fn test_linear_diagnostics_present() {
        let x = Mat::from_fn(10, 1, |i, _| i as f64);
        let noise = [0.3, -0.1, 0.2, -0.4, 0.1, 0.0, -0.2, 0.5, -0.3, 0.1];
        let y = Col::from_fn(10, |i| 2.0 + 0.5 * i as f64 + noise[i]);
        let model = OlsRegressor::builder().build().fit(&x, &y).expect("fit");

        let diag = observation_diagnostics(&model, ResidualType::Deviance).expect("diagnostics");
        let hat = diag.hat.expect("hat");
        assert_relative_eq!(hat.iter().sum::<f64>(), 2.0, epsilon = 1e-10);
        assert!(diag.sigma.is_some());
        assert!(diag.cooksd.is_some());
        assert_eq!(diag.std_resid.expect("std resid").len(), 10);
    }

    #[test]
    fn test_glm_has_no_loo_sigma() {
        let x = Mat::from_fn(10, 1, |i, _| i as f64 / 3.0);
        let counts = [0.0, 1.0, 1.0, 2.0, 1.0, 3.0, 4.0, 3.0, 6.0, 7.0];
        let y = Col::from_fn(10, |i| counts[i]);
        let model = GlmRegressor::poisson().build().fit(&x, &y).expect("fit");

        let diag = observation_diagnostics(&model, ResidualType::Pearson).expect("diagnostics");
        assert!(diag.sigma.is_none());
        assert_relative_eq!(
            diag.hat.expect("hat").iter().sum::<f64>(),
            2.0,
            epsilon = 1e-8
        );
    }

    #[test]
    fn test_saturated_linear_model_omits_sigma() {
        let x = Mat::from_fn(3, 1, |i, _| i as f64);
        let y = Col::from_fn(3, |i| [1.0, 3.0, 2.0][i]);
        let model = OlsRegressor::builder().build().fit(&x, &y).expect("fit");

        let diag = observation_diagnostics(&model, ResidualType::Response).expect("diagnostics");
        assert!(diag.sigma.is_none());
        assert!(diag.hat.is_some());
    }
}
