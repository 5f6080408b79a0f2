//! GLM-specific residual types.
//!
//! # Residual Types
//!
//! - **Response**: Raw residuals `(y - μ)`
//! - **Pearson**: `(y - μ) / sqrt(V(μ))`
//! - **Deviance**: `sign(y - μ) * sqrt(d_i)` where `d_i` is unit deviance
//! - **Working**: `(y - μ) * (dη/dμ)` - used in IRLS
//!
//! With a Gaussian family and identity link all four coincide.
//!
//! # Reference
//!
//! McCullagh, P. and Nelder, J.A. (1989). Generalized Linear Models, 2nd ed.

use crate::core::{GlmFamily, Link, ResidualType};
use faer::Col;

/// Compute response residuals: y - μ.
pub fn response_residuals(y: &Col<f64>, mu: &Col<f64>) -> Col<f64> {
    let n = y.nrows();
    Col::from_fn(n, |i| y[i] - mu[i])
}

/// Compute Pearson residuals: (y - μ) / sqrt(V(μ)).
pub fn pearson_residuals(y: &Col<f64>, mu: &Col<f64>, family: GlmFamily) -> Col<f64> {
    let n = y.nrows();
    Col::from_fn(n, |i| {
        let v = family.variance(mu[i]);
        if v < 1e-14 {
            0.0
        } else {
            (y[i] - mu[i]) / v.sqrt()
        }
    })
}

/// Compute deviance residuals: sign(y - μ) * sqrt(d_i).
///
/// The squared residuals sum to the model deviance.
pub fn deviance_residuals(y: &Col<f64>, mu: &Col<f64>, family: GlmFamily) -> Col<f64> {
    let n = y.nrows();
    Col::from_fn(n, |i| {
        let d_i = family.unit_deviance(y[i], mu[i]).max(0.0);
        let sign = if y[i] >= mu[i] { 1.0 } else { -1.0 };
        sign * d_i.sqrt()
    })
}

/// Compute working residuals: (y - μ) * (dη/dμ).
///
/// Related to the IRLS working response by z = η + working_residual.
pub fn working_residuals(y: &Col<f64>, mu: &Col<f64>, link: Link) -> Col<f64> {
    let n = y.nrows();
    Col::from_fn(n, |i| (y[i] - mu[i]) * link.link_derivative(mu[i]))
}

/// Residuals of the requested type.
pub fn residuals_of_type(
    kind: ResidualType,
    y: &Col<f64>,
    mu: &Col<f64>,
    family: GlmFamily,
    link: Link,
) -> Col<f64> {
    match kind {
        ResidualType::Response => response_residuals(y, mu),
        ResidualType::Pearson => pearson_residuals(y, mu, family),
        ResidualType::Deviance => deviance_residuals(y, mu, family),
        ResidualType::Working => working_residuals(y, mu, link),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_response_residuals() {
        let y = Col::from_fn(5, |i| i as f64);
        let mu = Col::from_fn(5, |i| (i as f64) + 0.5);

        let resid = response_residuals(&y, &mu);

        for i in 0..5 {
            assert!((resid[i] - (-0.5)).abs() < 1e-10);
        }
    }

    #[test]
    fn test_gaussian_identity_types_coincide() {
        let y = Col::from_fn(5, |i| i as f64);
        let mu = Col::from_fn(5, |i| i as f64 + 0.5);

        for kind in [
            ResidualType::Response,
            ResidualType::Pearson,
            ResidualType::Deviance,
            ResidualType::Working,
        ] {
            let resid = residuals_of_type(kind, &y, &mu, GlmFamily::Gaussian, Link::Identity);
            for i in 0..5 {
                assert_relative_eq!(resid[i], -0.5, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_pearson_residuals_binomial() {
        let y = Col::from_fn(4, |i| if i < 2 { 0.0 } else { 1.0 });
        let mu = Col::from_fn(4, |_| 0.5);

        let resid = pearson_residuals(&y, &mu, GlmFamily::Binomial);

        // V(0.5) = 0.25, so Pearson = (y - 0.5) / 0.5 = ±1
        for i in 0..4 {
            assert!((resid[i].abs() - 1.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_deviance_residuals_square_to_deviance() {
        let y = vec![0.0, 1.0, 3.0, 2.0, 5.0];
        let mu = vec![0.4, 1.5, 2.2, 2.6, 4.1];
        let resid = deviance_residuals(
            &Col::from_fn(5, |i| y[i]),
            &Col::from_fn(5, |i| mu[i]),
            GlmFamily::Poisson,
        );

        let sum_sq: f64 = resid.iter().map(|r| r * r).sum();
        assert_relative_eq!(sum_sq, GlmFamily::Poisson.deviance(&y, &mu), epsilon = 1e-10);
        assert!(resid[0] < 0.0);
        assert!(resid[2] > 0.0);
    }

    #[test]
    fn test_working_residuals_log_link() {
        let y = Col::from_fn(3, |i| (i + 1) as f64);
        let mu = Col::from_fn(3, |_| 2.0);

        let resid = working_residuals(&y, &mu, Link::Log);

        // dη/dμ = 1/μ under the log link
        assert_relative_eq!(resid[0], -0.5, epsilon = 1e-12);
        assert_relative_eq!(resid[1], 0.0, epsilon = 1e-12);
        assert_relative_eq!(resid[2], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_pearson_residuals_near_zero_variance() {
        let y = Col::from_fn(5, |_| 0.0);
        let mu = Col::from_fn(5, |_| 1e-16);

        let resid = pearson_residuals(&y, &mu, GlmFamily::Poisson);

        for i in 0..5 {
            assert_eq!(resid[i], 0.0);
        }
    }
}
