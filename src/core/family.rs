//! Exponential-family distributions for generalized linear models.
//!
//! Each family supplies its variance function V(μ), unit deviance d(y, μ),
//! log-likelihood, starting values for IRLS, and whether the dispersion φ is
//! fixed at 1 or estimated from the Pearson statistic.
//!
//! # Reference
//!
//! McCullagh, P. and Nelder, J.A. (1989). Generalized Linear Models, 2nd ed.

use super::link::Link;
use statrs::function::gamma::ln_gamma;
use std::f64::consts::PI;
use std::fmt;

/// GLM family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlmFamily {
    /// Normal errors, V(μ) = 1.
    Gaussian,
    /// Bernoulli/proportion outcomes, V(μ) = μ(1-μ).
    Binomial,
    /// Counts, V(μ) = μ.
    Poisson,
    /// Positive continuous outcomes, V(μ) = μ².
    Gamma,
}

impl GlmFamily {
    /// Family name as used in model summaries.
    pub fn name(&self) -> &'static str {
        match self {
            GlmFamily::Gaussian => "gaussian",
            GlmFamily::Binomial => "binomial",
            GlmFamily::Poisson => "poisson",
            GlmFamily::Gamma => "Gamma",
        }
    }

    /// Canonical link for the family.
    pub fn canonical_link(&self) -> Link {
        match self {
            GlmFamily::Gaussian => Link::Identity,
            GlmFamily::Binomial => Link::Logit,
            GlmFamily::Poisson => Link::Log,
            GlmFamily::Gamma => Link::Inverse,
        }
    }

    /// Whether φ is estimated (Gaussian, Gamma) rather than fixed at 1.
    pub fn estimates_dispersion(&self) -> bool {
        matches!(self, GlmFamily::Gaussian | GlmFamily::Gamma)
    }

    /// Variance function V(μ).
    #[inline]
    pub fn variance(&self, mu: f64) -> f64 {
        match self {
            GlmFamily::Gaussian => 1.0,
            GlmFamily::Binomial => mu * (1.0 - mu),
            GlmFamily::Poisson => mu,
            GlmFamily::Gamma => mu * mu,
        }
    }

    /// Unit deviance d(y, μ); the total deviance is Σ d(yᵢ, μᵢ).
    pub fn unit_deviance(&self, y: f64, mu: f64) -> f64 {
        match self {
            GlmFamily::Gaussian => (y - mu).powi(2),
            GlmFamily::Binomial => {
                let mu = mu.clamp(1e-15, 1.0 - 1e-15);
                2.0 * (y_log_y(y, mu) + y_log_y(1.0 - y, 1.0 - mu))
            }
            GlmFamily::Poisson => {
                let mu = mu.max(1e-15);
                2.0 * (y_log_y(y, mu) - (y - mu))
            }
            GlmFamily::Gamma => {
                let mu = mu.max(1e-15);
                2.0 * (-(y / mu).ln() + (y - mu) / mu)
            }
        }
        .max(0.0)
    }

    /// Total deviance.
    pub fn deviance(&self, y: &[f64], mu: &[f64]) -> f64 {
        y.iter()
            .zip(mu.iter())
            .map(|(&yi, &mi)| self.unit_deviance(yi, mi))
            .sum()
    }

    /// Starting values for IRLS.
    pub fn initialize_mu(&self, y: &[f64]) -> Vec<f64> {
        let mean = y.iter().sum::<f64>() / y.len().max(1) as f64;
        y.iter()
            .map(|&yi| match self {
                GlmFamily::Gaussian => yi,
                GlmFamily::Binomial => (yi + 0.5) / 2.0,
                GlmFamily::Poisson => yi + 0.1,
                GlmFamily::Gamma => (yi + mean) / 2.0,
            })
            .collect()
    }

    /// Check that a response value is in the family's support.
    pub fn validate_response(&self, y: f64) -> bool {
        match self {
            GlmFamily::Gaussian => y.is_finite(),
            GlmFamily::Binomial => (0.0..=1.0).contains(&y),
            GlmFamily::Poisson => y >= 0.0,
            GlmFamily::Gamma => y > 0.0,
        }
    }

    /// Log-likelihood at the fitted means.
    ///
    /// For families with estimated dispersion, φ is taken at its maximum
    /// likelihood value deviance/n, matching R's `logLik.glm`.
    pub fn log_likelihood(&self, y: &[f64], mu: &[f64], deviance: f64) -> f64 {
        let n = y.len() as f64;
        match self {
            GlmFamily::Gaussian => -0.5 * n * ((2.0 * PI * deviance / n).ln() + 1.0),
            GlmFamily::Binomial => y
                .iter()
                .zip(mu.iter())
                .map(|(&yi, &mi)| {
                    let mi = mi.clamp(1e-15, 1.0 - 1e-15);
                    yi * mi.ln() + (1.0 - yi) * (1.0 - mi).ln()
                })
                .sum(),
            GlmFamily::Poisson => y
                .iter()
                .zip(mu.iter())
                .map(|(&yi, &mi)| yi * mi.max(1e-15).ln() - mi - ln_gamma(yi + 1.0))
                .sum(),
            GlmFamily::Gamma => {
                let disp = deviance / n;
                let shape = 1.0 / disp;
                y.iter()
                    .zip(mu.iter())
                    .map(|(&yi, &mi)| {
                        let scale = mi * disp;
                        (shape - 1.0) * yi.ln() - yi / scale - ln_gamma(shape) - shape * scale.ln()
                    })
                    .sum()
            }
        }
    }

    /// Number of extra parameters counted by AIC beyond the coefficients.
    pub fn aic_extra_params(&self) -> usize {
        usize::from(self.estimates_dispersion())
    }
}

impl fmt::Display for GlmFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// y·log(y/μ) with the convention 0·log(0) = 0.
#[inline]
fn y_log_y(y: f64, mu: f64) -> f64 {
    if y <= 0.0 {
        0.0
    } else {
        y * (y / mu).ln()
    }
}
