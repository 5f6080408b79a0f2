//! Link functions for generalized linear models.
//!
//! A link maps the mean μ to the linear predictor η = g(μ). The tidiers only
//! need a handful of operations on it: the inverse link for predictions, the
//! derivative dμ/dη for delta-method standard errors, and the name, which
//! decides whether exponentiated coefficients have a ratio interpretation.

use statrs::distribution::{Continuous, ContinuousCDF, Normal};
use std::fmt;

/// Link function g(μ) = η.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    /// g(μ) = μ
    Identity,
    /// g(μ) = log(μ)
    Log,
    /// g(μ) = log(μ/(1-μ))
    Logit,
    /// g(μ) = Φ⁻¹(μ)
    Probit,
    /// g(μ) = log(-log(1-μ))
    Cloglog,
    /// g(μ) = 1/μ
    Inverse,
    /// g(μ) = √μ
    Sqrt,
}

const MU_EPS: f64 = 1e-10;

fn std_normal() -> Normal {
    Normal::standard()
}

impl Link {
    /// Name as used in model summaries.
    pub fn name(&self) -> &'static str {
        match self {
            Link::Identity => "identity",
            Link::Log => "log",
            Link::Logit => "logit",
            Link::Probit => "probit",
            Link::Cloglog => "cloglog",
            Link::Inverse => "inverse",
            Link::Sqrt => "sqrt",
        }
    }

    /// Whether `exp(β)` reads as a rate or odds ratio under this link.
    pub fn is_log_like(&self) -> bool {
        matches!(self, Link::Log | Link::Logit)
    }

    /// Compute the link function g(μ).
    #[inline]
    pub fn link(&self, mu: f64) -> f64 {
        match self {
            Link::Identity => mu,
            Link::Log => mu.max(MU_EPS).ln(),
            Link::Logit => {
                let m = mu.clamp(MU_EPS, 1.0 - MU_EPS);
                (m / (1.0 - m)).ln()
            }
            Link::Probit => std_normal().inverse_cdf(mu.clamp(MU_EPS, 1.0 - MU_EPS)),
            Link::Cloglog => {
                let m = mu.clamp(MU_EPS, 1.0 - MU_EPS);
                (-(1.0 - m).ln()).ln()
            }
            Link::Inverse => 1.0 / mu,
            Link::Sqrt => mu.max(0.0).sqrt(),
        }
    }

    /// Compute the inverse link g⁻¹(η) = μ.
    #[inline]
    pub fn link_inverse(&self, eta: f64) -> f64 {
        match self {
            Link::Identity => eta,
            Link::Log => eta.exp().max(f64::EPSILON),
            Link::Logit => {
                if eta > 30.0 {
                    1.0 - 1e-14
                } else if eta < -30.0 {
                    1e-14
                } else {
                    1.0 / (1.0 + (-eta).exp())
                }
            }
            Link::Probit => std_normal().cdf(eta).clamp(1e-14, 1.0 - 1e-14),
            Link::Cloglog => {
                if eta > 10.0 {
                    1.0 - 1e-14
                } else {
                    (1.0 - (-eta.exp()).exp()).clamp(1e-14, 1.0 - 1e-14)
                }
            }
            Link::Inverse => 1.0 / eta,
            Link::Sqrt => eta * eta,
        }
    }

    /// Derivative of the link, dη/dμ.
    #[inline]
    pub fn link_derivative(&self, mu: f64) -> f64 {
        match self {
            Link::Identity => 1.0,
            Link::Log => 1.0 / mu.max(MU_EPS),
            Link::Logit => {
                let m = mu.clamp(MU_EPS, 1.0 - MU_EPS);
                1.0 / (m * (1.0 - m))
            }
            Link::Probit => {
                let z = self.link(mu);
                let pdf = std_normal().pdf(z);
                if pdf < 1e-14 {
                    1e14
                } else {
                    1.0 / pdf
                }
            }
            Link::Cloglog => {
                let m = mu.clamp(MU_EPS, 1.0 - MU_EPS);
                let neg_log = -(1.0 - m).ln();
                1.0 / ((1.0 - m) * neg_log)
            }
            Link::Inverse => -1.0 / (mu * mu),
            Link::Sqrt => 0.5 / mu.max(MU_EPS).sqrt(),
        }
    }

    /// Derivative of the inverse link, dμ/dη.
    #[inline]
    pub fn link_inverse_derivative(&self, eta: f64) -> f64 {
        match self {
            Link::Identity => 1.0,
            Link::Log => eta.exp().max(f64::EPSILON),
            Link::Logit => {
                let mu = self.link_inverse(eta);
                mu * (1.0 - mu)
            }
            Link::Probit => std_normal().pdf(eta).max(f64::EPSILON),
            Link::Cloglog => {
                if eta > 10.0 {
                    f64::EPSILON
                } else {
                    (eta - eta.exp()).exp().max(f64::EPSILON)
                }
            }
            Link::Inverse => -1.0 / (eta * eta),
            Link::Sqrt => 2.0 * eta,
        }
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Link; 7] = [
        Link::Identity,
        Link::Log,
        Link::Logit,
        Link::Probit,
        Link::Cloglog,
        Link::Inverse,
        Link::Sqrt,
    ];

    #[test]
    fn test_link_inverse_roundtrip() {
        for link in ALL {
            let mu = 0.3;
            let eta = link.link(mu);
            assert!(
                (link.link_inverse(eta) - mu).abs() < 1e-8,
                "{} failed roundtrip",
                link
            );
        }
    }

    #[test]
    fn test_derivatives_are_reciprocal() {
        for link in ALL {
            let mu = 0.4;
            let eta = link.link(mu);
            let product = link.link_derivative(mu) * link.link_inverse_derivative(eta);
            assert!((product - 1.0).abs() < 1e-6, "{}: {}", link, product);
        }
    }

    #[test]
    fn test_log_like() {
        assert!(Link::Log.is_log_like());
        assert!(Link::Logit.is_log_like());
        assert!(!Link::Identity.is_log_like());
        assert!(!Link::Probit.is_log_like());
    }
}
