//! Carrier for externally estimated ARIMA fits.
//!
//! Estimation of time-series models happens elsewhere; this type holds the
//! estimates, their covariance, the innovation variance and the
//! log-likelihood so they can be tidied and glanced like any other model.

use crate::solvers::traits::RegressionError;
use faer::Mat;

/// ARIMA(p, d, q) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArimaOrder {
    pub p: usize,
    pub d: usize,
    pub q: usize,
}

impl ArimaOrder {
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }

    /// Conventional coefficient names: `ar1..arp`, `ma1..maq`, then
    /// `intercept` when a mean is estimated.
    pub fn term_names(&self, include_mean: bool) -> Vec<String> {
        let mut names: Vec<String> = (1..=self.p).map(|i| format!("ar{}", i)).collect();
        names.extend((1..=self.q).map(|i| format!("ma{}", i)));
        if include_mean {
            names.push("intercept".to_string());
        }
        names
    }
}

/// A fitted ARIMA model.
#[derive(Debug, Clone)]
pub struct FittedArima {
    order: Option<ArimaOrder>,
    terms: Vec<String>,
    estimates: Vec<f64>,
    vcov: Mat<f64>,
    sigma2: f64,
    log_likelihood: f64,
    nobs: usize,
}

impl FittedArima {
    /// Wrap an estimated fit.
    ///
    /// `vcov` is the covariance of `estimates`; `sigma2` the innovation
    /// variance; `nobs` the number of observations used in estimation.
    pub fn new(
        terms: Vec<String>,
        estimates: Vec<f64>,
        vcov: Mat<f64>,
        sigma2: f64,
        log_likelihood: f64,
        nobs: usize,
    ) -> Result<Self, RegressionError> {
        let k = estimates.len();
        if terms.len() != k {
            return Err(RegressionError::InvalidData(format!(
                "{} term names for {} estimates",
                terms.len(),
                k
            )));
        }
        if vcov.nrows() != k || vcov.ncols() != k {
            return Err(RegressionError::InvalidData(format!(
                "covariance matrix is {}x{} but there are {} estimates",
                vcov.nrows(),
                vcov.ncols(),
                k
            )));
        }
        if !(sigma2.is_finite() && sigma2 > 0.0) {
            return Err(RegressionError::InvalidData(format!(
                "innovation variance must be positive, got {}",
                sigma2
            )));
        }
        if nobs == 0 {
            return Err(RegressionError::InsufficientObservations { needed: 1, got: 0 });
        }

        Ok(Self {
            order: None,
            terms,
            estimates,
            vcov,
            sigma2,
            log_likelihood,
            nobs,
        })
    }

    /// Record the model order.
    pub fn with_order(mut self, order: ArimaOrder) -> Self {
        self.order = Some(order);
        self
    }

    /// Model order, if recorded.
    pub fn order(&self) -> Option<ArimaOrder> {
        self.order
    }

    /// Coefficient names.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Coefficient estimates.
    pub fn estimates(&self) -> &[f64] {
        &self.estimates
    }

    /// Covariance of the estimates.
    pub fn vcov(&self) -> &Mat<f64> {
        &self.vcov
    }

    /// Standard errors from the covariance diagonal.
    pub fn std_errors(&self) -> Vec<f64> {
        (0..self.estimates.len())
            .map(|j| {
                let v = self.vcov[(j, j)];
                if v >= 0.0 {
                    v.sqrt()
                } else {
                    f64::NAN
                }
            })
            .collect()
    }

    /// Innovation variance σ².
    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    /// Maximized log-likelihood.
    pub fn log_likelihood(&self) -> f64 {
        self.log_likelihood
    }

    /// Observations used in estimation.
    pub fn nobs(&self) -> usize {
        self.nobs
    }

    /// AIC, counting σ² as a parameter.
    pub fn aic(&self) -> f64 {
        -2.0 * self.log_likelihood + 2.0 * (self.estimates.len() + 1) as f64
    }

    /// BIC, counting σ² as a parameter.
    pub fn bic(&self) -> f64 {
        -2.0 * self.log_likelihood + (self.estimates.len() + 1) as f64 * (self.nobs as f64).ln()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ar1() -> FittedArima {
        FittedArima::new(
            ArimaOrder::new(1, 0, 0).term_names(true),
            vec![0.6, 10.0],
            Mat::from_fn(2, 2, |i, j| if i == j { [0.01, 0.25][i] } else { 0.0 }),
            1.5,
            -140.0,
            100,
        )
        .expect("valid fit")
    }

    #[test]
    fn test_information_criteria() {
        let fit = ar1();
        assert_relative_eq!(fit.aic(), 286.0);
        assert_relative_eq!(fit.bic(), 280.0 + 3.0 * 100.0_f64.ln());
        assert_eq!(fit.terms(), ["ar1", "intercept"]);
        assert_relative_eq!(fit.std_errors()[1], 0.5);
    }

    #[test]
    fn test_rejects_bad_shapes() {
        let err = FittedArima::new(
            vec!["ar1".into()],
            vec![0.5],
            Mat::zeros(2, 2),
            1.0,
            0.0,
            10,
        )
        .unwrap_err();
        assert!(matches!(err, RegressionError::InvalidData(_)));
    }
}
