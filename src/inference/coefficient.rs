//! Coefficient inference calculations.

use faer::{Col, Mat};
use statrs::distribution::{ContinuousCDF, Normal, StudentsT};

/// Computes inference statistics for regression coefficients.
pub struct CoefficientInference;

impl CoefficientInference {
    /// Standard errors from an unscaled covariance matrix.
    ///
    /// SE(β_j) = sqrt(scale * (X'WX)^(-1)_{jj})
    pub fn standard_errors(unscaled_cov: &Mat<f64>, scale: f64) -> Col<f64> {
        Col::from_fn(unscaled_cov.nrows(), |j| {
            let var = scale * unscaled_cov[(j, j)];
            if var >= 0.0 {
                var.sqrt()
            } else {
                f64::NAN
            }
        })
    }

    /// Compute t-statistics for coefficients.
    ///
    /// t_j = β_j / SE(β_j)
    pub fn t_statistics(coefficients: &Col<f64>, std_errors: &Col<f64>) -> Col<f64> {
        Col::from_fn(coefficients.nrows(), |j| {
            if std_errors[j].is_nan() || std_errors[j] == 0.0 {
                f64::NAN
            } else {
                coefficients[j] / std_errors[j]
            }
        })
    }

    /// Two-sided p-values from t-statistics.
    ///
    /// p_j = 2 * P(|T| > |t_j|) where T ~ t(df)
    pub fn p_values(t_statistics: &Col<f64>, df: f64) -> Col<f64> {
        let n = t_statistics.nrows();
        let t_dist = if df > 0.0 {
            StudentsT::new(0.0, 1.0, df).ok()
        } else {
            None
        };

        match t_dist {
            None => Col::from_fn(n, |_| f64::NAN),
            Some(dist) => Col::from_fn(n, |j| {
                let t = t_statistics[j];
                if t.is_nan() {
                    f64::NAN
                } else {
                    2.0 * dist.sf(t.abs())
                }
            }),
        }
    }

    /// Two-sided p-values from z-statistics (fixed dispersion).
    pub fn z_p_values(z_statistics: &Col<f64>) -> Col<f64> {
        let normal = Normal::standard();
        Col::from_fn(z_statistics.nrows(), |j| {
            let z = z_statistics[j];
            if z.is_nan() {
                f64::NAN
            } else {
                2.0 * normal.sf(z.abs())
            }
        })
    }

    /// Upper critical value of t(df) for a two-sided interval.
    pub fn t_critical(df: f64, confidence_level: f64) -> f64 {
        if df <= 0.0 {
            return f64::NAN;
        }
        StudentsT::new(0.0, 1.0, df).map_or(f64::NAN, |d| {
            d.inverse_cdf(1.0 - (1.0 - confidence_level) / 2.0)
        })
    }

    /// Upper critical value of N(0, 1) for a two-sided interval.
    pub fn z_critical(confidence_level: f64) -> f64 {
        Normal::standard().inverse_cdf(1.0 - (1.0 - confidence_level) / 2.0)
    }

    /// Compute confidence intervals for coefficients.
    ///
    /// CI_j = β_j ± t_{α/2, df} * SE(β_j)
    pub fn confidence_intervals(
        coefficients: &Col<f64>,
        std_errors: &Col<f64>,
        df: f64,
        confidence_level: f64,
    ) -> (Col<f64>, Col<f64>) {
        let crit = Self::t_critical(df, confidence_level);
        Self::symmetric_intervals(coefficients, std_errors, crit)
    }

    /// Normal-approximation (Wald) intervals.
    ///
    /// CI_j = β_j ± z_{α/2} * SE(β_j)
    pub fn wald_intervals(
        coefficients: &Col<f64>,
        std_errors: &Col<f64>,
        confidence_level: f64,
    ) -> (Col<f64>, Col<f64>) {
        let crit = Self::z_critical(confidence_level);
        Self::symmetric_intervals(coefficients, std_errors, crit)
    }

    fn symmetric_intervals(
        coefficients: &Col<f64>,
        std_errors: &Col<f64>,
        crit: f64,
    ) -> (Col<f64>, Col<f64>) {
        let n = coefficients.nrows();
        let lower = Col::from_fn(n, |j| coefficients[j] - crit * std_errors[j]);
        let upper = Col::from_fn(n, |j| coefficients[j] + crit * std_errors[j]);
        (lower, upper)
    }
}
