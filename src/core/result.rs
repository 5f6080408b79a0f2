//! Regression result structures.

use super::na_action::NaInfo;
use faer::Col;

/// Complete result from a regression fit.
///
/// Contains coefficients, fit statistics, and optionally inference statistics
/// (standard errors, test statistics, p-values).
#[derive(Debug, Clone)]
pub struct RegressionResult {
    // ========== Core Results ==========
    /// Estimated coefficients (excluding intercept).
    /// Aliased (collinear) coefficients are set to NaN.
    pub coefficients: Col<f64>,

    /// Intercept term (if model was fit with intercept).
    pub intercept: Option<f64>,

    /// Response residuals (y - fitted_values).
    pub residuals: Col<f64>,

    /// Fitted values on the response scale.
    pub fitted_values: Col<f64>,

    // ========== Rank Information ==========
    /// Numerical rank of the design matrix.
    pub rank: usize,

    /// Number of estimated parameters (including intercept if present).
    pub n_parameters: usize,

    /// Number of observations used in the fit.
    pub n_observations: usize,

    /// Indicates which coefficients are aliased (perfectly collinear).
    pub aliased: Vec<bool>,

    // ========== Fit Statistics ==========
    /// Coefficient of determination (R²).
    pub r_squared: f64,

    /// Adjusted R².
    pub adj_r_squared: f64,

    /// Residual standard error.
    pub rmse: f64,

    /// Residual variance estimate RSS / (n - p).
    pub mse: f64,

    /// F-statistic for overall model significance.
    pub f_statistic: f64,

    /// P-value for F-statistic.
    pub f_pvalue: f64,

    // ========== Information Criteria ==========
    /// Akaike Information Criterion.
    pub aic: f64,

    /// Bayesian Information Criterion.
    pub bic: f64,

    /// Log-likelihood.
    pub log_likelihood: f64,

    // ========== Inference Statistics (Optional) ==========
    /// Standard errors of coefficients.
    pub std_errors: Option<Col<f64>>,

    /// Standard error of intercept.
    pub intercept_std_error: Option<f64>,

    /// Test statistics (t or z) for coefficients.
    pub t_statistics: Option<Col<f64>>,

    /// Test statistic for intercept.
    pub intercept_t_statistic: Option<f64>,

    /// P-values for coefficient significance tests.
    pub p_values: Option<Col<f64>>,

    /// P-value for intercept.
    pub intercept_p_value: Option<f64>,

    // ========== NA Handling Information ==========
    /// Rows removed for missing values before fitting.
    pub na_info: Option<NaInfo>,
}

impl RegressionResult {
    /// Create a new empty result (used internally by solvers).
    pub(crate) fn empty(n_features: usize, n_observations: usize) -> Self {
        Self {
            coefficients: Col::zeros(n_features),
            intercept: None,
            residuals: Col::zeros(n_observations),
            fitted_values: Col::zeros(n_observations),
            rank: 0,
            n_parameters: 0,
            n_observations,
            aliased: vec![false; n_features],
            r_squared: 0.0,
            adj_r_squared: 0.0,
            rmse: 0.0,
            mse: 0.0,
            f_statistic: 0.0,
            f_pvalue: 1.0,
            aic: 0.0,
            bic: 0.0,
            log_likelihood: 0.0,
            std_errors: None,
            intercept_std_error: None,
            t_statistics: None,
            intercept_t_statistic: None,
            p_values: None,
            intercept_p_value: None,
            na_info: None,
        }
    }

    /// Residual degrees of freedom (n - p).
    pub fn residual_df(&self) -> usize {
        self.n_observations.saturating_sub(self.n_parameters)
    }

    /// Model degrees of freedom (p - 1 if intercept, else p).
    pub fn model_df(&self) -> usize {
        if self.intercept.is_some() {
            self.n_parameters.saturating_sub(1)
        } else {
            self.n_parameters
        }
    }

    /// Check if any coefficients are aliased.
    pub fn has_aliased(&self) -> bool {
        self.aliased.iter().any(|&a| a)
    }

    /// Residual sum of squares (RSS).
    pub fn rss(&self) -> f64 {
        self.residuals.iter().map(|&r| r.powi(2)).sum()
    }

    /// Coefficients in design order, intercept first.
    pub fn design_coefficients(&self) -> Vec<f64> {
        with_intercept(self.intercept, Some(&self.coefficients)).unwrap_or_default()
    }

    /// Aliasing flags in design order; the intercept is never aliased.
    pub fn design_aliased(&self) -> Vec<bool> {
        let mut flags = Vec::with_capacity(self.aliased.len() + 1);
        if self.intercept.is_some() {
            flags.push(false);
        }
        flags.extend_from_slice(&self.aliased);
        flags
    }

    /// Standard errors in design order, if inference was computed.
    pub fn design_std_errors(&self) -> Option<Vec<f64>> {
        self.join_intercept(self.intercept_std_error, self.std_errors.as_ref())
    }

    /// Test statistics in design order, if inference was computed.
    pub fn design_statistics(&self) -> Option<Vec<f64>> {
        self.join_intercept(self.intercept_t_statistic, self.t_statistics.as_ref())
    }

    /// P-values in design order, if inference was computed.
    pub fn design_p_values(&self) -> Option<Vec<f64>> {
        self.join_intercept(self.intercept_p_value, self.p_values.as_ref())
    }

    fn join_intercept(&self, head: Option<f64>, rest: Option<&Col<f64>>) -> Option<Vec<f64>> {
        match (self.intercept.is_some(), head) {
            (true, None) => None,
            (true, Some(h)) => with_intercept(Some(h), rest),
            (false, _) => with_intercept(None, rest),
        }
    }
}

fn with_intercept(head: Option<f64>, rest: Option<&Col<f64>>) -> Option<Vec<f64>> {
    let rest = rest?;
    let mut out = Vec::with_capacity(rest.nrows() + 1);
    out.extend(head);
    out.extend(rest.iter().copied());
    Some(out)
}
