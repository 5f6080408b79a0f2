//! Generalized linear model solver.
//!
//! Fits any [`GlmFamily`] under any [`Link`] by Iteratively Reweighted Least
//! Squares (IRLS). The same IRLS routine, run with one coefficient held fixed
//! through an offset, drives the profile-likelihood confidence intervals.
//!
//! # Example
//!
//! ```rust,ignore
//! use tidy_regress::solvers::{GlmRegressor, Regressor, FittedRegressor};
//! use faer::{Mat, Col};
//!
//! let x = Mat::from_fn(100, 2, |i, j| (i + j) as f64 / 100.0);
//! let y = Col::from_fn(100, |i| (i % 10) as f64);
//!
//! let fitted = GlmRegressor::poisson().build().fit(&x, &y)?;
//! let counts = fitted.predict(&x);
//! ```
//!
//! # Reference
//!
//! McCullagh, P. and Nelder, J.A. (1989). Generalized Linear Models, 2nd ed.

use crate::core::{
    GlmFamily, Link, PredictionResult, PredictionType, RegressionOptions,
    RegressionOptionsBuilder, RegressionResult,
};
use crate::frame::{Frame, ModelFrame};
use crate::inference::CoefficientInference;
use crate::solvers::traits::{FittedRegressor, RegressionError, Regressor};
use crate::utils::{design_matrix, drop_columns, row_quadratic_form, weighted_cross_inverse};
use faer::{Col, Mat};

/// GLM regression estimator.
#[derive(Debug, Clone)]
pub struct GlmRegressor {
    options: RegressionOptions,
    family: GlmFamily,
    link: Link,
}

impl GlmRegressor {
    /// Create a new GLM regressor.
    pub fn new(options: RegressionOptions, family: GlmFamily, link: Link) -> Self {
        Self {
            options,
            family,
            link,
        }
    }

    /// Builder for a family; the link defaults to the canonical one.
    pub fn builder(family: GlmFamily) -> GlmRegressorBuilder {
        GlmRegressorBuilder {
            options_builder: RegressionOptionsBuilder::default(),
            family,
            link: family.canonical_link(),
        }
    }

    /// Gaussian family, identity link.
    pub fn gaussian() -> GlmRegressorBuilder {
        Self::builder(GlmFamily::Gaussian)
    }

    /// Binomial family, logit link.
    pub fn binomial() -> GlmRegressorBuilder {
        Self::builder(GlmFamily::Binomial)
    }

    /// Poisson family, log link.
    pub fn poisson() -> GlmRegressorBuilder {
        Self::builder(GlmFamily::Poisson)
    }

    /// Gamma family, inverse link.
    pub fn gamma() -> GlmRegressorBuilder {
        Self::builder(GlmFamily::Gamma)
    }

    /// Fit on named columns of a frame.
    pub fn fit_frame(
        &self,
        frame: &Frame,
        response: &str,
        covariates: &[&str],
    ) -> Result<FittedGlm, RegressionError> {
        let model_frame = ModelFrame::from_frame(
            frame,
            response,
            covariates,
            self.options.with_intercept,
            self.options.na_action,
        )?;
        self.fit_model_frame(model_frame)
    }

    fn fit_model_frame(&self, frame: ModelFrame) -> Result<FittedGlm, RegressionError> {
        self.options.validate()?;

        let n_samples = frame.nrows();
        let design = design_matrix(&frame.x, self.options.with_intercept);
        let n_params = design.ncols();

        if n_samples < 2 {
            return Err(RegressionError::InsufficientObservations {
                needed: 2,
                got: n_samples,
            });
        }
        if n_samples < n_params {
            return Err(RegressionError::InsufficientObservations {
                needed: n_params,
                got: n_samples,
            });
        }

        let y: Vec<f64> = frame.y.iter().copied().collect();
        if let Some(i) = y.iter().position(|&v| !self.family.validate_response(v)) {
            return Err(RegressionError::InvalidData(format!(
                "response value {} at row {} is outside the support of the {} family",
                y[i], i, self.family
            )));
        }

        let design_aliased = aliased_columns(&design, self.options.rank_tolerance);
        let active = drop_columns(&design, &design_aliased);
        let rank = active.ncols();

        let offset = vec![0.0; n_samples];
        let fit = irls(
            &active,
            &y,
            &offset,
            self.family,
            self.link,
            None,
            &self.options,
        )?;
        log::debug!(
            "IRLS for {} ({} link) converged in {} iterations, deviance {}",
            self.family,
            self.link,
            fit.iterations,
            fit.deviance
        );

        let df_resid = n_samples.saturating_sub(rank);
        let dispersion = if !self.family.estimates_dispersion() {
            1.0
        } else if df_resid > 0 {
            pearson_chi_squared(&y, &fit.mu, self.family) / df_resid as f64
        } else {
            f64::NAN
        };

        // Intercept-only fit has μ = ȳ under any link; without an intercept μ = g⁻¹(0)
        let null_mu = if self.options.with_intercept {
            vec![y.iter().sum::<f64>() / n_samples as f64; n_samples]
        } else {
            vec![self.link.link_inverse(0.0); n_samples]
        };
        let null_deviance = self.family.deviance(&y, &null_mu);

        let log_likelihood = self.family.log_likelihood(&y, &fit.mu, fit.deviance);
        let k = (rank + self.family.aic_extra_params()) as f64;
        let aic = 2.0 * k - 2.0 * log_likelihood;
        let bic = k * (n_samples as f64).ln() - 2.0 * log_likelihood;

        // Scatter active coefficients back to design order
        let mut beta_design = vec![f64::NAN; n_params];
        let mut next = 0;
        for (j, &is_aliased) in design_aliased.iter().enumerate() {
            if !is_aliased {
                beta_design[j] = fit.beta[next];
                next += 1;
            }
        }

        let offset_cols = usize::from(self.options.with_intercept);
        let n_features = frame.x.ncols();

        let mut result = RegressionResult::empty(n_features, n_samples);
        result.intercept = self.options.with_intercept.then(|| beta_design[0]);
        result.coefficients = Col::from_fn(n_features, |j| beta_design[j + offset_cols]);
        result.aliased = design_aliased[offset_cols..].to_vec();
        result.fitted_values = Col::from_fn(n_samples, |i| fit.mu[i]);
        result.residuals = Col::from_fn(n_samples, |i| y[i] - fit.mu[i]);
        result.rank = rank;
        result.n_parameters = rank;
        result.n_observations = n_samples;
        result.r_squared = f64::NAN;
        result.adj_r_squared = f64::NAN;
        result.f_statistic = f64::NAN;
        result.f_pvalue = f64::NAN;
        result.mse = dispersion;
        result.rmse = dispersion.sqrt();
        result.aic = aic;
        result.bic = bic;
        result.log_likelihood = log_likelihood;
        result.na_info = Some(frame.na_info.clone());

        let xtwx_inverse = weighted_cross_inverse(&active, &fit.weights).ok();

        if self.options.compute_inference && dispersion.is_finite() {
            if let Some(inv) = &xtwx_inverse {
                self.compute_inference(
                    inv,
                    &fit.beta,
                    dispersion,
                    df_resid,
                    &design_aliased,
                    &mut result,
                );
            }
        }

        Ok(FittedGlm {
            options: self.options.clone(),
            family: self.family,
            link: self.link,
            result,
            frame,
            deviance: fit.deviance,
            null_deviance,
            dispersion,
            iterations: fit.iterations,
            weights: fit.weights,
            xtwx_inverse,
        })
    }

    /// Wald standard errors with t tests when φ is estimated, z tests otherwise.
    fn compute_inference(
        &self,
        xtwx_inverse: &Mat<f64>,
        beta_active: &Col<f64>,
        dispersion: f64,
        df_resid: usize,
        design_aliased: &[bool],
        result: &mut RegressionResult,
    ) {
        let se_active = CoefficientInference::standard_errors(xtwx_inverse, dispersion);
        let stat_active = CoefficientInference::t_statistics(beta_active, &se_active);
        let p_active = if self.family.estimates_dispersion() {
            CoefficientInference::p_values(&stat_active, df_resid as f64)
        } else {
            CoefficientInference::z_p_values(&stat_active)
        };

        let scatter = |active: &Col<f64>| {
            let mut out = Vec::with_capacity(design_aliased.len());
            let mut next = 0;
            for &is_aliased in design_aliased {
                if is_aliased {
                    out.push(f64::NAN);
                } else {
                    out.push(active[next]);
                    next += 1;
                }
            }
            out
        };
        let se = scatter(&se_active);
        let stat = scatter(&stat_active);
        let p = scatter(&p_active);

        let offset = usize::from(result.intercept.is_some());
        if offset == 1 {
            result.intercept_std_error = Some(se[0]);
            result.intercept_t_statistic = Some(stat[0]);
            result.intercept_p_value = Some(p[0]);
        }
        let n_features = result.coefficients.nrows();
        result.std_errors = Some(Col::from_fn(n_features, |j| se[j + offset]));
        result.t_statistics = Some(Col::from_fn(n_features, |j| stat[j + offset]));
        result.p_values = Some(Col::from_fn(n_features, |j| p[j + offset]));
    }
}

impl Regressor for GlmRegressor {
    type Fitted = FittedGlm;

    fn fit(&self, x: &Mat<f64>, y: &Col<f64>) -> Result<Self::Fitted, RegressionError> {
        let frame = ModelFrame::from_matrix(
            x,
            y,
            self.options.with_intercept,
            self.options.na_action,
        )?;
        self.fit_model_frame(frame)
    }
}

/// Output of one IRLS run.
#[derive(Debug, Clone)]
struct IrlsFit {
    beta: Col<f64>,
    mu: Vec<f64>,
    weights: Vec<f64>,
    deviance: f64,
    iterations: usize,
}

/// IRLS on a full-rank design with a fixed offset.
///
/// Converges when the relative deviance change falls below the tolerance, as
/// R's `glm.fit` does. Non-finite deviance triggers step halving.
fn irls(
    x: &Mat<f64>,
    y: &[f64],
    offset: &[f64],
    family: GlmFamily,
    link: Link,
    mu_start: Option<&[f64]>,
    options: &RegressionOptions,
) -> Result<IrlsFit, RegressionError> {
    let n = y.len();
    let p = x.ncols();

    if p == 0 {
        let mu: Vec<f64> = offset.iter().map(|&e| link.link_inverse(e)).collect();
        let deviance = family.deviance(y, &mu);
        let weights = working_weights(&mu, family, link);
        return Ok(IrlsFit {
            beta: Col::zeros(0),
            mu,
            weights,
            deviance,
            iterations: 0,
        });
    }

    let mut mu: Vec<f64> = match mu_start {
        Some(start) => start.to_vec(),
        None => family.initialize_mu(y),
    };
    let mut eta: Vec<f64> = mu.iter().map(|&m| link.link(m)).collect();
    let mut beta: Option<Col<f64>> = None;
    let mut dev_old = family.deviance(y, &mu);

    for iter in 1..=options.max_iterations {
        let weights = working_weights(&mu, family, link);
        let z: Vec<f64> = (0..n)
            .map(|i| {
                let zi = eta[i] - offset[i] + (y[i] - mu[i]) * link.link_derivative(mu[i]);
                if zi.is_finite() {
                    zi
                } else {
                    0.0
                }
            })
            .collect();

        let mut beta_new = solve_weighted_ls(x, &z, &weights, options.rank_tolerance)?;
        let (mut eta_new, mut mu_new) = linear_predictor(x, &beta_new, offset, link);
        let mut dev_new = family.deviance(y, &mu_new);

        // Step halving towards the previous coefficients
        let mut halvings = 0;
        while !dev_new.is_finite() {
            let prev = match &beta {
                Some(b) => b,
                None => break,
            };
            if halvings >= 30 {
                break;
            }
            beta_new = Col::from_fn(p, |j| 0.5 * (beta_new[j] + prev[j]));
            let (e, m) = linear_predictor(x, &beta_new, offset, link);
            eta_new = e;
            mu_new = m;
            dev_new = family.deviance(y, &mu_new);
            halvings += 1;
        }
        if !dev_new.is_finite() {
            return Err(RegressionError::NumericalError(
                "deviance is not finite during IRLS".to_string(),
            ));
        }

        beta = Some(beta_new);
        eta = eta_new;
        mu = mu_new;

        if (dev_new - dev_old).abs() / (dev_new.abs() + 0.1) < options.tolerance {
            let weights = working_weights(&mu, family, link);
            return Ok(IrlsFit {
                beta: beta.unwrap_or_else(|| Col::zeros(p)),
                mu,
                weights,
                deviance: dev_new,
                iterations: iter,
            });
        }
        dev_old = dev_new;
    }

    Err(RegressionError::ConvergenceFailed {
        iterations: options.max_iterations,
    })
}

/// IRLS weights 1 / (V(μ) g'(μ)²).
fn working_weights(mu: &[f64], family: GlmFamily, link: Link) -> Vec<f64> {
    mu.iter()
        .map(|&m| {
            let d = link.link_derivative(m);
            let w = 1.0 / (family.variance(m) * d * d);
            if w.is_finite() {
                w
            } else {
                0.0
            }
        })
        .collect()
}

fn linear_predictor(
    x: &Mat<f64>,
    beta: &Col<f64>,
    offset: &[f64],
    link: Link,
) -> (Vec<f64>, Vec<f64>) {
    let eta: Vec<f64> = (0..x.nrows())
        .map(|i| {
            let mut e = offset[i];
            for j in 0..x.ncols() {
                e += x[(i, j)] * beta[j];
            }
            e
        })
        .collect();
    let mu = eta.iter().map(|&e| link.link_inverse(e)).collect();
    (eta, mu)
}

fn solve_weighted_ls(
    x: &Mat<f64>,
    z: &[f64],
    weights: &[f64],
    rank_tolerance: f64,
) -> Result<Col<f64>, RegressionError> {
    let n_samples = x.nrows();
    let n_params = x.ncols();

    let x_weighted = Mat::from_fn(n_samples, n_params, |i, j| weights[i].sqrt() * x[(i, j)]);
    let z_weighted = Col::from_fn(n_samples, |i| weights[i].sqrt() * z[i]);

    let qr = x_weighted.col_piv_qr();
    let q = qr.compute_Q();
    let r = qr.R();
    let perm = qr.P();

    let qtz = q.transpose() * z_weighted;

    let mut beta_perm = Col::zeros(n_params);
    for i in (0..n_params).rev() {
        let mut sum = qtz[i];
        for j in (i + 1)..n_params {
            sum -= r[(i, j)] * beta_perm[j];
        }
        if r[(i, i)].abs() > rank_tolerance {
            beta_perm[i] = sum / r[(i, i)];
        } else {
            return Err(RegressionError::SingularMatrix);
        }
    }

    // original[i] = design column at pivot position i
    let mut beta = Col::zeros(n_params);
    let original = perm.arrays().0;
    for i in 0..n_params {
        beta[original[i]] = beta_perm[i];
    }

    Ok(beta)
}

/// Columns beyond the numerical rank of the design, found by pivoted QR.
fn aliased_columns(design: &Mat<f64>, rank_tolerance: f64) -> Vec<bool> {
    let p = design.ncols();
    if p == 0 {
        return Vec::new();
    }
    let qr = design.col_piv_qr();
    let r = qr.R();
    let position = qr.P().arrays().1;

    let mut rank = 0;
    for i in 0..p.min(design.nrows()) {
        if r[(i, i)].abs() > rank_tolerance {
            rank += 1;
        } else {
            break;
        }
    }
    (0..p).map(|j| position[j] >= rank).collect()
}

/// Σ (y - μ)² / V(μ).
fn pearson_chi_squared(y: &[f64], mu: &[f64], family: GlmFamily) -> f64 {
    y.iter()
        .zip(mu.iter())
        .map(|(&yi, &mi)| {
            let v = family.variance(mi);
            if v < 1e-14 {
                0.0
            } else {
                (yi - mi).powi(2) / v
            }
        })
        .sum()
}

/// Step limits for profile-likelihood intervals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileSettings {
    /// Maximum bracket expansions, and maximum bisection steps.
    pub max_steps: usize,
    /// Bisection stops when the bracket is narrower than this many standard errors.
    pub tolerance: f64,
    /// Suppress the progress message.
    pub quiet: bool,
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self {
            max_steps: 60,
            tolerance: 1e-6,
            quiet: false,
        }
    }
}

impl ProfileSettings {
    /// Same settings with the quiet flag set.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }
}

/// Profile-likelihood interval for one coefficient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileBounds {
    pub lower: f64,
    pub upper: f64,
    /// The lower bound is the Wald bound because profiling failed.
    pub lower_fallback: bool,
    /// The upper bound is the Wald bound because profiling failed.
    pub upper_fallback: bool,
}

/// Fitted GLM.
#[derive(Debug, Clone)]
pub struct FittedGlm {
    options: RegressionOptions,
    family: GlmFamily,
    link: Link,
    result: RegressionResult,
    frame: ModelFrame,
    /// Residual deviance.
    pub deviance: f64,
    /// Deviance of the intercept-only (or empty) model.
    pub null_deviance: f64,
    /// Dispersion φ; 1 for binomial and Poisson.
    pub dispersion: f64,
    /// Number of IRLS iterations.
    pub iterations: usize,
    weights: Vec<f64>,
    /// (X'WX)⁻¹ over the non-aliased design columns.
    xtwx_inverse: Option<Mat<f64>>,
}

impl FittedGlm {
    /// Family the model was fit with.
    pub fn family(&self) -> GlmFamily {
        self.family
    }

    /// Link the model was fit with.
    pub fn link(&self) -> Link {
        self.link
    }

    /// Options used to fit this model.
    pub fn options(&self) -> &RegressionOptions {
        &self.options
    }

    /// Data the model was fit on.
    pub fn model_frame(&self) -> &ModelFrame {
        &self.frame
    }

    /// IRLS working weights at convergence.
    pub fn working_weights(&self) -> &[f64] {
        &self.weights
    }

    /// (X'WX)⁻¹ over the non-aliased design columns, if it could be formed.
    pub fn xtwx_inverse(&self) -> Option<&Mat<f64>> {
        self.xtwx_inverse.as_ref()
    }

    /// Residual degrees of freedom.
    pub fn df_residual(&self) -> usize {
        self.result.residual_df()
    }

    /// Degrees of freedom of the null model.
    pub fn df_null(&self) -> usize {
        self.result
            .n_observations
            .saturating_sub(usize::from(self.options.with_intercept))
    }

    /// Design matrix for covariates `x`, restricted to non-aliased columns.
    pub fn active_design(&self, x: &Mat<f64>) -> Mat<f64> {
        drop_columns(
            &design_matrix(x, self.options.with_intercept),
            &self.result.design_aliased(),
        )
    }

    fn active_coefficients(&self) -> Vec<f64> {
        self.result
            .design_coefficients()
            .into_iter()
            .zip(self.result.design_aliased())
            .filter(|(_, aliased)| !aliased)
            .map(|(b, _)| b)
            .collect()
    }

    /// Linear predictor η = Xβ for new covariates.
    pub fn predict_link(&self, x: &Mat<f64>) -> Col<f64> {
        let design = self.active_design(x);
        let beta = self.active_coefficients();
        Col::from_fn(design.nrows(), |i| {
            (0..design.ncols()).map(|j| design[(i, j)] * beta[j]).sum()
        })
    }

    /// Predictions with standard errors on the link or response scale.
    ///
    /// Response-scale standard errors use the delta method,
    /// se(μ) = |dμ/dη| · se(η).
    pub fn predict_with_se(&self, x: &Mat<f64>, pred_type: PredictionType) -> PredictionResult {
        let design = self.active_design(x);
        let eta = self.predict_link(x);
        let n_new = design.nrows();

        let se_eta = Col::from_fn(n_new, |i| match &self.xtwx_inverse {
            Some(inv) if self.dispersion.is_finite() => {
                let var = self.dispersion * row_quadratic_form(&design, i, inv);
                if var.is_nan() {
                    f64::NAN
                } else {
                    var.max(0.0).sqrt()
                }
            }
            _ => f64::NAN,
        });

        match pred_type {
            PredictionType::Link => PredictionResult::with_se(eta, se_eta),
            PredictionType::Response => {
                let mu = Col::from_fn(n_new, |i| self.link.link_inverse(eta[i]));
                let se_mu = Col::from_fn(n_new, |i| {
                    se_eta[i] * self.link.link_inverse_derivative(eta[i]).abs()
                });
                PredictionResult::with_se(mu, se_mu)
            }
        }
    }

    /// Profile-likelihood confidence intervals, one per design column.
    ///
    /// Each bound solves `sign(b - β̂)·sqrt((D(b) - D̂)/φ) = ±z_{α/2}` where
    /// `D(b)` is the deviance refit with the coefficient held at `b`. The
    /// search starts from the Wald bound, expands until the root is bracketed,
    /// then bisects. A bound that cannot be located falls back to the Wald
    /// bound and is flagged. Aliased columns get NaN bounds.
    pub fn profile_conf_int(
        &self,
        level: f64,
        settings: &ProfileSettings,
    ) -> Result<Vec<ProfileBounds>, RegressionError> {
        let se = self.result.design_std_errors().ok_or_else(|| {
            RegressionError::NumericalError("standard errors were not computed".to_string())
        })?;
        if !settings.quiet {
            log::info!("waiting for profiling to be done...");
        }

        let design = self.active_design(&self.frame.x);
        let y: Vec<f64> = self.frame.y.iter().copied().collect();
        let beta = self.result.design_coefficients();
        let aliased = self.result.design_aliased();
        let q = CoefficientInference::z_critical(level);
        let mu: Vec<f64> = self.result.fitted_values.iter().copied().collect();

        let mut bounds = Vec::with_capacity(beta.len());
        let mut active_index = 0;
        for j in 0..beta.len() {
            if aliased[j] {
                bounds.push(ProfileBounds {
                    lower: f64::NAN,
                    upper: f64::NAN,
                    lower_fallback: false,
                    upper_fallback: false,
                });
                continue;
            }

            let profile = Profile {
                model: self,
                design: &design,
                y: &y,
                mu_start: &mu,
                column: active_index,
                estimate: beta[j],
                std_error: se[j],
            };
            let side_bound = |sign: f64| match profile.bound(sign, q, settings) {
                Ok(value) => (value, false),
                Err(e) => {
                    log::debug!("profiling column {} failed ({}); using Wald bound", j, e);
                    (beta[j] + sign * q * se[j], true)
                }
            };
            let (lower, lower_fallback) = side_bound(-1.0);
            let (upper, upper_fallback) = side_bound(1.0);
            bounds.push(ProfileBounds {
                lower,
                upper,
                lower_fallback,
                upper_fallback,
            });
            active_index += 1;
        }

        Ok(bounds)
    }
}

/// Profile of the deviance along one coefficient.
struct Profile<'a> {
    model: &'a FittedGlm,
    design: &'a Mat<f64>,
    y: &'a [f64],
    mu_start: &'a [f64],
    column: usize,
    estimate: f64,
    std_error: f64,
}

impl Profile<'_> {
    /// Signed root deviance at distance `d` from the estimate on side `sign`,
    /// oriented so it increases with `d`.
    fn signed_root(&self, sign: f64, d: f64) -> Result<f64, RegressionError> {
        let b = self.estimate + sign * d;
        let n = self.design.nrows();
        let p = self.design.ncols();
        let reduced = Mat::from_fn(n, p - 1, |i, k| {
            self.design[(i, if k < self.column { k } else { k + 1 })]
        });
        let offset: Vec<f64> = (0..n).map(|i| b * self.design[(i, self.column)]).collect();

        let fit = irls(
            &reduced,
            self.y,
            &offset,
            self.model.family,
            self.model.link,
            Some(self.mu_start),
            &self.model.options,
        )?;
        let z = ((fit.deviance - self.model.deviance).max(0.0) / self.model.dispersion).sqrt();
        if z.is_finite() {
            Ok(z)
        } else {
            Err(RegressionError::NumericalError(
                "profile deviance is not finite".to_string(),
            ))
        }
    }

    fn bound(&self, sign: f64, q: f64, settings: &ProfileSettings) -> Result<f64, RegressionError> {
        if !(self.std_error.is_finite() && self.std_error > 0.0) {
            return Err(RegressionError::NumericalError(
                "standard error is not positive".to_string(),
            ));
        }

        // Expand from the Wald distance until the root is bracketed
        let mut lo = 0.0;
        let mut hi = q * self.std_error;
        let mut steps = 0;
        while self.signed_root(sign, hi)? < q {
            if steps >= settings.max_steps {
                return Err(RegressionError::ConvergenceFailed { iterations: steps });
            }
            lo = hi;
            hi *= 2.0;
            steps += 1;
        }
        log::debug!(
            "profile root for column {} bracketed in [{}, {}]",
            self.column,
            self.estimate + sign * lo,
            self.estimate + sign * hi
        );

        for _ in 0..settings.max_steps {
            if hi - lo <= settings.tolerance * self.std_error {
                break;
            }
            let mid = 0.5 * (lo + hi);
            if self.signed_root(sign, mid)? < q {
                lo = mid;
            } else {
                hi = mid;
            }
        }

        Ok(self.estimate + sign * 0.5 * (lo + hi))
    }
}

impl FittedRegressor for FittedGlm {
    fn predict(&self, x: &Mat<f64>) -> Col<f64> {
        let eta = self.predict_link(x);
        Col::from_fn(eta.nrows(), |i| self.link.link_inverse(eta[i]))
    }

    fn result(&self) -> &RegressionResult {
        &self.result
    }
}

/// Builder for `GlmRegressor`.
#[derive(Debug, Clone)]
pub struct GlmRegressorBuilder {
    options_builder: RegressionOptionsBuilder,
    family: GlmFamily,
    link: Link,
}

impl GlmRegressorBuilder {
    /// Set the link function.
    pub fn link(mut self, link: Link) -> Self {
        self.link = link;
        self
    }

    /// Set whether to include an intercept term.
    pub fn with_intercept(mut self, include: bool) -> Self {
        self.options_builder = self.options_builder.with_intercept(include);
        self
    }

    /// Set whether to compute inference statistics.
    pub fn compute_inference(mut self, compute: bool) -> Self {
        self.options_builder = self.options_builder.compute_inference(compute);
        self
    }

    /// Set the maximum iterations for IRLS.
    pub fn max_iterations(mut self, max_iter: usize) -> Self {
        self.options_builder = self.options_builder.max_iterations(max_iter);
        self
    }

    /// Set the convergence tolerance.
    pub fn tolerance(mut self, tol: f64) -> Self {
        self.options_builder = self.options_builder.tolerance(tol);
        self
    }

    /// Set the missing value policy.
    pub fn na_action(mut self, action: crate::core::NaAction) -> Self {
        self.options_builder = self.options_builder.na_action(action);
        self
    }

    /// Build the regressor. Options are validated when fitting.
    pub fn build(self) -> GlmRegressor {
        GlmRegressor::new(self.options_builder.build_unchecked(), self.family, self.link)
    }
}
