//! Uniform view over fitted models.
//!
//! Every model variant the tidiers accept implements [`TidyModel`]. What a
//! variant can produce is not inferred from which statistics happen to be
//! present: it is looked up in [`REGISTRY`], one [`Capabilities`] entry per
//! [`ModelKind`].

mod arima;
mod glm;
mod linear;

use crate::core::{
    GlmFamily, IntervalType, Link, PredictionResult, PredictionType, TidyError, TidyWarning,
};
use crate::frame::ModelFrame;
use faer::Mat;

/// Model variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    /// Least-squares linear model.
    Linear = 0,
    /// Generalized linear model fit by IRLS.
    Generalized = 1,
    /// Discrete time-series (ARIMA) model.
    TimeSeries = 2,
}

impl ModelKind {
    /// Name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            ModelKind::Linear => "linear",
            ModelKind::Generalized => "generalized linear",
            ModelKind::TimeSeries => "time series",
        }
    }

    /// Registry entry for this variant.
    pub fn capabilities(&self) -> &'static Capabilities {
        &REGISTRY[*self as usize]
    }
}

/// Procedure behind `conf_int`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalMethod {
    /// β ± t(df)·se
    StudentT,
    /// Inverted likelihood-ratio test
    ProfileLikelihood,
    /// β ± z·se
    NormalApproximation,
}

/// What a model variant supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub kind: ModelKind,
    /// Per-observation augmentation.
    pub augment: bool,
    /// `.hat`
    pub hat: bool,
    /// `.sigma` (leave-one-out residual scale)
    pub sigma: bool,
    /// `.cooksd`
    pub cooksd: bool,
    /// `.std.resid`
    pub std_resid: bool,
    /// `statistic` and `p.value` in tidy output.
    pub coefficient_tests: bool,
    /// `.lower` / `.upper` in augment output.
    pub prediction_intervals: bool,
    pub interval_method: IntervalMethod,
}

/// Capability table, indexed by `ModelKind as usize`.
pub static REGISTRY: [Capabilities; 3] = [
    Capabilities {
        kind: ModelKind::Linear,
        augment: true,
        hat: true,
        sigma: true,
        cooksd: true,
        std_resid: true,
        coefficient_tests: true,
        prediction_intervals: true,
        interval_method: IntervalMethod::StudentT,
    },
    Capabilities {
        kind: ModelKind::Generalized,
        augment: true,
        hat: true,
        sigma: false,
        cooksd: true,
        std_resid: true,
        coefficient_tests: true,
        prediction_intervals: false,
        interval_method: IntervalMethod::ProfileLikelihood,
    },
    Capabilities {
        kind: ModelKind::TimeSeries,
        augment: false,
        hat: false,
        sigma: false,
        cooksd: false,
        std_resid: false,
        coefficient_tests: false,
        prediction_intervals: false,
        interval_method: IntervalMethod::NormalApproximation,
    },
];

/// Estimable terms of a model in native order. Aliased terms are excluded.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientMatrix {
    pub terms: Vec<String>,
    pub estimates: Vec<f64>,
    pub std_errors: Vec<f64>,
    pub statistics: Option<Vec<f64>>,
    pub p_values: Option<Vec<f64>>,
}

impl CoefficientMatrix {
    /// Number of terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether there are no estimable terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Coefficient confidence bounds, aligned with [`CoefficientMatrix`] rows.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalEstimate {
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
    /// Conditions met while computing the bounds.
    pub warnings: Vec<TidyWarning>,
}

/// Model-level statistics shared by every variant. `None` when the variant
/// does not expose the value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FitStatistics {
    pub log_lik: Option<f64>,
    pub aic: Option<f64>,
    pub bic: Option<f64>,
    pub deviance: Option<f64>,
    pub df_residual: Option<usize>,
    pub null_deviance: Option<f64>,
    pub df_null: Option<usize>,
    pub nobs: Option<usize>,
}

/// Variant-specific glance fields.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GlanceCore {
    pub r_squared: Option<f64>,
    pub adj_r_squared: Option<f64>,
    pub sigma: Option<f64>,
    pub statistic: Option<f64>,
    pub p_value: Option<f64>,
    pub df: Option<f64>,
}

/// Training-data view consumed by the diagnostics engine.
#[derive(Debug, Clone)]
pub struct Observations<'a> {
    /// Rows the model was fit on.
    pub frame: &'a ModelFrame,
    /// Non-aliased design columns, intercept first.
    pub design: Mat<f64>,
    /// Fitted means on the response scale.
    pub mu: Vec<f64>,
    /// Observation weights of the final fit (IRLS working weights; 1 for OLS).
    pub weights: Vec<f64>,
    /// (X'WX)⁻¹ over `design`, when it could be formed at fit time.
    pub unscaled_cov: Option<&'a Mat<f64>>,
    /// σ² for linear models, φ for GLMs.
    pub scale: f64,
    pub family: GlmFamily,
    pub link: Link,
    /// Number of estimated coefficients.
    pub n_params: usize,
}

/// A fitted model the tidiers can read.
pub trait TidyModel {
    /// Variant tag.
    fn kind(&self) -> ModelKind;

    /// Registry entry for this model's variant.
    fn capabilities(&self) -> &'static Capabilities {
        self.kind().capabilities()
    }

    /// Estimable terms with estimates, standard errors and, where the
    /// variant has them, test statistics and p-values.
    ///
    /// Fails with `ModelStateError` if the model carries no standard errors.
    fn coefficient_matrix(&self) -> Result<CoefficientMatrix, TidyError>;

    /// Confidence bounds for the estimable terms by the variant's own method.
    fn conf_int(&self, level: f64) -> Result<IntervalEstimate, TidyError>;

    /// Link function, for variants that have one.
    fn link(&self) -> Option<Link>;

    fn fit_statistics(&self) -> FitStatistics;

    fn glance_core(&self) -> GlanceCore;

    /// Training view for per-observation diagnostics; `None` when the variant
    /// has no per-observation augmentation.
    fn observations(&self) -> Option<Observations<'_>>;

    /// Fitted values and standard errors for covariates `x`, columns in the
    /// model's covariate order.
    fn predict(&self, x: &Mat<f64>, pred_type: PredictionType)
        -> Result<PredictionResult, TidyError>;

    /// Fitted values with interval bounds for covariates `x`.
    fn prediction_interval(
        &self,
        _x: &Mat<f64>,
        _interval: IntervalType,
        _level: f64,
    ) -> Result<PredictionResult, TidyError> {
        Err(TidyError::UnsupportedOperation {
            operation: "prediction intervals",
            variant: self.kind().name(),
        })
    }
}

/// Check a confidence level lies in (0, 1).
pub(crate) fn check_level(level: f64) -> Result<(), TidyError> {
    if level > 0.0 && level < 1.0 {
        Ok(())
    } else {
        Err(TidyError::InvalidOption(format!(
            "confidence level must be in (0, 1), got {}",
            level
        )))
    }
}

/// Keep the entries of `values` whose flag in `aliased` is false.
pub(crate) fn estimable<T: Clone>(values: &[T], aliased: &[bool]) -> Vec<T> {
    values
        .iter()
        .zip(aliased)
        .filter(|(_, &a)| !a)
        .map(|(v, _)| v.clone())
        .collect()
}

/// `Some(v)` for finite values.
pub(crate) fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}
