//! Prediction and residual scale types.

use super::error::TidyError;
use faer::Col;
use std::str::FromStr;

/// Type of interval to compute for predictions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntervalType {
    /// Confidence interval for the mean response E[Y|X=x₀].
    /// Narrower - only accounts for uncertainty in coefficient estimates.
    Confidence,

    /// Prediction interval for a new observation Y|X=x₀.
    /// Wider - also accounts for residual variance (irreducible error).
    #[default]
    Prediction,
}

impl FromStr for IntervalType {
    type Err = TidyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confidence" => Ok(IntervalType::Confidence),
            "prediction" => Ok(IntervalType::Prediction),
            other => Err(TidyError::InvalidOption(format!(
                "unknown interval type '{}', expected 'confidence' or 'prediction'",
                other
            ))),
        }
    }
}

/// Scale on which predictions are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PredictionType {
    /// Linear predictor η = Xβ.
    #[default]
    Link,
    /// Mean response μ = g⁻¹(η).
    Response,
}

impl FromStr for PredictionType {
    type Err = TidyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "link" => Ok(PredictionType::Link),
            "response" => Ok(PredictionType::Response),
            other => Err(TidyError::InvalidOption(format!(
                "unknown predict type '{}', expected 'link' or 'response'",
                other
            ))),
        }
    }
}

/// Residual definition reported as `.resid`.
///
/// For an unweighted linear model all four coincide with y − ŷ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResidualType {
    /// y − μ
    Response,
    /// sign(y − μ)·√d(y, μ)
    #[default]
    Deviance,
    /// (y − μ)/√V(μ)
    Pearson,
    /// (y − μ)·dη/dμ
    Working,
}

impl FromStr for ResidualType {
    type Err = TidyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "response" => Ok(ResidualType::Response),
            "deviance" => Ok(ResidualType::Deviance),
            "pearson" => Ok(ResidualType::Pearson),
            "working" => Ok(ResidualType::Working),
            other => Err(TidyError::InvalidOption(format!(
                "unknown residual type '{}', expected one of response, deviance, pearson, working",
                other
            ))),
        }
    }
}

/// Result of prediction with optional intervals.
#[derive(Debug, Clone)]
pub struct PredictionResult {
    /// Point predictions.
    pub fit: Col<f64>,
    /// Lower bounds of the interval.
    pub lower: Col<f64>,
    /// Upper bounds of the interval.
    pub upper: Col<f64>,
    /// Standard errors of the predictions.
    pub se: Col<f64>,
}

impl PredictionResult {
    /// Create a prediction result with standard errors but no interval.
    pub fn with_se(fit: Col<f64>, se: Col<f64>) -> Self {
        let lower = fit.clone();
        let upper = fit.clone();
        Self {
            fit,
            lower,
            upper,
            se,
        }
    }

    /// Create a new prediction result with intervals.
    pub fn with_intervals(fit: Col<f64>, lower: Col<f64>, upper: Col<f64>, se: Col<f64>) -> Self {
        Self {
            fit,
            lower,
            upper,
            se,
        }
    }

    /// Number of predictions.
    pub fn len(&self) -> usize {
        self.fit.nrows()
    }

    /// Returns true if there are no predictions.
    pub fn is_empty(&self) -> bool {
        self.fit.nrows() == 0
    }
}
