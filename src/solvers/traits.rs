//! Core traits for regression estimators.

use crate::core::{NaError, OptionsError, RegressionResult};
use faer::{Col, Mat};
use thiserror::Error;

/// Errors that can occur during regression fitting.
#[derive(Debug, Error)]
pub enum RegressionError {
    #[error("dimension mismatch: X has {x_rows} rows but y has {y_len} elements")]
    DimensionMismatch { x_rows: usize, y_len: usize },

    #[error("insufficient observations: need at least {needed}, got {got}")]
    InsufficientObservations { needed: usize, got: usize },

    #[error("matrix is singular or nearly singular")]
    SingularMatrix,

    #[error("all features are constant")]
    AllFeaturesConstant,

    #[error("invalid options: {0}")]
    InvalidOptions(#[from] OptionsError),

    #[error(transparent)]
    Na(#[from] NaError),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("convergence failed after {iterations} iterations")]
    ConvergenceFailed { iterations: usize },

    #[error("numerical error: {0}")]
    NumericalError(String),
}

/// A regression estimator that can be fit to data.
///
/// Fitting returns a separate fitted-model value; the estimator itself only
/// carries configuration.
pub trait Regressor {
    /// The type of the fitted model.
    type Fitted: FittedRegressor;

    /// Fit the model to the data.
    ///
    /// # Arguments
    /// * `x` - Covariate matrix of shape (n_samples, n_features), no intercept column
    /// * `y` - Response vector of length n_samples
    fn fit(&self, x: &Mat<f64>, y: &Col<f64>) -> Result<Self::Fitted, RegressionError>;
}

/// A fitted regression model that can make predictions.
pub trait FittedRegressor {
    /// Predictions on the response scale for new covariates.
    fn predict(&self, x: &Mat<f64>) -> Col<f64>;

    /// Access the regression results (coefficients, statistics, etc.).
    fn result(&self) -> &RegressionResult;

    /// Get the coefficients (convenience method).
    fn coefficients(&self) -> &Col<f64> {
        &self.result().coefficients
    }

    /// Get the intercept (convenience method).
    fn intercept(&self) -> Option<f64> {
        self.result().intercept
    }
}
