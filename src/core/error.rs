//! Errors and warnings raised by the tidiers.

use crate::solvers::RegressionError;
use thiserror::Error;

/// Errors returned by `tidy`, `augment` and `glance`.
///
/// No table is returned when an error is raised.
#[derive(Debug, Error)]
pub enum TidyError {
    /// The operation is not defined for this model variant.
    #[error("{operation} is not supported for {variant} models")]
    UnsupportedOperation {
        operation: &'static str,
        variant: &'static str,
    },

    /// A supplied table does not line up with the model.
    #[error("data mismatch: {0}")]
    DataMismatch(String),

    /// An option is out of range or not recognized.
    #[error("invalid option: {0}")]
    InvalidOption(String),

    /// The model lacks a statistic the operation needs.
    #[error("model state error: {0}")]
    ModelStateError(String),

    /// The fitting backend failed while predicting or profiling.
    #[error(transparent)]
    Regression(#[from] RegressionError),
}

/// Non-fatal conditions attached to a produced table.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TidyWarning {
    /// Coefficients were exponentiated under a link without a ratio reading.
    #[error("exponentiating coefficients from a model with a '{link}' link; results may not be interpretable as ratios")]
    NonLogLink { link: &'static str },

    /// A profile-likelihood bound could not be located; the Wald bound is used.
    #[error("profile likelihood failed for '{term}' ({side} bound); using the Wald bound")]
    ProfileFallback { term: String, side: &'static str },

    /// An input column shadowed an output column name and was dropped.
    #[error("input column '{name}' replaced by the computed column of the same name")]
    ReplacedColumn { name: String },
}

impl TidyWarning {
    /// Log the warning and pass it through.
    pub(crate) fn emit(self) -> Self {
        log::warn!("{}", self);
        self
    }
}
