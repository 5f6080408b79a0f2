//! Core types shared by the fitting backends and the tidiers.

mod error;
mod family;
mod link;
mod na_action;
mod options;
mod prediction;
mod result;

pub use error::{TidyError, TidyWarning};
pub use family::GlmFamily;
pub use link::Link;
pub use na_action::{NaAction, NaError, NaHandler, NaInfo, NaResult};
pub use options::{OptionsError, RegressionOptions, RegressionOptionsBuilder};
pub use prediction::{IntervalType, PredictionResult, PredictionType, ResidualType};
pub use result::RegressionResult;
