//! Fitting backends producing the models the tidiers read.

mod arima;
mod glm;
mod ols;
mod traits;

pub use arima::{ArimaOrder, FittedArima};
pub use glm::{FittedGlm, GlmRegressor, GlmRegressorBuilder, ProfileBounds, ProfileSettings};
pub use ols::{FittedOls, OlsRegressor, OlsRegressorBuilder};
pub use traits::{FittedRegressor, RegressionError, Regressor};
