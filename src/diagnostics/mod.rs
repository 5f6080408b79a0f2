//! Regression diagnostics (leverage, Cook's distance, residual scales).
//!
//! - **Leverage**: diagonal of the (IRLS-weighted) hat matrix
//! - **Residuals**: standardized residuals and the leave-one-out residual scale
//! - **Influence**: Cook's distance, linear and GLM forms
//! - **GLM residuals**: response, Pearson, deviance and working residuals
//!
//! [`observation_diagnostics`] combines them for a fitted model according to
//! its capability entry.

mod engine;
mod glm_residuals;
mod influence;
mod leverage;
mod residuals;

pub use engine::{diagnostics_for, observation_diagnostics, ObservationDiagnostics};
pub use glm_residuals::{
    deviance_residuals, pearson_residuals, residuals_of_type, response_residuals,
    working_residuals,
};
pub use influence::{cooks_distance, glm_cooks_distance};
pub use leverage::{compute_leverage, leverage_from_inverse};
pub use residuals::{leave_one_out_sigma, standardized_residuals};
