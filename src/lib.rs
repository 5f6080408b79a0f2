//! Tidy, augment and glance views over fitted regression models.
//!
//! Fitted linear models, GLMs and ARIMA fits are read through one interface
//! ([`adapter::TidyModel`]) and turned into uniform tables:
//!
//! - [`tidy`]: per-term estimates, standard errors, tests and confidence bounds
//! - [`augment`]: per-observation fitted values, residuals, leverage, Cook's
//!   distance and leave-one-out residual scale
//! - [`glance`]: a single row of model-level statistics
//!
//! # Example
//!
//! ```rust,ignore
//! use tidy_regress::prelude::*;
//!
//! let fitted = OlsRegressor::builder().build().fit_frame(&data, "y", &["x1", "x2"])?;
//!
//! let coefs = tidy(&fitted, &TidyOptions::builder().conf_int(true).build()?)?;
//! let rows = augment(&fitted, None, None, &AugmentOptions::default())?;
//! let summary = glance(&fitted)?;
//!
//! println!("R² = {:?}", summary.r_squared);
//! ```

pub mod adapter;
pub mod core;
pub mod diagnostics;
pub mod frame;
pub mod inference;
pub mod solvers;
pub mod tidiers;
pub mod utils;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::adapter::{Capabilities, IntervalMethod, ModelKind, TidyModel};
    pub use crate::core::{
        GlmFamily, IntervalType, Link, NaAction, NaInfo, PredictionResult, PredictionType,
        RegressionOptions, RegressionOptionsBuilder, RegressionResult, ResidualType, TidyError,
        TidyWarning,
    };
    pub use crate::frame::{Column, ColumnData, Frame};
    pub use crate::solvers::{
        ArimaOrder, FittedArima, FittedGlm, FittedOls, FittedRegressor, GlmRegressor,
        OlsRegressor, ProfileSettings, RegressionError, Regressor,
    };
    pub use crate::tidiers::{
        augment, glance, tidy, AugmentOptions, AugmentTable, CoefficientRow, GlanceRow,
        TidyOptions, TidyTable,
    };
}

pub use crate::tidiers::{augment, glance, tidy};
