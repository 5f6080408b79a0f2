//! The three tabular views of a fitted model.
//!
//! - [`tidy`]: one row per estimable coefficient
//! - [`augment`]: one row per observation, with fitted values and diagnostics
//! - [`glance`]: one row for the whole model

mod augment;
mod glance;
mod options;
mod tidy;

pub use augment::{augment, AugmentTable, ObservationRow};
pub use glance::{glance, GlanceRow};
pub use options::{
    AugmentOptions, AugmentOptionsBuilder, TidyOptions, TidyOptionsBuilder, Transform,
};
pub use tidy::{tidy, CoefficientRow, TidyTable};
