//! Options for `tidy` and `augment`.

use crate::adapter::check_level;
use crate::core::{IntervalType, PredictionType, ResidualType, TidyError};

/// Back-transform applied to estimates and confidence bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transform {
    #[default]
    Identity,
    Exp,
}

impl Transform {
    /// `Exp` when `exponentiate` is set.
    pub fn from_flag(exponentiate: bool) -> Self {
        if exponentiate {
            Transform::Exp
        } else {
            Transform::Identity
        }
    }

    #[inline]
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Transform::Identity => value,
            Transform::Exp => value.exp(),
        }
    }
}

/// Options for `tidy`.
#[derive(Debug, Clone, PartialEq)]
pub struct TidyOptions {
    /// Add `conf.low` / `conf.high` (default: false).
    pub conf_int: bool,
    /// Confidence level in (0, 1) (default: 0.95).
    pub conf_level: f64,
    /// Report `exp(estimate)` and exponentiated bounds (default: false).
    pub exponentiate: bool,
}

impl Default for TidyOptions {
    fn default() -> Self {
        Self {
            conf_int: false,
            conf_level: 0.95,
            exponentiate: false,
        }
    }
}

impl TidyOptions {
    /// Create a builder for tidy options.
    pub fn builder() -> TidyOptionsBuilder {
        TidyOptionsBuilder::default()
    }

    /// Check the options are in range.
    pub fn validate(&self) -> Result<(), TidyError> {
        check_level(self.conf_level)
    }

    pub(crate) fn transform(&self) -> Transform {
        Transform::from_flag(self.exponentiate)
    }
}

/// Builder for [`TidyOptions`].
#[derive(Debug, Clone, Default)]
pub struct TidyOptionsBuilder {
    options: TidyOptions,
}

impl TidyOptionsBuilder {
    pub fn conf_int(mut self, conf_int: bool) -> Self {
        self.options.conf_int = conf_int;
        self
    }

    pub fn conf_level(mut self, level: f64) -> Self {
        self.options.conf_level = level;
        self
    }

    pub fn exponentiate(mut self, exponentiate: bool) -> Self {
        self.options.exponentiate = exponentiate;
        self
    }

    /// Build and validate.
    pub fn build(self) -> Result<TidyOptions, TidyError> {
        self.options.validate()?;
        Ok(self.options)
    }
}

/// Options for `augment`.
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentOptions {
    /// Scale of `.fitted` and `.se.fit` (default: link).
    pub predict_type: PredictionType,
    /// Definition of `.resid` (default: deviance).
    pub residual_type: ResidualType,
    /// Add `.lower` / `.upper` (default: none).
    pub interval: Option<IntervalType>,
    /// Level for `.lower` / `.upper` (default: 0.95).
    pub conf_level: f64,
}

impl Default for AugmentOptions {
    fn default() -> Self {
        Self {
            predict_type: PredictionType::Link,
            residual_type: ResidualType::Deviance,
            interval: None,
            conf_level: 0.95,
        }
    }
}

impl AugmentOptions {
    /// Create a builder for augment options.
    pub fn builder() -> AugmentOptionsBuilder {
        AugmentOptionsBuilder::default()
    }

    /// Check the options are in range.
    pub fn validate(&self) -> Result<(), TidyError> {
        check_level(self.conf_level)
    }
}

/// Builder for [`AugmentOptions`].
#[derive(Debug, Clone, Default)]
pub struct AugmentOptionsBuilder {
    options: AugmentOptions,
}

impl AugmentOptionsBuilder {
    pub fn predict_type(mut self, predict_type: PredictionType) -> Self {
        self.options.predict_type = predict_type;
        self
    }

    pub fn residual_type(mut self, residual_type: ResidualType) -> Self {
        self.options.residual_type = residual_type;
        self
    }

    pub fn interval(mut self, interval: IntervalType) -> Self {
        self.options.interval = Some(interval);
        self
    }

    pub fn conf_level(mut self, level: f64) -> Self {
        self.options.conf_level = level;
        self
    }

    /// Build and validate.
    pub fn build(self) -> Result<AugmentOptions, TidyError> {
        self.options.validate()?;
        Ok(self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let tidy = TidyOptions::default();
        assert!(!tidy.conf_int && !tidy.exponentiate);
        assert_eq!(tidy.conf_level, 0.95);

        let augment = AugmentOptions::default();
        assert_eq!(augment.predict_type, PredictionType::Link);
        assert_eq!(augment.residual_type, ResidualType::Deviance);
        assert!(augment.interval.is_none());
    }

    #[test]
    fn test_builder_rejects_level() {
        for level in [0.0, 1.0, -0.5, 2.0] {
            assert!(matches!(
                TidyOptions::builder().conf_level(level).build(),
                Err(TidyError::InvalidOption(_))
            ));
            assert!(matches!(
                AugmentOptions::builder().conf_level(level).build(),
                Err(TidyError::InvalidOption(_))
            ));
        }
    }

    #[test]
    fn test_options_parse_from_strings() {
        let options = AugmentOptions::builder()
            .predict_type("response".parse().expect("predict type"))
            .residual_type("pearson".parse().expect("residual type"))
            .build()
            .expect("valid");
        assert_eq!(options.predict_type, PredictionType::Response);
        assert_eq!(options.residual_type, ResidualType::Pearson);
        assert!("quantile".parse::<ResidualType>().is_err());
    }

    #[test]
    fn test_transform() {
        assert_eq!(Transform::from_flag(false).apply(2.0), 2.0);
        assert_eq!(Transform::from_flag(true).apply(0.0), 1.0);
    }
}
