//! Per-term coefficient summaries.

use super::options::{TidyOptions, Transform};
use crate::adapter::TidyModel;
use crate::core::{TidyError, TidyWarning};
use crate::frame::{normalize, Column, Frame, TIDY_COLUMNS};
use serde::Serialize;

/// One estimable term.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoefficientRow {
    pub term: String,
    pub estimate: f64,
    #[serde(rename = "std.error")]
    pub std_error: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistic: Option<f64>,
    #[serde(rename = "p.value", skip_serializing_if = "Option::is_none")]
    pub p_value: Option<f64>,
    #[serde(rename = "conf.low", skip_serializing_if = "Option::is_none")]
    pub conf_low: Option<f64>,
    #[serde(rename = "conf.high", skip_serializing_if = "Option::is_none")]
    pub conf_high: Option<f64>,
}

/// Output of [`tidy`].
#[derive(Debug, Clone, PartialEq)]
pub struct TidyTable {
    /// One row per estimable term, in the model's term order.
    pub rows: Vec<CoefficientRow>,
    pub warnings: Vec<TidyWarning>,
}

impl TidyTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row for `term`, if present.
    pub fn row(&self, term: &str) -> Option<&CoefficientRow> {
        self.rows.iter().find(|r| r.term == term)
    }

    /// Normalized table: `term, estimate, std.error[, statistic, p.value][, conf.low, conf.high]`.
    pub fn to_frame(&self) -> Result<Frame, TidyError> {
        let mut columns = vec![
            Column::text("term", self.rows.iter().map(|r| r.term.clone()).collect()),
            Column::float("estimate", self.rows.iter().map(|r| r.estimate).collect()),
            Column::float("std.error", self.rows.iter().map(|r| r.std_error).collect()),
        ];
        let optional: [(&str, fn(&CoefficientRow) -> Option<f64>); 4] = [
            ("statistic", |r| r.statistic),
            ("p.value", |r| r.p_value),
            ("conf.low", |r| r.conf_low),
            ("conf.high", |r| r.conf_high),
        ];
        for (name, get) in optional {
            if self.rows.iter().any(|r| get(r).is_some()) {
                columns.push(Column::float(
                    name,
                    self.rows.iter().map(|r| get(r).unwrap_or(f64::NAN)).collect(),
                ));
            }
        }
        normalize(Frame::from_columns(columns)?, TIDY_COLUMNS)
    }
}

/// Summarize a model's coefficients, one row per estimable term.
///
/// # Errors
/// - `InvalidOption` if the confidence level is outside (0, 1)
/// - `ModelStateError` if the model has no standard errors, or if
///   exponentiation is requested for a model without a link function
/// - `Regression` if the interval procedure fails outright
pub fn tidy<M: TidyModel + ?Sized>(
    model: &M,
    options: &TidyOptions,
) -> Result<TidyTable, TidyError> {
    options.validate()?;
    let coefs = model.coefficient_matrix()?;
    let mut warnings = Vec::new();

    let transform = options.transform();
    if transform == Transform::Exp {
        match model.link() {
            None => {
                return Err(TidyError::ModelStateError(format!(
                    "{} models carry no link function; coefficients cannot be exponentiated",
                    model.kind().name()
                )))
            }
            Some(link) if !link.is_log_like() => {
                warnings.push(TidyWarning::NonLogLink { link: link.name() }.emit())
            }
            Some(_) => {}
        }
    }

    let bounds = if options.conf_int {
        let interval = model.conf_int(options.conf_level)?;
        if interval.lower.len() != coefs.len() || interval.upper.len() != coefs.len() {
            return Err(TidyError::ModelStateError(format!(
                "{} confidence bounds for {} terms",
                interval.lower.len(),
                coefs.len()
            )));
        }
        warnings.extend(interval.warnings);
        Some((interval.lower, interval.upper))
    } else {
        None
    };

    let (statistics, p_values) = if model.capabilities().coefficient_tests {
        (coefs.statistics, coefs.p_values)
    } else {
        (None, None)
    };

    let rows = coefs
        .terms
        .into_iter()
        .enumerate()
        .map(|(j, term)| CoefficientRow {
            term,
            estimate: transform.apply(coefs.estimates[j]),
            std_error: coefs.std_errors[j],
            statistic: statistics.as_ref().map(|s| s[j]),
            p_value: p_values.as_ref().map(|p| p[j]),
            conf_low: bounds.as_ref().map(|(lo, _)| transform.apply(lo[j])),
            conf_high: bounds.as_ref().map(|(_, hi)| transform.apply(hi[j])),
        })
        .collect();

    Ok(TidyTable { rows, warnings })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solvers::{ArimaOrder, FittedArima, OlsRegressor, Regressor};
    use faer::{Col, Mat};

    fn linear() -> crate::solvers::FittedOls {
        let x = Mat::from_fn(7, 1, |i, _| i as f64);
        let noise = [0.2, -0.1, 0.0, 0.3, -0.2, 0.1, -0.3];
        let y = Col::from_fn(7, |i| 0.5 + 1.5 * i as f64 + noise[i]);
        OlsRegressor::builder().build().fit(&x, &y).expect("fit")
    }

    #[test]
    fn test_schema_without_intervals() {
        let table = tidy(&linear(), &TidyOptions::default()).expect("tidy");
        let frame = table.to_frame().expect("frame");
        assert_eq!(
            frame.column_names(),
            vec!["term", "estimate", "std.error", "statistic", "p.value"]
        );
        assert!(table.warnings.is_empty());
    }

    #[test]
    fn test_exponentiate_identity_link_warns() {
        let options = TidyOptions::builder().exponentiate(true).build().expect("options");
        let table = tidy(&linear(), &options).expect("tidy");
        assert_eq!(
            table.warnings,
            vec![TidyWarning::NonLogLink { link: "identity" }]
        );
    }

    #[test]
    fn test_exponentiate_without_link_fails() {
        let model = FittedArima::new(
            ArimaOrder::new(1, 0, 0).term_names(false),
            vec![0.4],
            Mat::from_fn(1, 1, |_, _| 0.01),
            1.0,
            -50.0,
            40,
        )
        .expect("fit");
        let options = TidyOptions::builder().exponentiate(true).build().expect("options");
        assert!(matches!(
            tidy(&model, &options),
            Err(TidyError::ModelStateError(_))
        ));

        let plain = tidy(&model, &TidyOptions::default()).expect("tidy");
        assert!(plain.rows[0].statistic.is_none());
    }
}
