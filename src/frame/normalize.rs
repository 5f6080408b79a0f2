//! Final pass applied to every table the tidiers return.

use super::{Column, Frame};
use crate::core::TidyError;

/// Column order of `tidy` output.
pub const TIDY_COLUMNS: &[&str] = &[
    "term",
    "estimate",
    "std.error",
    "statistic",
    "p.value",
    "conf.low",
    "conf.high",
];

/// Column order of the columns `augment` appends to the input rows.
pub const AUGMENT_COLUMNS: &[&str] = &[
    ".fitted",
    ".se.fit",
    ".resid",
    ".hat",
    ".sigma",
    ".cooksd",
    ".std.resid",
    ".lower",
    ".upper",
];

/// Column order of `glance` output.
pub const GLANCE_COLUMNS: &[&str] = &[
    "r.squared",
    "adj.r.squared",
    "sigma",
    "statistic",
    "p.value",
    "df",
    "logLik",
    "AIC",
    "BIC",
    "deviance",
    "df.residual",
    "null.deviance",
    "df.null",
    "nobs",
];

/// Strip row names and put columns in a stable order.
///
/// Columns not listed in `canonical` keep their relative order and come first;
/// listed columns follow in `canonical` order. Fails if a column length
/// disagrees with the row count or a name is repeated.
pub fn normalize(frame: Frame, canonical: &[&str]) -> Result<Frame, TidyError> {
    let (columns, nrows, _row_names) = frame.into_parts();

    let (mut leading, mut computed): (Vec<Column>, Vec<Column>) = columns
        .into_iter()
        .partition(|c| !canonical.contains(&c.name.as_str()));
    computed.sort_by_key(|c| {
        canonical
            .iter()
            .position(|&name| name == c.name)
            .unwrap_or(usize::MAX)
    });
    leading.append(&mut computed);

    let mut out = Frame::with_nrows(nrows);
    for column in leading {
        if column.len() != nrows {
            return Err(TidyError::DataMismatch(format!(
                "column '{}' has {} values but the table has {} rows",
                column.name,
                column.len(),
                nrows
            )));
        }
        out.push_column(column)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_row_names_and_orders() {
        let frame = Frame::new()
            .with_float(".resid", vec![0.1, -0.1])
            .and_then(|f| f.with_float("x", vec![1.0, 2.0]))
            .and_then(|f| f.with_float(".fitted", vec![1.0, 2.0]))
            .and_then(|f| f.with_row_names(vec!["a".into(), "b".into()]))
            .expect("valid frame");

        let out = normalize(frame, AUGMENT_COLUMNS).expect("normalize");
        assert!(out.row_names().is_none());
        assert_eq!(out.column_names(), vec!["x", ".fitted", ".resid"]);
        assert_eq!(out.nrows(), 2);
    }

    #[test]
    fn test_idempotent() {
        let frame = Frame::new()
            .with_text("term", vec!["(Intercept)".into()])
            .and_then(|f| f.with_float("estimate", vec![1.0]))
            .expect("valid frame");
        let once = normalize(frame, TIDY_COLUMNS).expect("normalize");
        let twice = normalize(once.clone(), TIDY_COLUMNS).expect("normalize");
        assert_eq!(once, twice);
    }
}
