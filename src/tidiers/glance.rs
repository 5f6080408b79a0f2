//! One-row model summaries.

use crate::adapter::{FitStatistics, GlanceCore, TidyModel};
use crate::core::TidyError;
use crate::frame::{normalize, Column, Frame, GLANCE_COLUMNS};
use serde::Serialize;

/// Model-level statistics. Fields the model variant does not expose, or whose
/// value is not finite, are `None` and absent from the serialized form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GlanceRow {
    #[serde(rename = "r.squared", skip_serializing_if = "Option::is_none")]
    pub r_squared: Option<f64>,
    #[serde(rename = "adj.r.squared", skip_serializing_if = "Option::is_none")]
    pub adj_r_squared: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sigma: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistic: Option<f64>,
    #[serde(rename = "p.value", skip_serializing_if = "Option::is_none")]
    pub p_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub df: Option<f64>,
    #[serde(rename = "logLik", skip_serializing_if = "Option::is_none")]
    pub log_lik: Option<f64>,
    #[serde(rename = "AIC", skip_serializing_if = "Option::is_none")]
    pub aic: Option<f64>,
    #[serde(rename = "BIC", skip_serializing_if = "Option::is_none")]
    pub bic: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deviance: Option<f64>,
    #[serde(rename = "df.residual", skip_serializing_if = "Option::is_none")]
    pub df_residual: Option<usize>,
    #[serde(rename = "null.deviance", skip_serializing_if = "Option::is_none")]
    pub null_deviance: Option<f64>,
    #[serde(rename = "df.null", skip_serializing_if = "Option::is_none")]
    pub df_null: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nobs: Option<usize>,
}

impl GlanceRow {
    fn from_parts(core: GlanceCore, stats: FitStatistics) -> Self {
        let keep = |v: Option<f64>| v.filter(|x| x.is_finite());
        Self {
            r_squared: keep(core.r_squared),
            adj_r_squared: keep(core.adj_r_squared),
            sigma: keep(core.sigma),
            statistic: keep(core.statistic),
            p_value: keep(core.p_value),
            df: keep(core.df),
            log_lik: keep(stats.log_lik),
            aic: keep(stats.aic),
            bic: keep(stats.bic),
            deviance: keep(stats.deviance),
            df_residual: stats.df_residual,
            null_deviance: keep(stats.null_deviance),
            df_null: stats.df_null,
            nobs: stats.nobs,
        }
    }

    /// Present fields as `(column name, value)`, in column order.
    pub fn fields(&self) -> Vec<(&'static str, f64)> {
        let count = |v: Option<usize>| v.map(|n| n as f64);
        [
            ("r.squared", self.r_squared),
            ("adj.r.squared", self.adj_r_squared),
            ("sigma", self.sigma),
            ("statistic", self.statistic),
            ("p.value", self.p_value),
            ("df", self.df),
            ("logLik", self.log_lik),
            ("AIC", self.aic),
            ("BIC", self.bic),
            ("deviance", self.deviance),
            ("df.residual", count(self.df_residual)),
            ("null.deviance", self.null_deviance),
            ("df.null", count(self.df_null)),
            ("nobs", count(self.nobs)),
        ]
        .into_iter()
        .filter_map(|(name, v)| v.map(|v| (name, v)))
        .collect()
    }

    /// Normalized one-row table of the present fields.
    pub fn to_frame(&self) -> Result<Frame, TidyError> {
        let columns = self
            .fields()
            .into_iter()
            .map(|(name, v)| Column::float(name, vec![v]))
            .collect();
        normalize(Frame::from_columns(columns)?, GLANCE_COLUMNS)
    }
}

/// Summarize a model in a single row.
pub fn glance<M: TidyModel + ?Sized>(model: &M) -> Result<GlanceRow, TidyError> {
    Ok(GlanceRow::from_parts(model.glance_core(), model.fit_statistics()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_finite_fields_are_dropped() {
        let row = GlanceRow::from_parts(
            GlanceCore {
                r_squared: Some(f64::NAN),
                sigma: Some(1.5),
                ..GlanceCore::default()
            },
            FitStatistics {
                aic: Some(f64::INFINITY),
                nobs: Some(12),
                ..FitStatistics::default()
            },
        );
        assert_eq!(row.fields(), vec![("sigma", 1.5), ("nobs", 12.0)]);

        let frame = row.to_frame().expect("frame");
        assert_eq!(frame.nrows(), 1);
        assert_eq!(frame.column_names(), vec!["sigma", "nobs"]);
    }
}
