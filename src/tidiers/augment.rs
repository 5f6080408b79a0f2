//! Per-observation fitted values and diagnostics merged onto input rows.

use super::options::AugmentOptions;
use crate::adapter::{Observations, TidyModel};
use crate::core::{PredictionType, TidyError, TidyWarning};
use crate::diagnostics::{diagnostics_for, residuals_of_type};
use crate::frame::{normalize, Column, Frame, AUGMENT_COLUMNS};
use faer::{Col, Mat};

/// Computed columns for one row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservationRow {
    pub fitted: f64,
    pub se_fit: f64,
    pub resid: Option<f64>,
    pub hat: Option<f64>,
    pub sigma: Option<f64>,
    pub cooksd: Option<f64>,
    pub std_resid: Option<f64>,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

/// Output of [`augment`]: the input rows plus computed columns.
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentTable {
    /// Input columns, minus any that collided with a computed column name.
    pub data: Frame,
    pub fitted: Vec<f64>,
    pub se_fit: Vec<f64>,
    pub resid: Option<Vec<f64>>,
    pub hat: Option<Vec<f64>>,
    pub sigma: Option<Vec<f64>>,
    pub cooksd: Option<Vec<f64>>,
    pub std_resid: Option<Vec<f64>>,
    pub lower: Option<Vec<f64>>,
    pub upper: Option<Vec<f64>>,
    pub warnings: Vec<TidyWarning>,
}

impl AugmentTable {
    pub fn nrows(&self) -> usize {
        self.fitted.len()
    }

    /// Computed columns of row `i`.
    pub fn row(&self, i: usize) -> Option<ObservationRow> {
        let at = |col: &Option<Vec<f64>>| col.as_ref().map(|v| v[i]);
        (i < self.nrows()).then(|| ObservationRow {
            fitted: self.fitted[i],
            se_fit: self.se_fit[i],
            resid: at(&self.resid),
            hat: at(&self.hat),
            sigma: at(&self.sigma),
            cooksd: at(&self.cooksd),
            std_resid: at(&self.std_resid),
            lower: at(&self.lower),
            upper: at(&self.upper),
        })
    }

    /// Normalized table: input columns, then `.fitted, .se.fit` and whichever
    /// optional columns were produced.
    pub fn to_frame(&self) -> Result<Frame, TidyError> {
        let mut frame = self.data.clone();
        frame.push_column(Column::float(".fitted", self.fitted.clone()))?;
        frame.push_column(Column::float(".se.fit", self.se_fit.clone()))?;
        let optional = [
            (".resid", &self.resid),
            (".hat", &self.hat),
            (".sigma", &self.sigma),
            (".cooksd", &self.cooksd),
            (".std.resid", &self.std_resid),
            (".lower", &self.lower),
            (".upper", &self.upper),
        ];
        for (name, values) in optional {
            if let Some(values) = values {
                frame.push_column(Column::float(name, values.clone()))?;
            }
        }
        normalize(frame, AUGMENT_COLUMNS)
    }
}

/// Add fitted values and diagnostics to observations.
///
/// Without `newdata` the rows are the training rows: `data` if given (it must
/// have one row per observation used in the fit), otherwise the model's own
/// frame. `.resid`, and the leverage and influence columns the model variant
/// supports, are added.
///
/// With `newdata` only `.fitted` and `.se.fit` are computed, plus `.resid`
/// when `newdata` has a numeric response column.
///
/// # Errors
/// - `UnsupportedOperation` for variants without augmentation, or when an
///   interval is requested for a variant without prediction intervals
/// - `DataMismatch` when `data` has the wrong number of rows or `newdata`
///   lacks a covariate
/// - `InvalidOption` for a confidence level outside (0, 1)
pub fn augment<M: TidyModel + ?Sized>(
    model: &M,
    data: Option<&Frame>,
    newdata: Option<&Frame>,
    options: &AugmentOptions,
) -> Result<AugmentTable, TidyError> {
    options.validate()?;
    let caps = model.capabilities();
    let obs = match model.observations() {
        Some(obs) if caps.augment => obs,
        _ => {
            return Err(TidyError::UnsupportedOperation {
                operation: "augment",
                variant: caps.kind.name(),
            })
        }
    };

    let mut table = match newdata {
        None => augment_training(model, &obs, data, options)?,
        Some(newdata) => augment_new(model, &obs, newdata, options)?,
    };

    let replaced: Vec<String> = AUGMENT_COLUMNS
        .iter()
        .filter(|name| table.data.contains(name))
        .map(|name| name.to_string())
        .collect();
    for name in replaced {
        table.data.remove_column(&name);
        table.warnings.push(TidyWarning::ReplacedColumn { name }.emit());
    }
    Ok(table)
}

fn augment_training<M: TidyModel + ?Sized>(
    model: &M,
    obs: &Observations<'_>,
    data: Option<&Frame>,
    options: &AugmentOptions,
) -> Result<AugmentTable, TidyError> {
    let frame = obs.frame;
    let base = data.unwrap_or(&frame.data);
    if base.nrows() != frame.nrows() {
        let mut msg = format!(
            "data has {} rows but the model was fit on {}",
            base.nrows(),
            frame.nrows()
        );
        if frame.na_info.has_removed() {
            msg.push_str(&format!(
                "; {} rows with missing values were dropped during fitting, \
                 refit the model on data with those rows removed",
                frame.na_info.n_removed
            ));
        }
        return Err(TidyError::DataMismatch(msg));
    }

    let diag = diagnostics_for(model.capabilities(), obs, options.residual_type)?;
    let pred = model.predict(&frame.x, options.predict_type)?;
    let (lower, upper) = intervals(model, &frame.x, options)?;

    Ok(AugmentTable {
        data: base.clone(),
        fitted: to_vec(&pred.fit),
        se_fit: to_vec(&pred.se),
        resid: Some(diag.resid),
        hat: diag.hat,
        sigma: diag.sigma,
        cooksd: diag.cooksd,
        std_resid: diag.std_resid,
        lower,
        upper,
        warnings: Vec::new(),
    })
}

fn augment_new<M: TidyModel + ?Sized>(
    model: &M,
    obs: &Observations<'_>,
    newdata: &Frame,
    options: &AugmentOptions,
) -> Result<AugmentTable, TidyError> {
    let frame = obs.frame;
    let x = newdata.numeric_matrix(&frame.covariates)?;
    let pred = model.predict(&x, options.predict_type)?;

    let resid = match newdata.float(&frame.response) {
        Some(y) => {
            let mu = match options.predict_type {
                PredictionType::Response => pred.fit.clone(),
                PredictionType::Link => model.predict(&x, PredictionType::Response)?.fit,
            };
            let y = Col::from_fn(y.len(), |i| y[i]);
            let r = residuals_of_type(options.residual_type, &y, &mu, obs.family, obs.link);
            Some(to_vec(&r))
        }
        None => None,
    };
    let (lower, upper) = intervals(model, &x, options)?;

    Ok(AugmentTable {
        data: newdata.clone(),
        fitted: to_vec(&pred.fit),
        se_fit: to_vec(&pred.se),
        resid,
        hat: None,
        sigma: None,
        cooksd: None,
        std_resid: None,
        lower,
        upper,
        warnings: Vec::new(),
    })
}

type Bounds = (Option<Vec<f64>>, Option<Vec<f64>>);

fn intervals<M: TidyModel + ?Sized>(
    model: &M,
    x: &Mat<f64>,
    options: &AugmentOptions,
) -> Result<Bounds, TidyError> {
    match options.interval {
        None => Ok((None, None)),
        Some(interval) => {
            let pred = model.prediction_interval(x, interval, options.conf_level)?;
            Ok((Some(to_vec(&pred.lower)), Some(to_vec(&pred.upper))))
        }
    }
}

fn to_vec(col: &Col<f64>) -> Vec<f64> {
    col.iter().copied().collect()
}
