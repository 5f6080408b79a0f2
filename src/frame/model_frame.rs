//! The rows and variables a model was actually fit on.

use super::{Column, Frame};
use crate::core::{NaAction, NaHandler, NaInfo};
use crate::solvers::RegressionError;
use faer::{Col, Mat};

/// Name given to the intercept term.
pub const INTERCEPT_TERM: &str = "(Intercept)";

/// Training data retained by a fitted model.
///
/// Holds the response and covariates after missing-value handling, so
/// `augment` can rebuild the per-observation table without the caller
/// passing the data again.
#[derive(Debug, Clone)]
pub struct ModelFrame {
    /// Response column name.
    pub response: String,
    /// Covariate column names, in design order.
    pub covariates: Vec<String>,
    /// Whether an intercept column precedes the covariates.
    pub with_intercept: bool,
    /// Covariate matrix (no intercept column).
    pub x: Mat<f64>,
    /// Response vector.
    pub y: Col<f64>,
    /// Response and covariates as a table, rows in fit order.
    pub data: Frame,
    /// Rows dropped before fitting.
    pub na_info: NaInfo,
}

impl ModelFrame {
    /// Build from a matrix and response; covariates are named `x1..xp`, the
    /// response `y`.
    pub fn from_matrix(
        x: &Mat<f64>,
        y: &Col<f64>,
        with_intercept: bool,
        na_action: NaAction,
    ) -> Result<Self, RegressionError> {
        if x.nrows() != y.nrows() {
            return Err(RegressionError::DimensionMismatch {
                x_rows: x.nrows(),
                y_len: y.nrows(),
            });
        }
        let covariates = (1..=x.ncols()).map(|j| format!("x{}", j)).collect();
        Self::build(x, y, "y".to_string(), covariates, with_intercept, na_action)
    }

    /// Build from named columns of a frame.
    pub fn from_frame(
        frame: &Frame,
        response: &str,
        covariates: &[&str],
        with_intercept: bool,
        na_action: NaAction,
    ) -> Result<Self, RegressionError> {
        let covariates: Vec<String> = covariates.iter().map(|s| s.to_string()).collect();
        let x = frame
            .numeric_matrix(&covariates)
            .map_err(|e| RegressionError::InvalidData(e.to_string()))?;
        let y = frame
            .numeric_col(response)
            .map_err(|e| RegressionError::InvalidData(e.to_string()))?;
        Self::build(&x, &y, response.to_string(), covariates, with_intercept, na_action)
    }

    fn build(
        x: &Mat<f64>,
        y: &Col<f64>,
        response: String,
        covariates: Vec<String>,
        with_intercept: bool,
        na_action: NaAction,
    ) -> Result<Self, RegressionError> {
        let cleaned = NaHandler::process(x, y, na_action)?;
        let x = cleaned.x_clean;
        let y = cleaned.y_clean;
        let n = y.nrows();

        let mut columns = Vec::with_capacity(covariates.len() + 1);
        columns.push(Column::float(response.clone(), (0..n).map(|i| y[i]).collect()));
        for (j, name) in covariates.iter().enumerate() {
            columns.push(Column::float(name.clone(), (0..n).map(|i| x[(i, j)]).collect()));
        }
        let data =
            Frame::from_columns(columns).map_err(|e| RegressionError::InvalidData(e.to_string()))?;

        Ok(Self {
            response,
            covariates,
            with_intercept,
            x,
            y,
            data,
            na_info: cleaned.na_info,
        })
    }

    /// Number of rows used in the fit.
    pub fn nrows(&self) -> usize {
        self.y.nrows()
    }

    /// Term names in coefficient order, intercept first.
    pub fn term_names(&self) -> Vec<String> {
        let mut terms = Vec::with_capacity(self.covariates.len() + 1);
        if self.with_intercept {
            terms.push(INTERCEPT_TERM.to_string());
        }
        terms.extend(self.covariates.iter().cloned());
        terms
    }
}
