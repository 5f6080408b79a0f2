//! Missing value (NA) handling applied before a model is fit.
//!
//! Two policies mirror R's `na.action`:
//! - `Omit`: drop rows containing NaN; the model's fitted dimension is then
//!   shorter than the input table.
//! - `Fail`: return an error if any NaN is present.
//!
//! The tidiers read [`NaInfo`] back from a fitted model to explain a row-count
//! mismatch between the model and a table supplied to `augment`.
//!
//! # Example
//!
//! ```
//! use tidy_regress::core::{NaAction, NaHandler};
//! use faer::{Mat, Col};
//!
//! let x = Mat::from_fn(5, 2, |i, j| if i == 2 { f64::NAN } else { (i + j) as f64 });
//! let y = Col::from_fn(5, |i| if i == 3 { f64::NAN } else { i as f64 });
//!
//! let result = NaHandler::process(&x, &y, NaAction::Omit).unwrap();
//! assert_eq!(result.x_clean.nrows(), 3);
//! assert_eq!(result.na_info.kept_indices, vec![0, 1, 4]);
//! ```

use faer::{Col, Mat};
use thiserror::Error;

/// Action to take when missing values (NaN) are encountered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NaAction {
    /// Remove rows containing NaN. Equivalent to R's `na.omit`.
    #[default]
    Omit,

    /// Return an error if any NaN is present. Equivalent to R's `na.fail`.
    Fail,
}

/// Errors raised by NA preprocessing.
#[derive(Debug, Error)]
pub enum NaError {
    /// NaN found in input data when using `NaAction::Fail`.
    #[error("NA values found in data (na.fail): {n_na} rows contain missing values")]
    NaValuesPresent { n_na: usize },

    /// All observations were removed.
    #[error("all observations contain NA values")]
    AllNa,
}

/// Record of the NA handling applied to a fit.
#[derive(Debug, Clone)]
pub struct NaInfo {
    /// Number of rows before NA removal.
    pub n_original: usize,

    /// Indices (into the original rows) of the rows that were kept.
    pub kept_indices: Vec<usize>,

    /// Number of rows removed.
    pub n_removed: usize,

    /// The NA action that was applied.
    pub action: NaAction,
}

impl NaInfo {
    /// NaInfo for data with no missing values.
    pub fn no_na(n_observations: usize, action: NaAction) -> Self {
        Self {
            n_original: n_observations,
            kept_indices: (0..n_observations).collect(),
            n_removed: 0,
            action,
        }
    }

    /// Whether any rows were dropped.
    pub fn has_removed(&self) -> bool {
        self.n_removed > 0
    }
}

/// Result of NA preprocessing.
#[derive(Debug, Clone)]
pub struct NaResult {
    /// Feature matrix with NA rows removed.
    pub x_clean: Mat<f64>,
    /// Response with NA rows removed.
    pub y_clean: Col<f64>,
    /// What was removed.
    pub na_info: NaInfo,
}

/// Handler for missing value processing.
pub struct NaHandler;

impl NaHandler {
    /// Process input data according to the specified NA action.
    ///
    /// # Errors
    ///
    /// - `NaError::NaValuesPresent` if `action` is `Fail` and NaN values exist
    /// - `NaError::AllNa` if every row contains NaN
    pub fn process(x: &Mat<f64>, y: &Col<f64>, action: NaAction) -> Result<NaResult, NaError> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        let na_mask = Self::find_na_rows(x, y);
        let n_na = na_mask.iter().filter(|&&v| v).count();

        if n_na == 0 {
            return Ok(NaResult {
                x_clean: x.clone(),
                y_clean: y.clone(),
                na_info: NaInfo::no_na(n_samples, action),
            });
        }

        match action {
            NaAction::Fail => Err(NaError::NaValuesPresent { n_na }),
            NaAction::Omit => {
                if n_na == n_samples {
                    return Err(NaError::AllNa);
                }

                let kept_indices: Vec<usize> = na_mask
                    .iter()
                    .enumerate()
                    .filter_map(|(i, &had_na)| if !had_na { Some(i) } else { None })
                    .collect();
                let n_clean = kept_indices.len();

                let x_clean = Mat::from_fn(n_clean, n_features, |i, j| x[(kept_indices[i], j)]);
                let y_clean = Col::from_fn(n_clean, |i| y[kept_indices[i]]);

                Ok(NaResult {
                    x_clean,
                    y_clean,
                    na_info: NaInfo {
                        n_original: n_samples,
                        kept_indices,
                        n_removed: n_na,
                        action,
                    },
                })
            }
        }
    }

    /// Mask of rows containing a NaN in `x` or `y`.
    pub fn find_na_rows(x: &Mat<f64>, y: &Col<f64>) -> Vec<bool> {
        (0..x.nrows())
            .map(|i| y[i].is_nan() || (0..x.ncols()).any(|j| x[(i, j)].is_nan()))
            .collect()
    }
}
