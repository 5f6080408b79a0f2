//! In-memory column tables used as model input and tidier output.
//!
//! A [`Frame`] is a list of equally long named columns. Columns hold either
//! floats or text; only float columns can feed a design matrix, text columns
//! are carried through `augment` untouched. A frame may carry row names, the
//! positional-identity metadata that [`normalize`] strips from every output.

mod model_frame;
mod normalize;

pub use model_frame::{ModelFrame, INTERCEPT_TERM};
pub use normalize::{normalize, AUGMENT_COLUMNS, GLANCE_COLUMNS, TIDY_COLUMNS};

use crate::core::TidyError;
use faer::{Col, Mat};
use serde::Serialize;

/// Values of a single column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ColumnData {
    Float(Vec<f64>),
    Text(Vec<String>),
}

impl ColumnData {
    /// Number of values.
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Float(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }

    /// Returns true if the column has no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Float values, if this is a float column.
    pub fn as_float(&self) -> Option<&[f64]> {
        match self {
            ColumnData::Float(v) => Some(v),
            ColumnData::Text(_) => None,
        }
    }

    /// Text values, if this is a text column.
    pub fn as_text(&self) -> Option<&[String]> {
        match self {
            ColumnData::Float(_) => None,
            ColumnData::Text(v) => Some(v),
        }
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    /// Float column.
    pub fn float(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Float(values),
        }
    }

    /// Text column.
    pub fn text(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Text(values),
        }
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the column has no values.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Column table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Frame {
    columns: Vec<Column>,
    #[serde(skip)]
    nrows: usize,
    #[serde(skip)]
    row_names: Option<Vec<String>>,
}

impl Frame {
    /// Empty frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a frame from columns, checking lengths and name uniqueness.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self, TidyError> {
        let mut frame = Self::new();
        for column in columns {
            frame.push_column(column)?;
        }
        Ok(frame)
    }

    /// Append a float column.
    pub fn with_float(mut self, name: impl Into<String>, values: Vec<f64>) -> Result<Self, TidyError> {
        self.push_column(Column::float(name, values))?;
        Ok(self)
    }

    /// Append a text column.
    pub fn with_text(
        mut self,
        name: impl Into<String>,
        values: Vec<String>,
    ) -> Result<Self, TidyError> {
        self.push_column(Column::text(name, values))?;
        Ok(self)
    }

    /// Attach row names.
    pub fn with_row_names(mut self, names: Vec<String>) -> Result<Self, TidyError> {
        if names.len() != self.nrows {
            return Err(TidyError::DataMismatch(format!(
                "{} row names for a frame with {} rows",
                names.len(),
                self.nrows
            )));
        }
        self.row_names = Some(names);
        Ok(self)
    }

    /// Append a column.
    pub fn push_column(&mut self, column: Column) -> Result<(), TidyError> {
        if self.contains(&column.name) {
            return Err(TidyError::DataMismatch(format!(
                "duplicate column name '{}'",
                column.name
            )));
        }
        if self.columns.is_empty() && self.row_names.is_none() {
            self.nrows = column.len();
        } else if column.len() != self.nrows {
            return Err(TidyError::DataMismatch(format!(
                "column '{}' has {} values but the frame has {} rows",
                column.name,
                column.len(),
                self.nrows
            )));
        }
        self.columns.push(column);
        Ok(())
    }

    /// Number of rows.
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of columns.
    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    /// Column names in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// All columns in order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Row names, if any.
    pub fn row_names(&self) -> Option<&[String]> {
        self.row_names.as_deref()
    }

    /// Whether a column with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Float values of a column, if it exists and is numeric.
    pub fn float(&self, name: &str) -> Option<&[f64]> {
        self.column(name).and_then(|c| c.data.as_float())
    }

    /// Float values of a column, or a `DataMismatch` naming the problem.
    pub fn require_float(&self, name: &str) -> Result<&[f64], TidyError> {
        match self.column(name) {
            None => Err(TidyError::DataMismatch(format!("column '{}' not found", name))),
            Some(c) => c.data.as_float().ok_or_else(|| {
                TidyError::DataMismatch(format!("column '{}' is not numeric", name))
            }),
        }
    }

    /// Numeric column as a vector.
    pub fn numeric_col(&self, name: &str) -> Result<Col<f64>, TidyError> {
        let values = self.require_float(name)?;
        Ok(Col::from_fn(values.len(), |i| values[i]))
    }

    /// Numeric columns stacked into a matrix, in the order given.
    pub fn numeric_matrix(&self, names: &[String]) -> Result<Mat<f64>, TidyError> {
        let columns = names
            .iter()
            .map(|name| self.require_float(name))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Mat::from_fn(self.nrows, columns.len(), |i, j| columns[j][i]))
    }

    /// Remove a column by name.
    pub(crate) fn remove_column(&mut self, name: &str) -> Option<Column> {
        let pos = self.columns.iter().position(|c| c.name == name)?;
        Some(self.columns.remove(pos))
    }

    pub(crate) fn into_parts(self) -> (Vec<Column>, usize, Option<Vec<String>>) {
        (self.columns, self.nrows, self.row_names)
    }

    /// Empty frame with a fixed row count, for building output tables.
    pub(crate) fn with_nrows(nrows: usize) -> Self {
        Self {
            columns: Vec::new(),
            nrows,
            row_names: None,
        }
    }
}
