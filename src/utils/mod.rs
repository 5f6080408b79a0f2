//! Numerical helpers.

mod matrix;

pub use matrix::{
    center_columns, center_vector, design_matrix, detect_constant_columns, drop_columns, invert,
    row_quadratic_form, weighted_cross_inverse,
};
