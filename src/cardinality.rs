//! Uniqueness statistics used to confirm roles and flag noise columns.

use std::collections::HashSet;

use crate::{data::Column, error::CleanError};

/// Number of distinct non-missing values.
pub fn distinct_count(column: &Column) -> usize {
    column
        .cells
        .iter()
        .filter(|cell| !cell.is_missing())
        .collect::<HashSet<_>>()
        .len()
}

/// `distinct / row_count`, always within `[0, 1]`.
pub fn ratio(column: &Column) -> Result<f64, CleanError> {
    if column.is_empty() {
        return Err(CleanError::EmptyTable);
    }
    Ok(distinct_count(column) as f64 / column.len() as f64)
}
