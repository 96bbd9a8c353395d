//! Per-role value normalizers.
//!
//! Each normalizer rewrites a single column in place and never fails on a
//! bad cell: unparseable dates become missing, unresolvable countries and
//! unrecognised blood types pass through unchanged.

pub mod blood;
pub mod country;
pub mod date;
pub mod phone;
pub mod text;

use crate::data::{Cell, Column};

/// Title-cases every text cell of a column.
pub fn title_case_column(column: &mut Column) {
    for cell in &mut column.cells {
        if let Cell::Text(value) = cell {
            let cased = text::title_case(value.trim()).into_owned();
            *value = cased;
        }
    }
}

/// Replaces numeric cells (and numeric text) by their absolute value.
pub fn absolute_column(column: &mut Column) {
    for cell in &mut column.cells {
        let number = match cell {
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => crate::data::parse_number(s),
            _ => None,
        };
        if let Some(n) = number {
            *cell = Cell::Number(n.abs());
        }
    }
}
