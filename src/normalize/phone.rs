//! Phone number re-chunking.
//!
//! Formatting symbols are learned per column: every non-digit character that
//! occurs anywhere in the column is stripped, and the remaining digits are
//! regrouped with a fixed separator.

use std::collections::BTreeSet;

use crate::data::{Cell, Column, format_number};

#[derive(Debug, Clone)]
pub struct PhoneFormat {
    pub separator: String,
    pub chunk: usize,
}

impl Default for PhoneFormat {
    fn default() -> Self {
        Self {
            separator: "-".to_string(),
            chunk: 3,
        }
    }
}

fn cell_text(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Text(s) => Some(s.clone()),
        Cell::Number(n) => Some(format_number(n.abs())),
        _ => None,
    }
}

/// Non-digit characters occurring anywhere in the column.
pub fn symbol_set(column: &Column) -> BTreeSet<char> {
    column
        .cells
        .iter()
        .filter_map(cell_text)
        .flat_map(|text| text.chars().collect::<Vec<_>>())
        .filter(|ch| !ch.is_ascii_digit())
        .collect()
}

/// Strips `symbols` from `value` and regroups what is left.
pub fn normalize_value(value: &str, symbols: &BTreeSet<char>, format: &PhoneFormat) -> String {
    let digits = value
        .chars()
        .filter(|ch| !symbols.contains(ch))
        .collect::<Vec<_>>();
    digits
        .chunks(format.chunk.max(1))
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(&format.separator)
}

/// Rewrites a phone column in place; values with no digits become missing.
pub fn normalize_column(column: &mut Column, format: &PhoneFormat) {
    let symbols = symbol_set(column);
    for cell in &mut column.cells {
        let Some(text) = cell_text(cell) else {
            continue;
        };
        let normalized = normalize_value(&text, &symbols, format);
        *cell = if normalized.is_empty() {
            Cell::Missing
        } else {
            Cell::Text(normalized)
        };
    }
}
