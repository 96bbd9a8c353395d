//! In-memory table model.
//!
//! A [`Table`] is an ordered list of named [`Column`]s of equal length. Cells
//! are untyped scalars; the CSV source only produces [`Cell::Text`] and
//! [`Cell::Missing`], and later stages rewrite cells into numbers and dates.

use std::{
    collections::HashSet,
    fmt,
    hash::{Hash, Hasher},
};

use anyhow::{Result, ensure};
use chrono::NaiveDate;
use serde::Serialize;

/// Tokens treated as missing when a table is loaded.
pub const MISSING_PLACEHOLDERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-NaN", "-nan", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a",
    "nan", "null",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Missing,
}

impl Cell {
    /// Builds a cell from raw CSV text, mapping blanks and NA placeholders to `Missing`.
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || MISSING_PLACEHOLDERS.contains(&trimmed) {
            Cell::Missing
        } else {
            Cell::Text(raw.to_string())
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Rendering used for output and for distinct-value counting.
    pub fn as_display(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => format_number(*n),
            Cell::Date(d) => d.format("%Y-%m-%d").to_string(),
            Cell::Missing => String::new(),
        }
    }
}

impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Cell::Text(s) => s.hash(state),
            Cell::Number(n) => n.to_bits().hash(state),
            Cell::Date(d) => d.hash(state),
            Cell::Missing => {}
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

/// Parses a finite number; `inf`/`nan` spellings are not numbers here.
pub fn parse_number(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|parsed| parsed.is_finite())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Text,
    Numeric,
    Date,
    Empty,
}

impl ColumnKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnKind::Text => "text",
            ColumnKind::Numeric => "numeric",
            ColumnKind::Date => "date",
            ColumnKind::Empty => "empty",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn missing_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_missing()).count()
    }

    /// Kind derived from the cells currently held by the column.
    ///
    /// Text cells that all parse as numbers make a `Numeric` column, so a
    /// column of digit strings is numeric until a stage rewrites it.
    pub fn kind(&self) -> ColumnKind {
        let mut saw_number = false;
        let mut saw_date = false;
        let mut saw_text = false;
        for cell in &self.cells {
            match cell {
                Cell::Missing => {}
                Cell::Number(_) => saw_number = true,
                Cell::Date(_) => saw_date = true,
                Cell::Text(s) => {
                    if parse_number(s).is_some() {
                        saw_number = true;
                    } else {
                        saw_text = true;
                    }
                }
            }
        }
        match (saw_text, saw_date, saw_number) {
            (false, false, false) => ColumnKind::Empty,
            (false, true, false) => ColumnKind::Date,
            (false, false, true) => ColumnKind::Numeric,
            _ => ColumnKind::Text,
        }
    }

    pub fn text_values(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().filter_map(Cell::as_text)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Builds a table from columns, rejecting columns of unequal length.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        if let Some(first) = columns.first() {
            let expected = first.len();
            for column in &columns {
                ensure!(
                    column.len() == expected,
                    "Column '{}' has {} value(s), expected {}",
                    column.name,
                    column.len(),
                    expected
                );
            }
        }
        Ok(Self { columns })
    }

    /// Builds a table from a header row and row-major records of raw text.
    pub fn from_rows(headers: &[String], rows: &[Vec<String>]) -> Result<Self> {
        let mut columns = headers
            .iter()
            .map(|name| Column::new(name.clone(), Vec::with_capacity(rows.len())))
            .collect::<Vec<_>>();
        for (row_idx, row) in rows.iter().enumerate() {
            ensure!(
                row.len() == headers.len(),
                "Row {} has {} field(s), expected {}",
                row_idx + 1,
                row.len(),
                headers.len()
            );
            for (column, raw) in columns.iter_mut().zip(row) {
                column.cells.push(Cell::from_raw(raw));
            }
        }
        Ok(Self { columns })
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn headers(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    /// Removes the named columns, returning how many were present.
    pub fn drop_columns(&mut self, names: &[String]) -> usize {
        let before = self.columns.len();
        self.columns.retain(|c| !names.contains(&c.name));
        before - self.columns.len()
    }

    /// Keeps only rows whose mask entry is `true`.
    pub fn retain_rows(&mut self, keep: &[bool]) {
        for column in &mut self.columns {
            let mut idx = 0;
            column.cells.retain(|_| {
                let kept = keep.get(idx).copied().unwrap_or(true);
                idx += 1;
                kept
            });
        }
    }

    /// Drops exact-duplicate rows, keeping the first occurrence. Returns the number removed.
    pub fn dedup_rows(&mut self) -> usize {
        let rows = self.row_count();
        let mut seen = HashSet::with_capacity(rows);
        let keep = (0..rows)
            .map(|row| seen.insert(self.row(row)))
            .collect::<Vec<_>>();
        let removed = keep.iter().filter(|kept| !**kept).count();
        if removed > 0 {
            self.retain_rows(&keep);
        }
        removed
    }

    pub fn row(&self, index: usize) -> Vec<&Cell> {
        self.columns.iter().map(|c| &c.cells[index]).collect()
    }

    pub fn display_rows(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        (0..self.row_count()).map(move |idx| {
            self.columns
                .iter()
                .map(|c| c.cells[idx].as_display())
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        let headers = headers.iter().map(|h| h.to_string()).collect::<Vec<_>>();
        let rows = rows
            .iter()
            .map(|r| r.iter().map(|v| v.to_string()).collect())
            .collect::<Vec<_>>();
        Table::from_rows(&headers, &rows).unwrap()
    }

    #[test]
    fn placeholders_become_missing() {
        assert_eq!(Cell::from_raw(""), Cell::Missing);
        assert_eq!(Cell::from_raw("  "), Cell::Missing);
        assert_eq!(Cell::from_raw("N/A"), Cell::Missing);
        assert_eq!(Cell::from_raw("null"), Cell::Missing);
        assert_eq!(Cell::from_raw("none"), Cell::text("none"));
    }

    #[test]
    fn kind_detects_numeric_text_and_empty() {
        let t = table(
            &["a", "b", "c"],
            &[&["1", "x", ""], &["-2.5", "3", "NA"], &["", "y", ""]],
        );
        assert_eq!(t.columns()[0].kind(), ColumnKind::Numeric);
        assert_eq!(t.columns()[1].kind(), ColumnKind::Text);
        assert_eq!(t.columns()[2].kind(), ColumnKind::Empty);
    }

    #[test]
    fn inf_and_nan_are_not_numbers() {
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number(" 42 "), Some(42.0));
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let mut t = table(&["a", "b"], &[&["1", "x"], &["2", "y"], &["1", "x"]]);
        assert_eq!(t.dedup_rows(), 1);
        assert_eq!(t.row_count(), 2);
        assert_eq!(t.dedup_rows(), 0);
        let rows = t.display_rows().collect::<Vec<_>>();
        assert_eq!(rows, vec![vec!["1", "x"], vec!["2", "y"]]);
    }

    #[test]
    fn unequal_columns_are_rejected() {
        let result = Table::new(vec![
            Column::new("a", vec![Cell::Missing]),
            Column::new("b", vec![]),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn numbers_render_without_trailing_zero() {
        assert_eq!(Cell::Number(3.0).as_display(), "3");
        assert_eq!(Cell::Number(2.5).as_display(), "2.5");
    }
}
