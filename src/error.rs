//! Error taxonomy for the cleaning pipeline.
//!
//! Structural failures (unreadable input, empty table, missing resolver data)
//! abort the run. Per-cell failures are absorbed by the normalizers and only
//! surface here when a policy asks for it (`on_unparseable_date: fail`).

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CleanError {
    #[error("Malformed CSV input {path:?}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Table has no data rows")]
    EmptyTable,

    #[error("Resolver unavailable: {0}")]
    ResolverUnavailable(String),

    #[error("Unparseable value '{value}' in column '{column}'")]
    UnparseableValue { column: String, value: String },

    #[error("{count} row(s) in column '{column}' could not be parsed as dates")]
    UnparseableDates { column: String, count: usize },

    #[error("No country matches '{0}'")]
    CountryNotFound(String),
}

pub type CleanResult<T> = std::result::Result<T, CleanError>;
