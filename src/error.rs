//! Error types for loading and parsing the passenger tables.

use thiserror::Error;

/// Errors raised while loading a table from disk.
///
/// Row-level problems (bad dates, bad counts) never surface here; those rows
/// are dropped with a warning. Only structural failures are fatal.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be opened or read.
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader failed (bad quoting, invalid UTF-8, etc).
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Required headers are absent, so no aggregate can be trusted.
    #[error("{path} is missing required columns: {}", missing.join(", "))]
    MissingColumns { path: String, missing: Vec<String> },
}

/// A categorical value that is not one of the known variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {column} value: {value:?}")]
pub struct ParseCategoryError {
    pub column: &'static str,
    pub value: String,
}

impl ParseCategoryError {
    pub fn new(column: &'static str, value: &str) -> Self {
        Self {
            column,
            value: value.to_string(),
        }
    }
}
