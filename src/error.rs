//! Error type for loading inputs and writing exports.
//!
//! The scoring engine itself never fails; only the file boundary does.

use std::path::PathBuf;

/// Result type alias using this crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File system errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading or writing errors
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON (de)serialization errors
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A required CSV column is absent
    #[error("missing column `{column}` in {}", path.display())]
    MissingColumn { column: String, path: PathBuf },

    /// A classifier probability row could not be read
    #[error("invalid probabilities for segment {text:?}: {reason}")]
    InvalidProbabilities { text: String, reason: String },

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn missing_column(column: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::MissingColumn {
            column: column.into(),
            path: path.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
