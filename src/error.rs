use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for format-level reading and writing.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Convenience result type for cleaning operations.
pub type CleaningResult<T> = Result<T, CleaningError>;

/// Error type returned by the format readers and writers.
///
/// This is a single error enum shared across CSV, JSON and Parquet.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading or writing error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON reading or writing error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Parquet reading error.
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// The input has no columns to parse.
    #[error("no columns to parse from input")]
    EmptyInput,

    /// The input is structurally inconsistent (ragged rows, non-object JSON records, ...).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// JSON records carry column names only through their rows, so an empty dataset cannot be
    /// written as JSON or NDJSON.
    #[error("cannot write {path} as JSON: the dataset has no rows to carry its columns")]
    NoRecords { path: PathBuf },

    /// The path's extension names a format this crate cannot handle in that direction.
    #[error("unsupported format '{format}' for {path}")]
    UnsupportedFormat { format: String, path: PathBuf },
}

/// Error type returned by cleaning operations.
///
/// Every variant renders to a self-contained message; the tool adapter relies on that when it
/// turns errors into text results.
#[derive(Debug, Error)]
pub enum CleaningError {
    /// Neither the inline nor the locator interpretation of the source could be loaded.
    #[error("Failed to read CSV from path '{reference}' or as string content: {cause}")]
    Load {
        reference: String,
        #[source]
        cause: IngestionError,
    },

    /// The fill strategy name is not recognized.
    #[error("Unknown strategy '{0}'")]
    UnknownStrategy(String),

    /// The filter operator name is not recognized.
    #[error(
        "Unknown operator '{0}'. Valid operators: equals, not_equals, greater, less, contains, not_contains"
    )]
    UnknownOperator(String),

    /// The standardize operation name is not recognized.
    #[error("Unknown operation '{0}'")]
    UnknownOperation(String),

    /// The dedup `keep` policy is not recognized.
    #[error("Unknown keep value '{0}'. Valid values: first, last, none")]
    UnknownKeep(String),

    /// A named column does not exist in the dataset.
    #[error("Column '{column}' not found in CSV. Available columns: {available:?}")]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    /// A parameter required by the chosen mode was not supplied.
    #[error("{argument} required when {reason}")]
    MissingArgument { argument: String, reason: String },

    /// A comparison value could not be interpreted.
    #[error("invalid value '{value}': {message}")]
    InvalidValue { value: String, message: String },

    /// Persisting the result failed.
    #[error("failed to write {}: {cause}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        cause: IngestionError,
    },
}

impl CleaningError {
    /// True for errors caused by a bad enum-like or missing argument, as opposed to data or I/O
    /// problems.
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            CleaningError::UnknownStrategy(_)
                | CleaningError::UnknownOperator(_)
                | CleaningError::UnknownOperation(_)
                | CleaningError::UnknownKeep(_)
                | CleaningError::MissingColumn { .. }
                | CleaningError::MissingArgument { .. }
        )
    }
}
