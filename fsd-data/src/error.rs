/// Error types for extraction and dataset building
use fsd_utils::error::DateError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    /// The interconnection phrase is neither "Month Year" nor a bare year
    #[error("Failed to parse interconnection date: {0}")]
    DateParse(#[from] DateError),

    /// No "effective in" phrase in the page text
    #[error("No interconnection date found")]
    MissingDate,

    /// Numeric text that does not coerce to its column type
    #[error("Failed to convert {field} value {value:?}")]
    Coercion { field: &'static str, value: String },

    /// A column with no fallback was never extracted
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Failed to write CSV
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for Results using DataError
pub type Result<T> = std::result::Result<T, DataError>;
