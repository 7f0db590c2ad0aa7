//! Error handling for the accident ETL.
//!
//! Fallible operations return [`Result`], an `anyhow` result carrying context
//! added at I/O, parquet, arrow and SQL boundaries. Domain failures are
//! expressed as [`Error`] variants and converted with `.into()`.

pub mod util;

/// Domain errors raised by the ETL
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required column is missing from a record batch
    #[error("Column '{column}' not found in record batch")]
    ColumnNotFound { column: String },

    /// A column does not have the expected arrow type
    #[error("Column '{column}' is not a {expected} array")]
    InvalidDataType { column: String, expected: String },

    /// Missing or malformed configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Post-load verification failed
    #[error("Row count mismatch for table '{table}': expected {expected}, found {actual}")]
    RowCountMismatch {
        table: String,
        expected: u64,
        actual: u64,
    },

    /// The target store rejected an operation
    #[error("Store error: {0}")]
    Store(String),
}

/// Result type for ETL operations
pub type Result<T> = anyhow::Result<T>;
