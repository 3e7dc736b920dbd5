//! Tabular data for linked visual units
//!
//! Provides an in-memory [`DataTable`] implementing the engine's data-model
//! contract, dimension/measure inference and a CSV loader.

pub mod config;
pub mod schema;
pub mod sources;
pub mod table;

use thiserror::Error;

// Re-exports
pub use config::{NullConfig, TableConfig};
pub use schema::SchemaDetector;
pub use sources::CsvSource;
pub use table::DataTable;

/// Errors that can occur in data operations
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(String),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Row {row} has {found} values, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },

    #[error("Unknown field '{0}'")]
    UnknownField(String),
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => DataError::Io(std::io::Error::new(io_err.kind(), error.to_string())),
            _ => DataError::Csv(error.to_string()),
        }
    }
}
