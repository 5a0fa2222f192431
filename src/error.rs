use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("month '{month}' not recognized in date '{date}'")]
    UnrecognizedMonth { month: String, date: String },

    #[error("malformed date '{date}': {reason}")]
    MalformedDate { date: String, reason: &'static str },
}

#[derive(Debug, Error)]
pub enum EtlError {
    #[error("{}: row {row}: {source}", path.display())]
    Date {
        path: PathBuf,
        row: usize,
        #[source]
        source: DateError,
    },

    #[error("failed to read {}: {reason}", path.display())]
    FileRead { path: PathBuf, reason: String },

    #[error("column '{column}' missing from {table}")]
    MissingColumn { column: String, table: String },
}

impl EtlError {
    pub fn missing_column(column: &str, table: impl Into<String>) -> Self {
        EtlError::MissingColumn {
            column: column.to_string(),
            table: table.into(),
        }
    }
}
