use std::path::PathBuf;

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Source file for `{table}` not found at {}", .path.display())]
    MissingSource { table: &'static str, path: PathBuf },

    #[error("Unexpected header in {}: expected [{}], found [{}]", .path.display(), .expected.join(","), .found.join(","))]
    HeaderMismatch {
        path: PathBuf,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("Failed to coerce `{table}` rows from {}: {source}", .path.display())]
    Coercion {
        table: &'static str,
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to open store: {0}")]
    Connection(#[from] diesel::ConnectionError),

    #[error("Failed to create schema: {0}")]
    Schema(String),

    #[error("Failed to append rows to `{table}`: {source}")]
    Append {
        table: &'static str,
        #[source]
        source: DieselError,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] DieselError),

    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write report to {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl EtlError {
    /// True when a row collided with an existing primary key, e.g. on a re-run.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            EtlError::Append { source, .. } | EtlError::Storage(source) => matches!(
                source,
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
            ),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
