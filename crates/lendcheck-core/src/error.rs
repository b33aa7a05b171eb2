use std::path::PathBuf;

use thiserror::Error;

/// Core error type shared across lendcheck crates.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The table violates internal invariants (ragged columns, duplicate names).
    #[error("invalid table: {0}")]
    InvalidTable(String),
    /// A referenced column does not exist.
    #[error("column not found: {0}")]
    MissingColumn(String),
    /// Output filename does not end with `.csv`.
    #[error("filename must end with '.csv': {0}")]
    InvalidFilename(String),
    /// Output directory is absent.
    #[error("directory {0} does not exist")]
    DirectoryNotFound(PathBuf),
    /// Input is not a table.
    #[error("input must be a table, found {0}")]
    NotTabular(&'static str),
    /// Table has no observations.
    #[error("table must contain observations")]
    EmptyTable,
    /// Configuration failed a consistency check.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Convenience alias for results returned by lendcheck crates.
pub type Result<T> = std::result::Result<T, CoreError>;
