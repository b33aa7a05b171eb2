//! Core contracts and helpers for lendcheck.
//!
//! This crate defines the in-memory table model, the column contracts of
//! the loan dataset, validation configuration, and CSV I/O shared by the
//! validator, the preprocessing stage, and the CLI.

pub mod config;
pub mod error;
pub mod fingerprint;
pub mod io;
pub mod schema;
pub mod table;
pub mod value;

pub use config::{DEFAULT_SPLIT_SEED, SplitConfig, ValidationConfig};
pub use error::{CoreError, Result};
pub use fingerprint::fingerprint;
pub use io::{CsvWriteSummary, read_table, read_table_from_reader, write_csv};
pub use schema::{
    ColumnSpec, ColumnType, Domain, PURPOSE_CATEGORIES, TARGET_COLUMN, loan_columns,
};
pub use table::{Column, Table, Tabular};
pub use value::Value;
