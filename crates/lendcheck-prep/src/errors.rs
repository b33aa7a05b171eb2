use lendcheck_core::CoreError;
use thiserror::Error;

/// Errors emitted by cleaning helpers and the preprocessor.
#[derive(Debug, Error)]
pub enum PrepError {
    #[error("missing column: {0}")]
    MissingColumn(String),
    #[error("column '{0}' holds non-numeric values")]
    NonNumeric(String),
    #[error("no feature columns selected")]
    NoFeatures,
    #[error("column '{0}' has no values to fit on")]
    NoValues(String),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PrepError>;
