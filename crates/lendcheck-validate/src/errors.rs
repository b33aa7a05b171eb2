use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Errors emitted by the dataset validator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("input is not a table (found {found})")]
    InvalidInputType { found: &'static str },
    #[error("input table cannot be empty")]
    EmptyInput,
    #[error("schema validation failed: {0}")]
    SchemaViolation(SchemaReport),
    #[error(
        "train/test target distribution mismatch: train={train:.4}, test={test:.4} (tolerance {tolerance})"
    )]
    TargetDistributionMismatch {
        train: f64,
        test: f64,
        tolerance: f64,
    },
    #[error("anomalous correlations between the following columns: {}", format_pairs(.pairs))]
    AnomalousCorrelation { pairs: Vec<CorrelatedPair> },
}

impl ValidationError {
    /// Machine-readable error code for logs and artifacts.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::InvalidInputType { .. } => "invalid_input_type",
            ValidationError::EmptyInput => "empty_input",
            ValidationError::SchemaViolation(_) => "schema_violation",
            ValidationError::TargetDistributionMismatch { .. } => "target_distribution_mismatch",
            ValidationError::AnomalousCorrelation { .. } => "anomalous_correlation",
        }
    }

    pub fn schema_report(&self) -> Option<&SchemaReport> {
        match self {
            ValidationError::SchemaViolation(report) => Some(report),
            _ => None,
        }
    }
}

/// Category of a column- or row-level failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    MissingColumn,
    WrongType,
    ExcessNulls,
    NullValues,
    OutOfDomain,
    UnexpectedColumn,
    DuplicateRows,
    EmptyRows,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::MissingColumn => "missing_column",
            FailureKind::WrongType => "wrong_type",
            FailureKind::ExcessNulls => "excess_nulls",
            FailureKind::NullValues => "null_values",
            FailureKind::OutOfDomain => "out_of_domain",
            FailureKind::UnexpectedColumn => "unexpected_column",
            FailureKind::DuplicateRows => "duplicate_rows",
            FailureKind::EmptyRows => "empty_rows",
        }
    }
}

/// One schema failure; `rows` holds the offending row labels, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaFailure {
    pub kind: FailureKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rows: Vec<usize>,
}

impl SchemaFailure {
    pub fn column(kind: FailureKind, column: &str, message: impl Into<String>) -> Self {
        Self {
            kind,
            column: Some(column.to_string()),
            message: message.into(),
            rows: Vec::new(),
        }
    }

    pub fn rows(kind: FailureKind, message: impl Into<String>, rows: Vec<usize>) -> Self {
        Self {
            kind,
            column: None,
            message: message.into(),
            rows,
        }
    }

    pub fn with_rows(mut self, rows: Vec<usize>) -> Self {
        self.rows = rows;
        self
    }
}

impl fmt::Display for SchemaFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.column {
            Some(column) => write!(f, "[{}] {}: {}", self.kind.as_str(), column, self.message),
            None => write!(f, "[{}] {}", self.kind.as_str(), self.message),
        }
    }
}

/// Accumulator for every column- and row-level failure found in one pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchemaReport {
    pub failures: Vec<SchemaFailure>,
}

impl SchemaReport {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn push(&mut self, failure: SchemaFailure) {
        self.failures.push(failure);
    }

    pub fn has(&self, kind: FailureKind) -> bool {
        self.failures.iter().any(|failure| failure.kind == kind)
    }

    /// Failures attached to a given column.
    pub fn for_column<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a SchemaFailure> {
        self.failures
            .iter()
            .filter(move |failure| failure.column.as_deref() == Some(column))
    }

    /// Distinct column names that have at least one failure, in report order.
    pub fn columns(&self) -> Vec<&str> {
        let mut columns: Vec<&str> = Vec::new();
        for column in self.failures.iter().filter_map(|f| f.column.as_deref()) {
            if !columns.contains(&column) {
                columns.push(column);
            }
        }
        columns
    }

    /// Convert the accumulated failures into a single error.
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(ValidationError::SchemaViolation(self))
        }
    }
}

impl fmt::Display for SchemaReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failure(s)", self.failures.len())?;
        for failure in &self.failures {
            write!(f, "\n  - {failure}")?;
        }
        Ok(())
    }
}

/// A pair of numeric columns whose correlation magnitude reached the
/// threshold, or whose correlation is undefined (`coefficient: None`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelatedPair {
    pub left: String,
    pub right: String,
    pub coefficient: Option<f64>,
}

impl CorrelatedPair {
    /// True when this pair names both columns, in either order.
    pub fn involves(&self, a: &str, b: &str) -> bool {
        (self.left == a && self.right == b) || (self.left == b && self.right == a)
    }

    /// Coefficient to four decimals, or `undefined`.
    pub fn coefficient_label(&self) -> String {
        match self.coefficient {
            Some(r) => format!("{r:.4}"),
            None => "undefined".to_string(),
        }
    }
}

impl fmt::Display for CorrelatedPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}): {}",
            self.left,
            self.right,
            self.coefficient_label()
        )
    }
}

fn format_pairs(pairs: &[CorrelatedPair]) -> String {
    pairs
        .iter()
        .map(|pair| pair.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
