use lendcheck_core::{Column, Table, Tabular, ValidationConfig};
use serde::Serialize;

use crate::checks::{check_columns, check_rows};
use crate::errors::{FailureKind, SchemaFailure, SchemaReport, ValidationError};
use crate::split::{TrainTestSplit, train_test_split};
use crate::stats::{CorrelationMatrix, class_ratio};

/// Diagnostic numbers from a successful validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationSummary {
    pub rows: usize,
    pub columns: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    pub split_seed: u64,
    pub train_negative_ratio: f64,
    pub test_negative_ratio: f64,
    pub numeric_columns: usize,
    pub correlation_pairs_checked: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_abs_correlation: Option<f64>,
}

/// Validate datasets against a column contract and statistical thresholds.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Run every check and return the diagnostics on success.
    pub fn run<D: Tabular + ?Sized>(
        &self,
        data: &D,
    ) -> Result<ValidationSummary, ValidationError> {
        run_checks(data, &self.config)
    }
}

/// Validate `data` against `config`; the first failing stage wins.
///
/// Schema and row failures are collected together; the split-parity and
/// correlation checks only run on a structurally clean table.
pub fn validate<D: Tabular + ?Sized>(
    data: &D,
    config: &ValidationConfig,
) -> Result<(), ValidationError> {
    run_checks(data, config).map(|_| ())
}

fn run_checks<D: Tabular + ?Sized>(
    data: &D,
    config: &ValidationConfig,
) -> Result<ValidationSummary, ValidationError> {
    let table = check_input(data)?;
    tracing::debug!(
        event = "validation_started",
        rows = table.n_rows(),
        columns = table.n_cols()
    );

    check_structure(table, config)?;

    let split = train_test_split(table, &config.split);
    tracing::debug!(
        event = "split_computed",
        seed = config.split.seed,
        train_rows = split.train.n_rows(),
        test_rows = split.test.n_rows()
    );

    let (train_ratio, test_ratio) = check_target_parity(&split, config)?;
    let matrix = check_correlations(&split.train, config)?;

    let summary = ValidationSummary {
        rows: table.n_rows(),
        columns: table.n_cols(),
        train_rows: split.train.n_rows(),
        test_rows: split.test.n_rows(),
        split_seed: config.split.seed,
        train_negative_ratio: train_ratio,
        test_negative_ratio: test_ratio,
        numeric_columns: matrix.columns().len(),
        correlation_pairs_checked: matrix.pair_count(),
        max_abs_correlation: matrix.max_abs(),
    };
    tracing::info!(event = "validation_passed", rows = summary.rows);

    Ok(summary)
}

fn check_input<D: Tabular + ?Sized>(data: &D) -> Result<&Table, ValidationError> {
    let table = data
        .as_table()
        .ok_or(ValidationError::InvalidInputType { found: data.kind() })?;
    if table.is_empty() {
        return Err(ValidationError::EmptyInput);
    }
    Ok(table)
}

fn check_structure(table: &Table, config: &ValidationConfig) -> Result<(), ValidationError> {
    let mut report = SchemaReport::default();
    check_columns(table, config, &mut report);
    check_rows(table, &mut report);

    if !report.is_ok() {
        tracing::warn!(
            event = "schema_failed",
            failures = report.failures.len(),
            columns = ?report.columns()
        );
    }
    report.into_result()
}

fn check_target_parity(
    split: &TrainTestSplit,
    config: &ValidationConfig,
) -> Result<(f64, f64), ValidationError> {
    let train = class_ratio(
        target_column(&split.train, &config.target)?,
        config.negative_class,
    );
    let test = class_ratio(
        target_column(&split.test, &config.target)?,
        config.negative_class,
    );

    if (train - test).abs() > config.target_tolerance {
        tracing::warn!(event = "target_mismatch", train, test);
        return Err(ValidationError::TargetDistributionMismatch {
            train,
            test,
            tolerance: config.target_tolerance,
        });
    }
    Ok((train, test))
}

fn target_column<'a>(table: &'a Table, target: &str) -> Result<&'a Column, ValidationError> {
    table.column(target).ok_or_else(|| {
        let mut report = SchemaReport::default();
        report.push(SchemaFailure::column(
            FailureKind::MissingColumn,
            target,
            "target column not found in dataset",
        ));
        ValidationError::SchemaViolation(report)
    })
}

fn check_correlations(
    train: &Table,
    config: &ValidationConfig,
) -> Result<CorrelationMatrix, ValidationError> {
    let matrix = CorrelationMatrix::compute(train);
    let pairs = matrix.anomalous_pairs(config.correlation_threshold);
    if !pairs.is_empty() {
        tracing::warn!(event = "anomalous_correlation", pairs = pairs.len());
        return Err(ValidationError::AnomalousCorrelation { pairs });
    }
    Ok(matrix)
}
