use lendcheck_core::ValidationConfig;

use crate::engine::ValidationSummary;
use crate::errors::{FailureKind, ValidationError};

/// Render a deterministic markdown report for one validation outcome.
pub fn render_report(
    outcome: &Result<ValidationSummary, ValidationError>,
    config: &ValidationConfig,
    dataset: &str,
) -> String {
    let mut lines = Vec::new();

    lines.push("# Loan Dataset Validation Report".to_string());
    lines.push(String::new());
    lines.push("## Run summary".to_string());
    lines.push(format!("- dataset: {dataset}"));
    let status = match outcome {
        Ok(_) => "passed",
        Err(err) => err.code(),
    };
    lines.push(format!("- status: {status}"));
    lines.push(format!("- target: {}", config.target));
    lines.push(format!("- split_seed: {}", config.split.seed));
    lines.push(format!("- test_ratio: {}", config.split.test_ratio));
    lines.push(String::new());

    match outcome {
        Ok(summary) => push_summary(&mut lines, summary),
        Err(err) => push_failure(&mut lines, err, config),
    }

    lines.push("## Recommendations".to_string());
    lines.extend(recommendations(outcome));
    lines.join("\n")
}

fn push_summary(lines: &mut Vec<String>, summary: &ValidationSummary) {
    lines.push("## Dataset".to_string());
    lines.push("| rows | columns | train_rows | test_rows |".to_string());
    lines.push("| --- | --- | --- | --- |".to_string());
    lines.push(format!(
        "| {} | {} | {} | {} |",
        summary.rows, summary.columns, summary.train_rows, summary.test_rows
    ));
    lines.push(String::new());

    lines.push("## Target parity".to_string());
    lines.push(format!(
        "- negative class ratio: train={:.4}, test={:.4}",
        summary.train_negative_ratio, summary.test_negative_ratio
    ));
    lines.push(String::new());

    lines.push("## Correlations".to_string());
    lines.push(format!(
        "- numeric columns: {}, pairs checked: {}",
        summary.numeric_columns, summary.correlation_pairs_checked
    ));
    if let Some(max) = summary.max_abs_correlation {
        lines.push(format!("- largest |r|: {max:.4}"));
    }
    lines.push(String::new());
}

fn push_failure(lines: &mut Vec<String>, err: &ValidationError, config: &ValidationConfig) {
    match err {
        ValidationError::InvalidInputType { found } => {
            lines.push("## Input".to_string());
            lines.push(format!("- expected a table, found {found}"));
        }
        ValidationError::EmptyInput => {
            lines.push("## Input".to_string());
            lines.push("- table has no rows or no columns".to_string());
        }
        ValidationError::SchemaViolation(report) => {
            lines.push("## Schema failures".to_string());
            lines.push("| kind | column | detail |".to_string());
            lines.push("| --- | --- | --- |".to_string());
            for failure in &report.failures {
                lines.push(format!(
                    "| {} | {} | {} |",
                    failure.kind.as_str(),
                    failure.column.as_deref().unwrap_or("-"),
                    failure.message.replace('|', "\\|")
                ));
            }
        }
        ValidationError::TargetDistributionMismatch { train, test, tolerance } => {
            lines.push("## Target parity".to_string());
            lines.push(format!(
                "- negative class ratio: train={train:.4}, test={test:.4}, |diff|={:.4} > {tolerance}",
                (train - test).abs()
            ));
        }
        ValidationError::AnomalousCorrelation { pairs } => {
            lines.push("## Correlations".to_string());
            lines.push(format!(
                "| left | right | r (|r| >= {}) |",
                config.correlation_threshold
            ));
            lines.push("| --- | --- | --- |".to_string());
            for pair in pairs {
                lines.push(format!(
                    "| {} | {} | {} |",
                    pair.left,
                    pair.right,
                    pair.coefficient_label()
                ));
            }
        }
    }
    lines.push(String::new());
}

fn recommendations(outcome: &Result<ValidationSummary, ValidationError>) -> Vec<String> {
    let mut lines = Vec::new();
    match outcome {
        Ok(_) => {
            lines.push(
                "- no violations detected; compare fingerprints across runs for drift.".to_string(),
            );
        }
        Err(ValidationError::InvalidInputType { .. }) | Err(ValidationError::EmptyInput) => {
            lines.push("- check that the source file parsed into a non-empty table.".to_string());
        }
        Err(ValidationError::SchemaViolation(report)) => {
            if report.has(FailureKind::MissingColumn) {
                lines.push("- re-export the dataset with every declared column.".to_string());
            }
            if report.has(FailureKind::WrongType) || report.has(FailureKind::OutOfDomain) {
                lines.push(
                    "- inspect the source for mis-encoded or out-of-range values.".to_string(),
                );
            }
            if report.has(FailureKind::ExcessNulls) || report.has(FailureKind::NullValues) {
                lines.push("- impute or drop incomplete records before validation.".to_string());
            }
            if report.has(FailureKind::DuplicateRows) || report.has(FailureKind::EmptyRows) {
                lines.push("- deduplicate the dataset and remove blank records.".to_string());
            }
            if report.has(FailureKind::UnexpectedColumn) {
                lines.push("- declare the extra columns or disable strict_columns.".to_string());
            }
        }
        Err(ValidationError::TargetDistributionMismatch { .. }) => {
            lines.push(
                "- collect more data or revisit the label balance before splitting.".to_string(),
            );
        }
        Err(ValidationError::AnomalousCorrelation { .. }) => {
            lines.push(
                "- drop one column of each correlated pair or verify the source joins.".to_string(),
            );
        }
    }
    lines
}
