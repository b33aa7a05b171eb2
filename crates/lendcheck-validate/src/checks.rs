//! Structural checks: per-column contracts and cross-row invariants.
//!
//! Both passes write into the same [`SchemaReport`] so a single call
//! surfaces every structural problem at once.

use std::collections::HashMap;

use lendcheck_core::{Column, ColumnSpec, Table, ValidationConfig, Value};

use crate::errors::{FailureKind, SchemaFailure, SchemaReport};

/// Rows listed in a failure message before truncating.
const MAX_LISTED_ROWS: usize = 10;

/// Check every declared column, plus undeclared ones when `strict_columns` is set.
pub fn check_columns(table: &Table, config: &ValidationConfig, report: &mut SchemaReport) {
    for spec in &config.columns {
        match table.column(&spec.name) {
            Some(column) => {
                check_column(spec, column, table.index(), config.max_null_ratio, report)
            }
            None => report.push(SchemaFailure::column(
                FailureKind::MissingColumn,
                &spec.name,
                "column not found in dataset",
            )),
        }
    }

    if config.strict_columns {
        for column in table.columns() {
            if config.column(&column.name).is_none() {
                report.push(SchemaFailure::column(
                    FailureKind::UnexpectedColumn,
                    &column.name,
                    "column is not declared in the schema",
                ));
            }
        }
    }
}

fn check_column(
    spec: &ColumnSpec,
    column: &Column,
    labels: &[usize],
    max_null_ratio: f64,
    report: &mut SchemaReport,
) {
    let mistyped = positions(column, |value| !spec.column_type.accepts(value));
    if let Some(first) = mistyped.first() {
        let sample = &column.values[*first];
        report.push(
            SchemaFailure::column(
                FailureKind::WrongType,
                &spec.name,
                format!(
                    "expected {} values, found {} incompatible value(s) (first: {} '{}')",
                    spec.column_type.as_str(),
                    mistyped.len(),
                    sample.type_name(),
                    sample
                ),
            )
            .with_rows(to_labels(&mistyped, labels)),
        );
    }

    let nulls = column.null_count();
    if !column.is_empty() {
        let ratio = nulls as f64 / column.len() as f64;
        if ratio > max_null_ratio {
            report.push(SchemaFailure::column(
                FailureKind::ExcessNulls,
                &spec.name,
                format!("null ratio {ratio:.3} exceeds {max_null_ratio} ({nulls} null value(s))"),
            ));
        }
    }

    if !spec.nullable && nulls > 0 {
        let missing = positions(column, Value::is_missing);
        report.push(
            SchemaFailure::column(
                FailureKind::NullValues,
                &spec.name,
                format!("{nulls} null value(s) in non-nullable column"),
            )
            .with_rows(to_labels(&missing, labels)),
        );
    }

    // Domain checks are meaningless on values of the wrong type.
    if !mistyped.is_empty() {
        return;
    }

    let outside = positions(column, |value| {
        !value.is_missing() && !spec.domain.contains(value)
    });
    if let Some(first) = outside.first() {
        report.push(
            SchemaFailure::column(
                FailureKind::OutOfDomain,
                &spec.name,
                format!(
                    "{} value(s) not {} (e.g. {})",
                    outside.len(),
                    spec.domain.describe(),
                    column.values[*first]
                ),
            )
            .with_rows(to_labels(&outside, labels)),
        );
    }
}

/// Flag repeated rows (every occurrence after the first) and all-missing rows.
pub fn check_rows(table: &Table, report: &mut SchemaReport) {
    let labels = table.index();
    let mut first_seen: HashMap<String, usize> = HashMap::with_capacity(table.n_rows());
    let mut duplicates = Vec::new();
    let mut empty = Vec::new();

    for row in 0..table.n_rows() {
        let values = table.row(row);
        if !values.is_empty() && values.iter().all(|value| value.is_missing()) {
            empty.push(labels[row]);
        }

        let key = row_key(&values);
        if first_seen.contains_key(&key) {
            duplicates.push(labels[row]);
        } else {
            first_seen.insert(key, row);
        }
    }

    if !duplicates.is_empty() {
        report.push(SchemaFailure::rows(
            FailureKind::DuplicateRows,
            format!(
                "{} duplicate row(s) found (rows {})",
                duplicates.len(),
                list_rows(&duplicates)
            ),
            duplicates,
        ));
    }

    if !empty.is_empty() {
        report.push(SchemaFailure::rows(
            FailureKind::EmptyRows,
            format!(
                "{} empty row(s) found (rows {})",
                empty.len(),
                list_rows(&empty)
            ),
            empty,
        ));
    }
}

fn positions<F>(column: &Column, predicate: F) -> Vec<usize>
where
    F: Fn(&Value) -> bool,
{
    column
        .values
        .iter()
        .enumerate()
        .filter(|(_, value)| predicate(*value))
        .map(|(pos, _)| pos)
        .collect()
}

fn to_labels(positions: &[usize], labels: &[usize]) -> Vec<usize> {
    positions
        .iter()
        .filter_map(|pos| labels.get(*pos).copied())
        .collect()
}

fn row_key(values: &[&Value]) -> String {
    values
        .iter()
        .map(|value| value.key())
        .collect::<Vec<_>>()
        .join("|")
}

fn list_rows(rows: &[usize]) -> String {
    let mut listed = rows
        .iter()
        .take(MAX_LISTED_ROWS)
        .map(|row| row.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    if rows.len() > MAX_LISTED_ROWS {
        listed.push_str(", ...");
    }
    listed
}
