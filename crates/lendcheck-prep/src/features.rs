//! Row cleaning and derived loan features.

use lendcheck_core::{Column, Table, Value};
use serde::{Deserialize, Serialize};

use crate::errors::{PrepError, Result};

pub const LOAN_CATEGORY_COLUMN: &str = "loan_categories";
pub const RISK_CATEGORY_COLUMN: &str = "risk_category";
pub const LOAN_INCOME_RATIO_COLUMN: &str = "loan_income_ratio";
pub const ANNUAL_INCOME_COLUMN: &str = "annual.inc";

const UNKNOWN: &str = "Unknown";

/// Lower FICO bound of each loan category, highest first.
const LOAN_BANDS: [(f64, &str); 4] = [
    (720.0, "Super-prime"),
    (660.0, "Prime"),
    (620.0, "Near-prime"),
    (580.0, "Subprime"),
];
const LOAN_FLOOR: &str = "Deep subprime";

const RISK_BANDS: [(f64, &str); 2] = [(720.0, "Low Risk"), (650.0, "Medium Risk")];
const RISK_FLOOR: &str = "High Risk";

/// How [`handle_missing_values`] treats missing cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingStrategy {
    #[default]
    Mean,
    Median,
    Drop,
}

impl MissingStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissingStrategy::Mean => "mean",
            MissingStrategy::Median => "median",
            MissingStrategy::Drop => "drop",
        }
    }
}

/// Drop or fill missing cells in `columns` (every column when `None`).
///
/// `Drop` removes rows with a missing value in any selected column.
/// `Mean` and `Median` fill numeric columns only; text columns and columns
/// without a single number are left untouched.
pub fn handle_missing_values(
    table: &Table,
    strategy: MissingStrategy,
    columns: Option<&[&str]>,
) -> Result<Table> {
    let names: Vec<String> = match columns {
        Some(names) => names.iter().map(|name| name.to_string()).collect(),
        None => table
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect(),
    };
    for name in &names {
        if table.column(name).is_none() {
            return Err(PrepError::MissingColumn(name.clone()));
        }
    }

    let cleaned = match strategy {
        MissingStrategy::Drop => table.filter_rows(|pos| {
            names.iter().all(|name| {
                table
                    .value(name, pos)
                    .is_some_and(|value| !value.is_missing())
            })
        }),
        MissingStrategy::Mean | MissingStrategy::Median => {
            let mut filled = table.clone();
            for name in &names {
                if let Some(column) = filled.column_mut(name) {
                    fill_column(column, strategy);
                }
            }
            filled
        }
    };

    tracing::debug!(
        event = "missing_values_handled",
        strategy = strategy.as_str(),
        rows_before = table.n_rows(),
        rows_after = cleaned.n_rows()
    );
    Ok(cleaned)
}

fn fill_column(column: &mut Column, strategy: MissingStrategy) {
    if !column.is_numeric() {
        return;
    }
    let mut present = column.numbers().flatten().collect::<Vec<_>>();
    let fill = match strategy {
        MissingStrategy::Mean => mean(&present),
        MissingStrategy::Median => median(&mut present),
        MissingStrategy::Drop => None,
    };
    let Some(fill) = fill else {
        return;
    };

    let integral = column
        .values
        .iter()
        .all(|value| value.is_missing() || matches!(value, Value::Int(_)));
    let replacement = if integral && fill.fract() == 0.0 {
        Value::Int(fill as i64)
    } else {
        Value::Float(fill)
    };
    for value in column.values.iter_mut() {
        if value.is_missing() {
            *value = replacement.clone();
        }
    }
}

/// Add `loan_categories`, banding `fico_column` into lending tiers.
pub fn add_loan_categories(table: &mut Table, fico_column: &str) -> Result<()> {
    add_band_column(table, fico_column, LOAN_CATEGORY_COLUMN, &LOAN_BANDS, LOAN_FLOOR)
}

/// Add `risk_category`, banding `fico_column` into risk levels.
pub fn add_risk_categories(table: &mut Table, fico_column: &str) -> Result<()> {
    add_band_column(table, fico_column, RISK_CATEGORY_COLUMN, &RISK_BANDS, RISK_FLOOR)
}

fn add_band_column(
    table: &mut Table,
    source: &str,
    target: &str,
    bands: &[(f64, &str)],
    floor: &str,
) -> Result<()> {
    let column = table
        .column(source)
        .ok_or_else(|| PrepError::MissingColumn(source.to_string()))?;
    let labels = column
        .numbers()
        .map(|score| Value::from(band(score, bands, floor)))
        .collect();
    table.with_column(Column::new(target, labels))?;
    Ok(())
}

fn band<'a>(score: Option<f64>, bands: &[(f64, &'a str)], floor: &'a str) -> &'a str {
    let Some(score) = score else {
        return UNKNOWN;
    };
    bands
        .iter()
        .find(|(min, _)| score >= *min)
        .map(|(_, label)| *label)
        .unwrap_or(floor)
}

/// Add `loan_income_ratio = installment * 12 / income`.
///
/// The ratio is missing when either input is missing or the income is zero.
pub fn add_loan_income_ratio(
    table: &mut Table,
    installment_column: &str,
    income_column: &str,
) -> Result<()> {
    let installment = table
        .column(installment_column)
        .ok_or_else(|| PrepError::MissingColumn(installment_column.to_string()))?;
    let income = table
        .column(income_column)
        .ok_or_else(|| PrepError::MissingColumn(income_column.to_string()))?;

    let ratios = installment
        .numbers()
        .zip(income.numbers())
        .map(|(installment, income)| match (installment, income) {
            (Some(installment), Some(income)) if income != 0.0 => {
                Value::Float(installment * 12.0 / income)
            }
            _ => Value::Null,
        })
        .collect();
    table.with_column(Column::new(LOAN_INCOME_RATIO_COLUMN, ratios))?;
    Ok(())
}

/// Add `annual.inc`, the exponential of the natural-log income column.
pub fn add_annual_income(table: &mut Table, log_income_column: &str) -> Result<()> {
    let column = table
        .column(log_income_column)
        .ok_or_else(|| PrepError::MissingColumn(log_income_column.to_string()))?;
    let incomes = column
        .numbers()
        .map(|log_income| Value::from(log_income.map(f64::exp)))
        .collect();
    table.with_column(Column::new(ANNUAL_INCOME_COLUMN, incomes))?;
    Ok(())
}

pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

pub(crate) fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}
