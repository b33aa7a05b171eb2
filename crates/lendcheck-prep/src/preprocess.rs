//! Fitted column transforms that turn a loan table into model inputs.
//!
//! Numeric features are median-imputed then standardized; categorical
//! features are mode-imputed then one-hot encoded. The fitted state is plain
//! data and persists as JSON so later stages reuse exactly the same
//! transformation.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use lendcheck_core::{Column, ColumnType, TARGET_COLUMN, Table, Value, loan_columns};
use serde::{Deserialize, Serialize};

use crate::errors::{PrepError, Result};
use crate::features::{mean, median};

/// Numeric loan columns fed to the model: every non-text column but the target.
pub fn default_numeric_features() -> Vec<String> {
    loan_columns()
        .into_iter()
        .filter(|spec| spec.name != TARGET_COLUMN && spec.column_type != ColumnType::String)
        .map(|spec| spec.name)
        .collect()
}

pub fn default_categorical_features() -> Vec<String> {
    loan_columns()
        .into_iter()
        .filter(|spec| spec.column_type == ColumnType::String)
        .map(|spec| spec.name)
        .collect()
}

/// Median imputation followed by standard scaling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericScaler {
    pub column: String,
    pub median: f64,
    pub mean: f64,
    /// Population standard deviation of the imputed column; 1 when it is 0.
    pub scale: f64,
}

impl NumericScaler {
    fn fit(column: &Column) -> Result<Self> {
        let raw = numeric_values(column)?;
        let mut present = raw.iter().flatten().copied().collect::<Vec<_>>();
        let median =
            median(&mut present).ok_or_else(|| PrepError::NoValues(column.name.clone()))?;

        let imputed = raw
            .iter()
            .map(|value| value.unwrap_or(median))
            .collect::<Vec<_>>();
        let mean = mean(&imputed).unwrap_or(median);
        let variance =
            imputed.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / imputed.len() as f64;
        let std = variance.sqrt();

        Ok(Self {
            column: column.name.clone(),
            median,
            mean,
            scale: if std == 0.0 { 1.0 } else { std },
        })
    }

    pub fn output_name(&self) -> String {
        format!("num__{}", self.column)
    }

    fn transform(&self, column: &Column) -> Result<Column> {
        let values = numeric_values(column)?
            .into_iter()
            .map(|value| Value::Float((value.unwrap_or(self.median) - self.mean) / self.scale))
            .collect();
        Ok(Column::new(self.output_name(), values))
    }
}

/// Most-frequent imputation followed by one-hot encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalEncoder {
    pub column: String,
    pub fill: String,
    /// Sorted categories seen during fitting.
    pub categories: Vec<String>,
}

impl CategoricalEncoder {
    fn fit(column: &Column) -> Result<Self> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for label in column.values.iter().filter_map(category) {
            *counts.entry(label).or_default() += 1;
        }

        // Ties resolve to the smallest label.
        let mut fill: Option<(&String, usize)> = None;
        for (label, count) in &counts {
            if fill.is_none_or(|(_, best)| *count > best) {
                fill = Some((label, *count));
            }
        }
        let fill = fill
            .map(|(label, _)| label.clone())
            .ok_or_else(|| PrepError::NoValues(column.name.clone()))?;

        Ok(Self {
            column: column.name.clone(),
            fill,
            categories: counts.into_keys().collect(),
        })
    }

    pub fn output_names(&self) -> Vec<String> {
        self.categories
            .iter()
            .map(|label| format!("cat__{}_{}", self.column, label))
            .collect()
    }

    /// Categories unseen during fitting encode as all zeros.
    fn transform(&self, column: &Column) -> Vec<Column> {
        let labels = column
            .values
            .iter()
            .map(|value| category(value).unwrap_or_else(|| self.fill.clone()))
            .collect::<Vec<_>>();

        self.categories
            .iter()
            .zip(self.output_names())
            .map(|(category, name)| {
                let values = labels
                    .iter()
                    .map(|label| Value::Float(if label == category { 1.0 } else { 0.0 }))
                    .collect();
                Column::new(name, values)
            })
            .collect()
    }
}

/// Fitted numeric and categorical transforms, applied in that order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preprocessor {
    numeric: Vec<NumericScaler>,
    categorical: Vec<CategoricalEncoder>,
}

impl Preprocessor {
    /// Learn imputation, scaling and encoding parameters from `table`.
    pub fn fit<S: AsRef<str>>(table: &Table, numeric: &[S], categorical: &[S]) -> Result<Self> {
        if numeric.is_empty() && categorical.is_empty() {
            return Err(PrepError::NoFeatures);
        }

        let numeric = numeric
            .iter()
            .map(|name| NumericScaler::fit(require(table, name.as_ref())?))
            .collect::<Result<Vec<_>>>()?;
        let categorical = categorical
            .iter()
            .map(|name| CategoricalEncoder::fit(require(table, name.as_ref())?))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            event = "preprocessor_fitted",
            rows = table.n_rows(),
            numeric = numeric.len(),
            categorical = categorical.len()
        );
        Ok(Self {
            numeric,
            categorical,
        })
    }

    /// Fit with the loan dataset's default feature lists.
    pub fn fit_default(table: &Table) -> Result<Self> {
        Self::fit(
            table,
            &default_numeric_features(),
            &default_categorical_features(),
        )
    }

    pub fn numeric(&self) -> &[NumericScaler] {
        &self.numeric
    }

    pub fn categorical(&self) -> &[CategoricalEncoder] {
        &self.categorical
    }

    /// Output column names, in transform order.
    pub fn feature_names(&self) -> Vec<String> {
        let mut names = self
            .numeric
            .iter()
            .map(NumericScaler::output_name)
            .collect::<Vec<_>>();
        for encoder in &self.categorical {
            names.extend(encoder.output_names());
        }
        names
    }

    /// Apply the fitted transforms; columns not selected at fit time are dropped.
    pub fn transform(&self, table: &Table) -> Result<Table> {
        let mut columns = Vec::new();
        for scaler in &self.numeric {
            columns.push(scaler.transform(require(table, &scaler.column)?)?);
        }
        for encoder in &self.categorical {
            columns.extend(encoder.transform(require(table, &encoder.column)?));
        }

        let transformed = Table::new(columns)?.with_index(table.index().to_vec())?;
        Ok(transformed)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let payload = serde_json::to_vec_pretty(self)?;
        fs::write(path, payload)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let payload = fs::read(path)?;
        Ok(serde_json::from_slice(&payload)?)
    }
}

fn require<'a>(table: &'a Table, name: &str) -> Result<&'a Column> {
    table
        .column(name)
        .ok_or_else(|| PrepError::MissingColumn(name.to_string()))
}

fn numeric_values(column: &Column) -> Result<Vec<Option<f64>>> {
    if column.values.iter().any(|value| matches!(value, Value::Text(_))) {
        return Err(PrepError::NonNumeric(column.name.clone()));
    }
    Ok(column.numbers().collect())
}

fn category(value: &Value) -> Option<String> {
    match value {
        Value::Text(text) => Some(text.clone()),
        other if other.is_missing() => None,
        other => Some(other.to_csv()),
    }
}
