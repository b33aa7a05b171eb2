use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Label column of the loan dataset.
pub const TARGET_COLUMN: &str = "not.fully.paid";

/// Allowed values of the `purpose` column.
pub const PURPOSE_CATEGORIES: [&str; 7] = [
    "debt_consolidation",
    "all_other",
    "credit_card",
    "home_improvement",
    "small_business",
    "major_purchase",
    "educational",
];

/// Declared storage type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Integer,
    Float,
    String,
}

impl ColumnType {
    /// Whether a non-missing value is stored in (or coercible to) this type.
    ///
    /// Missing cells are accepted by every type; nullability is checked separately.
    pub fn accepts(&self, value: &Value) -> bool {
        if value.is_missing() {
            return true;
        }
        match self {
            ColumnType::Integer => value.as_i64().is_some(),
            ColumnType::Float => value.is_numeric(),
            ColumnType::String => matches!(value, Value::Text(_)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::String => "string",
        }
    }
}

/// Allowed values for a column.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Domain {
    #[default]
    Any,
    /// Enumerated integer labels.
    IntegerSet { values: Vec<i64> },
    /// Enumerated string categories.
    TextSet { values: Vec<String> },
    /// Inclusive numeric bounds; either side may be open.
    Range {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
}

impl Domain {
    pub fn at_least(min: f64) -> Self {
        Domain::Range {
            min: Some(min),
            max: None,
        }
    }

    pub fn between(min: f64, max: f64) -> Self {
        Domain::Range {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn integers(values: &[i64]) -> Self {
        Domain::IntegerSet {
            values: values.to_vec(),
        }
    }

    pub fn categories(values: &[&str]) -> Self {
        Domain::TextSet {
            values: values.iter().map(|value| value.to_string()).collect(),
        }
    }

    /// Membership test for a non-missing value.
    pub fn contains(&self, value: &Value) -> bool {
        match self {
            Domain::Any => true,
            Domain::IntegerSet { values } => value
                .as_i64()
                .map(|v| values.contains(&v))
                .unwrap_or(false),
            Domain::TextSet { values } => value
                .as_str()
                .map(|v| values.iter().any(|allowed| allowed == v))
                .unwrap_or(false),
            Domain::Range { min, max } => match value.as_f64() {
                Some(v) => min.is_none_or(|min| v >= min) && max.is_none_or(|max| v <= max),
                None => false,
            },
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Domain::Any => "any value".to_string(),
            Domain::IntegerSet { values } => format!(
                "one of {{{}}}",
                values
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Domain::TextSet { values } => format!("one of {{{}}}", values.join(", ")),
            Domain::Range {
                min: Some(min),
                max: Some(max),
            } => format!("in [{min}, {max}]"),
            Domain::Range {
                min: Some(min),
                max: None,
            } => format!(">= {min}"),
            Domain::Range {
                min: None,
                max: Some(max),
            } => format!("<= {max}"),
            Domain::Range {
                min: None,
                max: None,
            } => "any number".to_string(),
        }
    }
}

/// Contract for one declared column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ColumnSpec {
    pub name: String,
    pub column_type: ColumnType,
    pub nullable: bool,
    #[serde(default)]
    pub domain: Domain,
}

impl ColumnSpec {
    pub fn new(name: &str, column_type: ColumnType, nullable: bool, domain: Domain) -> Self {
        Self {
            name: name.to_string(),
            column_type,
            nullable,
            domain,
        }
    }
}

/// Column contracts of the raw loan dataset, in file order.
pub fn loan_columns() -> Vec<ColumnSpec> {
    use ColumnType::{Float, Integer, String};

    vec![
        ColumnSpec::new("credit.policy", Integer, true, Domain::integers(&[0, 1])),
        ColumnSpec::new(
            "purpose",
            String,
            true,
            Domain::categories(&PURPOSE_CATEGORIES),
        ),
        ColumnSpec::new("int.rate", Float, true, Domain::between(0.0, 1.0)),
        ColumnSpec::new("installment", Float, true, Domain::at_least(0.0)),
        ColumnSpec::new("log.annual.inc", Float, true, Domain::at_least(1.0)),
        ColumnSpec::new("dti", Float, true, Domain::at_least(0.0)),
        ColumnSpec::new("fico", Integer, true, Domain::between(300.0, 900.0)),
        ColumnSpec::new("days.with.cr.line", Float, true, Domain::at_least(0.0)),
        ColumnSpec::new("revol.bal", Integer, true, Domain::at_least(0.0)),
        ColumnSpec::new("revol.util", Float, true, Domain::at_least(0.0)),
        ColumnSpec::new("inq.last.6mths", Integer, true, Domain::at_least(0.0)),
        ColumnSpec::new("delinq.2yrs", Integer, true, Domain::at_least(0.0)),
        ColumnSpec::new("pub.rec", Integer, true, Domain::at_least(0.0)),
        ColumnSpec::new(TARGET_COLUMN, Integer, false, Domain::integers(&[0, 1])),
    ]
}
