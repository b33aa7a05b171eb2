use std::path::Path;

use schemars::JsonSchema;
use schemars::schema::RootSchema;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::schema::{ColumnSpec, TARGET_COLUMN, loan_columns};

/// Seed shared by the validator and the split stage.
pub const DEFAULT_SPLIT_SEED: u64 = 522;

/// Train/holdout split settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SplitConfig {
    /// Fraction of rows assigned to the holdout set.
    pub test_ratio: f64,
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_ratio: 0.2,
            seed: DEFAULT_SPLIT_SEED,
        }
    }
}

/// Column contracts and statistical thresholds for dataset validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ValidationConfig {
    pub columns: Vec<ColumnSpec>,
    /// Label column checked for split parity.
    pub target: String,
    /// Label value whose proportion is compared across splits.
    pub negative_class: i64,
    pub max_null_ratio: f64,
    /// Report columns that are not declared in `columns`.
    pub strict_columns: bool,
    pub split: SplitConfig,
    pub target_tolerance: f64,
    /// Correlation magnitude at or above which a pair is anomalous.
    pub correlation_threshold: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            columns: loan_columns(),
            target: TARGET_COLUMN.to_string(),
            negative_class: 0,
            max_null_ratio: 0.05,
            strict_columns: false,
            split: SplitConfig::default(),
            target_tolerance: 0.05,
            correlation_threshold: 0.9,
        }
    }
}

impl ValidationConfig {
    /// Parse a TOML document; omitted fields keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ValidationConfig = toml::from_str(content)?;
        config.check()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|col| col.name == name)
    }

    /// JSON Schema for config documents.
    pub fn json_schema() -> RootSchema {
        schemars::schema_for!(ValidationConfig)
    }

    /// Reject thresholds that would make validation meaningless.
    pub fn check(&self) -> Result<()> {
        if !(self.split.test_ratio > 0.0 && self.split.test_ratio < 1.0) {
            return Err(CoreError::InvalidConfig(format!(
                "split.test_ratio must be in (0, 1), got {}",
                self.split.test_ratio
            )));
        }
        if !(0.0..=1.0).contains(&self.max_null_ratio) {
            return Err(CoreError::InvalidConfig(format!(
                "max_null_ratio must be in [0, 1], got {}",
                self.max_null_ratio
            )));
        }
        if !(0.0..=1.0).contains(&self.correlation_threshold) {
            return Err(CoreError::InvalidConfig(format!(
                "correlation_threshold must be in [0, 1], got {}",
                self.correlation_threshold
            )));
        }
        if self.target_tolerance < 0.0 {
            return Err(CoreError::InvalidConfig(format!(
                "target_tolerance must be non-negative, got {}",
                self.target_tolerance
            )));
        }
        if self.column(&self.target).is_none() {
            return Err(CoreError::InvalidConfig(format!(
                "target column '{}' is not declared",
                self.target
            )));
        }
        Ok(())
    }
}
