//! Cleaning, feature enrichment and model-input preprocessing for loan tables.

pub mod errors;
pub mod features;
pub mod preprocess;

pub use errors::{PrepError, Result};
pub use features::{
    ANNUAL_INCOME_COLUMN, LOAN_CATEGORY_COLUMN, LOAN_INCOME_RATIO_COLUMN, MissingStrategy,
    RISK_CATEGORY_COLUMN, add_annual_income, add_loan_categories, add_loan_income_ratio,
    add_risk_categories, handle_missing_values,
};
pub use preprocess::{
    CategoricalEncoder, NumericScaler, Preprocessor, default_categorical_features,
    default_numeric_features,
};
