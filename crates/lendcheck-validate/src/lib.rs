//! Dataset validation for the loan-default pipeline.
//!
//! [`validate`] runs, in order: input precondition checks, per-column
//! schema checks, duplicate/empty row checks, a seeded train/holdout split,
//! a target-distribution parity check across the split, and a pairwise
//! correlation anomaly check on the training partition.

pub mod checks;
pub mod engine;
pub mod errors;
pub mod report;
pub mod split;
pub mod stats;

pub use engine::{ValidationSummary, Validator, validate};
pub use errors::{CorrelatedPair, FailureKind, SchemaFailure, SchemaReport, ValidationError};
pub use report::render_report;
pub use split::{TrainTestSplit, split_positions, train_test_split};
pub use stats::{CorrelationMatrix, class_ratio, pearson};
