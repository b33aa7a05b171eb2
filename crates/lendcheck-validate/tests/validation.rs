mod common;

use common::{default_fixture, loan_fixture, overwrite_head, stringify_column};
use lendcheck_core::{Column, SplitConfig, TARGET_COLUMN, Table, ValidationConfig, Value};
use lendcheck_validate::{FailureKind, ValidationError, Validator, validate};

fn schema_failure(result: Result<(), ValidationError>) -> lendcheck_validate::SchemaReport {
    match result {
        Err(ValidationError::SchemaViolation(report)) => report,
        other => panic!("expected schema violation, got {other:?}"),
    }
}

fn small_fixture() -> Table {
    loan_fixture(200, 7)
}

#[test]
fn valid_dataset_passes() {
    let table = default_fixture();
    let summary = Validator::default().run(&table).expect("validation passes");

    assert_eq!(summary.rows, table.n_rows());
    assert_eq!(summary.columns, 14);
    assert_eq!(summary.train_rows + summary.test_rows, table.n_rows());
    assert!(summary.test_rows >= 2000);
    assert_eq!(summary.numeric_columns, 13);
    assert_eq!(summary.correlation_pairs_checked, 78);
    assert!(summary.max_abs_correlation.expect("defined") < 0.9);
}

#[test]
fn validation_is_repeatable() {
    let table = default_fixture();
    let config = ValidationConfig::default();
    assert_eq!(validate(&table, &config), Ok(()));
    assert_eq!(validate(&table, &config), Ok(()));

    let validator = Validator::new(config);
    assert_eq!(validator.run(&table), validator.run(&table));
}

#[test]
fn split_seed_is_configurable() {
    let table = default_fixture();
    let config = ValidationConfig {
        split: SplitConfig {
            seed: 7,
            ..SplitConfig::default()
        },
        ..ValidationConfig::default()
    };

    let summary = Validator::new(config).run(&table).expect("validation passes");
    assert_eq!(summary.split_seed, 7);
}

#[test]
fn non_table_inputs_are_rejected() {
    let config = ValidationConfig::default();

    let scalar = Value::Int(3);
    assert_eq!(
        validate(&scalar, &config),
        Err(ValidationError::InvalidInputType { found: "scalar" })
    );

    let array = vec![vec![Value::Int(1), Value::Int(2)]];
    assert_eq!(
        validate(&array, &config),
        Err(ValidationError::InvalidInputType { found: "array" })
    );
    assert_eq!(
        validate(array.as_slice(), &config),
        Err(ValidationError::InvalidInputType { found: "array" })
    );
}

#[test]
fn empty_tables_are_rejected() {
    let config = ValidationConfig::default();

    let no_columns = Table::new(vec![]).expect("table");
    assert_eq!(validate(&no_columns, &config), Err(ValidationError::EmptyInput));

    let no_rows = Table::new(vec![Column::new(TARGET_COLUMN, vec![])]).expect("table");
    assert_eq!(validate(&no_rows, &config), Err(ValidationError::EmptyInput));
}

#[test]
fn every_missing_column_is_named() {
    let config = ValidationConfig::default();
    for spec in &config.columns {
        let mut table = small_fixture();
        table.drop_column(&spec.name).expect("column present");

        let report = schema_failure(validate(&table, &config));
        assert!(
            report
                .for_column(&spec.name)
                .any(|failure| failure.kind == FailureKind::MissingColumn),
            "missing {} not reported: {report}",
            spec.name
        );
    }
}

#[test]
fn unknown_purpose_is_out_of_domain() {
    let mut table = small_fixture();
    overwrite_head(&mut table, "purpose", 1, Value::from("others"));

    let report = schema_failure(validate(&table, &ValidationConfig::default()));
    let failure = report
        .for_column("purpose")
        .next()
        .expect("purpose failure");
    assert_eq!(failure.kind, FailureKind::OutOfDomain);
    assert_eq!(failure.rows, vec![0]);
}

#[test]
fn out_of_range_values_are_rejected() {
    let cases = [
        ("fico", Value::Int(1000)),
        ("fico", Value::Int(200)),
        ("int.rate", Value::Float(1.5)),
        ("installment", Value::Float(-3.0)),
        ("log.annual.inc", Value::Float(0.5)),
        ("revol.bal", Value::Int(-1)),
        ("credit.policy", Value::Int(2)),
        (TARGET_COLUMN, Value::Int(3)),
    ];

    for (column, value) in cases {
        let mut table = small_fixture();
        overwrite_head(&mut table, column, 3, value.clone());

        let report = schema_failure(validate(&table, &ValidationConfig::default()));
        let failure = report
            .for_column(column)
            .find(|failure| failure.kind == FailureKind::OutOfDomain)
            .unwrap_or_else(|| panic!("{column}={value} not flagged: {report}"));
        assert_eq!(failure.rows, vec![0, 1, 2]);
    }
}

#[test]
fn wrong_dtype_is_reported() {
    let mut table = small_fixture();
    stringify_column(&mut table, "int.rate");

    let report = schema_failure(validate(&table, &ValidationConfig::default()));
    let kinds = report
        .for_column("int.rate")
        .map(|failure| failure.kind)
        .collect::<Vec<_>>();
    assert_eq!(kinds, vec![FailureKind::WrongType]);

    let mut table = small_fixture();
    overwrite_head(&mut table, "fico", 1, Value::Float(700.5));
    let report = schema_failure(validate(&table, &ValidationConfig::default()));
    assert!(report.has(FailureKind::WrongType));
}

#[test]
fn duplicated_rows_are_reported() {
    let table = small_fixture();
    let mut positions = (0..table.n_rows()).collect::<Vec<_>>();
    positions.push(4);
    let table = table.take_rows(&positions);

    let report = schema_failure(validate(&table, &ValidationConfig::default()));
    let failure = report
        .failures
        .iter()
        .find(|failure| failure.kind == FailureKind::DuplicateRows)
        .expect("duplicate failure");
    assert_eq!(failure.rows, vec![4]);
    assert!(failure.column.is_none());
}

#[test]
fn blank_rows_are_reported() {
    let mut table = small_fixture();
    let names = table
        .column_names()
        .into_iter()
        .map(str::to_string)
        .collect::<Vec<_>>();
    for name in &names {
        let blank = if name == "int.rate" {
            Value::Float(f64::NAN)
        } else {
            Value::Null
        };
        table.set_value(name, 5, blank).expect("blank cell");
    }

    let report = schema_failure(validate(&table, &ValidationConfig::default()));
    let failure = report
        .failures
        .iter()
        .find(|failure| failure.kind == FailureKind::EmptyRows)
        .expect("empty row failure");
    assert_eq!(failure.rows, vec![5]);
    assert!(
        report
            .for_column(TARGET_COLUMN)
            .any(|failure| failure.kind == FailureKind::NullValues)
    );
}

#[test]
fn excess_nulls_are_reported() {
    let mut table = small_fixture();
    overwrite_head(&mut table, "dti", 20, Value::Null);

    let report = schema_failure(validate(&table, &ValidationConfig::default()));
    let kinds = report
        .for_column("dti")
        .map(|failure| failure.kind)
        .collect::<Vec<_>>();
    assert_eq!(kinds, vec![FailureKind::ExcessNulls]);
}

#[test]
fn null_ratio_at_the_limit_is_accepted() {
    let mut table = small_fixture();
    overwrite_head(&mut table, "dti", 10, Value::Null);
    if let Err(ValidationError::SchemaViolation(report)) =
        validate(&table, &ValidationConfig::default())
    {
        assert_eq!(report.for_column("dti").count(), 0, "{report:?}");
    }

    overwrite_head(&mut table, "dti", 11, Value::Null);
    let report = schema_failure(validate(&table, &ValidationConfig::default()));
    assert!(report.has(FailureKind::ExcessNulls));

    let mut table = default_fixture();
    overwrite_head(&mut table, "dti", 500, Value::Null);
    assert_eq!(validate(&table, &ValidationConfig::default()), Ok(()));
}

#[test]
fn failing_validation_is_repeatable() {
    let table = small_fixture();
    let mut positions = (0..table.n_rows()).collect::<Vec<_>>();
    positions.push(4);
    let mut table = table.take_rows(&positions);
    table.drop_column("fico");

    let config = ValidationConfig::default();
    let first = validate(&table, &config);
    assert!(matches!(first, Err(ValidationError::SchemaViolation(_))));
    assert_eq!(first, validate(&table, &config));

    let report = schema_failure(first);
    assert!(report.has(FailureKind::MissingColumn));
    assert!(report.has(FailureKind::DuplicateRows));
}

#[test]
fn extra_columns_fail_only_in_strict_mode() {
    let mut table = default_fixture();
    let rows = table.n_rows();
    table
        .with_column(Column::new("note", vec![Value::from("ok"); rows]))
        .expect("add column");

    assert_eq!(validate(&table, &ValidationConfig::default()), Ok(()));

    let strict = ValidationConfig {
        strict_columns: true,
        ..ValidationConfig::default()
    };
    let report = schema_failure(validate(&table, &strict));
    assert_eq!(report.columns(), vec!["note"]);
    assert!(report.has(FailureKind::UnexpectedColumn));
}

#[test]
fn skewed_target_fails_parity() {
    let mut table = loan_fixture(10, 99);
    overwrite_head(&mut table, TARGET_COLUMN, 10, Value::Int(1));
    table
        .set_value(TARGET_COLUMN, 6, Value::Int(0))
        .expect("set label");

    match validate(&table, &ValidationConfig::default()) {
        Err(ValidationError::TargetDistributionMismatch {
            train,
            test,
            tolerance,
        }) => {
            assert!((train - test).abs() > tolerance);
        }
        other => panic!("expected target mismatch, got {other:?}"),
    }
}

#[test]
fn correlated_columns_are_reported() {
    let mut table = default_fixture();
    let shifted = table
        .column("revol.util")
        .expect("column")
        .values
        .iter()
        .map(|value| Value::from(value.as_f64().map(|v| v + 1.0)))
        .collect::<Vec<_>>();
    table
        .with_column(Column::new("installment", shifted))
        .expect("replace column");

    match validate(&table, &ValidationConfig::default()) {
        Err(ValidationError::AnomalousCorrelation { pairs }) => {
            assert_eq!(pairs.len(), 1);
            assert!(pairs[0].involves("installment", "revol.util"));
            let r = pairs[0].coefficient.expect("defined coefficient");
            assert!((r - 1.0).abs() < 1e-9);
        }
        other => panic!("expected anomalous correlation, got {other:?}"),
    }
}

#[test]
fn constant_columns_have_undefined_correlations() {
    let mut table = default_fixture();
    let rows = table.n_rows();
    overwrite_head(&mut table, "pub.rec", rows, Value::Int(0));

    match validate(&table, &ValidationConfig::default()) {
        Err(ValidationError::AnomalousCorrelation { pairs }) => {
            assert_eq!(pairs.len(), 12);
            assert!(pairs.iter().all(|pair| pair.coefficient.is_none()));
            assert!(
                pairs
                    .iter()
                    .all(|pair| pair.left == "pub.rec" || pair.right == "pub.rec")
            );
            assert!(pairs[0].to_string().ends_with(": undefined"));
        }
        other => panic!("expected anomalous correlation, got {other:?}"),
    }
}

#[test]
fn error_messages_name_the_problem() {
    let mut table = small_fixture();
    table.drop_column("fico");
    let err = validate(&table, &ValidationConfig::default()).expect_err("fails");
    assert_eq!(err.code(), "schema_violation");
    assert!(err.to_string().contains("fico"));
}
