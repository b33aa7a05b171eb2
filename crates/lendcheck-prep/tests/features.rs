use lendcheck_core::{Table, Value};
use lendcheck_prep::{
    ANNUAL_INCOME_COLUMN, LOAN_CATEGORY_COLUMN, LOAN_INCOME_RATIO_COLUMN, MissingStrategy,
    PrepError, RISK_CATEGORY_COLUMN, add_annual_income, add_loan_categories,
    add_loan_income_ratio, add_risk_categories, handle_missing_values,
};

fn sample() -> Table {
    Table::from_rows(
        &["fico_score", "monthly_installment", "annual_income", "missing_values"],
        vec![
            vec![Value::Int(750), Value::Int(500), Value::Int(60000), Value::Null],
            vec![Value::Int(670), Value::Int(400), Value::Int(55000), Value::Int(2)],
            vec![Value::Int(610), Value::Int(300), Value::Int(50000), Value::Null],
            vec![Value::Int(590), Value::Int(200), Value::Int(45000), Value::Int(4)],
            vec![Value::Null, Value::Int(100), Value::Int(40000), Value::Int(5)],
        ],
    )
    .expect("sample table")
}

fn texts(table: &Table, column: &str) -> Vec<String> {
    table
        .column(column)
        .expect("column")
        .values
        .iter()
        .map(|value| value.as_str().expect("text").to_string())
        .collect()
}

#[test]
fn mean_fills_missing_values() {
    let result = handle_missing_values(&sample(), MissingStrategy::Mean, Some(&["missing_values"]))
        .expect("fill");
    let column = result.column("missing_values").expect("column");
    assert_eq!(column.null_count(), 0);
    let filled = column.values[0].as_f64().expect("number");
    assert!((filled - 11.0 / 3.0).abs() < 1e-9);
    assert_eq!(result.column("fico_score").expect("fico").null_count(), 1);
}

#[test]
fn median_fills_missing_values() {
    let result =
        handle_missing_values(&sample(), MissingStrategy::Median, Some(&["missing_values"]))
            .expect("fill");
    let column = result.column("missing_values").expect("column");
    assert_eq!(column.null_count(), 0);
    assert_eq!(column.values[0], Value::Int(4));
}

#[test]
fn drop_removes_incomplete_rows() {
    let result = handle_missing_values(&sample(), MissingStrategy::Drop, Some(&["missing_values"]))
        .expect("drop");
    assert_eq!(result.n_rows(), 3);
    assert_eq!(result.index(), &[1, 3, 4]);

    let result = handle_missing_values(&sample(), MissingStrategy::Drop, None).expect("drop");
    assert_eq!(result.index(), &[1, 3]);
}

#[test]
fn text_columns_are_left_alone() {
    let table = Table::from_rows(
        &["label", "score"],
        vec![
            vec![Value::from("a"), Value::Float(1.0)],
            vec![Value::Null, Value::Null],
            vec![Value::from("b"), Value::Float(2.0)],
        ],
    )
    .expect("table");

    let result = handle_missing_values(&table, MissingStrategy::Mean, None).expect("fill");
    assert_eq!(result.value("label", 1), Some(&Value::Null));
    assert_eq!(result.value("score", 1), Some(&Value::Float(1.5)));
}

#[test]
fn unknown_columns_are_rejected() {
    let err = handle_missing_values(&sample(), MissingStrategy::Mean, Some(&["nope"]))
        .expect_err("missing column");
    assert!(matches!(err, PrepError::MissingColumn(name) if name == "nope"));
}

#[test]
fn loan_categories_band_fico_scores() {
    let mut table = sample();
    add_loan_categories(&mut table, "fico_score").expect("categories");
    assert_eq!(
        texts(&table, LOAN_CATEGORY_COLUMN),
        vec!["Super-prime", "Prime", "Subprime", "Subprime", "Unknown"]
    );

    let mut table = Table::from_rows(
        &["fico"],
        vec![
            vec![Value::Int(720)],
            vec![Value::Int(719)],
            vec![Value::Int(660)],
            vec![Value::Int(659)],
            vec![Value::Int(620)],
            vec![Value::Int(619)],
            vec![Value::Int(580)],
            vec![Value::Int(579)],
        ],
    )
    .expect("table");
    add_loan_categories(&mut table, "fico").expect("categories");
    assert_eq!(
        texts(&table, LOAN_CATEGORY_COLUMN),
        vec![
            "Super-prime",
            "Prime",
            "Prime",
            "Near-prime",
            "Near-prime",
            "Subprime",
            "Subprime",
            "Deep subprime",
        ]
    );
}

#[test]
fn risk_categories_band_fico_scores() {
    let mut table = sample();
    add_risk_categories(&mut table, "fico_score").expect("categories");
    assert_eq!(
        texts(&table, RISK_CATEGORY_COLUMN),
        vec!["Low Risk", "Medium Risk", "High Risk", "High Risk", "Unknown"]
    );
}

#[test]
fn loan_income_ratio_annualizes_installments() {
    let mut table = sample();
    add_loan_income_ratio(&mut table, "monthly_installment", "annual_income").expect("ratio");
    let ratios = &table.column(LOAN_INCOME_RATIO_COLUMN).expect("ratio").values;
    assert!((ratios[0].as_f64().expect("number") - 0.1).abs() < 1e-12);
    assert!((ratios[4].as_f64().expect("number") - 0.03).abs() < 1e-12);

    let mut table = Table::from_rows(
        &["installment", "income"],
        vec![
            vec![Value::Float(100.0), Value::Float(0.0)],
            vec![Value::Null, Value::Float(1000.0)],
        ],
    )
    .expect("table");
    add_loan_income_ratio(&mut table, "installment", "income").expect("ratio");
    let ratios = &table.column(LOAN_INCOME_RATIO_COLUMN).expect("ratio").values;
    assert!(ratios.iter().all(Value::is_null));
}

#[test]
fn helpers_require_their_columns() {
    let mut table = sample();
    assert!(matches!(
        add_loan_categories(&mut table, "fico"),
        Err(PrepError::MissingColumn(_))
    ));
    assert!(matches!(
        add_risk_categories(&mut table, "fico"),
        Err(PrepError::MissingColumn(_))
    ));
    assert!(matches!(
        add_loan_income_ratio(&mut table, "monthly_installment", "income"),
        Err(PrepError::MissingColumn(name)) if name == "income"
    ));
}

#[test]
fn annual_income_undoes_the_log() {
    let mut table = Table::from_rows(
        &["log.annual.inc"],
        vec![vec![Value::Float(0.0)], vec![Value::Null], vec![Value::Float(2.0)]],
    )
    .expect("table");
    add_annual_income(&mut table, "log.annual.inc").expect("income");

    let incomes = &table.column(ANNUAL_INCOME_COLUMN).expect("income").values;
    assert_eq!(incomes[0], Value::Float(1.0));
    assert!(incomes[1].is_null());
    assert!((incomes[2].as_f64().expect("number") - 2.0f64.exp()).abs() < 1e-9);
}
