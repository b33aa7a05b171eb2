#![allow(dead_code)]

use lendcheck_core::{Column, PURPOSE_CATEGORIES, Table, Value};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Rows in the default fixture; large enough that random 80/20 splits keep
/// the label ratio well inside the parity tolerance.
pub const FIXTURE_ROWS: usize = 10_000;

/// Loan table with independent, in-domain columns and ~16% positive labels.
pub fn loan_fixture(rows: usize, seed: u64) -> Table {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut columns: Vec<(&str, Vec<Value>)> = vec![
        ("credit.policy", Vec::with_capacity(rows)),
        ("purpose", Vec::with_capacity(rows)),
        ("int.rate", Vec::with_capacity(rows)),
        ("installment", Vec::with_capacity(rows)),
        ("log.annual.inc", Vec::with_capacity(rows)),
        ("dti", Vec::with_capacity(rows)),
        ("fico", Vec::with_capacity(rows)),
        ("days.with.cr.line", Vec::with_capacity(rows)),
        ("revol.bal", Vec::with_capacity(rows)),
        ("revol.util", Vec::with_capacity(rows)),
        ("inq.last.6mths", Vec::with_capacity(rows)),
        ("delinq.2yrs", Vec::with_capacity(rows)),
        ("pub.rec", Vec::with_capacity(rows)),
        ("not.fully.paid", Vec::with_capacity(rows)),
    ];

    for _ in 0..rows {
        let purpose = PURPOSE_CATEGORIES[rng.random_range(0..PURPOSE_CATEGORIES.len())];
        let row = [
            Value::Int(rng.random_range(0..=1)),
            Value::from(purpose),
            Value::Float(rng.random_range(0.06..0.22)),
            Value::Float(rng.random_range(15.0..940.0)),
            Value::Float(rng.random_range(7.5..14.5)),
            Value::Float(rng.random_range(0.0..30.0)),
            Value::Int(rng.random_range(612..=827)),
            Value::Float(rng.random_range(180.0..17_000.0)),
            Value::Int(rng.random_range(0..=120_000)),
            Value::Float(rng.random_range(0.0..100.0)),
            Value::Int(rng.random_range(0..=8)),
            Value::Int(rng.random_range(0..=3)),
            Value::Int(rng.random_range(0..=2)),
            Value::Int(if rng.random::<f64>() < 0.16 { 1 } else { 0 }),
        ];
        for ((_, values), value) in columns.iter_mut().zip(row) {
            values.push(value);
        }
    }

    Table::new(
        columns
            .into_iter()
            .map(|(name, values)| Column::new(name, values))
            .collect(),
    )
    .expect("fixture table")
}

pub fn default_fixture() -> Table {
    loan_fixture(FIXTURE_ROWS, 123)
}

/// Fill the first `count` cells of a column with `value`.
pub fn overwrite_head(table: &mut Table, column: &str, count: usize, value: Value) {
    for row in 0..count {
        table
            .set_value(column, row, value.clone())
            .expect("set fixture value");
    }
}

/// Replace every cell of a column with its text rendering.
pub fn stringify_column(table: &mut Table, column: &str) {
    let col = table.column_mut(column).expect("fixture column");
    for value in col.values.iter_mut() {
        *value = Value::Text(value.to_csv());
    }
}
