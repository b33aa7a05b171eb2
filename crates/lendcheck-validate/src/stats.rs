use lendcheck_core::{Column, Table};

use crate::errors::CorrelatedPair;

/// Share of non-missing values equal to `class`; zero for a column with no values.
pub fn class_ratio(column: &Column, class: i64) -> f64 {
    let mut present = 0usize;
    let mut matching = 0usize;
    for value in &column.values {
        if value.is_missing() {
            continue;
        }
        present += 1;
        if value.as_i64() == Some(class) {
            matching += 1;
        }
    }

    if present == 0 {
        0.0
    } else {
        matching as f64 / present as f64
    }
}

/// Pearson correlation over pairwise-complete observations.
///
/// Returns `None` when fewer than two complete pairs exist or either side
/// has zero variance.
pub fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> Option<f64> {
    let pairs = x
        .iter()
        .zip(y)
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .collect::<Vec<_>>();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(a, _)| a).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, b)| b).sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut syy = 0.0;
    let mut sxy = 0.0;
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

/// Symmetric correlation matrix over the numeric columns of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    columns: Vec<String>,
    values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn compute(table: &Table) -> Self {
        let numeric = table
            .columns()
            .iter()
            .filter(|col| col.is_numeric())
            .collect::<Vec<_>>();
        let series = numeric
            .iter()
            .map(|col| col.numbers().collect::<Vec<_>>())
            .collect::<Vec<_>>();

        let size = numeric.len();
        let mut values = vec![vec![None; size]; size];
        for i in 0..size {
            values[i][i] = Some(1.0);
            for j in (i + 1)..size {
                let r = pearson(&series[i], &series[j]);
                values[i][j] = r;
                values[j][i] = r;
            }
        }

        Self {
            columns: numeric.iter().map(|col| col.name.clone()).collect(),
            values,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get(row).and_then(|r| r.get(col)).copied().flatten()
    }

    /// Number of distinct unordered column pairs.
    pub fn pair_count(&self) -> usize {
        let n = self.columns.len();
        n * n.saturating_sub(1) / 2
    }

    /// Every unordered pair of distinct columns whose correlation magnitude
    /// is at least `threshold`, visiting the upper triangle only.
    ///
    /// Undefined correlations never fall inside the accepted band, so those
    /// pairs are reported with no coefficient.
    pub fn anomalous_pairs(&self, threshold: f64) -> Vec<CorrelatedPair> {
        let mut pairs = Vec::new();
        for i in 0..self.columns.len() {
            for j in (i + 1)..self.columns.len() {
                let coefficient = self.get(i, j);
                if coefficient.is_none_or(|r| r.abs() >= threshold) {
                    pairs.push(CorrelatedPair {
                        left: self.columns[i].clone(),
                        right: self.columns[j].clone(),
                        coefficient,
                    });
                }
            }
        }
        pairs
    }

    /// Largest off-diagonal correlation magnitude, if any pair is defined.
    pub fn max_abs(&self) -> Option<f64> {
        let mut max: Option<f64> = None;
        for i in 0..self.columns.len() {
            for j in (i + 1)..self.columns.len() {
                if let Some(r) = self.get(i, j) {
                    max = Some(max.map_or(r.abs(), |m| m.max(r.abs())));
                }
            }
        }
        max
    }
}
