use lendcheck_core::{SplitConfig, Table};
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

/// Training and holdout partitions of a table.
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub train: Table,
    pub test: Table,
}

/// Row positions for the holdout and training sets, in that order.
///
/// Positions are shuffled with a ChaCha8 stream seeded from `config.seed`;
/// the first `ceil(n * test_ratio)` shuffled positions form the holdout set.
/// The same seed and row count always produce the same partition.
pub fn split_positions(n_rows: usize, config: &SplitConfig) -> (Vec<usize>, Vec<usize>) {
    let n_test = ((n_rows as f64) * config.test_ratio).ceil() as usize;
    let n_test = n_test.min(n_rows);

    let mut positions: Vec<usize> = (0..n_rows).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    positions.shuffle(&mut rng);

    let train = positions.split_off(n_test);
    (positions, train)
}

/// Partition a table into training and holdout sets.
pub fn train_test_split(table: &Table, config: &SplitConfig) -> TrainTestSplit {
    let (test_positions, train_positions) = split_positions(table.n_rows(), config);
    TrainTestSplit {
        train: table.take_rows(&train_positions),
        test: table.take_rows(&test_positions),
    }
}
