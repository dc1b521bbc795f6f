//! Seeded train/test partitioning.

use super::{DataError, Dataset};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Split `dataset` into `(train, test)` after a seeded shuffle.
///
/// The test side holds `ceil(n * test_fraction)` rows. The same seed always
/// yields the same partition.
pub fn train_test_split(
    dataset: &Dataset,
    test_fraction: f64,
    seed: u64,
) -> Result<(Dataset, Dataset), DataError> {
    let n = dataset.n_rows();
    if n == 0 {
        return Err(DataError::Empty);
    }
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(DataError::InvalidSplit(test_fraction));
    }

    let n_test = (n as f64 * test_fraction).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(DataError::InvalidSplit(test_fraction));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let (test_idx, train_idx) = indices.split_at(n_test);
    Ok((dataset.take_rows(train_idx)?, dataset.take_rows(test_idx)?))
}
