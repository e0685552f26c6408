// ============================================================
// Layer 4 — Train/Validation Splitter
// ============================================================
// Splits records into a training head and a validation tail.
//
//   split_at = floor(len * train_fraction)
//   train    = records[..split_at]
//   val      = records[split_at..]
//
// Without a seed the input order is kept, so the validation
// set is always the last files of the collection. With a seed
// the records are shuffled first (Fisher-Yates via
// rand::seq::SliceRandom), reproducibly.
//
// Reference: rand crate documentation

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Split `items` into (train, validation).
pub fn split_train_val<T>(
    mut items:      Vec<T>,
    train_fraction: f64,
    seed:           Option<u64>,
) -> (Vec<T>, Vec<T>) {
    if let Some(seed) = seed {
        let mut rng = StdRng::seed_from_u64(seed);
        items.shuffle(&mut rng);
    }

    let total    = items.len();
    let fraction = train_fraction.clamp(0.0, 1.0);
    let split_at = ((total as f64) * fraction).floor() as usize;
    let split_at = split_at.min(total);

    let val = items.split_off(split_at);

    tracing::debug!(
        "Dataset split: {} training, {} validation",
        items.len(),
        val.len(),
    );

    (items, val)
}
