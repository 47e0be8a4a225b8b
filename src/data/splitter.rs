// ============================================================
// Layer 4 — Train/Evaluation Splitter
// ============================================================
// Splits labelled samples into a training partition (used to
// fit the vocabulary and the classifier) and an evaluation
// partition (only ever scored, never fitted on).
//
// Two guarantees:
//   - Reproducible: the shuffle uses a StdRng seeded from the
//     configured seed, so the same corpus + seed always yields
//     the same partitions.
//   - Stratified: each label is split separately, so both
//     partitions keep the corpus' positive/negative ratio.
//
// Uses Fisher-Yates shuffle via rand::seq::SliceRandom.
//
// Reference: rand crate documentation (SeedableRng, SliceRandom)

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Shuffle `samples` with `rng` and split into (train, evaluation),
/// keeping `train_fraction` of them (rounded) for training.
pub fn split_train_val<T>(
    mut samples:    Vec<T>,
    train_fraction: f64,
    rng:            &mut StdRng,
) -> (Vec<T>, Vec<T>) {
    samples.shuffle(rng);

    let total    = samples.len();
    let split_at = ((total as f64) * train_fraction.clamp(0.0, 1.0)).round() as usize;
    let split_at = split_at.min(total);

    let val = samples.split_off(split_at);
    (samples, val)
}

/// Seeded, label-stratified split.
///
/// `eval_fraction` of each label group (rounded) goes to the
/// evaluation partition. Both partitions are shuffled once more
/// so labels are interleaved.
pub fn split_stratified<T, F>(
    samples:       Vec<T>,
    eval_fraction: f64,
    seed:          u64,
    label_of:      F,
) -> (Vec<T>, Vec<T>)
where
    F: Fn(&T) -> bool,
{
    let mut rng = StdRng::seed_from_u64(seed);
    let total   = samples.len();

    let (positives, negatives): (Vec<T>, Vec<T>) =
        samples.into_iter().partition(|s| label_of(s));

    let train_fraction = 1.0 - eval_fraction.clamp(0.0, 1.0);
    let (mut train, mut eval) = split_train_val(positives, train_fraction, &mut rng);
    let (neg_train, neg_eval) = split_train_val(negatives, train_fraction, &mut rng);
    train.extend(neg_train);
    eval.extend(neg_eval);

    train.shuffle(&mut rng);
    eval.shuffle(&mut rng);

    tracing::debug!(
        "Stratified split: {} training, {} evaluation ({}% / {}%)",
        train.len(),
        eval.len(),
        (train.len() * 100) / total.max(1),
        (eval.len()  * 100) / total.max(1),
    );

    (train, eval)
}
