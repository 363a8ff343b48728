use crate::data::batch;
use crate::data::record::Record;
use crate::error::Result;
use crate::math::Matrix;
use crate::network::network::Network;

/// Records predicted per forward pass while evaluating.
const EVAL_CHUNK: usize = 1000;

/// Fraction of `records` whose most activated output matches the label.
/// An empty slice scores `0.0`.
pub fn evaluate(network: &Network, records: &[Record]) -> Result<f32> {
    if records.is_empty() {
        return Ok(0.0);
    }
    let mut correct = 0usize;
    for chunk in records.chunks(EVAL_CHUNK) {
        let predictions = network.predict(&batch::inputs(chunk))?;
        correct += count_correct(&predictions, chunk.iter().map(|r| r.label()));
    }
    Ok(correct as f32 / records.len() as f32)
}

/// Argmax accuracy of a prediction matrix (one row per sample) against
/// class labels.
///
/// # Panics
/// Panics if `predictions` does not have exactly one row per label.
pub fn accuracy(predictions: &Matrix, labels: &[u8]) -> f32 {
    assert_eq!(predictions.rows, labels.len(), "one label per prediction row");
    if labels.is_empty() {
        return 0.0;
    }
    count_correct(predictions, labels.iter().copied()) as f32 / labels.len() as f32
}

/// Index of the maximum element; the first one wins ties.
pub fn argmax(v: &[f32]) -> usize {
    let mut best = 0;
    for (i, &x) in v.iter().enumerate().skip(1) {
        if x > v[best] {
            best = i;
        }
    }
    best
}

fn count_correct(predictions: &Matrix, labels: impl Iterator<Item = u8>) -> usize {
    labels
        .enumerate()
        .filter(|&(i, label)| argmax(predictions.row(i)) == usize::from(label))
        .count()
}
