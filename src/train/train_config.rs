use serde::{Deserialize, Serialize};

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `epochs`         — full passes over the record store
/// - `batch_size`     — records per mini-batch; the last batch may be shorter
/// - `progress_every` — log progress each time this many records have been
///                      consumed within an epoch (`0` disables it)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub progress_every: usize,
}

impl TrainConfig {
    pub fn new(epochs: usize, batch_size: usize) -> Self {
        TrainConfig {
            epochs,
            batch_size,
            ..TrainConfig::default()
        }
    }
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            epochs: 1,
            batch_size: 50,
            progress_every: 1000,
        }
    }
}
