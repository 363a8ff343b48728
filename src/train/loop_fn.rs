use std::time::Instant;

use crate::data::batch;
use crate::data::record::Record;
use crate::error::{Error, Result};
use crate::network::network::Network;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `network` for `config.epochs` epochs over `records` and returns
/// one `EpochStats` per completed epoch.
///
/// Records are consumed in file order, `config.batch_size` at a time. The
/// final batch of an epoch holds whatever remains and is trained with its
/// true row count.
///
/// # Errors
/// `Error::Config` if `batch_size` is zero; `Error::Shape` if the network's
/// widths do not match digit records.
pub fn train_loop(
    network: &mut Network,
    records: &[Record],
    config: &TrainConfig,
) -> Result<Vec<EpochStats>> {
    if config.batch_size == 0 {
        return Err(Error::Config("batch size must be at least 1".into()));
    }

    let mut history = Vec::with_capacity(config.epochs);

    for epoch in 1..=config.epochs {
        let t_start = Instant::now();

        let train_loss = run_one_epoch(network, records, config, epoch)?;

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            train_loss,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };
        log::info!(
            "epoch {}/{}: loss {:.6}, {} ms",
            stats.epoch,
            stats.total_epochs,
            stats.train_loss,
            stats.elapsed_ms
        );
        history.push(stats);
    }

    Ok(history)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Runs one pass of mini-batch training. Returns the mean squared error per
/// record.
fn run_one_epoch(
    network: &mut Network,
    records: &[Record],
    config: &TrainConfig,
    epoch: usize,
) -> Result<f32> {
    let mut total_loss = 0.0f64;
    let mut trained = 0usize;

    for chunk in records.chunks(config.batch_size) {
        let inputs = batch::inputs(chunk);
        let targets = batch::targets(chunk);

        let loss = network.train(&inputs, &targets)?;
        total_loss += f64::from(loss);
        log::debug!("batch of {}: loss {}", chunk.len(), loss / chunk.len() as f32);

        let before = trained;
        trained += chunk.len();
        if config.progress_every > 0
            && trained / config.progress_every > before / config.progress_every
        {
            log::info!("epoch {}: trained {} of {}", epoch, trained, records.len());
        }
    }

    if records.is_empty() {
        return Ok(0.0);
    }
    Ok((total_loss / records.len() as f64) as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NetworkConfig;
    use crate::data::record::PIXELS;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn network() -> Network {
        Network::with_rng(&NetworkConfig::default(), &mut StdRng::seed_from_u64(11)).unwrap()
    }

    fn records(n: usize) -> Vec<Record> {
        (0..n)
            .map(|i| Record::new((i % 10) as u8, [(i * 25 % 256) as u8; PIXELS]).unwrap())
            .collect()
    }

    #[test]
    fn one_stats_entry_per_epoch() {
        let mut net = network();
        let stats = train_loop(&mut net, &records(7), &TrainConfig::new(3, 5)).unwrap();
        assert_eq!(stats.len(), 3);
        assert_eq!(stats[2].epoch, 3);
        assert!(stats.iter().all(|s| s.total_epochs == 3 && s.train_loss.is_finite()));
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let mut net = network();
        let before = net.weights_ih().clone();
        let err = train_loop(&mut net, &records(3), &TrainConfig::new(1, 0)).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(net.weights_ih(), &before);
    }

    #[test]
    fn empty_store_trains_nothing() {
        let mut net = network();
        let before = net.weights_ho().clone();
        let stats = train_loop(&mut net, &[], &TrainConfig::default()).unwrap();
        assert_eq!(stats[0].train_loss, 0.0);
        assert_eq!(net.weights_ho(), &before);
    }

    #[test]
    fn batch_size_changes_the_update() {
        let data = records(6);
        let mut whole = network();
        let mut split = network();
        train_loop(&mut whole, &data, &TrainConfig::new(1, 6)).unwrap();
        train_loop(&mut split, &data, &TrainConfig::new(1, 4)).unwrap();
        assert_ne!(whole.weights_ho(), split.weights_ho());
    }
}
