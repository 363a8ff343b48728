use std::io;
use std::path::PathBuf;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use digit_trainer::data::MAX_RECORD_HINT;
use digit_trainer::{Config, Error, Network, RecordStore, Shell};

/// Train and inspect a 784-N-10 sigmoid network on an MNIST-style CSV file.
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Dataset file: one `label,pixel_0,...,pixel_783` record per line
    dataset: PathBuf,
    /// Expected number of records, used to pre-allocate the store
    #[arg(value_parser = clap::value_parser!(u64).range(..=MAX_RECORD_HINT as u64))]
    record_count_hint: Option<u64>,
    /// JSON config file with `network` and `training` sections
    #[arg(long)]
    config: Option<PathBuf>,
    /// Hidden layer width
    #[arg(long)]
    hidden: Option<usize>,
    /// Learning rate of the gradient step
    #[arg(long)]
    learning_rate: Option<f32>,
    /// Records per mini-batch
    #[arg(long)]
    batch_size: Option<usize>,
    /// Seed for the initial weights
    #[arg(long)]
    seed: Option<u64>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Loads the optional JSON config, applies command-line overrides on top
/// and validates the result.
fn resolve_config(cli: &Cli) -> digit_trainer::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_json(path)?,
        None => Config::default(),
    };
    if let Some(hidden) = cli.hidden {
        config.network.hidden_nodes = hidden;
    }
    if let Some(rate) = cli.learning_rate {
        config.network.learning_rate = rate;
    }
    if let Some(size) = cli.batch_size {
        config.training.batch_size = size;
    }
    config.validate()?;
    Ok(config)
}

fn run(cli: Cli) -> digit_trainer::Result<()> {
    let config = resolve_config(&cli)?;

    let hint = cli.record_count_hint.unwrap_or(0) as usize;
    let store = RecordStore::load(&cli.dataset, hint)?;
    println!("{}: {}", cli.dataset.display(), store.len());

    let network = match cli.seed {
        Some(seed) => Network::with_rng(&config.network, &mut StdRng::seed_from_u64(seed))?,
        None => Network::new(&config.network)?,
    };

    let mut shell = Shell::new(store, network, config.training);
    let stdin = io::stdin();
    let stdout = io::stdout();
    shell
        .run(stdin.lock(), &mut stdout.lock())
        .map_err(|source| Error::Io {
            path: PathBuf::from("<stdio>"),
            source,
        })
}
