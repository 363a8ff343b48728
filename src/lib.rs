pub mod activation;
pub mod config;
pub mod data;
pub mod error;
pub mod loss;
pub mod math;
pub mod network;
pub mod shell;
pub mod train;

// Convenience re-exports
pub use config::{Config, NetworkConfig};
pub use data::{Record, RecordStore};
pub use error::{Error, FormatError, ParseError, Result};
pub use math::matrix::Matrix;
pub use network::network::Network;
pub use shell::Shell;
pub use train::{train_loop, EpochStats, TrainConfig};
