use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::record::{CLASSES, PIXELS};
use crate::error::{Error, Result};
use crate::train::train_config::TrainConfig;

/// Layer widths and learning rate of the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub input_nodes: usize,
    pub hidden_nodes: usize,
    pub output_nodes: usize,
    pub learning_rate: f32,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            input_nodes: PIXELS,
            hidden_nodes: 225,
            output_nodes: CLASSES,
            learning_rate: 0.3,
        }
    }
}

impl NetworkConfig {
    /// Every width must be non-zero and the learning rate finite and positive.
    pub fn validate(&self) -> Result<()> {
        if self.input_nodes == 0 || self.hidden_nodes == 0 || self.output_nodes == 0 {
            return Err(Error::Config(format!(
                "layer widths must be non-zero, got {}/{}/{}",
                self.input_nodes, self.hidden_nodes, self.output_nodes
            )));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(Error::Config(format!(
                "learning rate must be a positive number, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }

    /// Digit records always carry `PIXELS` inputs and `CLASSES` outputs.
    pub fn check_digit_dataset(&self) -> Result<()> {
        if self.input_nodes != PIXELS || self.output_nodes != CLASSES {
            return Err(Error::Config(format!(
                "digit records need {} inputs and {} outputs, configured {} and {}",
                PIXELS, CLASSES, self.input_nodes, self.output_nodes
            )));
        }
        Ok(())
    }
}

/// Everything a run can be configured with. Missing keys take defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub network: NetworkConfig,
    pub training: TrainConfig,
}

impl Config {
    /// Reads a JSON config file such as
    /// `{"network": {"hidden_nodes": 100}, "training": {"batch_size": 30}}`.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| Error::io(path, e))?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Checks everything a digit-training run depends on.
    pub fn validate(&self) -> Result<()> {
        self.network.validate()?;
        self.network.check_digit_dataset()?;
        if self.training.batch_size == 0 {
            return Err(Error::Config("batch size must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_the_digit_network() {
        let config = Config::default();
        assert_eq!(config.network.input_nodes, 784);
        assert_eq!(config.network.hidden_nodes, 225);
        assert_eq!(config.network.output_nodes, 10);
        assert_eq!(config.network.learning_rate, 0.3);
        assert_eq!(config.training.batch_size, 50);
        config.network.validate().unwrap();
        config.network.check_digit_dataset().unwrap();
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"network": {{"hidden_nodes": 64}}, "training": {{"batch_size": 30}}}}"#
        )
        .unwrap();

        let config = Config::load_json(file.path()).unwrap();
        assert_eq!(config.network.hidden_nodes, 64);
        assert_eq!(config.network.learning_rate, 0.3);
        assert_eq!(config.training.batch_size, 30);
        assert_eq!(config.training.epochs, 1);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        assert!(matches!(Config::load_json(file.path()), Err(Error::Config(_))));
    }

    #[test]
    fn rejects_degenerate_networks() {
        let zero_hidden = NetworkConfig {
            hidden_nodes: 0,
            ..NetworkConfig::default()
        };
        assert!(zero_hidden.validate().is_err());

        let bad_rate = NetworkConfig {
            learning_rate: f32::NAN,
            ..NetworkConfig::default()
        };
        assert!(bad_rate.validate().is_err());

        let wrong_inputs = NetworkConfig {
            input_nodes: 100,
            ..NetworkConfig::default()
        };
        wrong_inputs.validate().unwrap();
        assert!(wrong_inputs.check_digit_dataset().is_err());

        let mut zero_batch = Config::default();
        zero_batch.training.batch_size = 0;
        assert!(matches!(zero_batch.validate(), Err(Error::Config(_))));
    }
}
