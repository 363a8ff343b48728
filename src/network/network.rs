use rand::Rng;

use crate::activation::activation::{sigmoid_delta, sigmoid_matrix};
use crate::config::NetworkConfig;
use crate::error::{Error, Result};
use crate::loss::mse::MseLoss;
use crate::math::Matrix;

/// Fully connected input → hidden → output network with sigmoid
/// activations and no biases.
///
/// The network exclusively owns both weight matrices. Their shapes are fixed
/// at construction; training and model loading only replace values.
#[derive(Debug, Clone)]
pub struct Network {
    pub(super) weights_ih: Matrix,
    pub(super) weights_ho: Matrix,
    learning_rate: f32,
}

impl Network {
    /// Builds a network with weights drawn uniformly from `[-1, 1)`.
    pub fn new(config: &NetworkConfig) -> Result<Network> {
        Network::with_rng(config, &mut rand::thread_rng())
    }

    /// Like `new`, drawing the initial weights from `rng`.
    pub fn with_rng<R: Rng + ?Sized>(config: &NetworkConfig, rng: &mut R) -> Result<Network> {
        config.validate()?;
        let weights_ih = Matrix::random_with(config.input_nodes, config.hidden_nodes, rng);
        let weights_ho = Matrix::random_with(config.hidden_nodes, config.output_nodes, rng);
        log::info!(
            "network {}-{}-{}, learning rate {}",
            config.input_nodes,
            config.hidden_nodes,
            config.output_nodes,
            config.learning_rate
        );
        Ok(Network {
            weights_ih,
            weights_ho,
            learning_rate: config.learning_rate,
        })
    }

    pub fn input_nodes(&self) -> usize {
        self.weights_ih.rows
    }

    pub fn hidden_nodes(&self) -> usize {
        self.weights_ih.cols
    }

    pub fn output_nodes(&self) -> usize {
        self.weights_ho.cols
    }

    pub fn learning_rate(&self) -> f32 {
        self.learning_rate
    }

    pub fn weights_ih(&self) -> &Matrix {
        &self.weights_ih
    }

    pub fn weights_ho(&self) -> &Matrix {
        &self.weights_ho
    }

    /// Output activations for a batch (one row per sample). Does not mutate.
    pub fn predict(&self, inputs: &Matrix) -> Result<Matrix> {
        self.check_inputs(inputs)?;
        let (_, output) = self.forward(inputs);
        Ok(output)
    }

    /// One mini-batch gradient step on the squared error.
    ///
    /// Returns the batch's summed squared error measured before the update.
    /// On a shape mismatch nothing is modified.
    pub fn train(&mut self, inputs: &Matrix, targets: &Matrix) -> Result<f32> {
        self.check_inputs(inputs)?;
        if targets.cols != self.output_nodes() {
            return Err(Error::Shape {
                what: "target columns",
                expected: self.output_nodes(),
                found: targets.cols,
            });
        }
        if targets.rows != inputs.rows {
            return Err(Error::Shape {
                what: "target rows",
                expected: inputs.rows,
                found: targets.rows,
            });
        }

        let (hidden, output) = self.forward(inputs);
        let loss = MseLoss::sum_squared(&output, targets);

        let output_error = targets - &output;
        // Propagated through the pre-update hidden→output weights.
        let hidden_error = output_error.mul_t(&self.weights_ho);

        let output_delta = sigmoid_delta(&output_error, &output);
        self.weights_ho
            .add_scaled(&hidden.t_mul(&output_delta), self.learning_rate);

        let hidden_delta = sigmoid_delta(&hidden_error, &hidden);
        self.weights_ih
            .add_scaled(&inputs.t_mul(&hidden_delta), self.learning_rate);

        Ok(loss)
    }

    /// Returns `(hidden activations, output activations)`.
    fn forward(&self, inputs: &Matrix) -> (Matrix, Matrix) {
        let hidden = sigmoid_matrix(&(inputs * &self.weights_ih));
        let output = sigmoid_matrix(&(&hidden * &self.weights_ho));
        (hidden, output)
    }

    fn check_inputs(&self, inputs: &Matrix) -> Result<()> {
        if inputs.cols != self.input_nodes() {
            return Err(Error::Shape {
                what: "input columns",
                expected: self.input_nodes(),
                found: inputs.cols,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn small_config() -> NetworkConfig {
        NetworkConfig {
            input_nodes: 4,
            hidden_nodes: 3,
            output_nodes: 2,
            learning_rate: 0.3,
        }
    }

    fn small_network(seed: u64) -> Network {
        Network::with_rng(&small_config(), &mut StdRng::seed_from_u64(seed)).unwrap()
    }

    #[test]
    fn shapes_follow_config() {
        let net = small_network(1);
        assert_eq!(net.weights_ih().shape(), (4, 3));
        assert_eq!(net.weights_ho().shape(), (3, 2));
        assert_eq!(net.input_nodes(), 4);
        assert_eq!(net.hidden_nodes(), 3);
        assert_eq!(net.output_nodes(), 2);
    }

    #[test]
    fn same_seed_gives_same_weights() {
        assert_eq!(small_network(5).weights_ih(), small_network(5).weights_ih());
    }

    #[test]
    fn zero_input_gives_half_hidden_activations() {
        let net = small_network(2);
        let (hidden, output) = net.forward(&Matrix::zeros(1, 4));
        assert!(hidden.as_slice().iter().all(|&h| h == 0.5));

        // Output is sigmoid(0.5 * column sums of W_ho).
        for j in 0..2 {
            let z: f32 = (0..3).map(|k| 0.5 * net.weights_ho()[(k, j)]).sum();
            assert!((output[(0, j)] - crate::activation::sigmoid(z)).abs() < 1e-6);
        }
        assert_eq!(net.predict(&Matrix::zeros(1, 4)).unwrap(), output);
    }

    #[test]
    fn train_step_matches_manual_update() {
        let mut net = small_network(3);
        let before = net.clone();
        let x = Matrix::from_rows(vec![vec![0.2, 0.4, 0.6, 0.8]]);
        let t = Matrix::from_rows(vec![vec![1.0, 0.0]]);

        net.train(&x, &t).unwrap();

        let hidden = sigmoid_matrix(&(&x * &before.weights_ih));
        let output = sigmoid_matrix(&(&hidden * &before.weights_ho));
        let out_err = &t - &output;
        let hid_err = &out_err * &before.weights_ho.transpose();
        let mut ho = before.weights_ho.clone();
        ho.add_scaled(
            &(&hidden.transpose() * &out_err.hadamard(&output.map(|o| o * (1.0 - o)))),
            0.3,
        );
        let mut ih = before.weights_ih.clone();
        ih.add_scaled(
            &(&x.transpose() * &hid_err.hadamard(&hidden.map(|h| h * (1.0 - h)))),
            0.3,
        );

        for (a, b) in net.weights_ho().as_slice().iter().zip(ho.as_slice()) {
            assert!((a - b).abs() < 1e-6);
        }
        for (a, b) in net.weights_ih().as_slice().iter().zip(ih.as_slice()) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn train_does_not_increase_batch_error_at_small_rate() {
        let config = NetworkConfig {
            learning_rate: 0.05,
            ..small_config()
        };
        let mut net = Network::with_rng(&config, &mut StdRng::seed_from_u64(9)).unwrap();
        let x = Matrix::from_rows(vec![
            vec![0.1, 0.9, 0.3, 0.5],
            vec![0.7, 0.2, 0.8, 0.1],
        ]);
        let t = Matrix::from_rows(vec![vec![1.0, 0.0], vec![0.0, 1.0]]);

        let before = net.train(&x, &t).unwrap();
        let after = MseLoss::sum_squared(&net.predict(&x).unwrap(), &t);
        assert!(after <= before, "error rose from {} to {}", before, after);
    }

    #[test]
    fn shape_mismatch_leaves_weights_untouched() {
        let mut net = small_network(4);
        let before = net.clone();

        let wide = Matrix::zeros(1, 5);
        assert!(matches!(net.predict(&wide), Err(Error::Shape { .. })));
        assert!(matches!(
            net.train(&wide, &Matrix::zeros(1, 2)),
            Err(Error::Shape { .. })
        ));
        assert!(matches!(
            net.train(&Matrix::zeros(2, 4), &Matrix::zeros(1, 2)),
            Err(Error::Shape { what: "target rows", .. })
        ));
        assert_eq!(net.weights_ih(), before.weights_ih());
        assert_eq!(net.weights_ho(), before.weights_ho());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = NetworkConfig {
            output_nodes: 0,
            ..small_config()
        };
        assert!(matches!(Network::new(&config), Err(Error::Config(_))));
    }
}
