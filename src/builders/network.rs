use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::activations::Activation;
use crate::error::{DqnError, Result};
use crate::layers::{DenseLayer, DropoutLayer, Layer, WeightInit};
use crate::network::QNetwork;

/// Builder for constructing a [`QNetwork`] with a fluent API
pub struct QNetworkBuilder {
    state_size: usize,
    action_size: usize,
    hidden_layers: Vec<usize>,
    hidden_activation: Activation,
    dropout: Option<f32>,
    init: WeightInit,
    seed: u64,
}

impl QNetworkBuilder {
    /// Start from the default architecture: hidden layers `[64, 64]`, ReLU, no dropout
    pub fn new(state_size: usize, action_size: usize) -> Self {
        QNetworkBuilder {
            state_size,
            action_size,
            hidden_layers: vec![64, 64],
            hidden_activation: Activation::Relu,
            dropout: None,
            init: WeightInit::FanInUniform,
            seed: 0,
        }
    }

    pub fn hidden_layers(mut self, sizes: &[usize]) -> Self {
        self.hidden_layers = sizes.to_vec();
        self
    }

    pub fn hidden_activation(mut self, activation: Activation) -> Self {
        self.hidden_activation = activation;
        self
    }

    /// Insert a dropout layer with this rate after every hidden layer
    pub fn dropout(mut self, rate: f32) -> Self {
        self.dropout = Some(rate);
        self
    }

    pub fn weight_init(mut self, init: WeightInit) -> Self {
        self.init = init;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Build the network
    pub fn build(self) -> Result<QNetwork> {
        if self.state_size == 0 {
            return Err(DqnError::invalid_parameter("state_size", "Must be greater than 0"));
        }
        if self.action_size == 0 {
            return Err(DqnError::invalid_parameter("action_size", "Must be greater than 0"));
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut layers: Vec<Box<dyn Layer>> = Vec::new();
        let mut input_size = self.state_size;

        for &hidden in &self.hidden_layers {
            let dense = DenseLayer::new(input_size, hidden, self.hidden_activation, &self.init, &mut rng)?;
            layers.push(Box::new(dense));
            if let Some(rate) = self.dropout {
                layers.push(Box::new(DropoutLayer::new(hidden, rate, rng.gen())?));
            }
            input_size = hidden;
        }

        let head = DenseLayer::new(input_size, self.action_size, Activation::Linear, &self.init, &mut rng)?;
        layers.push(Box::new(head));

        QNetwork::from_layers(layers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::Estimator;

    #[test]
    fn test_default_architecture() {
        let network = QNetworkBuilder::new(8, 4).build().unwrap();
        assert_eq!(network.layers().len(), 3);
        assert_eq!(network.input_size(), 8);
        assert_eq!(network.output_size(), 4);
        // weights and biases for each dense layer
        assert_eq!(network.parameters().len(), 6);
    }

    #[test]
    fn test_dropout_layers_inserted() {
        let network = QNetworkBuilder::new(3, 2)
            .hidden_layers(&[16, 8])
            .dropout(0.2)
            .build()
            .unwrap();
        assert_eq!(network.layers().len(), 5);
        assert_eq!(network.parameters().len(), 6);
    }

    #[test]
    fn test_weight_init_and_activation_options() {
        let bounded = QNetworkBuilder::new(4, 2)
            .hidden_layers(&[8])
            .hidden_activation(Activation::Tanh)
            .weight_init(WeightInit::Uniform { min: -0.1, max: 0.1 })
            .build()
            .unwrap();
        for param in bounded.parameters() {
            assert!(param.iter().all(|&v| (-0.1..=0.1).contains(&v)));
        }

        let default = QNetworkBuilder::new(4, 2).seed(3).build().unwrap();
        for init in [WeightInit::XavierUniform, WeightInit::HeUniform, WeightInit::HeNormal] {
            let mut network = QNetworkBuilder::new(4, 2)
                .hidden_activation(Activation::LeakyRelu { alpha: 0.01 })
                .weight_init(init)
                .seed(3)
                .build()
                .unwrap();
            assert_ne!(network.parameters(), default.parameters());
            let output = network.predict(ndarray::Array2::ones((2, 4)).view()).unwrap();
            assert!(output.iter().all(|v| v.is_finite()));
        }

        let zeros = QNetworkBuilder::new(4, 2).weight_init(WeightInit::Zeros).build().unwrap();
        assert!(zeros.parameters().iter().all(|p| p.iter().all(|&v| v == 0.0)));
    }

    #[test]
    fn test_builder_errors() {
        assert!(QNetworkBuilder::new(0, 2).build().is_err());
        assert!(QNetworkBuilder::new(2, 0).build().is_err());
        assert!(QNetworkBuilder::new(2, 2).hidden_layers(&[0]).build().is_err());
        assert!(QNetworkBuilder::new(2, 2).dropout(1.5).build().is_err());
    }
}
