pub mod test_layers;

use ndarray::{Array1, Array2};
use rand::{SeedableRng, rngs::StdRng};

use crate::activations::Activation;
use crate::layers::{DenseLayer, Layer, WeightInit};
use crate::network::QNetwork;

/// Single linear layer with fixed weights, so action values are known exactly
pub(crate) fn linear_network(weights: Array2<f32>, biases: Array1<f32>) -> QNetwork {
    let mut rng = StdRng::seed_from_u64(0);
    let (input, output) = weights.dim();
    let layer = DenseLayer::new(input, output, Activation::Linear, &WeightInit::Zeros, &mut rng)
        .unwrap()
        .with_weights(weights)
        .unwrap()
        .with_biases(biases)
        .unwrap();
    let layers: Vec<Box<dyn Layer>> = vec![Box::new(layer)];
    QNetwork::from_layers(layers).unwrap()
}
