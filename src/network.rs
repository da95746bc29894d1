//! # Q-Network
//!
//! The bundled [`Estimator`]: a multi-layer perceptron mapping a batch of
//! states to one row of action values per state. Hidden layers use ReLU by
//! default and the head is linear, so the outputs are unbounded value
//! estimates. Optional dropout after each hidden layer gives the network a
//! training-only behaviour that [`Mode::Eval`] switches off.

use ndarray::{Array2, ArrayView2, ArrayViewD};
use rand::{SeedableRng, rngs::StdRng};

use crate::activations::Activation;
use crate::builders::QNetworkBuilder;
use crate::error::{DqnError, Result};
use crate::estimator::{Estimator, Mode, ParamMut};
use crate::layers::{DenseLayer, Layer, WeightInit};

/// A feed-forward action-value network.
#[derive(Clone)]
pub struct QNetwork {
    layers: Vec<Box<dyn Layer>>,
    mode: Mode,
}

impl QNetwork {
    /// The default architecture: two hidden layers of 64 ReLU units, weights
    /// drawn from an RNG seeded with `seed`.
    pub fn new(state_size: usize, action_size: usize, seed: u64) -> Result<Self> {
        QNetworkBuilder::new(state_size, action_size).seed(seed).build()
    }

    /// Assemble a network from explicit layers. Adjacent layer sizes must agree.
    pub fn from_layers(layers: Vec<Box<dyn Layer>>) -> Result<Self> {
        if layers.is_empty() {
            return Err(DqnError::invalid_parameter(
                "layers",
                "Network must have at least one layer",
            ));
        }
        for pair in layers.windows(2) {
            if pair[0].output_size() != pair[1].input_size() {
                return Err(DqnError::dimension_mismatch(
                    format!("layer input of {}", pair[0].output_size()),
                    format!("layer input of {}", pair[1].input_size()),
                ));
            }
        }
        Ok(QNetwork { layers, mode: Mode::Train })
    }

    /// Dense layers from `(input, output, activation)` triples, initialised
    /// with the default scheme from an RNG seeded with `seed`.
    pub fn from_dense(specs: &[(usize, usize, Activation)], seed: u64) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        let init = WeightInit::default();
        let mut layers: Vec<Box<dyn Layer>> = Vec::with_capacity(specs.len());
        for &(input, output, activation) in specs {
            layers.push(Box::new(DenseLayer::new(input, output, activation, &init, &mut rng)?));
        }
        Self::from_layers(layers)
    }

    pub fn layers(&self) -> &[Box<dyn Layer>] {
        &self.layers
    }

    fn check_input(&self, states: &ArrayView2<f32>) -> Result<()> {
        let expected = self.input_size();
        if states.ncols() != expected {
            return Err(DqnError::dimension_mismatch(
                format!("states with {} features", expected),
                format!("states with {} features", states.ncols()),
            ));
        }
        Ok(())
    }

    fn run(&mut self, states: ArrayView2<f32>, record: bool) -> Result<Array2<f32>> {
        self.check_input(&states)?;
        let mut current = states.to_owned();
        for layer in &mut self.layers {
            current = layer.forward_batch(current.view(), record);
        }
        Ok(current)
    }
}

impl Estimator for QNetwork {
    fn input_size(&self) -> usize {
        self.layers.first().map_or(0, |layer| layer.input_size())
    }

    fn output_size(&self) -> usize {
        self.layers.last().map_or(0, |layer| layer.output_size())
    }

    fn predict(&mut self, states: ArrayView2<f32>) -> Result<Array2<f32>> {
        self.run(states, false)
    }

    fn forward(&mut self, states: ArrayView2<f32>) -> Result<Array2<f32>> {
        self.run(states, true)
    }

    fn backward(&mut self, output_grad: ArrayView2<f32>) -> Result<()> {
        let mut grad = output_grad.to_owned();
        for layer in self.layers.iter_mut().rev() {
            grad = layer.backward_batch(grad.view())?;
        }
        Ok(())
    }

    fn zero_grad(&mut self) {
        for layer in &mut self.layers {
            layer.zero_grad();
        }
    }

    fn parameters(&self) -> Vec<ArrayViewD<'_, f32>> {
        self.layers.iter().flat_map(|layer| layer.parameters()).collect()
    }

    fn parameters_mut(&mut self) -> Vec<ParamMut<'_>> {
        self.layers.iter_mut().flat_map(|layer| layer.parameters_mut()).collect()
    }

    fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        for layer in &mut self.layers {
            layer.set_training(mode == Mode::Train);
        }
    }

    fn mode(&self) -> Mode {
        self.mode
    }
}
