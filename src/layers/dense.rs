use ndarray::{Array1, Array2, ArrayView2, ArrayViewD, Axis};
use rand::Rng;

use crate::activations::Activation;
use crate::error::{DqnError, Result};
use crate::estimator::ParamMut;
use super::initialization::WeightInit;
use super::traits::Layer;

/// A fully connected layer computing `activation(inputs · weights + biases)`.
///
/// Weights are stored as `(input_size, output_size)` so a batch with one
/// example per row multiplies on the left.
#[derive(Clone, Debug)]
pub struct DenseLayer {
    pub weights: Array2<f32>,
    pub biases: Array1<f32>,
    pub activation: Activation,
    weight_grad: Array2<f32>,
    bias_grad: Array1<f32>,
    inputs: Option<Array2<f32>>,
    pre_activation_output: Option<Array2<f32>>,
}

impl DenseLayer {
    /// Create a dense layer whose parameters are drawn from `init` using `rng`.
    pub fn new<R: Rng + ?Sized>(
        input_size: usize,
        output_size: usize,
        activation: Activation,
        init: &WeightInit,
        rng: &mut R,
    ) -> Result<Self> {
        if input_size == 0 || output_size == 0 {
            return Err(DqnError::invalid_parameter(
                "layer_size",
                "Layer sizes must be greater than 0",
            ));
        }
        let weights = init.initialize_weights((input_size, output_size), rng)?;
        let biases = init.initialize_biases(input_size, output_size, rng)?;
        Ok(DenseLayer {
            weight_grad: Array2::zeros(weights.dim()),
            bias_grad: Array1::zeros(biases.dim()),
            weights,
            biases,
            activation,
            inputs: None,
            pre_activation_output: None,
        })
    }

    pub fn with_weights(mut self, weights: Array2<f32>) -> Result<Self> {
        if weights.dim() != self.weights.dim() {
            return Err(DqnError::dimension_mismatch(
                format!("{:?}", self.weights.dim()),
                format!("{:?}", weights.dim()),
            ));
        }
        self.weights = weights;
        Ok(self)
    }

    pub fn with_biases(mut self, biases: Array1<f32>) -> Result<Self> {
        if biases.dim() != self.biases.dim() {
            return Err(DqnError::dimension_mismatch(
                format!("{:?}", self.biases.dim()),
                format!("{:?}", biases.dim()),
            ));
        }
        self.biases = biases;
        Ok(self)
    }

    pub fn weight_grad(&self) -> &Array2<f32> {
        &self.weight_grad
    }

    pub fn bias_grad(&self) -> &Array1<f32> {
        &self.bias_grad
    }
}

impl Layer for DenseLayer {
    fn forward_batch(&mut self, inputs: ArrayView2<f32>, record: bool) -> Array2<f32> {
        let mut outputs = inputs.dot(&self.weights) + &self.biases.view().insert_axis(Axis(0));
        if record {
            self.inputs = Some(inputs.to_owned());
            self.pre_activation_output = Some(outputs.clone());
        }
        self.activation.apply_batch(&mut outputs);
        outputs
    }

    fn backward_batch(&mut self, output_grad: ArrayView2<f32>) -> Result<Array2<f32>> {
        let (inputs, pre_activation_output) = match (&self.inputs, &self.pre_activation_output) {
            (Some(inputs), Some(pre)) => (inputs, pre),
            _ => {
                return Err(DqnError::EstimatorError(
                    "backward called before a recorded forward pass".to_string(),
                ))
            }
        };
        if output_grad.dim() != pre_activation_output.dim() {
            return Err(DqnError::dimension_mismatch(
                format!("{:?}", pre_activation_output.dim()),
                format!("{:?}", output_grad.dim()),
            ));
        }

        let delta = &output_grad * &self.activation.derivative_batch(pre_activation_output.view());
        self.weight_grad += &inputs.t().dot(&delta);
        self.bias_grad += &delta.sum_axis(Axis(0));

        Ok(delta.dot(&self.weights.t()))
    }

    fn zero_grad(&mut self) {
        self.weight_grad.fill(0.0);
        self.bias_grad.fill(0.0);
    }

    fn parameters(&self) -> Vec<ArrayViewD<'_, f32>> {
        vec![self.weights.view().into_dyn(), self.biases.view().into_dyn()]
    }

    fn parameters_mut(&mut self) -> Vec<ParamMut<'_>> {
        vec![
            ParamMut {
                value: self.weights.view_mut().into_dyn(),
                grad: self.weight_grad.view().into_dyn(),
            },
            ParamMut {
                value: self.biases.view_mut().into_dyn(),
                grad: self.bias_grad.view().into_dyn(),
            },
        ]
    }

    fn set_training(&mut self, _training: bool) {}

    fn input_size(&self) -> usize {
        self.weights.shape()[0]
    }

    fn output_size(&self) -> usize {
        self.weights.shape()[1]
    }

    fn clone_box(&self) -> Box<dyn Layer> {
        Box::new(self.clone())
    }
}
