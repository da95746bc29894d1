use ndarray::{Array2, ArrayView2, ArrayViewD};

use crate::error::Result;
use crate::estimator::ParamMut;

/// Trait defining the interface for network layers
pub trait Layer: Send + Sync {
    /// Forward propagation for a batch of inputs, one row per example.
    /// When `record` is set the layer keeps what `backward_batch` needs.
    fn forward_batch(&mut self, inputs: ArrayView2<f32>, record: bool) -> Array2<f32>;

    /// Accumulate parameter gradients and return the gradient with respect to the inputs
    fn backward_batch(&mut self, output_grad: ArrayView2<f32>) -> Result<Array2<f32>>;

    /// Reset accumulated gradients to zero
    fn zero_grad(&mut self);

    fn parameters(&self) -> Vec<ArrayViewD<'_, f32>>;

    fn parameters_mut(&mut self) -> Vec<ParamMut<'_>>;

    /// Toggle training-only behaviour
    fn set_training(&mut self, training: bool);

    /// Get the input size of the layer
    fn input_size(&self) -> usize;

    /// Get the output size of the layer
    fn output_size(&self) -> usize;

    /// Clone the layer into a boxed trait object
    fn clone_box(&self) -> Box<dyn Layer>;
}

impl Clone for Box<dyn Layer> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
