use ndarray::{Array2, ArrayView2, ArrayViewD};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{DqnError, Result};
use crate::estimator::ParamMut;
use super::traits::Layer;

/// What the last recorded forward pass did, kept for backpropagation.
#[derive(Clone, Debug)]
enum Recorded {
    Nothing,
    Identity,
    Mask(Array2<f32>),
}

/// Dropout Layer
///
/// Zeroes each unit with probability `dropout_rate` while training and scales
/// the survivors by `1 / (1 - dropout_rate)`. In inference mode it is the
/// identity, which is what makes the estimator's train/eval toggle observable.
#[derive(Clone, Debug)]
pub struct DropoutLayer {
    pub dropout_rate: f32,
    pub training: bool,
    size: usize,
    rng: StdRng,
    recorded: Recorded,
}

impl DropoutLayer {
    pub fn new(size: usize, dropout_rate: f32, seed: u64) -> Result<Self> {
        if !(0.0..1.0).contains(&dropout_rate) {
            return Err(DqnError::invalid_parameter(
                "dropout_rate",
                "Dropout rate must be in [0, 1)",
            ));
        }
        Ok(DropoutLayer {
            dropout_rate,
            training: true,
            size,
            rng: StdRng::seed_from_u64(seed),
            recorded: Recorded::Nothing,
        })
    }
}

impl Layer for DropoutLayer {
    fn forward_batch(&mut self, inputs: ArrayView2<f32>, record: bool) -> Array2<f32> {
        if !self.training || self.dropout_rate == 0.0 {
            if record {
                self.recorded = Recorded::Identity;
            }
            return inputs.to_owned();
        }

        let keep = 1.0 - self.dropout_rate;
        let scale = 1.0 / keep;
        let rng = &mut self.rng;
        let mask = Array2::from_shape_fn(inputs.dim(), |_| {
            if rng.gen::<f32>() < keep { scale } else { 0.0 }
        });
        let outputs = &inputs * &mask;
        if record {
            self.recorded = Recorded::Mask(mask);
        }
        outputs
    }

    fn backward_batch(&mut self, output_grad: ArrayView2<f32>) -> Result<Array2<f32>> {
        match &self.recorded {
            Recorded::Nothing => Err(DqnError::EstimatorError(
                "backward called before a recorded forward pass".to_string(),
            )),
            Recorded::Identity => Ok(output_grad.to_owned()),
            Recorded::Mask(mask) => {
                if mask.dim() != output_grad.dim() {
                    return Err(DqnError::dimension_mismatch(
                        format!("{:?}", mask.dim()),
                        format!("{:?}", output_grad.dim()),
                    ));
                }
                Ok(&output_grad * mask)
            }
        }
    }

    // Dropout has no learnable parameters
    fn zero_grad(&mut self) {}

    fn parameters(&self) -> Vec<ArrayViewD<'_, f32>> {
        Vec::new()
    }

    fn parameters_mut(&mut self) -> Vec<ParamMut<'_>> {
        Vec::new()
    }

    fn set_training(&mut self, training: bool) {
        self.training = training;
    }

    fn input_size(&self) -> usize {
        self.size
    }

    fn output_size(&self) -> usize {
        self.size
    }

    fn clone_box(&self) -> Box<dyn Layer> {
        Box::new(self.clone())
    }
}
