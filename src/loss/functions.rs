use ndarray::{Array1, ArrayView1};

use crate::error::{DqnError, Result};

/// Trait defining the interface for loss functions over per-example values
pub trait Loss: Send + Sync {
    /// Compute the loss for a batch of predictions and targets
    fn compute(&self, predictions: ArrayView1<f32>, targets: ArrayView1<f32>) -> Result<f32>;

    /// Gradient of the loss with respect to each prediction
    fn gradient(&self, predictions: ArrayView1<f32>, targets: ArrayView1<f32>) -> Result<Array1<f32>>;
}

/// Mean Squared Error: `mean((prediction - target)^2)`
#[derive(Clone, Copy, Debug, Default)]
pub struct MeanSquaredError;

fn check_pair(predictions: &ArrayView1<f32>, targets: &ArrayView1<f32>) -> Result<()> {
    if predictions.len() != targets.len() {
        return Err(DqnError::dimension_mismatch(
            format!("{} targets", predictions.len()),
            format!("{} targets", targets.len()),
        ));
    }
    if predictions.is_empty() {
        return Err(DqnError::invalid_parameter("predictions", "Loss over an empty batch"));
    }
    Ok(())
}

impl Loss for MeanSquaredError {
    fn compute(&self, predictions: ArrayView1<f32>, targets: ArrayView1<f32>) -> Result<f32> {
        check_pair(&predictions, &targets)?;
        let diff = &predictions - &targets;
        Ok((&diff * &diff).sum() / predictions.len() as f32)
    }

    fn gradient(&self, predictions: ArrayView1<f32>, targets: ArrayView1<f32>) -> Result<Array1<f32>> {
        check_pair(&predictions, &targets)?;
        let scale = 2.0 / predictions.len() as f32;
        Ok((&predictions - &targets) * scale)
    }
}
