//! # Estimator Capability
//!
//! The agent never depends on a concrete network architecture. Anything that
//! maps a batch of states to a batch of per-action values, can be trained by
//! gradient descent, and exposes its parameters in a stable order satisfies
//! [`Estimator`]. The bundled [`QNetwork`](crate::network::QNetwork) is one
//! such implementation.
//!
//! Gradients live next to the parameters they belong to: `backward`
//! accumulates into them, `zero_grad` clears them and an
//! [`Optimizer`](crate::optimizer::Optimizer) consumes them through
//! [`ParamMut`] pairs.

use ndarray::{Array2, ArrayView2, ArrayViewD, ArrayViewMutD};
use serde::{Serialize, Deserialize};

use crate::error::Result;

/// Training or inference behaviour of an estimator.
///
/// `Eval` disables training-only behaviour such as dropout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Mode {
    #[default]
    Train,
    Eval,
}

/// A mutable parameter tensor paired with its accumulated gradient.
pub struct ParamMut<'a> {
    pub value: ArrayViewMutD<'a, f32>,
    pub grad: ArrayViewD<'a, f32>,
}

/// An opaque differentiable mapping from states to action values.
pub trait Estimator: Clone {
    /// Length of the state vectors this estimator accepts
    fn input_size(&self) -> usize;

    /// Number of action values produced per state
    fn output_size(&self) -> usize;

    /// Batched evaluation that records nothing for backpropagation.
    fn predict(&mut self, states: ArrayView2<f32>) -> Result<Array2<f32>>;

    /// Batched evaluation that records what `backward` needs.
    fn forward(&mut self, states: ArrayView2<f32>) -> Result<Array2<f32>>;

    /// Accumulate parameter gradients given dLoss/dOutput for the most recent `forward`.
    fn backward(&mut self, output_grad: ArrayView2<f32>) -> Result<()>;

    /// Clear all accumulated gradients.
    fn zero_grad(&mut self);

    /// Parameters in a fixed order shared by every estimator of the same architecture.
    fn parameters(&self) -> Vec<ArrayViewD<'_, f32>>;

    /// Parameters with their gradients, in the same order as `parameters`.
    fn parameters_mut(&mut self) -> Vec<ParamMut<'_>>;

    fn set_mode(&mut self, mode: Mode);

    fn mode(&self) -> Mode;
}
