//! # Activation Functions Module
//!
//! Non-linearities applied by the dense layers of the bundled [`QNetwork`](crate::network::QNetwork).
//!
//! ## Available Activations
//!
//! - **ReLU**: `max(0, x)`, the default for hidden layers
//! - **Linear**: identity, used for the action-value head
//! - **Tanh**: hyperbolic tangent, outputs between -1 and 1
//! - **LeakyReLU**: ReLU with a small negative slope
//!
//! Every activation works on a whole batch (`Array2`, one row per state) and
//! exposes its derivative with respect to the pre-activation values, which the
//! dense layer needs during backpropagation.

pub mod functions;

pub use functions::Activation;
