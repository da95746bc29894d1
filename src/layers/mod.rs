pub mod traits;
pub mod dense;
pub mod dropout;
pub mod initialization;

pub use traits::Layer;
pub use dense::DenseLayer;
pub use dropout::DropoutLayer;
pub use initialization::WeightInit;
