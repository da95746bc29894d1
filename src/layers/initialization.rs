use ndarray::{Array1, Array2};
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::{Normal, Uniform};
use serde::{Serialize, Deserialize};

use crate::error::{DqnError, Result};

/// Weight initialization strategies
///
/// Every strategy draws from a caller-supplied RNG so two networks built from
/// the same seed start from identical parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum WeightInit {
    /// U(-1/sqrt(fan_in), 1/sqrt(fan_in)) for weights and biases
    #[default]
    FanInUniform,

    /// Xavier/Glorot uniform initialization
    XavierUniform,

    /// He/Kaiming uniform initialization (for ReLU)
    HeUniform,

    /// He/Kaiming normal initialization (for ReLU)
    HeNormal,

    /// Uniform distribution with custom range
    Uniform { min: f32, max: f32 },

    /// All zeros
    Zeros,
}

impl WeightInit {
    /// Initialize a `(fan_in, fan_out)` weight matrix
    pub fn initialize_weights<R: Rng + ?Sized>(&self, shape: (usize, usize), rng: &mut R) -> Result<Array2<f32>> {
        let (fan_in, fan_out) = shape;

        let weights = match self {
            WeightInit::FanInUniform => {
                let limit = 1.0 / (fan_in as f32).sqrt();
                Array2::random_using(shape, Uniform::new(-limit, limit), rng)
            }
            WeightInit::XavierUniform => {
                let limit = (6.0 / (fan_in + fan_out) as f32).sqrt();
                Array2::random_using(shape, Uniform::new(-limit, limit), rng)
            }
            WeightInit::HeUniform => {
                let limit = (6.0 / fan_in as f32).sqrt();
                Array2::random_using(shape, Uniform::new(-limit, limit), rng)
            }
            WeightInit::HeNormal => {
                let std = (2.0 / fan_in as f32).sqrt();
                let normal = Normal::new(0.0, std)
                    .map_err(|e| DqnError::NumericalError(e.to_string()))?;
                Array2::random_using(shape, normal, rng)
            }
            WeightInit::Uniform { min, max } => {
                Array2::random_using(shape, Self::custom_uniform(*min, *max)?, rng)
            }
            WeightInit::Zeros => Array2::zeros(shape),
        };
        Ok(weights)
    }

    /// Initialize the bias vector of a layer with `fan_in` inputs
    pub fn initialize_biases<R: Rng + ?Sized>(&self, fan_in: usize, size: usize, rng: &mut R) -> Result<Array1<f32>> {
        let biases = match self {
            WeightInit::FanInUniform => {
                let limit = 1.0 / (fan_in as f32).sqrt();
                Array1::random_using(size, Uniform::new(-limit, limit), rng)
            }
            WeightInit::Uniform { min, max } => {
                Array1::random_using(size, Self::custom_uniform(*min, *max)?, rng)
            }
            WeightInit::XavierUniform
            | WeightInit::HeUniform
            | WeightInit::HeNormal
            | WeightInit::Zeros => Array1::zeros(size),
        };
        Ok(biases)
    }

    fn custom_uniform(min: f32, max: f32) -> Result<Uniform<f32>> {
        if !(min < max) {
            return Err(DqnError::invalid_parameter(
                "weight_init",
                "Uniform range requires min < max",
            ));
        }
        Ok(Uniform::new(min, max))
    }
}
