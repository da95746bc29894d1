use serde::{Serialize, Deserialize};

use crate::error::{DqnError, Result};

/// Replay buffer capacity
pub const BUFFER_SIZE: usize = 100_000;
/// Minibatch size
pub const BATCH_SIZE: usize = 64;
/// Discount factor
pub const GAMMA: f32 = 0.99;
/// Interpolation factor for the soft target update
pub const TAU: f32 = 1e-3;
/// Learning rate of the default Adam optimizer
pub const LEARNING_RATE: f32 = 5e-4;
/// Environment steps between learning updates
pub const UPDATE_EVERY: usize = 4;

/// Hyperparameters of a [`DqnAgent`](super::DqnAgent).
///
/// `hidden_layers`, `dropout` and `learning_rate` only shape the default
/// estimator and optimizer built by `DqnAgent::from_config`; an agent built
/// from a caller-supplied estimator ignores them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DqnConfig {
    pub state_size: usize,
    pub action_size: usize,
    pub buffer_size: usize,
    pub batch_size: usize,
    pub gamma: f32,
    pub tau: f32,
    pub learning_rate: f32,
    pub update_every: usize,
    pub seed: u64,
    pub hidden_layers: Vec<usize>,
    pub dropout: Option<f32>,
}

impl Default for DqnConfig {
    fn default() -> Self {
        DqnConfig {
            state_size: 0,
            action_size: 0,
            buffer_size: BUFFER_SIZE,
            batch_size: BATCH_SIZE,
            gamma: GAMMA,
            tau: TAU,
            learning_rate: LEARNING_RATE,
            update_every: UPDATE_EVERY,
            seed: 0,
            hidden_layers: vec![64, 64],
            dropout: None,
        }
    }
}

impl DqnConfig {
    pub fn new(state_size: usize, action_size: usize) -> Self {
        DqnConfig {
            state_size,
            action_size,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.state_size == 0 {
            return Err(DqnError::invalid_parameter("state_size", "Must be greater than 0"));
        }
        if self.action_size == 0 {
            return Err(DqnError::invalid_parameter("action_size", "Must be greater than 0"));
        }
        if self.buffer_size == 0 {
            return Err(DqnError::invalid_parameter("buffer_size", "Must be greater than 0"));
        }
        if self.batch_size == 0 || self.batch_size > self.buffer_size {
            return Err(DqnError::invalid_parameter(
                "batch_size",
                "Must be greater than 0 and at most buffer_size",
            ));
        }
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(DqnError::invalid_parameter("gamma", "Must be in [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.tau) {
            return Err(DqnError::invalid_parameter("tau", "Must be in [0, 1]"));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(DqnError::invalid_parameter("learning_rate", "Must be a positive finite number"));
        }
        if self.update_every == 0 {
            return Err(DqnError::invalid_parameter("update_every", "Must be greater than 0"));
        }
        Ok(())
    }

    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: DqnConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
