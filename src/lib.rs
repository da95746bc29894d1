//! # dqn-agent - Deep Q-Network agent for discrete control
//!
//! A value-based reinforcement learning agent: it learns to act in an
//! environment with a fixed-length real-valued state and a finite set of
//! actions by approximating action values with a neural estimator.
//!
//! ## Key Features
//!
//! - **Epsilon-greedy control** from an online estimator
//! - **Experience replay** in a bounded ring buffer with uniform sampling
//! - **Target estimator** kept close to the online one by soft updates
//! - **Pluggable estimators** through the [`estimator::Estimator`] trait
//! - **Optimizers**: SGD, Adam and RMSProp over `(parameter, gradient)` pairs
//! - **Deterministic runs**: every source of randomness is a seeded RNG
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dqn_agent::agent::{DqnAgent, DqnConfig, EpsilonSchedule};
//! use ndarray::Array1;
//!
//! let config = DqnConfig { seed: 42, ..DqnConfig::new(8, 4) };
//! let mut agent = DqnAgent::from_config(config).unwrap();
//! let mut epsilon = EpsilonSchedule::default();
//!
//! let mut state = Array1::<f32>::zeros(8);
//! for _ in 0..1000 {
//!     let action = agent.act(state.view(), epsilon.value()).unwrap();
//!     // ... step the environment ...
//!     let next_state = Array1::<f32>::zeros(8);
//!     agent.step(state, action, 0.0, next_state.clone(), false).unwrap();
//!     state = next_state;
//! }
//! epsilon.advance();
//! ```
//!
//! ## Module Organization
//!
//! - [`activations`] - Activation functions (ReLU, Tanh, LeakyReLU, Linear)
//! - [`agent`] - The DQN agent, its configuration and exploration schedule
//! - [`builders`] - Builder patterns for networks and replay buffers
//! - [`error`] - Error types and result handling
//! - [`estimator`] - The estimator capability the agent is generic over
//! - [`layers`] - Dense and dropout layers, weight initialization
//! - [`loss`] - Loss functions for training
//! - [`network`] - The bundled multi-layer Q-network
//! - [`optimizer`] - Optimization algorithms
//! - [`parallel`] - Thread-safe replay buffer handle
//! - [`replay_buffer`] - Experience replay

#[macro_use]
pub mod macros;

pub mod activations;
pub mod agent;
pub mod builders;
pub mod error;
pub mod estimator;
pub mod layers;
pub mod loss;
pub mod network;
pub mod optimizer;
pub mod parallel;
pub mod replay_buffer;

#[cfg(test)]
mod tests;
