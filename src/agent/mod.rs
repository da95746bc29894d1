//! # DQN Agent
//!
//! Value-based control with a learned action-value estimator. The agent
//! selects actions epsilon-greedily from its online estimator, stores every
//! transition in a bounded replay buffer, and periodically fits the online
//! estimator to Bellman targets computed from a slowly tracking target
//! estimator.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use dqn_agent::agent::{DqnAgentBuilder, EpsilonSchedule};
//! use ndarray::array;
//!
//! let mut agent = DqnAgentBuilder::new(4, 2)
//!     .hidden_layers(&[64, 64])
//!     .seed(42)
//!     .build()
//!     .unwrap();
//! let mut epsilon = EpsilonSchedule::default();
//!
//! let state = array![0.1, 0.2, -0.3, 0.4];
//! let action = agent.act(state.view(), epsilon.value()).unwrap();
//! let next_state = array![0.1, 0.25, -0.3, 0.35];
//! agent.step(state, action, 1.0, next_state, false).unwrap();
//! epsilon.advance();
//! ```

mod config;
mod dqn;
mod policy;

pub use config::{DqnConfig, BATCH_SIZE, BUFFER_SIZE, GAMMA, LEARNING_RATE, TAU, UPDATE_EVERY};
pub use dqn::{q_targets, soft_update, DqnAgent, DqnAgentBuilder};
pub use policy::{greedy_action, EpsilonSchedule};
