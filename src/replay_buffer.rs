//! # Experience Replay
//!
//! A fixed-capacity store of environment transitions with uniform sampling.
//! The store is an explicit ring: records live in an index-addressed vector
//! and `head` points at the oldest one once the store is full, so inserting
//! into a full store overwrites exactly the oldest record.

use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;
use serde::{Serialize, Deserialize};

use crate::error::{DqnError, Result};

/// One environment transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub state: Array1<f32>,
    pub action: usize,
    pub reward: f32,
    pub next_state: Array1<f32>,
    pub done: bool,
}

impl Experience {
    pub fn new(state: Array1<f32>, action: usize, reward: f32, next_state: Array1<f32>, done: bool) -> Self {
        Experience { state, action, reward, next_state, done }
    }
}

/// A sampled batch reorganised into five parallel arrays.
///
/// Row `i` of every array belongs to the same transition. `dones` holds
/// `1.0` for terminal transitions and `0.0` otherwise.
#[derive(Clone, Debug, PartialEq)]
pub struct ExperienceBatch {
    pub states: Array2<f32>,
    pub actions: Array1<usize>,
    pub rewards: Array1<f32>,
    pub next_states: Array2<f32>,
    pub dones: Array1<f32>,
}

impl ExperienceBatch {
    /// Stack experiences row by row. All states must share one length.
    pub fn from_experiences(experiences: &[&Experience]) -> Result<Self> {
        let first = experiences.first().ok_or_else(|| {
            DqnError::invalid_parameter("experiences", "Cannot build an empty batch")
        })?;
        let batch_size = experiences.len();
        let state_size = first.state.len();

        let mut states = Array2::zeros((batch_size, state_size));
        let mut next_states = Array2::zeros((batch_size, state_size));
        let mut actions = Array1::zeros(batch_size);
        let mut rewards = Array1::zeros(batch_size);
        let mut dones = Array1::zeros(batch_size);

        for (i, exp) in experiences.iter().enumerate() {
            if exp.state.len() != state_size || exp.next_state.len() != state_size {
                return Err(DqnError::dimension_mismatch(
                    format!("states of length {}", state_size),
                    format!("state {} / next_state {}", exp.state.len(), exp.next_state.len()),
                ));
            }
            states.row_mut(i).assign(&exp.state);
            next_states.row_mut(i).assign(&exp.next_state);
            actions[i] = exp.action;
            rewards[i] = exp.reward;
            dones[i] = if exp.done { 1.0 } else { 0.0 };
        }

        Ok(ExperienceBatch { states, actions, rewards, next_states, dones })
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Fixed-size ring buffer of experiences with its own seeded RNG.
#[derive(Clone, Debug)]
pub struct ReplayBuffer {
    slots: Vec<Experience>,
    capacity: usize,
    head: usize,
    rng: StdRng,
}

impl ReplayBuffer {
    pub fn new(capacity: usize, seed: u64) -> Result<Self> {
        if capacity == 0 {
            return Err(DqnError::invalid_parameter(
                "capacity",
                "Capacity must be greater than 0",
            ));
        }
        Ok(ReplayBuffer {
            slots: Vec::with_capacity(capacity),
            capacity,
            head: 0,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Store an experience, overwriting the oldest one when full.
    pub fn push(&mut self, experience: Experience) {
        if self.slots.len() < self.capacity {
            self.slots.push(experience);
        } else {
            self.slots[self.head] = experience;
            self.head = (self.head + 1) % self.capacity;
        }
    }

    pub fn add(&mut self, state: Array1<f32>, action: usize, reward: f32, next_state: Array1<f32>, done: bool) {
        self.push(Experience::new(state, action, reward, next_state, done));
    }

    /// Draw `batch_size` distinct experiences uniformly at random.
    ///
    /// Sampled records stay in the buffer.
    pub fn sample(&mut self, batch_size: usize) -> Result<ExperienceBatch> {
        if batch_size == 0 {
            return Err(DqnError::invalid_parameter(
                "batch_size",
                "Batch size must be greater than 0",
            ));
        }
        if batch_size > self.slots.len() {
            return Err(DqnError::InsufficientData {
                requested: batch_size,
                available: self.slots.len(),
            });
        }

        let picked: Vec<&Experience> = index::sample(&mut self.rng, self.slots.len(), batch_size)
            .into_iter()
            .map(|i| &self.slots[i])
            .collect();
        ExperienceBatch::from_experiences(&picked)
    }

    /// Experiences from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &Experience> {
        self.slots[self.head..].iter().chain(self.slots[..self.head].iter())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.head = 0;
    }
}
