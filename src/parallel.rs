//! Shared replay storage for several actors
//!
//! A `DqnAgent` is single-threaded and owns its buffer outright. When
//! rollouts run on several threads feeding one store, [`SharedReplayBuffer`]
//! wraps the ring in a mutex so `add`, `sample` and `len` all observe one
//! consistent append sequence.

use std::sync::{Arc, Mutex, MutexGuard};

use ndarray::Array1;

use crate::error::{DqnError, Result};
use crate::replay_buffer::{Experience, ExperienceBatch, ReplayBuffer};

/// Cloneable handle to a mutex-guarded [`ReplayBuffer`].
#[derive(Clone, Debug)]
pub struct SharedReplayBuffer {
    inner: Arc<Mutex<ReplayBuffer>>,
}

impl SharedReplayBuffer {
    pub fn new(buffer: ReplayBuffer) -> Self {
        SharedReplayBuffer { inner: Arc::new(Mutex::new(buffer)) }
    }

    fn lock(&self) -> Result<MutexGuard<'_, ReplayBuffer>> {
        self.inner
            .lock()
            .map_err(|e| DqnError::LockPoisoned(e.to_string()))
    }

    pub fn push(&self, experience: Experience) -> Result<()> {
        self.lock()?.push(experience);
        Ok(())
    }

    pub fn add(&self, state: Array1<f32>, action: usize, reward: f32, next_state: Array1<f32>, done: bool) -> Result<()> {
        self.lock()?.add(state, action, reward, next_state, done);
        Ok(())
    }

    pub fn sample(&self, batch_size: usize) -> Result<ExperienceBatch> {
        self.lock()?.sample(batch_size)
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }

    pub fn capacity(&self) -> Result<usize> {
        Ok(self.lock()?.capacity())
    }
}
