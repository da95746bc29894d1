use crate::agent::BUFFER_SIZE;
use crate::parallel::SharedReplayBuffer;
use crate::replay_buffer::ReplayBuffer;
use crate::error::Result;

/// Builder for ReplayBuffer
pub struct ReplayBufferBuilder {
    capacity: usize,
    seed: u64,
}

impl ReplayBufferBuilder {
    /// Defaults to a capacity of [`BUFFER_SIZE`] and seed 0
    pub fn new() -> Self {
        ReplayBufferBuilder { capacity: BUFFER_SIZE, seed: 0 }
    }

    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn build(self) -> Result<ReplayBuffer> {
        ReplayBuffer::new(self.capacity, self.seed)
    }

    /// Build a buffer that several actors can feed concurrently
    pub fn build_shared(self) -> Result<SharedReplayBuffer> {
        Ok(SharedReplayBuffer::new(self.build()?))
    }
}

impl Default for ReplayBufferBuilder {
    fn default() -> Self {
        Self::new()
    }
}
