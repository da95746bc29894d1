use ndarray::ArrayView1;
use serde::{Serialize, Deserialize};

use crate::error::{DqnError, Result};

/// Index of the largest value, keeping the first on ties.
///
/// Any NaN makes the ranking meaningless and is reported instead of being
/// silently skipped.
pub fn greedy_action(q_values: ArrayView1<f32>) -> Result<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (idx, &value) in q_values.iter().enumerate() {
        if value.is_nan() {
            return Err(DqnError::NumericalError(format!("NaN action value at index {}", idx)));
        }
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((idx, value)),
        }
    }
    best.map(|(idx, _)| idx)
        .ok_or_else(|| DqnError::NumericalError("No action values to choose from".to_string()))
}

/// Multiplicative per-episode epsilon decay, floored at `end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpsilonSchedule {
    start: f32,
    end: f32,
    decay: f32,
    current: f32,
}

impl Default for EpsilonSchedule {
    fn default() -> Self {
        EpsilonSchedule {
            start: 1.0,
            end: 0.01,
            decay: 0.995,
            current: 1.0,
        }
    }
}

impl EpsilonSchedule {
    pub fn new(start: f32, end: f32, decay: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&start) || !(0.0..=1.0).contains(&end) {
            return Err(DqnError::invalid_parameter("epsilon", "start and end must be in [0, 1]"));
        }
        if end > start {
            return Err(DqnError::invalid_parameter("epsilon", "end must not exceed start"));
        }
        if !(decay > 0.0 && decay <= 1.0) {
            return Err(DqnError::invalid_parameter("decay", "Must be in (0, 1]"));
        }
        Ok(EpsilonSchedule { start, end, decay, current: start })
    }

    pub fn value(&self) -> f32 {
        self.current
    }

    /// Decay once (typically at the end of an episode) and return the new value
    pub fn advance(&mut self) -> f32 {
        self.current = (self.current * self.decay).max(self.end);
        self.current
    }

    pub fn reset(&mut self) {
        self.current = self.start;
    }
}
