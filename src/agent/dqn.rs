use ndarray::{Array1, Array2, ArrayView1, Axis, Zip};
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{debug, info, trace};

use crate::builders::QNetworkBuilder;
use crate::error::{DqnError, Result};
use crate::estimator::{Estimator, Mode};
use crate::loss::{Loss, MeanSquaredError};
use crate::network::QNetwork;
use crate::optimizer::{Optimizer, OptimizerWrapper};
use crate::replay_buffer::{ExperienceBatch, ReplayBuffer};

use super::config::DqnConfig;
use super::policy::greedy_action;

/// Deep Q-Network agent with experience replay and a soft-updated target network
///
/// The agent owns two estimators of identical architecture. The online
/// estimator is trained by gradient descent and selects actions; the target
/// estimator only produces the bootstrap values of the Bellman target and
/// trails the online one through [`soft_update`].
///
/// # Example
///
/// ```rust
/// use dqn_agent::agent::{DqnAgent, DqnConfig};
/// use ndarray::array;
///
/// let config = DqnConfig { batch_size: 4, buffer_size: 100, ..DqnConfig::new(2, 3) };
/// let mut agent = DqnAgent::from_config(config).unwrap();
///
/// let state = array![0.1, -0.2];
/// let action = agent.act(state.view(), 0.1).unwrap();
/// assert!(action < 3);
///
/// let next_state = array![0.2, -0.1];
/// let loss = agent.step(state, action, 1.0, next_state, false).unwrap();
/// assert!(loss.is_none());
/// ```
pub struct DqnAgent<E = QNetwork, O = OptimizerWrapper> {
    config: DqnConfig,

    /// Estimator being trained, used for action selection
    online: E,

    /// Slowly tracking copy used for bootstrap targets
    target: E,

    optimizer: O,
    memory: ReplayBuffer,
    loss_fn: MeanSquaredError,

    /// Steps since the last learning update, modulo `update_every`
    t_step: usize,

    /// Number of learning updates performed
    learn_steps: usize,

    rng: StdRng,
}

impl DqnAgent<QNetwork, OptimizerWrapper> {
    /// Agent with the default Q-network shaped by `config` and an Adam optimizer
    pub fn from_config(config: DqnConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = QNetworkBuilder::new(config.state_size, config.action_size)
            .hidden_layers(&config.hidden_layers)
            .seed(config.seed);
        if let Some(rate) = config.dropout {
            builder = builder.dropout(rate);
        }
        let online = builder.build()?;
        let optimizer = OptimizerWrapper::adam(&online, config.learning_rate);

        Self::new(config, online, optimizer)
    }
}

impl<E: Estimator, O: Optimizer> DqnAgent<E, O> {
    /// Create an agent around a caller-supplied estimator and optimizer.
    ///
    /// The target estimator starts as an exact copy of `online` and stays in
    /// [`Mode::Eval`].
    pub fn new(config: DqnConfig, mut online: E, optimizer: O) -> Result<Self> {
        config.validate()?;

        if online.input_size() != config.state_size || online.output_size() != config.action_size {
            return Err(DqnError::dimension_mismatch(
                format!("estimator mapping {} -> {}", config.state_size, config.action_size),
                format!("estimator mapping {} -> {}", online.input_size(), online.output_size()),
            ));
        }

        online.set_mode(Mode::Train);
        // Never trained, so training-only behaviour stays off
        let mut target = online.clone();
        target.set_mode(Mode::Eval);

        let mut rng = StdRng::seed_from_u64(config.seed);
        let memory = ReplayBuffer::new(config.buffer_size, rng.gen())?;

        info!(
            state_size = config.state_size,
            action_size = config.action_size,
            buffer_size = config.buffer_size,
            batch_size = config.batch_size,
            update_every = config.update_every,
            "created DQN agent"
        );

        Ok(DqnAgent {
            config,
            online,
            target,
            optimizer,
            memory,
            loss_fn: MeanSquaredError,
            t_step: 0,
            learn_steps: 0,
            rng,
        })
    }

    /// Select an action for `state` using an epsilon-greedy policy.
    ///
    /// With probability `1 - epsilon` the action with the highest online
    /// value is returned (first index on ties), otherwise a uniformly random
    /// one. The online estimator is evaluated in [`Mode::Eval`] and always
    /// left in [`Mode::Train`] afterwards.
    pub fn act(&mut self, state: ArrayView1<f32>, epsilon: f32) -> Result<usize> {
        self.check_state(state.len(), "state")?;
        if !(0.0..=1.0).contains(&epsilon) {
            return Err(DqnError::invalid_parameter("epsilon", "Must be in [0, 1]"));
        }

        self.online.set_mode(Mode::Eval);
        let q_values = self.online.predict(state.insert_axis(Axis(0)));
        self.online.set_mode(Mode::Train);
        let q_values = q_values?;

        if self.rng.gen::<f32>() >= epsilon {
            greedy_action(q_values.row(0))
        } else {
            Ok(self.rng.gen_range(0..self.config.action_size))
        }
    }

    /// Record one transition and learn every `update_every` steps.
    ///
    /// Returns the loss of the learning update when one was performed. An
    /// update runs when the step counter wraps to zero and the buffer holds
    /// more than `batch_size` experiences.
    pub fn step(
        &mut self,
        state: Array1<f32>,
        action: usize,
        reward: f32,
        next_state: Array1<f32>,
        done: bool,
    ) -> Result<Option<f32>> {
        self.check_state(state.len(), "state")?;
        self.check_state(next_state.len(), "next_state")?;
        self.check_action(action)?;

        self.memory.add(state, action, reward, next_state, done);
        self.t_step = (self.t_step + 1) % self.config.update_every;

        trace!(t_step = self.t_step, buffer_len = self.memory.len(), "recorded transition");

        if self.t_step == 0 && self.memory.len() > self.config.batch_size {
            let batch = self.memory.sample(self.config.batch_size)?;
            let loss = self.learn(&batch, self.config.gamma)?;
            return Ok(Some(loss));
        }
        Ok(None)
    }

    /// One gradient step on `batch` followed by a soft target update.
    ///
    /// Returns the mean squared error between the online values of the taken
    /// actions and their Bellman targets, measured before the update.
    pub fn learn(&mut self, batch: &ExperienceBatch, gamma: f32) -> Result<f32> {
        self.check_batch(batch)?;
        if !(0.0..=1.0).contains(&gamma) {
            return Err(DqnError::invalid_parameter("gamma", "Must be in [0, 1]"));
        }

        // Targets are constants: nothing flows back into the target estimator
        let q_next = self.target.predict(batch.next_states.view())?;
        let q_next_max = q_next.map_axis(Axis(1), |row| {
            row.iter().fold(f32::NEG_INFINITY, |max, &value| {
                if value.is_nan() || value > max { value } else { max }
            })
        });
        let targets = q_targets(batch.rewards.view(), q_next_max.view(), batch.dones.view(), gamma)?;
        if let Some(row) = targets.iter().position(|t| t.is_nan()) {
            return Err(DqnError::NumericalError(format!("NaN Bellman target at batch row {}", row)));
        }

        self.online.zero_grad();
        let q_all = self.online.forward(batch.states.view())?;
        let q_expected: Array1<f32> = batch.actions.iter()
            .enumerate()
            .map(|(row, &action)| q_all[[row, action]])
            .collect();

        let loss = self.loss_fn.compute(q_expected.view(), targets.view())?;
        let grad = self.loss_fn.gradient(q_expected.view(), targets.view())?;

        let mut output_grad = Array2::zeros(q_all.raw_dim());
        for (row, (&action, &g)) in batch.actions.iter().zip(grad.iter()).enumerate() {
            output_grad[[row, action]] = g;
        }
        self.online.backward(output_grad.view())?;
        self.optimizer.step(&mut self.online.parameters_mut())?;

        self.soft_update()?;
        self.learn_steps += 1;

        debug!(
            learn_step = self.learn_steps,
            loss,
            mean_target = targets.mean().unwrap_or(0.0),
            "learning update"
        );
        Ok(loss)
    }

    /// Move the target estimator toward the online one by `tau`
    pub fn soft_update(&mut self) -> Result<()> {
        soft_update(&self.online, &mut self.target, self.config.tau)
    }

    pub fn config(&self) -> &DqnConfig {
        &self.config
    }

    pub fn online(&self) -> &E {
        &self.online
    }

    pub fn online_mut(&mut self) -> &mut E {
        &mut self.online
    }

    pub fn target(&self) -> &E {
        &self.target
    }

    pub fn optimizer(&self) -> &O {
        &self.optimizer
    }

    pub fn memory(&self) -> &ReplayBuffer {
        &self.memory
    }

    pub fn t_step(&self) -> usize {
        self.t_step
    }

    pub fn learn_steps(&self) -> usize {
        self.learn_steps
    }

    fn check_state(&self, len: usize, what: &str) -> Result<()> {
        if len != self.config.state_size {
            return Err(DqnError::dimension_mismatch(
                format!("{} of length {}", what, self.config.state_size),
                format!("{} of length {}", what, len),
            ));
        }
        Ok(())
    }

    fn check_action(&self, action: usize) -> Result<()> {
        if action >= self.config.action_size {
            return Err(DqnError::InvalidAction {
                action,
                action_size: self.config.action_size,
            });
        }
        Ok(())
    }

    fn check_batch(&self, batch: &ExperienceBatch) -> Result<()> {
        let n = batch.len();
        if n == 0 {
            return Err(DqnError::invalid_parameter("batch", "Must contain at least one experience"));
        }
        self.check_state(batch.states.ncols(), "states")?;
        self.check_state(batch.next_states.ncols(), "next_states")?;
        let lengths = [batch.actions.len(), batch.rewards.len(), batch.next_states.nrows(), batch.dones.len()];
        if lengths.iter().any(|&len| len != n) {
            return Err(DqnError::dimension_mismatch(
                format!("{} rows in every batch field", n),
                format!("{:?}", lengths),
            ));
        }
        for &action in batch.actions.iter() {
            self.check_action(action)?;
        }
        Ok(())
    }
}

/// Bellman targets `r + gamma * q_next * (1 - done)`.
///
/// Terminal rows take the reward alone, so a non-finite bootstrap value
/// cannot reach them.
pub fn q_targets(
    rewards: ArrayView1<f32>,
    q_next: ArrayView1<f32>,
    dones: ArrayView1<f32>,
    gamma: f32,
) -> Result<Array1<f32>> {
    if q_next.len() != rewards.len() || dones.len() != rewards.len() {
        return Err(DqnError::dimension_mismatch(
            format!("{} rewards, next values and done flags", rewards.len()),
            format!("{}, {} and {}", rewards.len(), q_next.len(), dones.len()),
        ));
    }

    let mut targets = Array1::zeros(rewards.len());
    Zip::from(&mut targets)
        .and(&rewards)
        .and(&q_next)
        .and(&dones)
        .for_each(|t, &r, &q, &d| {
            *t = if d >= 1.0 { r } else { r + gamma * q * (1.0 - d) };
        });
    Ok(targets)
}

/// Soft update: `target = tau * local + (1 - tau) * target`, parameter by parameter.
pub fn soft_update<E: Estimator>(local: &E, target: &mut E, tau: f32) -> Result<()> {
    if !(0.0..=1.0).contains(&tau) {
        return Err(DqnError::invalid_parameter("tau", "Must be in [0, 1]"));
    }

    let local_params = local.parameters();
    let mut target_params = target.parameters_mut();
    if local_params.len() != target_params.len() {
        return Err(DqnError::dimension_mismatch(
            format!("{} parameter tensors", local_params.len()),
            format!("{} parameter tensors", target_params.len()),
        ));
    }

    for (target_param, local_param) in target_params.iter_mut().zip(local_params.iter()) {
        if target_param.value.shape() != local_param.shape() {
            return Err(DqnError::dimension_mismatch(
                format!("{:?}", local_param.shape()),
                format!("{:?}", target_param.value.shape()),
            ));
        }
        target_param.value.zip_mut_with(local_param, |t, &l| {
            *t = tau * l + (1.0 - tau) * *t;
        });
    }
    Ok(())
}

/// Builder pattern for DqnAgent
pub struct DqnAgentBuilder {
    config: DqnConfig,
}

impl DqnAgentBuilder {
    pub fn new(state_size: usize, action_size: usize) -> Self {
        DqnAgentBuilder {
            config: DqnConfig::new(state_size, action_size),
        }
    }

    pub fn hidden_layers(mut self, sizes: &[usize]) -> Self {
        self.config.hidden_layers = sizes.to_vec();
        self
    }

    pub fn dropout(mut self, rate: f32) -> Self {
        self.config.dropout = Some(rate);
        self
    }

    pub fn buffer_size(mut self, size: usize) -> Self {
        self.config.buffer_size = size;
        self
    }

    pub fn batch_size(mut self, size: usize) -> Self {
        self.config.batch_size = size;
        self
    }

    pub fn gamma(mut self, gamma: f32) -> Self {
        self.config.gamma = gamma;
        self
    }

    pub fn tau(mut self, tau: f32) -> Self {
        self.config.tau = tau;
        self
    }

    pub fn learning_rate(mut self, lr: f32) -> Self {
        self.config.learning_rate = lr;
        self
    }

    pub fn update_every(mut self, steps: usize) -> Self {
        self.config.update_every = steps;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn build(self) -> Result<DqnAgent> {
        DqnAgent::from_config(self.config)
    }
}
