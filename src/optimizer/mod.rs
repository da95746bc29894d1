//! # Optimizers
//!
//! An optimizer updates parameter tensors from the gradients accumulated next
//! to them. The estimator owns gradient clearing (`zero_grad`) and
//! accumulation (`backward`); the optimizer applies one update per `step`.
//! Stateful optimizers are shaped from the estimator they will train and
//! refuse parameter sets of any other shape.

use ndarray::{ArrayD, Zip};
use serde::{Serialize, Deserialize};

use crate::error::{DqnError, Result};
use crate::estimator::{Estimator, ParamMut};

pub trait Optimizer {
    /// Apply one update to every parameter from its accumulated gradient
    fn step(&mut self, params: &mut [ParamMut<'_>]) -> Result<()>;

    fn learning_rate(&self) -> f32;
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub enum OptimizerWrapper {
    SGD(Sgd),
    Adam(Adam),
    RMSProp(RmsProp),
}

impl OptimizerWrapper {
    /// Adam with default moments over the parameters of `estimator`
    pub fn adam<E: Estimator>(estimator: &E, learning_rate: f32) -> Self {
        OptimizerWrapper::Adam(Adam::new(estimator, learning_rate))
    }
}

impl Optimizer for OptimizerWrapper {
    fn step(&mut self, params: &mut [ParamMut<'_>]) -> Result<()> {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.step(params),
            OptimizerWrapper::Adam(optimizer) => optimizer.step(params),
            OptimizerWrapper::RMSProp(optimizer) => optimizer.step(params),
        }
    }

    fn learning_rate(&self) -> f32 {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.learning_rate(),
            OptimizerWrapper::Adam(optimizer) => optimizer.learning_rate(),
            OptimizerWrapper::RMSProp(optimizer) => optimizer.learning_rate(),
        }
    }
}

fn zeros_like<E: Estimator>(estimator: &E) -> Vec<ArrayD<f32>> {
    estimator
        .parameters()
        .iter()
        .map(|param| ArrayD::zeros(param.raw_dim()))
        .collect()
}

fn check_shapes(state: &[ArrayD<f32>], params: &[ParamMut<'_>]) -> Result<()> {
    if state.len() != params.len() {
        return Err(DqnError::dimension_mismatch(
            format!("{} parameter tensors", state.len()),
            format!("{} parameter tensors", params.len()),
        ));
    }
    for (expected, param) in state.iter().zip(params.iter()) {
        if expected.shape() != param.value.shape() || expected.shape() != param.grad.shape() {
            return Err(DqnError::dimension_mismatch(
                format!("{:?}", expected.shape()),
                format!("{:?}", param.value.shape()),
            ));
        }
    }
    Ok(())
}

/// Plain gradient descent
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Sgd {
    pub learning_rate: f32,
}

impl Sgd {
    pub fn new(learning_rate: f32) -> Sgd {
        Sgd { learning_rate }
    }
}

impl Optimizer for Sgd {
    fn step(&mut self, params: &mut [ParamMut<'_>]) -> Result<()> {
        let lr = self.learning_rate;
        for param in params.iter_mut() {
            if param.value.shape() != param.grad.shape() {
                return Err(DqnError::dimension_mismatch(
                    format!("{:?}", param.value.shape()),
                    format!("{:?}", param.grad.shape()),
                ));
            }
            param.value.zip_mut_with(&param.grad, |w, &g| *w -= lr * g);
        }
        Ok(())
    }

    fn learning_rate(&self) -> f32 {
        self.learning_rate
    }
}

/// Adam with bias-corrected first and second moment estimates per parameter
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Adam {
    pub learning_rate: f32,
    pub beta1: f32,
    pub beta2: f32,
    pub epsilon: f32,
    m: Vec<ArrayD<f32>>,
    v: Vec<ArrayD<f32>>,
    pub t: i32,
}

impl Adam {
    pub fn new<E: Estimator>(estimator: &E, learning_rate: f32) -> Self {
        Self::with_moments(estimator, learning_rate, 0.9, 0.999, 1e-8)
    }

    pub fn with_moments<E: Estimator>(estimator: &E, learning_rate: f32, beta1: f32, beta2: f32, epsilon: f32) -> Self {
        Adam {
            learning_rate,
            beta1,
            beta2,
            epsilon,
            m: zeros_like(estimator),
            v: zeros_like(estimator),
            t: 0,
        }
    }
}

impl Optimizer for Adam {
    fn step(&mut self, params: &mut [ParamMut<'_>]) -> Result<()> {
        check_shapes(&self.m, params)?;
        self.t += 1;

        let (lr, beta1, beta2, eps) = (self.learning_rate, self.beta1, self.beta2, self.epsilon);
        let bias1 = 1.0 - beta1.powi(self.t);
        let bias2 = 1.0 - beta2.powi(self.t);

        for ((param, m), v) in params.iter_mut().zip(self.m.iter_mut()).zip(self.v.iter_mut()) {
            Zip::from(&mut param.value)
                .and(&param.grad)
                .and(m)
                .and(v)
                .for_each(|w, &g, m, v| {
                    *m = beta1 * *m + (1.0 - beta1) * g;
                    *v = beta2 * *v + (1.0 - beta2) * g * g;
                    let m_hat = *m / bias1;
                    let v_hat = *v / bias2;
                    *w -= lr * m_hat / (v_hat.sqrt() + eps);
                });
        }
        Ok(())
    }

    fn learning_rate(&self) -> f32 {
        self.learning_rate
    }
}

/// RMSProp optimizer
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RmsProp {
    pub learning_rate: f32,
    pub beta: f32,
    pub epsilon: f32,
    v: Vec<ArrayD<f32>>,
}

impl RmsProp {
    pub fn new<E: Estimator>(estimator: &E, learning_rate: f32) -> Self {
        Self::with_decay(estimator, learning_rate, 0.99, 1e-8)
    }

    pub fn with_decay<E: Estimator>(estimator: &E, learning_rate: f32, beta: f32, epsilon: f32) -> Self {
        RmsProp {
            learning_rate,
            beta,
            epsilon,
            v: zeros_like(estimator),
        }
    }
}

impl Optimizer for RmsProp {
    fn step(&mut self, params: &mut [ParamMut<'_>]) -> Result<()> {
        check_shapes(&self.v, params)?;

        let (lr, beta, eps) = (self.learning_rate, self.beta, self.epsilon);
        for (param, v) in params.iter_mut().zip(self.v.iter_mut()) {
            Zip::from(&mut param.value)
                .and(&param.grad)
                .and(v)
                .for_each(|w, &g, v| {
                    *v = beta * *v + (1.0 - beta) * g * g;
                    *w -= lr * g / (v.sqrt() + eps);
                });
        }
        Ok(())
    }

    fn learning_rate(&self) -> f32 {
        self.learning_rate
    }
}
