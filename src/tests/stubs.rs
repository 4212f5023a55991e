//! Deterministic stand-ins for the environment and approximator
//! collaborators, shared across the unit tests.

use ndarray::{Array1, Array2, ArrayView2};

use crate::env::{Environment, Step};
use crate::error::Result;
use crate::value_function::{TrainOutcome, ValueFunction};

/// Value function that scores every state with the same fixed action-value
/// row and counts training calls without updating anything.
pub struct FixedValueFunction {
    pub q_row: Vec<f32>,
    pub train_calls: usize,
    pub loss: f32,
}

impl FixedValueFunction {
    pub fn new(q_row: Vec<f32>) -> Self {
        FixedValueFunction {
            q_row,
            train_calls: 0,
            loss: 0.1,
        }
    }
}

impl ValueFunction for FixedValueFunction {
    fn predict(&mut self, states: ArrayView2<f32>) -> Array2<f32> {
        let mut out = Array2::zeros((states.nrows(), self.q_row.len()));
        for mut row in out.rows_mut() {
            row.assign(&Array1::from_vec(self.q_row.clone()));
        }
        out
    }

    fn train(&mut self, _states: ArrayView2<f32>, _targets: ArrayView2<f32>) -> Result<TrainOutcome> {
        self.train_calls += 1;
        Ok(TrainOutcome {
            loss: self.loss,
            weight_norms: vec![0.0; 3],
        })
    }

    fn num_actions(&self) -> usize {
        self.q_row.len()
    }
}

/// Environment with fixed-length episodes and a constant per-step reward.
pub struct FixedRewardEnv {
    pub episode_len: usize,
    pub reward: f32,
    step_count: usize,
}

impl FixedRewardEnv {
    pub fn new(episode_len: usize, reward: f32) -> Self {
        FixedRewardEnv {
            episode_len,
            reward,
            step_count: 0,
        }
    }
}

impl Environment for FixedRewardEnv {
    fn reset(&mut self) -> Array1<f32> {
        self.step_count = 0;
        Array1::zeros(2)
    }

    fn step(&mut self, _action: usize) -> Step {
        self.step_count += 1;
        Step {
            next_state: Array1::from_vec(vec![self.step_count as f32, 0.0]),
            reward: self.reward,
            done: self.step_count >= self.episode_len,
        }
    }

    fn num_actions(&self) -> usize {
        2
    }

    fn state_dim(&self) -> usize {
        2
    }
}
