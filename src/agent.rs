use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use rand::rngs::ThreadRng;
use rand::Rng;

use crate::error::Result;
use crate::value_function::{TrainOutcome, ValueFunction};

/// Epsilon-greedy agent over a pluggable action-value approximator.
///
/// With probability `eps` the agent explores with a uniformly random action;
/// otherwise it exploits the approximator's argmax. The exploration rate is
/// mutated externally by the experiment driver, decaying multiplicatively
/// after each episode down to a floor.
pub struct EpsGreedyAgent<V: ValueFunction> {
    /// Current exploration rate in [0, 1].
    pub eps: f32,
    num_actions: usize,
    value_function: V,
    rng: ThreadRng,
}

impl<V: ValueFunction> EpsGreedyAgent<V> {
    pub fn new(value_function: V, eps: f32) -> Self {
        let num_actions = value_function.num_actions();
        EpsGreedyAgent {
            eps: eps.clamp(0.0, 1.0),
            num_actions,
            value_function,
            rng: rand::thread_rng(),
        }
    }

    /// Select an action for `state` by the epsilon-greedy policy.
    ///
    /// Greedy ties break toward the first-occurring action index.
    pub fn act(&mut self, state: ArrayView1<f32>) -> Result<usize> {
        if self.rng.gen::<f32>() < self.eps {
            return Ok(self.rng.gen_range(0..self.num_actions));
        }

        let states = state.insert_axis(Axis(0));
        let q_values = self.value_function.predict(states);
        let row = q_values.row(0);

        let mut best = 0;
        let mut best_q = f32::NEG_INFINITY;
        for (idx, &q) in row.iter().enumerate() {
            if q > best_q {
                best = idx;
                best_q = q;
            }
        }
        Ok(best)
    }

    /// Predicted action-values, one row per input state.
    pub fn predict_q_values(&mut self, states: ArrayView2<f32>) -> Array2<f32> {
        self.value_function.predict(states)
    }

    /// One gradient step on (states, targets); returns the loss and the
    /// approximator's weight-magnitude diagnostics.
    pub fn train(&mut self, states: ArrayView2<f32>, targets: ArrayView2<f32>) -> Result<TrainOutcome> {
        self.value_function.train(states, targets)
    }

    /// Multiplicative exploration decay: `eps <- max(eps * factor, floor)`.
    pub fn decay_eps(&mut self, factor: f32, floor: f32) {
        self.eps = (self.eps * factor).max(floor);
    }

    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    pub fn value_function(&self) -> &V {
        &self.value_function
    }

    pub fn value_function_mut(&mut self) -> &mut V {
        &mut self.value_function
    }
}
