//! Environment and state-normalizer collaborator traits, plus the Mountain
//! Car environment used by the experiment binary.

pub mod mountain_car;

pub use mountain_car::MountainCar;

use ndarray::{Array1, ArrayView1};

/// The observation, reward and terminal flag produced by one environment step.
#[derive(Clone, Debug)]
pub struct Step {
    pub next_state: Array1<f32>,
    pub reward: f32,
    pub done: bool,
}

/// An episodic control task with a discrete action space.
pub trait Environment {
    /// Start a new episode and return the initial state.
    fn reset(&mut self) -> Array1<f32>;

    /// Advance one step with the given action index.
    fn step(&mut self, action: usize) -> Step;

    /// Number of discrete actions.
    fn num_actions(&self) -> usize;

    /// Dimensionality of the observation vector.
    fn state_dim(&self) -> usize;
}

/// Optional preprocessing applied to every observation before the agent
/// sees it.
pub trait StateNormalizer {
    fn transform(&self, state: ArrayView1<f32>) -> Array1<f32>;
}

/// Scales each state component from `[low, high]` into `[-1, 1]`.
pub struct RangeNormalizer {
    low: Array1<f32>,
    high: Array1<f32>,
}

impl RangeNormalizer {
    pub fn new(low: Array1<f32>, high: Array1<f32>) -> Self {
        assert_eq!(low.len(), high.len());
        RangeNormalizer { low, high }
    }
}

impl StateNormalizer for RangeNormalizer {
    fn transform(&self, state: ArrayView1<f32>) -> Array1<f32> {
        let mut out = Array1::zeros(state.len());
        for (i, &v) in state.iter().enumerate() {
            let span = self.high[i] - self.low[i];
            out[i] = if span == 0.0 {
                0.0
            } else {
                2.0 * (v - self.low[i]) / span - 1.0
            };
        }
        out
    }
}
