use ndarray::{Array2, ArrayView2};

use crate::error::{AscentError, Result};
use crate::network::{Activation, NeuralNetwork};
use crate::optimizer::OptimizerWrapper;

/// Scalar loss plus the per-layer weight-magnitude diagnostics produced by
/// one training step.
#[derive(Clone, Debug)]
pub struct TrainOutcome {
    pub loss: f32,
    pub weight_norms: Vec<f32>,
}

/// Capability interface for a trainable action-value approximator.
///
/// The concrete architecture is a pluggable detail; the training loop only
/// needs batched prediction and a single gradient step on supplied targets.
pub trait ValueFunction {
    /// Predicted action-values, one row per input state.
    fn predict(&mut self, states: ArrayView2<f32>) -> Array2<f32>;

    /// One gradient step on a batch of (state, target) rows.
    fn train(&mut self, states: ArrayView2<f32>, targets: ArrayView2<f32>) -> Result<TrainOutcome>;

    /// Number of actions scored per state.
    fn num_actions(&self) -> usize;
}

/// Action-value approximator backed by a small fully connected network.
pub struct QNetwork {
    network: NeuralNetwork,
    num_actions: usize,
    learning_rate: f32,
}

impl QNetwork {
    /// Build a ReLU MLP with a linear output layer scoring `num_actions`
    /// actions for `state_dim`-dimensional states.
    pub fn new(
        state_dim: usize,
        hidden_sizes: &[usize],
        num_actions: usize,
        make_optimizer: impl FnOnce(&[crate::network::Layer]) -> OptimizerWrapper,
        learning_rate: f32,
    ) -> Result<Self> {
        if state_dim == 0 || num_actions == 0 {
            return Err(AscentError::invalid_parameter(
                "state_dim/num_actions",
                "must be non-zero",
            ));
        }
        if learning_rate <= 0.0 {
            return Err(AscentError::invalid_parameter(
                "learning_rate",
                "must be positive",
            ));
        }

        let mut layer_sizes = Vec::with_capacity(hidden_sizes.len() + 2);
        layer_sizes.push(state_dim);
        layer_sizes.extend_from_slice(hidden_sizes);
        layer_sizes.push(num_actions);

        let mut activations = vec![Activation::Relu; layer_sizes.len() - 2];
        activations.push(Activation::Linear);

        // Build once with a placeholder optimizer so the real one can size its
        // per-layer state from the finished layers.
        let network = NeuralNetwork::new(
            &layer_sizes,
            &activations,
            OptimizerWrapper::SGD(crate::optimizer::SGD::new()),
        );
        let optimizer = make_optimizer(&network.layers);
        let network = NeuralNetwork {
            layers: network.layers,
            optimizer,
        };

        Ok(QNetwork {
            network,
            num_actions,
            learning_rate,
        })
    }

    /// Persist the network weights and optimizer state.
    pub fn save(&self, path: &str) -> Result<()> {
        self.network.save(path)
    }

    pub fn load(path: &str, learning_rate: f32) -> Result<Self> {
        let network = NeuralNetwork::load(path)?;
        let num_actions = network
            .layers
            .last()
            .map(|l| l.biases.len())
            .ok_or_else(|| AscentError::invalid_parameter("path", "network has no layers"))?;
        Ok(QNetwork {
            network,
            num_actions,
            learning_rate,
        })
    }
}

impl ValueFunction for QNetwork {
    fn predict(&mut self, states: ArrayView2<f32>) -> Array2<f32> {
        self.network.forward_batch(states)
    }

    fn train(&mut self, states: ArrayView2<f32>, targets: ArrayView2<f32>) -> Result<TrainOutcome> {
        if states.nrows() != targets.nrows() {
            return Err(AscentError::dimension_mismatch(
                format!("{} target rows", states.nrows()),
                format!("{}", targets.nrows()),
            ));
        }
        if targets.ncols() != self.num_actions {
            return Err(AscentError::dimension_mismatch(
                format!("{} target columns", self.num_actions),
                format!("{}", targets.ncols()),
            ));
        }

        let loss = self
            .network
            .train_minibatch(states, targets, self.learning_rate);
        if !loss.is_finite() {
            return Err(AscentError::NumericalError(format!(
                "non-finite training loss: {}",
                loss
            )));
        }

        Ok(TrainOutcome {
            loss,
            weight_norms: self.network.weight_norms(),
        })
    }

    fn num_actions(&self) -> usize {
        self.num_actions
    }
}
