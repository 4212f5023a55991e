use ndarray::Array2;

use crate::agent::EpsGreedyAgent;
use crate::env::{Environment, StateNormalizer};
use crate::error::Result;
use crate::replay_memory::{ReplayMemory, Transition};
use crate::value_function::ValueFunction;

/// How an episode ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EpisodeStatus {
    /// The environment signalled a terminal state.
    Done,
    /// The step budget ran out without a terminal signal.
    Truncated,
}

/// Scalars produced by one episode of interaction and training.
#[derive(Clone, Debug)]
pub struct EpisodeOutcome {
    pub total_reward: f32,
    pub loss: f32,
    pub weight_norms: Vec<f32>,
    pub steps: usize,
    pub status: EpisodeStatus,
}

/// Bootstrapped one-step Q-learning targets for a sampled batch.
///
/// `target = reward + (1 - done) * discount * max_a Q(next_state, a)`; done
/// transitions truncate the bootstrap so the target equals the reward alone.
/// The returned matrix is the current predictions for the batch states with
/// only the taken action's entry overwritten, leaving the other actions with
/// zero gradient contribution.
pub fn q_learning_targets<V: ValueFunction>(
    agent: &mut EpsGreedyAgent<V>,
    batch: &[&Transition],
    discount: f32,
) -> (Array2<f32>, Array2<f32>) {
    let batch_size = batch.len();
    let state_dim = batch[0].state.len();

    let mut states = Array2::zeros((batch_size, state_dim));
    let mut next_states = Array2::zeros((batch_size, state_dim));
    for (i, transition) in batch.iter().enumerate() {
        states.row_mut(i).assign(&transition.state);
        next_states.row_mut(i).assign(&transition.next_state);
    }

    let q_next = agent.predict_q_values(next_states.view());
    let mut targets = agent.predict_q_values(states.view());

    for (i, transition) in batch.iter().enumerate() {
        let target = if transition.done {
            transition.reward
        } else {
            let max_next_q = q_next
                .row(i)
                .iter()
                .fold(f32::NEG_INFINITY, |max, &v| max.max(v));
            transition.reward + discount * max_next_q
        };
        targets[[i, transition.action]] = target;
    }

    (states, targets)
}

/// Drive one episode of agent/environment interaction.
///
/// Each step selects an action, advances the environment, accumulates the
/// reward and stores the transition. Once the memory holds more than
/// `batch_size` transitions, every step also samples a batch and performs one
/// training step on bootstrapped targets. Environment and approximator
/// failures propagate and end the run.
pub fn run_episode<E, V>(
    env: &mut E,
    agent: &mut EpsGreedyAgent<V>,
    normalizer: Option<&dyn StateNormalizer>,
    memory: &mut ReplayMemory,
    batch_size: usize,
    discount: f32,
    max_steps: usize,
) -> Result<EpisodeOutcome>
where
    E: Environment,
    V: ValueFunction,
{
    let mut state = env.reset();
    if let Some(n) = normalizer {
        state = n.transform(state.view());
    }

    let mut done = false;
    let mut total_reward = 0.0;
    let mut loss = 0.0;
    let mut weight_norms = Vec::new();
    let mut steps = 0;

    for _ in 0..max_steps {
        if done {
            break;
        }

        let action = agent.act(state.view())?;
        let step = env.step(action);
        total_reward += step.reward;
        done = step.done;
        steps += 1;

        let mut next_state = step.next_state;
        if let Some(n) = normalizer {
            next_state = n.transform(next_state.view());
        }

        memory.add(Transition {
            state: state.clone(),
            action,
            reward: step.reward,
            next_state: next_state.clone(),
            done,
        });

        if batch_size > 0 && memory.len() > batch_size {
            let batch = memory.sample(batch_size)?;
            let (states, targets) = q_learning_targets(agent, &batch, discount);
            let outcome = agent.train(states.view(), targets.view())?;
            loss = outcome.loss;
            weight_norms = outcome.weight_norms;
        }

        state = next_state;
    }

    let status = if done {
        EpisodeStatus::Done
    } else {
        EpisodeStatus::Truncated
    };

    Ok(EpisodeOutcome {
        total_reward,
        loss,
        weight_norms,
        steps,
        status,
    })
}
