use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::agent::EpsGreedyAgent;
use crate::env::{Environment, StateNormalizer};
use crate::error::{AscentError, Result};
use crate::replay_memory::ReplayMemory;
use crate::runner::run_episode;
use crate::stats::Statistics;
use crate::value_function::ValueFunction;

/// All knobs of an averaged experiment. Defaults carry the Mountain Car
/// values the crate was written around.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Discount factor for bootstrapped targets.
    pub discount: f32,
    /// Multiplicative per-episode exploration decay.
    pub eps_decay: f32,
    /// Floor for the exploration rate.
    pub eps_min: f32,
    /// Transitions per training batch.
    pub batch_size: usize,
    /// Replay memory capacity.
    pub memory_capacity: usize,
    /// Episode budget per run.
    pub max_episodes: usize,
    /// Step budget per episode.
    pub max_steps: usize,
    /// Average reward at which the problem counts as solved.
    pub min_avg_reward: f32,
    /// Trailing episodes averaged for the convergence signal.
    pub avg_window: usize,
    /// Consecutive window averages that must meet the threshold.
    pub solved_window: usize,
    /// Number of independent runs to average over.
    pub runs: usize,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        ExperimentConfig {
            discount: 0.99,
            eps_decay: 0.9,
            eps_min: 1e-4,
            batch_size: 64,
            memory_capacity: 100_000,
            max_episodes: 900,
            max_steps: 15_000,
            min_avg_reward: -30.0,
            avg_window: 100,
            solved_window: 200,
            runs: 3,
        }
    }
}

impl ExperimentConfig {
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(AscentError::invalid_parameter("batch_size", "must be non-zero"));
        }
        if self.memory_capacity <= self.batch_size {
            return Err(AscentError::invalid_parameter(
                "memory_capacity",
                "must exceed batch_size",
            ));
        }
        if self.avg_window == 0 || self.solved_window == 0 {
            return Err(AscentError::invalid_parameter(
                "avg_window/solved_window",
                "must be non-zero",
            ));
        }
        if self.max_episodes == 0 || self.max_steps == 0 {
            return Err(AscentError::invalid_parameter(
                "max_episodes/max_steps",
                "must be non-zero",
            ));
        }
        if self.runs == 0 {
            return Err(AscentError::invalid_parameter("runs", "must be non-zero"));
        }
        if !(0.0..=1.0).contains(&self.discount) {
            return Err(AscentError::invalid_parameter("discount", "must be in [0, 1]"));
        }
        if !(self.eps_decay > 0.0 && self.eps_decay <= 1.0) {
            return Err(AscentError::invalid_parameter("eps_decay", "must be in (0, 1]"));
        }
        Ok(())
    }
}

/// Fixed-length sliding window of trailing-average rewards used to detect
/// sustained convergence.
///
/// The window starts primed with negative-infinity sentinels so a run is
/// never considered solved before `len` real averages have been pushed; with
/// averages only produced after the warm-up episodes, termination cannot
/// happen before `avg_window + solved_window` episodes.
pub struct ConvergenceWindow {
    window: VecDeque<f32>,
    threshold: f32,
}

impl ConvergenceWindow {
    pub fn new(len: usize, threshold: f32) -> Self {
        let mut window = VecDeque::with_capacity(len);
        window.extend(std::iter::repeat(f32::NEG_INFINITY).take(len));
        ConvergenceWindow { window, threshold }
    }

    /// Push a new trailing average, evicting the oldest entry.
    pub fn push(&mut self, avg: f32) {
        self.window.pop_front();
        self.window.push_back(avg);
    }

    /// True once every entry meets the threshold.
    pub fn is_converged(&self) -> bool {
        self.window.iter().all(|&avg| avg >= self.threshold)
    }

    /// Entries currently at or above the threshold, for progress reporting.
    pub fn solved_count(&self) -> usize {
        self.window.iter().filter(|&&avg| avg >= self.threshold).count()
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }
}

/// Scalars logged for one episode.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EpisodeRecord {
    pub reward: f32,
    pub loss: f32,
    pub weight_norms: Vec<f32>,
}

/// Per-run episode log, flattened into one array per quantity, plus how the
/// run ended.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunRecord {
    pub rewards: Vec<f32>,
    pub losses: Vec<f32>,
    pub weight_norms: Vec<Vec<f32>>,
    pub episodes: usize,
    pub solved: bool,
}

impl RunRecord {
    /// Split an ordered episode log into the flat per-quantity arrays the
    /// export layer persists.
    pub fn from_episodes(log: Vec<EpisodeRecord>, solved: bool) -> Self {
        let episodes = log.len();
        let mut rewards = Vec::with_capacity(episodes);
        let mut losses = Vec::with_capacity(episodes);
        let mut weight_norms = Vec::with_capacity(episodes);
        for record in log {
            rewards.push(record.reward);
            losses.push(record.loss);
            weight_norms.push(record.weight_norms);
        }
        RunRecord {
            rewards,
            losses,
            weight_norms,
            episodes,
            solved,
        }
    }
}

/// All runs plus the elementwise across-run reward average.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExperimentReport {
    pub runs: Vec<RunRecord>,
    /// `average_rewards[i]` is the mean episode-`i` reward over the runs
    /// that reached episode `i`.
    pub average_rewards: Vec<f32>,
}

/// Repeats episodes until the convergence window fills with above-threshold
/// averages or the episode budget runs out, then repeats the whole run for a
/// number of independent experiments and averages the results.
pub struct ExperimentDriver<E: Environment> {
    config: ExperimentConfig,
    env: E,
    normalizer: Option<Box<dyn StateNormalizer>>,
}

impl<E: Environment> ExperimentDriver<E> {
    pub fn new(config: ExperimentConfig, env: E) -> Result<Self> {
        config.validate()?;
        Ok(ExperimentDriver {
            config,
            env,
            normalizer: None,
        })
    }

    pub fn with_normalizer(mut self, normalizer: Box<dyn StateNormalizer>) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// Run all experiments. `make_agent` is called once per run so every run
    /// starts from a freshly initialized agent and an empty memory.
    pub fn run<V, F>(&mut self, mut make_agent: F) -> Result<ExperimentReport>
    where
        V: ValueFunction,
        F: FnMut() -> Result<EpsGreedyAgent<V>>,
    {
        let mut runs = Vec::with_capacity(self.config.runs);

        for run_idx in 0..self.config.runs {
            println!("Run {}/{}", run_idx + 1, self.config.runs);
            let agent = make_agent()?;
            let record = self.run_once(agent)?;
            runs.push(record);
        }

        let average_rewards = average_across_runs(&runs);
        Ok(ExperimentReport {
            runs,
            average_rewards,
        })
    }

    /// One run: episodes until convergence or budget exhaustion.
    fn run_once<V: ValueFunction>(&mut self, mut agent: EpsGreedyAgent<V>) -> Result<RunRecord> {
        let cfg = &self.config;
        let mut memory = ReplayMemory::new(cfg.memory_capacity);
        let mut window = ConvergenceWindow::new(cfg.solved_window, cfg.min_avg_reward);

        let mut log: Vec<EpisodeRecord> = Vec::new();

        let mut ep = 0;
        while !window.is_converged() && ep < cfg.max_episodes {
            let outcome = run_episode(
                &mut self.env,
                &mut agent,
                self.normalizer.as_deref(),
                &mut memory,
                cfg.batch_size,
                cfg.discount,
                cfg.max_steps,
            )?;

            log.push(EpisodeRecord {
                reward: outcome.total_reward,
                loss: outcome.loss,
                weight_norms: outcome.weight_norms,
            });

            if ep >= cfg.avg_window {
                let recent: Vec<f32> = log[ep - cfg.avg_window..ep]
                    .iter()
                    .map(|record| record.reward)
                    .collect();
                let trailing = Statistics::from_slice(&recent);
                window.push(trailing.mean);
                println!(
                    "Episode {:5} finished with a reward of {:6.1}. \
                     Reward over the last {} episodes: avg={:4.2}, var={:4.2}. \
                     Minimum of {} reached in {} of the last {} episodes.",
                    ep,
                    outcome.total_reward,
                    cfg.avg_window,
                    trailing.mean,
                    trailing.variance,
                    cfg.min_avg_reward,
                    window.solved_count(),
                    window.len(),
                );
            } else {
                println!("Episode {} with a reward of {}.", ep, outcome.total_reward);
            }

            agent.decay_eps(cfg.eps_decay, cfg.eps_min);
            ep += 1;
        }

        let solved = window.is_converged();
        Ok(RunRecord::from_episodes(log, solved))
    }
}

/// Elementwise reward average over runs of possibly different lengths; each
/// index averages only the runs that reached it.
fn average_across_runs(runs: &[RunRecord]) -> Vec<f32> {
    let longest = runs.iter().map(|r| r.rewards.len()).max().unwrap_or(0);
    let mut averages = Vec::with_capacity(longest);

    for i in 0..longest {
        let mut sum = 0.0;
        let mut count = 0;
        for run in runs {
            if let Some(&r) = run.rewards.get(i) {
                sum += r;
                count += 1;
            }
        }
        averages.push(sum / count as f32);
    }

    averages
}
