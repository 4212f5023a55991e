//! # Ascent - Averaged DQN Experiments for Classic Control
//!
//! Ascent trains a Deep Q-Network agent with experience replay on the
//! Mountain Car control task, repeats the run for several independent
//! experiments, and persists per-episode reward and loss arrays together
//! with the across-run average.
//!
//! The library holds the reusable pieces: a bounded replay memory, an
//! epsilon-greedy agent over a pluggable value-function approximator, the
//! per-episode interaction/training loop, and a convergence-driven
//! experiment driver. The `average_mountain_car` binary wires them together
//! into the full experiment.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ascent::agent::EpsGreedyAgent;
//! use ascent::env::MountainCar;
//! use ascent::experiment::{ExperimentConfig, ExperimentDriver};
//! use ascent::optimizer::{Adam, OptimizerWrapper};
//! use ascent::value_function::QNetwork;
//!
//! let config = ExperimentConfig::default();
//! let mut driver = ExperimentDriver::new(config, MountainCar::new()).unwrap();
//! let report = driver
//!     .run(|| {
//!         let value_function = QNetwork::new(
//!             2,
//!             &[128, 128],
//!             3,
//!             |layers| OptimizerWrapper::Adam(Adam::default_for(layers)),
//!             0.001,
//!         )?;
//!         Ok(EpsGreedyAgent::new(value_function, 0.9))
//!     })
//!     .unwrap();
//! println!("{} runs averaged", report.runs.len());
//! ```
//!
//! ## Module Organization
//!
//! - [`agent`] - Epsilon-greedy agent over a value function
//! - [`env`] - Environment and state-normalizer traits, Mountain Car
//! - [`error`] - Error types and result handling
//! - [`experiment`] - Configuration, convergence window, experiment driver
//! - [`export`] - CSV/JSON persistence of experiment results
//! - [`network`] - Minimal fully connected network
//! - [`optimizer`] - SGD and Adam
//! - [`plot`] - ASCII plots of result series
//! - [`replay_memory`] - Bounded FIFO experience replay
//! - [`runner`] - Single-episode interaction and training loop
//! - [`stats`] - Summary statistics and moving averages
//! - [`value_function`] - Approximator capability trait and MLP-backed impl

pub mod agent;
pub mod env;
pub mod error;
pub mod experiment;
pub mod export;
pub mod network;
pub mod optimizer;
pub mod plot;
pub mod replay_memory;
pub mod runner;
pub mod stats;
pub mod value_function;

#[cfg(test)]
mod tests;
