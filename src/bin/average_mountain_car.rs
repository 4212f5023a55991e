//! Averaged DQN experiment on Mountain Car.
//!
//! Trains an epsilon-greedy DQN agent until the trailing-average reward stays
//! above the solve threshold, repeats the run for several independent
//! experiments, writes the reward/loss arrays to `results/`, and prints the
//! averaged reward curve.

use std::path::Path;
use std::process;

use ascent::agent::EpsGreedyAgent;
use ascent::env::MountainCar;
use ascent::error::Result;
use ascent::experiment::{ExperimentConfig, ExperimentDriver};
use ascent::export::export_report;
use ascent::optimizer::{Adam, OptimizerWrapper};
use ascent::plot::plot_series;
use ascent::stats::moving_average;
use ascent::value_function::QNetwork;

const HIDDEN_SIZES: [usize; 2] = [128, 128];
const LEARNING_RATE: f32 = 0.001;
const INITIAL_EPS: f32 = 0.9;
const RESULTS_DIR: &str = "results";

fn run() -> Result<()> {
    let config = ExperimentConfig::default();
    let env = MountainCar::new();
    let state_dim = 2;
    let num_actions = 3;

    let mut driver = ExperimentDriver::new(config.clone(), env)?;
    let report = driver.run(|| {
        let value_function = QNetwork::new(
            state_dim,
            &HIDDEN_SIZES,
            num_actions,
            |layers| OptimizerWrapper::Adam(Adam::default_for(layers)),
            LEARNING_RATE,
        )?;
        Ok(EpsGreedyAgent::new(value_function, INITIAL_EPS))
    })?;

    println!("Saving average cumulative rewards over runs");
    export_report(&report, Path::new(RESULTS_DIR))?;

    println!(
        "{}",
        plot_series(&report.average_rewards, "Reward per episode", 70, 20)
    );
    let smoothed = moving_average(&report.average_rewards, config.avg_window);
    if !smoothed.is_empty() {
        println!(
            "{}",
            plot_series(
                &smoothed,
                &format!("{}-episode moving average", config.avg_window),
                70,
                20,
            )
        );
    }

    for (i, run) in report.runs.iter().enumerate() {
        println!(
            "Run {}: {} episodes, solved={}",
            i + 1,
            run.episodes,
            run.solved
        );
    }
    println!("All runs done. Results written to {}/", RESULTS_DIR);

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Experiment failed: {}", err);
        process::exit(1);
    }
}
