use super::stubs::{FixedRewardEnv, FixedValueFunction};
use crate::agent::EpsGreedyAgent;
use crate::experiment::{ConvergenceWindow, ExperimentConfig, ExperimentDriver};

fn small_config() -> ExperimentConfig {
    ExperimentConfig {
        discount: 0.99,
        eps_decay: 0.9,
        eps_min: 1e-4,
        batch_size: 2,
        memory_capacity: 50,
        max_episodes: 40,
        max_steps: 10,
        min_avg_reward: 1.0,
        avg_window: 3,
        solved_window: 4,
        runs: 2,
    }
}

#[test]
fn test_window_primed_unsolved() {
    let window = ConvergenceWindow::new(5, -30.0);
    assert!(!window.is_converged());
    assert_eq!(window.solved_count(), 0);
    assert_eq!(window.len(), 5);
}

#[test]
fn test_window_converges_only_when_full_of_passing_averages() {
    let mut window = ConvergenceWindow::new(3, 0.0);

    window.push(1.0);
    window.push(2.0);
    assert!(!window.is_converged());
    assert_eq!(window.solved_count(), 2);

    window.push(3.0);
    assert!(window.is_converged());
}

#[test]
fn test_window_one_failing_average_resets_progress() {
    let mut window = ConvergenceWindow::new(3, 0.0);
    window.push(1.0);
    window.push(1.0);
    window.push(-5.0);
    assert!(!window.is_converged());
    assert_eq!(window.solved_count(), 2);
}

#[test]
fn test_config_validation() {
    assert!(ExperimentConfig::default().validate().is_ok());

    let mut cfg = small_config();
    cfg.batch_size = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = small_config();
    cfg.memory_capacity = cfg.batch_size;
    assert!(cfg.validate().is_err());

    let mut cfg = small_config();
    cfg.discount = 1.5;
    assert!(cfg.validate().is_err());

    let mut cfg = small_config();
    cfg.eps_decay = 0.0;
    assert!(cfg.validate().is_err());

    let mut cfg = small_config();
    cfg.runs = 0;
    assert!(cfg.validate().is_err());
}

#[test]
fn test_driver_converges_when_rewards_clear_threshold() {
    // 2-step episodes at +1 per step: every episode's reward is 2.0,
    // comfortably above the 1.0 threshold.
    let cfg = small_config();
    let env = FixedRewardEnv::new(2, 1.0);
    let mut driver = ExperimentDriver::new(cfg.clone(), env).unwrap();

    let report = driver
        .run(|| Ok(EpsGreedyAgent::new(FixedValueFunction::new(vec![0.0, 0.0]), 0.0)))
        .unwrap();

    assert_eq!(report.runs.len(), 2);
    for run in &report.runs {
        assert!(run.solved);
        // Sentinel priming delays the earliest possible termination until
        // avg_window + solved_window episodes.
        assert_eq!(run.episodes, cfg.avg_window + cfg.solved_window);
        assert!(run.episodes <= cfg.max_episodes);
        assert_eq!(run.rewards.len(), run.episodes);
        assert_eq!(run.losses.len(), run.episodes);
    }

    assert_eq!(report.average_rewards.len(), cfg.avg_window + cfg.solved_window);
    for &avg in &report.average_rewards {
        assert_eq!(avg, 2.0);
    }
}

#[test]
fn test_driver_exhausts_budget_when_unsolvable() {
    // -1 per step can never clear a +1.0 threshold.
    let cfg = small_config();
    let env = FixedRewardEnv::new(2, -1.0);
    let mut driver = ExperimentDriver::new(cfg.clone(), env).unwrap();

    let report = driver
        .run(|| Ok(EpsGreedyAgent::new(FixedValueFunction::new(vec![0.0, 0.0]), 0.0)))
        .unwrap();

    for run in &report.runs {
        assert!(!run.solved);
        assert_eq!(run.episodes, cfg.max_episodes);
    }
}

#[test]
fn test_driver_builds_fresh_agent_per_run() {
    let mut cfg = small_config();
    cfg.max_episodes = 3;
    cfg.min_avg_reward = f32::INFINITY; // always exhausts the budget

    let env = FixedRewardEnv::new(2, 1.0);
    let mut driver = ExperimentDriver::new(cfg.clone(), env).unwrap();

    let mut factory_calls = 0;
    driver
        .run(|| {
            factory_calls += 1;
            Ok(EpsGreedyAgent::new(FixedValueFunction::new(vec![0.0, 0.0]), 0.9))
        })
        .unwrap();

    assert_eq!(factory_calls, cfg.runs);
}
