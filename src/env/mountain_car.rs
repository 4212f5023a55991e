use ndarray::{array, Array1};
use rand::Rng;

use super::{Environment, Step};

const MIN_POSITION: f32 = -1.2;
const MAX_POSITION: f32 = 0.6;
const MAX_SPEED: f32 = 0.07;
const GOAL_POSITION: f32 = 0.5;
const FORCE: f32 = 0.001;
const GRAVITY: f32 = 0.0025;

/// The classic Mountain Car control task.
///
/// An underpowered car sits in a valley; the engine alone cannot climb the
/// right-hand hill, so the agent has to rock back and forth to build
/// momentum. Observations are `[position, velocity]`, actions are push left,
/// no push, push right. Every step yields a reward of -1 until the car
/// reaches the goal position.
pub struct MountainCar {
    position: f32,
    velocity: f32,
}

impl MountainCar {
    pub fn new() -> Self {
        MountainCar {
            position: -0.5,
            velocity: 0.0,
        }
    }

    fn state(&self) -> Array1<f32> {
        array![self.position, self.velocity]
    }

    /// Lower bounds of the observation components.
    pub fn observation_low() -> Array1<f32> {
        array![MIN_POSITION, -MAX_SPEED]
    }

    /// Upper bounds of the observation components.
    pub fn observation_high() -> Array1<f32> {
        array![MAX_POSITION, MAX_SPEED]
    }
}

impl Default for MountainCar {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for MountainCar {
    fn reset(&mut self) -> Array1<f32> {
        let mut rng = rand::thread_rng();
        self.position = rng.gen_range(-0.6..-0.4);
        self.velocity = 0.0;
        self.state()
    }

    fn step(&mut self, action: usize) -> Step {
        // 0 = push left, 1 = no push, 2 = push right
        let force = (action as f32 - 1.0) * FORCE;

        self.velocity += force - GRAVITY * (3.0 * self.position).cos();
        self.velocity = self.velocity.clamp(-MAX_SPEED, MAX_SPEED);

        self.position += self.velocity;
        self.position = self.position.clamp(MIN_POSITION, MAX_POSITION);

        // Hitting the left wall kills the momentum.
        if self.position <= MIN_POSITION && self.velocity < 0.0 {
            self.velocity = 0.0;
        }

        let done = self.position >= GOAL_POSITION;

        Step {
            next_state: self.state(),
            reward: -1.0,
            done,
        }
    }

    fn num_actions(&self) -> usize {
        3
    }

    fn state_dim(&self) -> usize {
        2
    }
}
