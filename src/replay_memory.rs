use ndarray::Array1;
use rand::seq::SliceRandom;
use rand::thread_rng;
use std::collections::VecDeque;

use crate::error::{AscentError, Result};

/// One step of agent/environment interaction. Written once into the replay
/// memory, read many times during sampling.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub state: Array1<f32>,
    pub action: usize,
    pub reward: f32,
    pub next_state: Array1<f32>,
    pub done: bool,
}

/// Bounded FIFO store of past transitions, sampled uniformly at random to
/// decorrelate sequential updates.
///
/// Insertion order determines eviction order only; sampled batches carry no
/// ordering guarantee.
#[derive(Clone)]
pub struct ReplayMemory {
    buffer: VecDeque<Transition>,
    capacity: usize,
}

impl ReplayMemory {
    pub fn new(capacity: usize) -> Self {
        ReplayMemory {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a transition, discarding the oldest entry once at capacity.
    pub fn add(&mut self, transition: Transition) {
        if self.buffer.len() == self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(transition);
    }

    /// Draw `batch_size` distinct transitions uniformly at random.
    ///
    /// Fails when `batch_size` exceeds the current size; callers are
    /// expected to guard with [`len`](Self::len) before sampling.
    pub fn sample(&self, batch_size: usize) -> Result<Vec<&Transition>> {
        if batch_size > self.buffer.len() {
            return Err(AscentError::SampleTooLarge {
                requested: batch_size,
                available: self.buffer.len(),
            });
        }
        let mut rng = thread_rng();
        let mut indices = (0..self.buffer.len()).collect::<Vec<usize>>();
        indices.shuffle(&mut rng);
        indices.truncate(batch_size);
        Ok(indices.into_iter().map(|i| &self.buffer[i]).collect())
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
