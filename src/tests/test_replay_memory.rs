use ndarray::array;

use crate::error::AscentError;
use crate::replay_memory::{ReplayMemory, Transition};

fn transition(tag: f32) -> Transition {
    Transition {
        state: array![tag],
        action: 0,
        reward: tag,
        next_state: array![tag + 1.0],
        done: false,
    }
}

#[test]
fn test_add_and_sample() {
    let mut memory = ReplayMemory::new(10);
    let t = Transition {
        state: array![0.5, -0.5],
        action: 0,
        reward: 1.0,
        next_state: array![0.6, -0.4],
        done: false,
    };
    memory.add(t.clone());
    assert_eq!(memory.len(), 1);
    let sample = memory.sample(1).unwrap();
    assert_eq!(sample[0], &t);
}

#[test]
fn test_capacity_fifo_eviction() {
    let mut memory = ReplayMemory::new(3);

    for i in 0..5 {
        memory.add(transition(i as f32));
    }

    // Only the most recent 3 survive
    assert_eq!(memory.len(), 3);

    let samples = memory.sample(3).unwrap();
    let states: Vec<f32> = samples.iter().map(|t| t.state[0]).collect();
    assert!(states.contains(&2.0));
    assert!(states.contains(&3.0));
    assert!(states.contains(&4.0));
}

#[test]
fn test_size_never_exceeds_capacity() {
    let mut memory = ReplayMemory::new(7);
    for i in 0..100 {
        memory.add(transition(i as f32));
        assert!(memory.len() <= memory.capacity());
    }
    assert_eq!(memory.len(), 7);
}

#[test]
fn test_is_empty() {
    let mut memory = ReplayMemory::new(10);
    assert!(memory.is_empty());

    memory.add(transition(0.0));
    assert!(!memory.is_empty());
}

#[test]
fn test_sample_distinct() {
    let mut memory = ReplayMemory::new(10);
    for i in 0..5 {
        memory.add(transition(i as f32));
    }

    let samples = memory.sample(5).unwrap();
    let mut states: Vec<f32> = samples.iter().map(|t| t.state[0]).collect();
    states.sort_by(|a, b| a.partial_cmp(b).unwrap());
    states.dedup();
    assert_eq!(states.len(), 5);
}

#[test]
fn test_sample_too_large_errors() {
    let mut memory = ReplayMemory::new(10);
    for i in 0..3 {
        memory.add(transition(i as f32));
    }

    match memory.sample(4) {
        Err(AscentError::SampleTooLarge { requested, available }) => {
            assert_eq!(requested, 4);
            assert_eq!(available, 3);
        }
        other => panic!("expected SampleTooLarge, got {:?}", other.map(|v| v.len())),
    }
}

#[test]
fn test_sample_after_wraparound() {
    let mut memory = ReplayMemory::new(4);
    for i in 0..9 {
        memory.add(transition(i as f32));
    }

    // The deque's ring has wrapped; every surviving entry must still be
    // reachable by sampling.
    let samples = memory.sample(4).unwrap();
    let mut states: Vec<f32> = samples.iter().map(|t| t.state[0]).collect();
    states.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(states, vec![5.0, 6.0, 7.0, 8.0]);
}
