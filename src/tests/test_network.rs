use ndarray::array;

use crate::network::{Activation, NeuralNetwork};
use crate::optimizer::{Adam, OptimizerWrapper, SGD};
use crate::value_function::{QNetwork, ValueFunction};

#[test]
fn test_forward_shapes() {
    let mut network = NeuralNetwork::new(
        &[2, 8, 3],
        &[Activation::Relu, Activation::Linear],
        OptimizerWrapper::SGD(SGD::new()),
    );

    let out = network.forward(array![0.1, -0.2].view());
    assert_eq!(out.len(), 3);

    let batch = array![[0.1, -0.2], [0.3, 0.4], [0.0, 0.0]];
    let out = network.forward_batch(batch.view());
    assert_eq!(out.shape(), &[3, 3]);
}

#[test]
fn test_training_reduces_loss_on_fixed_batch() {
    let mut network = NeuralNetwork::new(
        &[2, 16, 2],
        &[Activation::Relu, Activation::Linear],
        OptimizerWrapper::SGD(SGD::new()),
    );

    let inputs = array![[0.0, 1.0], [1.0, 0.0]];
    let targets = array![[1.0, 0.0], [0.0, 1.0]];

    let first_loss = network.train_minibatch(inputs.view(), targets.view(), 0.01);
    let mut last_loss = first_loss;
    for _ in 0..200 {
        last_loss = network.train_minibatch(inputs.view(), targets.view(), 0.01);
    }

    assert!(last_loss.is_finite());
    assert!(last_loss < first_loss);
}

#[test]
fn test_adam_training_is_finite() {
    let layers = NeuralNetwork::new(
        &[2, 8, 2],
        &[Activation::Relu, Activation::Linear],
        OptimizerWrapper::SGD(SGD::new()),
    )
    .layers;
    let optimizer = OptimizerWrapper::Adam(Adam::default_for(&layers));
    let mut network = NeuralNetwork { layers, optimizer };

    let inputs = array![[0.5, -0.5], [-0.5, 0.5]];
    let targets = array![[1.0, -1.0], [-1.0, 1.0]];

    for _ in 0..50 {
        let loss = network.train_minibatch(inputs.view(), targets.view(), 0.001);
        assert!(loss.is_finite());
    }
}

#[test]
fn test_weight_norms_one_per_layer() {
    let network = NeuralNetwork::new(
        &[2, 8, 4, 3],
        &[Activation::Relu, Activation::Relu, Activation::Linear],
        OptimizerWrapper::SGD(SGD::new()),
    );

    let norms = network.weight_norms();
    assert_eq!(norms.len(), 3);
    for norm in norms {
        assert!(norm > 0.0);
    }
}

#[test]
fn test_qnetwork_rejects_bad_parameters() {
    assert!(QNetwork::new(0, &[8], 2, |_| OptimizerWrapper::SGD(SGD::new()), 0.01).is_err());
    assert!(QNetwork::new(2, &[8], 0, |_| OptimizerWrapper::SGD(SGD::new()), 0.01).is_err());
    assert!(QNetwork::new(2, &[8], 2, |_| OptimizerWrapper::SGD(SGD::new()), 0.0).is_err());
}

#[test]
fn test_qnetwork_predict_and_train() {
    let mut vf = QNetwork::new(2, &[8], 3, |_| OptimizerWrapper::SGD(SGD::new()), 0.01).unwrap();
    assert_eq!(vf.num_actions(), 3);

    let states = array![[0.1, 0.2], [0.3, 0.4]];
    let q = vf.predict(states.view());
    assert_eq!(q.shape(), &[2, 3]);

    let targets = array![[0.0, 1.0, 0.0], [1.0, 0.0, 0.0]];
    let outcome = vf.train(states.view(), targets.view()).unwrap();
    assert!(outcome.loss.is_finite());
    assert_eq!(outcome.weight_norms.len(), 2);
}

#[test]
fn test_qnetwork_rejects_mismatched_targets() {
    let mut vf = QNetwork::new(2, &[8], 3, |_| OptimizerWrapper::SGD(SGD::new()), 0.01).unwrap();

    let states = array![[0.1, 0.2]];
    let bad_targets = array![[0.0, 1.0]];
    assert!(vf.train(states.view(), bad_targets.view()).is_err());
}

#[test]
fn test_qnetwork_snapshot_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("qnetwork.bin");
    let path = path.to_str().unwrap();

    let mut vf = QNetwork::new(2, &[8], 3, |_| OptimizerWrapper::SGD(SGD::new()), 0.01).unwrap();
    let states = array![[0.2, -0.3]];
    let before = vf.predict(states.view());

    vf.save(path).unwrap();
    let mut restored = QNetwork::load(path, 0.01).unwrap();
    assert_eq!(restored.num_actions(), 3);
    let after = restored.predict(states.view());

    assert_eq!(before, after);
}

#[test]
fn test_network_save_load_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("network.bin");
    let path = path.to_str().unwrap();

    let mut network = NeuralNetwork::new(
        &[2, 4, 2],
        &[Activation::Relu, Activation::Linear],
        OptimizerWrapper::SGD(SGD::new()),
    );
    let input = array![0.3, -0.7];
    let before = network.forward(input.view());

    network.save(path).unwrap();
    let mut restored = NeuralNetwork::load(path).unwrap();
    let after = restored.forward(input.view());

    assert_eq!(before, after);
}
