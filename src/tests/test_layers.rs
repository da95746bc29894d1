use approx::assert_abs_diff_eq;
use ndarray::{array, Array2};
use rand::{SeedableRng, rngs::StdRng};

use crate::activations::Activation;
use crate::error::DqnError;
use crate::layers::{DenseLayer, DropoutLayer, Layer, WeightInit};

fn dense(input: usize, output: usize, activation: Activation) -> DenseLayer {
    let mut rng = StdRng::seed_from_u64(11);
    DenseLayer::new(input, output, activation, &WeightInit::default(), &mut rng).unwrap()
}

#[test]
fn test_layer_creation() {
    let layer = dense(3, 2, Activation::Relu);
    assert_eq!(layer.weights.shape(), [3, 2]);
    assert_eq!(layer.biases.shape(), [2]);
    assert_eq!(layer.input_size(), 3);
    assert_eq!(layer.output_size(), 2);

    let mut rng = StdRng::seed_from_u64(0);
    assert!(DenseLayer::new(0, 2, Activation::Relu, &WeightInit::default(), &mut rng).is_err());
}

#[test]
fn test_dense_layer_forward() {
    let mut layer = dense(2, 2, Activation::Linear)
        .with_weights(array![[1.0, 2.0], [3.0, 4.0]])
        .unwrap()
        .with_biases(array![0.5, -0.5])
        .unwrap();
    let output = layer.forward_batch(array![[1.0, 1.0], [0.0, 2.0]].view(), false);
    assert_eq!(output, array![[4.5, 5.5], [6.5, 7.5]]);
}

#[test]
fn test_with_weights_shape_check() {
    assert!(dense(2, 2, Activation::Linear).with_weights(Array2::zeros((3, 2))).is_err());
    assert!(dense(2, 2, Activation::Linear).with_biases(array![1.0]).is_err());
}

#[test]
fn test_backward_requires_recorded_forward() {
    let mut layer = dense(2, 2, Activation::Relu);
    layer.forward_batch(array![[1.0, 2.0]].view(), false);
    let result = layer.backward_batch(array![[1.0, 1.0]].view());
    assert!(matches!(result, Err(DqnError::EstimatorError(_))));
}

#[test]
fn test_dense_backward_linear() {
    let mut layer = dense(2, 1, Activation::Linear)
        .with_weights(array![[2.0], [-1.0]])
        .unwrap();
    let inputs = array![[1.0, 3.0], [2.0, 0.0]];
    layer.forward_batch(inputs.view(), true);
    let input_grad = layer.backward_batch(array![[1.0], [0.5]].view()).unwrap();

    // dW = X^T g, db = sum(g), dX = g W^T
    assert_eq!(layer.weight_grad(), &array![[2.0], [3.0]]);
    assert_eq!(layer.bias_grad(), &array![1.5]);
    assert_eq!(input_grad, array![[2.0, -1.0], [1.0, -0.5]]);
}

#[test]
fn test_gradients_accumulate_until_zeroed() {
    let mut layer = dense(3, 2, Activation::Tanh);
    let inputs = array![[0.1, -0.4, 0.3]];
    let grad = array![[1.0, -2.0]];

    layer.forward_batch(inputs.view(), true);
    layer.backward_batch(grad.view()).unwrap();
    let single = layer.weight_grad().clone();

    layer.forward_batch(inputs.view(), true);
    layer.backward_batch(grad.view()).unwrap();
    for (acc, one) in layer.weight_grad().iter().zip(single.iter()) {
        assert_abs_diff_eq!(*acc, 2.0 * one, epsilon = 1e-6);
    }

    layer.zero_grad();
    assert!(layer.weight_grad().iter().all(|&g| g == 0.0));
    assert!(layer.bias_grad().iter().all(|&g| g == 0.0));

    layer.forward_batch(inputs.view(), true);
    layer.backward_batch(grad.view()).unwrap();
    for (fresh, one) in layer.weight_grad().iter().zip(single.iter()) {
        assert_abs_diff_eq!(*fresh, *one, epsilon = 1e-6);
    }
}

#[test]
fn test_dropout_layer() {
    let mut layer = DropoutLayer::new(4, 0.5, 3).unwrap();
    let input = Array2::ones((8, 4));

    // Training mode zeroes some units and scales the rest
    let output = layer.forward_batch(input.view(), true);
    assert!(output.iter().all(|&v| v == 0.0 || v == 2.0));
    assert!(output.iter().any(|&v| v == 0.0));
    assert!(output.iter().any(|&v| v == 2.0));

    // Gradient follows the same mask
    let grad = layer.backward_batch(Array2::ones((8, 4)).view()).unwrap();
    assert_eq!(grad, output);

    // Inference mode is the identity
    layer.set_training(false);
    assert_eq!(layer.forward_batch(input.view(), true), input);
}

#[test]
fn test_dropout_rate_validation() {
    assert!(DropoutLayer::new(4, 1.0, 0).is_err());
    assert!(DropoutLayer::new(4, -0.1, 0).is_err());
    assert!(DropoutLayer::new(4, 0.0, 0).is_ok());
}
