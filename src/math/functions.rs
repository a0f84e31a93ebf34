//! Stateless activation and normalization primitives.
//!
//! Each activation is paired with a derivative that reads a specific cached
//! quantity: `relu_derivative` takes the pre-activation `z`, while the
//! sigmoid, tanh and identity derivatives take the activated output `y`.

pub fn relu(z: f64) -> f64 {
    if z > 0.0 { z } else { 0.0 }
}

/// Derivative of ReLU evaluated at the pre-activation `z`.
pub fn relu_derivative(z: f64) -> f64 {
    if z > 0.0 { 1.0 } else { 0.0 }
}

/// Logistic sigmoid, branching on sign so `exp` never sees a large positive
/// argument.
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Derivative of sigmoid given the activated output `y = sigmoid(z)`.
pub fn sigmoid_derivative(y: f64) -> f64 {
    y * (1.0 - y)
}

pub fn tanh(z: f64) -> f64 {
    z.tanh()
}

/// Derivative of tanh given the activated output `y = tanh(z)`.
pub fn tanh_derivative(y: f64) -> f64 {
    1.0 - y * y
}

pub fn identity(z: f64) -> f64 {
    z
}

pub fn identity_derivative(_y: f64) -> f64 {
    1.0
}

/// Softmax with the max coordinate subtracted before exponentiating.
///
/// The output sums to 1 and is unchanged by adding a constant to every input.
/// An empty input yields an empty output.
pub fn softmax(x: &[f64]) -> Vec<f64> {
    let max = x.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = x.iter().map(|v| (v - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Softmax Jacobian-vector product: `output ⊙ (grad - grad·output)`.
///
/// `output` is a softmax result and `grad` the upstream gradient with respect
/// to it; the result is the gradient with respect to the softmax input. The
/// cross-entropy loss does not need this (it uses the closed form
/// `p - t`), but any other loss composed with softmax does.
pub fn softmax_backward(output: &[f64], grad: &[f64]) -> Vec<f64> {
    let dot: f64 = output.iter().zip(grad).map(|(o, g)| o * g).sum();
    output.iter().zip(grad).map(|(o, g)| o * (g - dot)).collect()
}

/// Index of the largest element; ties resolve to the first. Returns 0 for an
/// empty slice.
pub fn argmax(v: &[f64]) -> usize {
    v.iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(best_i, best), (i, &x)| {
            if x > best { (i, x) } else { (best_i, best) }
        })
        .0
}
