use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::activation::activation::{ActivationFunction, DerivativeInput};
use crate::error::{check_len, NnError, Result};
use crate::layers::layer::Layer;
use crate::math::matrix::Matrix;

/// How a dense layer's weight matrix is drawn at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightInit {
    /// Uniform in [-1, 1).
    #[default]
    Uniform,
    /// N(0, sqrt(2 / fan_in)); pairs well with ReLU.
    He,
    /// N(0, sqrt(1 / fan_in)); pairs well with Sigmoid/Tanh/Identity.
    Xavier,
}

/// Fully connected layer computing `y = f(Wx + b)`.
///
/// `weights` is `output_size × input_size`. Gradients accumulate in
/// `weight_grads`/`bias_grads` until `clear_grads()`.
#[derive(Debug, Clone)]
pub struct Dense {
    weights: Matrix,
    biases: Vec<f64>,
    activation: ActivationFunction,
    input: Vec<f64>,
    pre_activation: Vec<f64>,
    output: Vec<f64>,
    weight_grads: Matrix,
    bias_grads: Vec<f64>,
    has_forward: bool,
}

impl Dense {
    /// Builds an `input_size → output_size` layer with uniform weights, zero
    /// biases and zero gradients.
    pub fn new<R: Rng + ?Sized>(
        input_size: usize,
        output_size: usize,
        activation: ActivationFunction,
        rng: &mut R,
    ) -> Result<Dense> {
        Dense::with_init(input_size, output_size, activation, WeightInit::Uniform, rng)
    }

    pub fn with_init<R: Rng + ?Sized>(
        input_size: usize,
        output_size: usize,
        activation: ActivationFunction,
        init: WeightInit,
        rng: &mut R,
    ) -> Result<Dense> {
        if !activation.is_elementwise() {
            return Err(NnError::Config(format!(
                "{activation} cannot be used as a layer activation; the loss applies it"
            )));
        }
        if input_size == 0 || output_size == 0 {
            return Err(NnError::Config(format!(
                "layer widths must be positive, got {input_size} → {output_size}"
            )));
        }

        let weights = match init {
            WeightInit::Uniform => Matrix::random_uniform(output_size, input_size, rng),
            WeightInit::He => Matrix::he(output_size, input_size, rng),
            WeightInit::Xavier => Matrix::xavier(output_size, input_size, rng),
        };

        Ok(Dense {
            weights,
            biases: vec![0.0; output_size],
            activation,
            input: vec![0.0; input_size],
            pre_activation: vec![0.0; output_size],
            output: vec![0.0; output_size],
            weight_grads: Matrix::zeros(output_size, input_size),
            bias_grads: vec![0.0; output_size],
            has_forward: false,
        })
    }

    pub fn activation(&self) -> ActivationFunction {
        self.activation
    }

    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    /// Replaces the whole weight matrix. The new matrix must keep the layer's
    /// `output_size × input_size` shape.
    pub fn set_weights(&mut self, weights: Matrix) -> Result<()> {
        check_len("Dense::set_weights rows", self.weights.rows, weights.rows)?;
        check_len("Dense::set_weights cols", self.weights.cols, weights.cols)?;
        weights.check_shape()?;
        self.weights = weights;
        Ok(())
    }

    /// Single weight `W[i][j]`, used for numerical gradient checks.
    ///
    /// Panics if `(i, j)` is outside `output_size × input_size`.
    pub fn weight_mut(&mut self, i: usize, j: usize) -> &mut f64 {
        &mut self.weights.data[i][j]
    }

    pub fn biases(&self) -> &[f64] {
        &self.biases
    }

    pub fn biases_mut(&mut self) -> &mut [f64] {
        &mut self.biases
    }

    pub fn weight_grads(&self) -> &Matrix {
        &self.weight_grads
    }

    pub fn bias_grads(&self) -> &[f64] {
        &self.bias_grads
    }

    /// Activated output `y` from the most recent forward pass.
    pub fn output(&self) -> &[f64] {
        &self.output
    }
}

impl Layer for Dense {
    fn forward(&mut self, x: &[f64]) -> Result<Vec<f64>> {
        check_len("Dense::forward input", self.input_size(), x.len())?;

        let mut z = self.weights.mul_vec(x);
        for (value, b) in z.iter_mut().zip(&self.biases) {
            *value += b;
        }
        let y: Vec<f64> = z.iter().map(|&v| self.activation.function(v)).collect();

        self.input.clear();
        self.input.extend_from_slice(x);
        self.pre_activation = z;
        self.output = y.clone();
        self.has_forward = true;
        Ok(y)
    }

    fn backward(&mut self, upstream: &[f64]) -> Result<Vec<f64>> {
        if !self.has_forward {
            return Err(NnError::Protocol(
                "Dense::backward called before any forward pass".into(),
            ));
        }
        check_len("Dense::backward upstream gradient", self.output_size(), upstream.len())?;

        let selected = match self.activation.derivative_input() {
            DerivativeInput::PreActivation => &self.pre_activation,
            DerivativeInput::Output => &self.output,
        };
        // δ = ∂L/∂y ⊙ f'(·)
        let delta: Vec<f64> = upstream
            .iter()
            .zip(selected)
            .map(|(g, &s)| g * self.activation.derivative(s))
            .collect();

        self.weight_grads.add_outer(&delta, &self.input);
        for (acc, d) in self.bias_grads.iter_mut().zip(&delta) {
            *acc += d;
        }

        Ok(self.weights.transpose_mul_vec(&delta))
    }

    fn update(&mut self, lr: f64) {
        self.weights.scaled_sub_assign(lr, &self.weight_grads);
        for (b, g) in self.biases.iter_mut().zip(&self.bias_grads) {
            *b -= lr * g;
        }
    }

    fn clear_grads(&mut self) {
        self.weight_grads.fill(0.0);
        self.bias_grads.iter_mut().for_each(|g| *g = 0.0);
    }

    fn pre_activation(&self) -> &[f64] {
        &self.pre_activation
    }

    fn input_size(&self) -> usize {
        self.weights.cols
    }

    fn output_size(&self) -> usize {
        self.weights.rows
    }

    fn parameter_count(&self) -> usize {
        self.weights.rows * self.weights.cols + self.biases.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    /// 2 → 2 layer with hand-picked weights so outputs are easy to verify.
    fn fixed_layer(activation: ActivationFunction) -> Dense {
        let mut layer = Dense::new(2, 2, activation, &mut rng()).unwrap();
        layer
            .set_weights(Matrix::from_data(vec![vec![1.0, -1.0], vec![0.5, 2.0]]).unwrap())
            .unwrap();
        layer
    }

    #[test]
    fn set_weights_rejects_other_shapes() {
        let mut layer = fixed_layer(ActivationFunction::Identity);
        let err = layer.set_weights(Matrix::zeros(3, 5)).unwrap_err();
        assert!(matches!(err, NnError::ShapeMismatch { expected: 2, actual: 3, .. }));
        assert!(layer.set_weights(Matrix::zeros(2, 3)).is_err());

        let ragged = Matrix { rows: 2, cols: 2, data: vec![vec![1.0, 2.0], vec![3.0]] };
        assert!(layer.set_weights(ragged).is_err());

        // Rejected matrices leave the layer usable at its original width.
        assert_eq!(layer.weights().data, vec![vec![1.0, -1.0], vec![0.5, 2.0]]);
        assert_eq!(layer.forward(&[1.0, 1.0]).unwrap(), vec![0.0, 2.5]);
        assert!(layer.forward(&[1.0; 5]).is_err());
    }

    #[test]
    fn weight_mut_edits_one_entry() {
        let mut layer = fixed_layer(ActivationFunction::Identity);
        *layer.weight_mut(1, 0) = 3.0;
        assert_eq!(layer.weights().data, vec![vec![1.0, -1.0], vec![3.0, 2.0]]);
    }

    #[test]
    fn new_layer_has_zero_biases_and_gradients() {
        let layer = Dense::new(3, 4, ActivationFunction::Tanh, &mut rng()).unwrap();
        assert_eq!((layer.weights().rows, layer.weights().cols), (4, 3));
        assert!(layer.biases().iter().all(|&b| b == 0.0));
        assert!(layer.bias_grads().iter().all(|&g| g == 0.0));
        assert_eq!(layer.weight_grads(), &Matrix::zeros(4, 3));
        assert_eq!(layer.parameter_count(), 16);
    }

    #[test]
    fn softmax_activation_is_rejected() {
        let err = Dense::new(2, 2, ActivationFunction::Softmax, &mut rng()).unwrap_err();
        assert!(matches!(err, NnError::Config(_)));
    }

    #[test]
    fn zero_width_is_rejected() {
        let err = Dense::new(0, 2, ActivationFunction::ReLU, &mut rng()).unwrap_err();
        assert!(matches!(err, NnError::Config(_)));
    }

    #[test]
    fn same_seed_gives_same_weights() {
        let a = Dense::with_init(5, 3, ActivationFunction::ReLU, WeightInit::He, &mut rng()).unwrap();
        let b = Dense::with_init(5, 3, ActivationFunction::ReLU, WeightInit::He, &mut rng()).unwrap();
        assert_eq!(a.weights(), b.weights());
    }

    #[test]
    fn forward_caches_z_and_y() {
        let mut layer = fixed_layer(ActivationFunction::ReLU);
        let y = layer.forward(&[1.0, 2.0]).unwrap();
        assert_eq!(layer.pre_activation(), &[-1.0, 4.5]);
        assert_eq!(y, vec![0.0, 4.5]);
        assert_eq!(layer.output(), &[0.0, 4.5]);
    }

    #[test]
    fn forward_rejects_wrong_width() {
        let mut layer = fixed_layer(ActivationFunction::Identity);
        let err = layer.forward(&[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, NnError::ShapeMismatch { expected: 2, actual: 3, .. }));
    }

    #[test]
    fn backward_before_forward_is_protocol_error() {
        let mut layer = fixed_layer(ActivationFunction::Sigmoid);
        let err = layer.backward(&[1.0, 1.0]).unwrap_err();
        assert!(matches!(err, NnError::Protocol(_)));
    }

    #[test]
    fn backward_rejects_wrong_upstream_width() {
        let mut layer = fixed_layer(ActivationFunction::Sigmoid);
        layer.forward(&[0.1, 0.2]).unwrap();
        let err = layer.backward(&[1.0]).unwrap_err();
        assert!(matches!(err, NnError::ShapeMismatch { expected: 2, actual: 1, .. }));
    }

    #[test]
    fn relu_backward_masks_inactive_units() {
        let mut layer = fixed_layer(ActivationFunction::ReLU);
        layer.forward(&[1.0, 2.0]).unwrap();
        let dx = layer.backward(&[1.0, 1.0]).unwrap();

        // Unit 0 has z = -1 so only unit 1 contributes.
        assert_eq!(layer.bias_grads(), &[0.0, 1.0]);
        assert_eq!(layer.weight_grads().data, vec![vec![0.0, 0.0], vec![1.0, 2.0]]);
        assert_eq!(dx, vec![0.5, 2.0]);
    }

    #[test]
    fn sigmoid_backward_uses_cached_output() {
        let mut layer = fixed_layer(ActivationFunction::Sigmoid);
        let y = layer.forward(&[0.3, -0.7]).unwrap();
        layer.backward(&[1.0, 0.0]).unwrap();
        assert_abs_diff_eq!(layer.bias_grads()[0], y[0] * (1.0 - y[0]), epsilon = 1e-12);
        assert_eq!(layer.bias_grads()[1], 0.0);
    }

    #[test]
    fn gradients_accumulate_until_cleared() {
        let mut layer = fixed_layer(ActivationFunction::Identity);
        layer.forward(&[1.0, 1.0]).unwrap();
        layer.backward(&[1.0, 2.0]).unwrap();
        layer.backward(&[1.0, 2.0]).unwrap();
        assert_eq!(layer.bias_grads(), &[2.0, 4.0]);
        assert_eq!(layer.weight_grads().data, vec![vec![2.0, 2.0], vec![4.0, 4.0]]);

        layer.clear_grads();
        assert_eq!(layer.bias_grads(), &[0.0, 0.0]);
        assert_eq!(layer.pre_activation(), &[0.0, 2.5]);
    }

    #[test]
    fn zero_upstream_after_clear_leaves_gradients_zero() {
        let mut layer = fixed_layer(ActivationFunction::Tanh);
        layer.forward(&[0.4, -0.1]).unwrap();
        layer.backward(&[0.3, -0.8]).unwrap();
        layer.clear_grads();
        layer.backward(&[0.0, 0.0]).unwrap();
        assert_eq!(layer.weight_grads(), &Matrix::zeros(2, 2));
        assert_eq!(layer.bias_grads(), &[0.0, 0.0]);
    }

    #[test]
    fn update_applies_sgd_step() {
        let mut layer = fixed_layer(ActivationFunction::Identity);
        layer.forward(&[1.0, 0.0]).unwrap();
        layer.backward(&[1.0, -1.0]).unwrap();
        layer.update(0.5);
        assert_eq!(layer.weights().data, vec![vec![0.5, -1.0], vec![1.0, 2.0]]);
        assert_eq!(layer.biases(), &[-0.5, 0.5]);
    }
}
