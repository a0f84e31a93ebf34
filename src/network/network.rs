use tracing::{debug, warn};

use crate::activation::activation::ActivationFunction;
use crate::error::{check_len, NnError, Result};
use crate::layers::dense::Dense;
use crate::layers::layer::Layer;
use crate::loss::cross_entropy::SoftmaxCrossEntropyLoss;
use crate::loss::loss::Loss;
use crate::math::functions::{argmax, softmax};
use crate::math::matrix::Matrix;

/// Where a network is in the per-sample training protocol.
///
/// `forward` → `Forwarded`, `backprop` → `BackpropDone`,
/// `apply_updates` → `Updated`, `clear_grads` → `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingPhase {
    Idle,
    Forwarded,
    BackpropDone,
    Updated,
}

/// An ordered chain of dense layers plus the loss that scores its logits.
///
/// The last layer's pre-activation is the network output (the logits); the
/// loss applies softmax itself, so that layer should use `Identity`.
#[derive(Debug)]
pub struct Network<L: Loss = SoftmaxCrossEntropyLoss> {
    layers: Vec<Dense>,
    loss: L,
    /// Per-layer outputs of the latest forward pass. Hidden layers store the
    /// activated output, the last layer stores its pre-activation.
    outputs: Vec<Vec<f64>>,
    phase: TrainingPhase,
}

impl<L: Loss> Network<L> {
    /// Takes ownership of `layers` and `loss`.
    ///
    /// Fails with `Config` on an empty layer list or when a layer's output
    /// width does not match the next layer's input width.
    pub fn new(layers: Vec<Dense>, loss: L) -> Result<Network<L>> {
        let Some(last) = layers.last() else {
            return Err(NnError::Config("a network needs at least one layer".into()));
        };
        if last.activation() != ActivationFunction::Identity {
            warn!(
                activation = %last.activation(),
                "final layer is not Identity; logits are its pre-activation and its derivative is still applied on backprop"
            );
        }

        for (i, pair) in layers.windows(2).enumerate() {
            if pair[0].output_size() != pair[1].input_size() {
                return Err(NnError::Config(format!(
                    "layer {i} outputs {} values but layer {} expects {}",
                    pair[0].output_size(),
                    i + 1,
                    pair[1].input_size()
                )));
            }
        }

        for (i, layer) in layers.iter().enumerate() {
            debug!(
                layer = i,
                input = layer.input_size(),
                output = layer.output_size(),
                activation = %layer.activation(),
                "network layer"
            );
        }

        Ok(Network {
            outputs: Vec::with_capacity(layers.len()),
            layers,
            loss,
            phase: TrainingPhase::Idle,
        })
    }

    pub fn layers(&self) -> &[Dense] {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut [Dense] {
        &mut self.layers
    }

    pub fn loss(&self) -> &L {
        &self.loss
    }

    pub fn phase(&self) -> TrainingPhase {
        self.phase
    }

    pub fn input_size(&self) -> usize {
        self.layers[0].input_size()
    }

    pub fn output_size(&self) -> usize {
        self.layers[self.layers.len() - 1].output_size()
    }

    pub fn parameter_count(&self) -> usize {
        self.layers.iter().map(Layer::parameter_count).sum()
    }

    /// Logits from the most recent forward pass, if there was one.
    pub fn logits(&self) -> Option<&[f64]> {
        self.outputs.last().map(Vec::as_slice)
    }

    /// Feeds `x` through every layer and returns the logits.
    ///
    /// Each hidden layer's activated output becomes the next input; the last
    /// layer contributes its pre-activation.
    pub fn forward(&mut self, x: &[f64]) -> Result<Vec<f64>> {
        self.phase = TrainingPhase::Idle;
        self.outputs.clear();

        let last = self.layers.len() - 1;
        let mut outputs = Vec::with_capacity(self.layers.len());
        let mut current = x.to_vec();
        for (i, layer) in self.layers.iter_mut().enumerate() {
            let activated = layer.forward(&current)?;
            current = if i == last {
                layer.pre_activation().to_vec()
            } else {
                activated
            };
            outputs.push(current.clone());
        }

        self.outputs = outputs;
        self.phase = TrainingPhase::Forwarded;
        Ok(current)
    }

    /// Softmax probabilities for `x`.
    pub fn predict(&mut self, x: &[f64]) -> Result<Vec<f64>> {
        let logits = self.forward(x)?;
        Ok(softmax(&logits))
    }

    /// Loss of the cached logits (after softmax) against `y_true`.
    pub fn compute_loss(&self, y_true: &[f64]) -> Result<f64> {
        let logits = self.cached_logits("compute_loss")?;
        check_len("Network::compute_loss target", logits.len(), y_true.len())?;
        Ok(self.loss.forward(&softmax(logits), y_true))
    }

    /// Backpropagates the loss of the cached forward pass.
    ///
    /// Each layer's gradients are cleared right before it accumulates, so
    /// after this call every layer holds exactly this sample's gradient.
    pub fn backprop(&mut self, y_true: &[f64]) -> Result<()> {
        let logits = self.cached_logits("backprop")?;
        check_len("Network::backprop target", logits.len(), y_true.len())?;
        let probs = softmax(logits);

        let mut upstream = self.loss.backward(&probs, y_true);
        for layer in self.layers.iter_mut().rev() {
            layer.clear_grads();
            upstream = layer.backward(&upstream)?;
        }

        self.phase = TrainingPhase::BackpropDone;
        Ok(())
    }

    pub fn apply_updates(&mut self, lr: f64) {
        for layer in self.layers.iter_mut() {
            layer.update(lr);
        }
        self.phase = TrainingPhase::Updated;
    }

    pub fn clear_grads(&mut self) {
        for layer in self.layers.iter_mut() {
            layer.clear_grads();
        }
        self.phase = TrainingPhase::Idle;
    }

    /// Fraction of samples whose predicted class matches the one-hot target.
    ///
    /// `x` is `features × samples` and `y` is `classes × samples`. An empty
    /// batch scores 0.
    pub fn eval(&mut self, x: &Matrix, y: &Matrix) -> Result<f64> {
        x.check_shape()?;
        y.check_shape()?;
        check_len("Network::eval sample count", x.cols, y.cols)?;
        check_len("Network::eval feature count", self.input_size(), x.rows)?;
        check_len("Network::eval class count", self.output_size(), y.rows)?;
        if x.cols == 0 {
            return Ok(0.0);
        }

        let mut correct = 0;
        for j in 0..x.cols {
            let prediction = self.forward(&x.column(j))?;
            if argmax(&prediction) == argmax(&y.column(j)) {
                correct += 1;
            }
        }
        Ok(correct as f64 / x.cols as f64)
    }

    fn cached_logits(&self, operation: &str) -> Result<&[f64]> {
        let ready = matches!(
            self.phase,
            TrainingPhase::Forwarded | TrainingPhase::BackpropDone
        );
        match self.logits() {
            Some(logits) if ready => Ok(logits),
            _ => Err(NnError::Protocol(format!(
                "{operation} requires a forward pass with the current parameters (phase is {:?})",
                self.phase
            ))),
        }
    }
}
