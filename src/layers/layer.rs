use crate::error::Result;

/// The capability set every trainable layer exposes to `Network`.
///
/// A layer caches what it saw on `forward` and reads that cache on
/// `backward`. Parameter gradients accumulate across `backward` calls until
/// `clear_grads`; `update` applies whatever has accumulated.
pub trait Layer {
    /// Runs the layer on `x`, caching input, pre-activation and output.
    fn forward(&mut self, x: &[f64]) -> Result<Vec<f64>>;

    /// Takes `∂L/∂y` for the cached forward pass, adds this sample's
    /// contribution to the parameter gradients and returns `∂L/∂x`.
    fn backward(&mut self, upstream: &[f64]) -> Result<Vec<f64>>;

    /// Plain SGD step: `param -= lr · grad`.
    fn update(&mut self, lr: f64);

    /// Zeroes the gradient accumulators. Cached forward state is kept.
    fn clear_grads(&mut self);

    /// Pre-activation `z` from the most recent forward pass.
    fn pre_activation(&self) -> &[f64];

    fn input_size(&self) -> usize;

    fn output_size(&self) -> usize;

    /// Number of trainable scalars (weights plus biases).
    fn parameter_count(&self) -> usize;
}
