/// A scalar objective over a prediction and a target of equal length.
///
/// Implementations are stateless. `backward` returns the gradient the network
/// feeds into its final layer's backward pass.
pub trait Loss {
    fn forward(&self, predicted: &[f64], expected: &[f64]) -> f64;

    fn backward(&self, predicted: &[f64], expected: &[f64]) -> Vec<f64>;
}
