use crate::loss::loss::Loss;

/// Categorical cross-entropy over softmax probabilities.
///
/// `predicted` must already be softmax-normalized; this is not checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SoftmaxCrossEntropyLoss;

/// Floor applied to probabilities before `ln` so a zero never yields -inf.
pub const EPS: f64 = 1e-12;

impl Loss for SoftmaxCrossEntropyLoss {
    /// L = -sum(expected[i] * ln(max(predicted[i], eps)))
    fn forward(&self, predicted: &[f64], expected: &[f64]) -> f64 {
        debug_assert_eq!(predicted.len(), expected.len());
        -predicted
            .iter()
            .zip(expected)
            .map(|(p, e)| e * p.max(EPS).ln())
            .sum::<f64>()
    }

    /// `predicted - expected`.
    ///
    /// This is the gradient of softmax and cross-entropy combined, taken with
    /// respect to the pre-softmax logits, not with respect to `predicted`.
    /// The network hands it to a final layer whose activation is Identity, so
    /// that layer's derivative step passes it through unchanged.
    fn backward(&self, predicted: &[f64], expected: &[f64]) -> Vec<f64> {
        debug_assert_eq!(predicted.len(), expected.len());
        predicted.iter().zip(expected).map(|(p, e)| p - e).collect()
    }
}
