pub mod loss;
pub mod cross_entropy;

pub use loss::Loss;
pub use cross_entropy::SoftmaxCrossEntropyLoss;
