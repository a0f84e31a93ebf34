pub mod error;
pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod train;

// Convenience re-exports
pub use error::{NnError, Result};
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use layers::{Dense, Layer, WeightInit};
pub use network::{LayerSpec, Network, NetworkSpec, TrainingPhase};
pub use loss::{Loss, SoftmaxCrossEntropyLoss};
pub use train::{train, train_network, EpochStats, TrainConfig};
