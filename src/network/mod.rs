pub mod network;
pub mod spec;

pub use network::{Network, TrainingPhase};
pub use spec::{LayerSpec, NetworkSpec};
