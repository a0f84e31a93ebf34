pub mod layer;
pub mod dense;

pub use layer::Layer;
pub use dense::{Dense, WeightInit};
