use serde::{Deserialize, Serialize};

use crate::error::{NnError, Result};

/// Configuration for a `train` run.
///
/// # Fields
/// - `epochs`         — total number of full passes over the training data
/// - `learning_rate`  — SGD step size, applied after every sample
/// - `track_accuracy` — when set, each epoch also evaluates accuracy on the
///                      training set (one extra forward pass per sample)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub epochs: usize,
    pub learning_rate: f64,
    #[serde(default)]
    pub track_accuracy: bool,
}

impl TrainConfig {
    pub fn new(epochs: usize, learning_rate: f64) -> Self {
        TrainConfig {
            epochs,
            learning_rate,
            track_accuracy: false,
        }
    }

    pub fn with_accuracy(mut self) -> Self {
        self.track_accuracy = true;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(NnError::Config("epochs must be at least 1".into()));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(NnError::Config(format!(
                "learning rate must be a positive finite number, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }
}
