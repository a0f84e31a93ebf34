use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::activation::activation::ActivationFunction;
use crate::error::{NnError, Result};
use crate::layers::dense::{Dense, WeightInit};
use crate::loss::cross_entropy::SoftmaxCrossEntropyLoss;
use crate::network::network::Network;

/// Describes one layer in a network specification.
///
/// Fields:
/// - `input_size` — number of values feeding into this layer (the previous
///                  layer's `size`, or the raw input dimension for the first)
/// - `size`       — number of neurons, i.e. the output width
/// - `activation` — activation applied after the affine transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub input_size: usize,
    pub size: usize,
    pub activation: ActivationFunction,
}

/// A serializable description of a network architecture and how to
/// initialize it. Only the shape and the seed are stored, never trained
/// parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Human-readable name, used in log output.
    pub name: String,
    /// Seed for the weight initializer; the same spec always builds the
    /// same starting network.
    pub seed: u64,
    #[serde(default)]
    pub init: WeightInit,
    /// Ordered list of layer descriptions (input → output).
    pub layers: Vec<LayerSpec>,
}

impl NetworkSpec {
    /// Builds the described network with a softmax cross-entropy loss.
    pub fn build(&self) -> Result<Network<SoftmaxCrossEntropyLoss>> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let layers = self
            .layers
            .iter()
            .map(|l| Dense::with_init(l.input_size, l.size, l.activation, self.init, &mut rng))
            .collect::<Result<Vec<_>>>()?;
        Network::new(layers, SoftmaxCrossEntropyLoss)
    }

    pub fn from_json_str(json: &str) -> Result<NetworkSpec> {
        serde_json::from_str(json).map_err(NnError::from)
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `NetworkSpec` from a JSON file.
    pub fn load_json(path: &str) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    /// The 2 → 16 → 16 → 2 XOR classifier.
    pub fn xor() -> NetworkSpec {
        NetworkSpec {
            name: "xor".into(),
            seed: 0,
            init: WeightInit::Uniform,
            layers: vec![
                LayerSpec { input_size: 2, size: 16, activation: ActivationFunction::ReLU },
                LayerSpec { input_size: 16, size: 16, activation: ActivationFunction::Sigmoid },
                LayerSpec { input_size: 16, size: 2, activation: ActivationFunction::Identity },
            ],
        }
    }
}
