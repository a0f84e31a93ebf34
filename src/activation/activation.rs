use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NnError;
use crate::math::functions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationFunction {
    ReLU,
    Sigmoid,
    Tanh,
    Identity,
    /// Softmax is vector-valued and belongs to the loss. It exists here only so
    /// configurations can name it; `Dense::new()` rejects it.
    Softmax,
}

/// Which cached quantity an activation's derivative is evaluated at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivativeInput {
    /// The pre-activation `z = Wx + b`.
    PreActivation,
    /// The activated output `y = f(z)`.
    Output,
}

impl ActivationFunction {
    /// True for the kinds a dense layer can apply element-wise.
    pub fn is_elementwise(&self) -> bool {
        !matches!(self, ActivationFunction::Softmax)
    }

    /// Element-wise activation. `Softmax` never reaches here because no layer
    /// can be built with it; it passes values through unchanged.
    pub fn function(&self, z: f64) -> f64 {
        match self {
            ActivationFunction::ReLU => functions::relu(z),
            ActivationFunction::Sigmoid => functions::sigmoid(z),
            ActivationFunction::Tanh => functions::tanh(z),
            ActivationFunction::Identity | ActivationFunction::Softmax => functions::identity(z),
        }
    }

    pub fn derivative_input(&self) -> DerivativeInput {
        match self {
            ActivationFunction::ReLU => DerivativeInput::PreActivation,
            _ => DerivativeInput::Output,
        }
    }

    /// Derivative evaluated at the quantity named by `derivative_input()`:
    /// `z` for ReLU, `y` for the rest. Passing the other one gives wrong
    /// gradients.
    pub fn derivative(&self, selected: f64) -> f64 {
        match self {
            ActivationFunction::ReLU => functions::relu_derivative(selected),
            ActivationFunction::Sigmoid => functions::sigmoid_derivative(selected),
            ActivationFunction::Tanh => functions::tanh_derivative(selected),
            ActivationFunction::Identity | ActivationFunction::Softmax => {
                functions::identity_derivative(selected)
            }
        }
    }
}

impl fmt::Display for ActivationFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActivationFunction::ReLU => "ReLU",
            ActivationFunction::Sigmoid => "Sigmoid",
            ActivationFunction::Tanh => "Tanh",
            ActivationFunction::Identity => "Identity",
            ActivationFunction::Softmax => "Softmax",
        };
        f.write_str(name)
    }
}

impl FromStr for ActivationFunction {
    type Err = NnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "relu" => Ok(ActivationFunction::ReLU),
            "sigmoid" => Ok(ActivationFunction::Sigmoid),
            "tanh" => Ok(ActivationFunction::Tanh),
            "identity" | "linear" | "none" => Ok(ActivationFunction::Identity),
            "softmax" => Ok(ActivationFunction::Softmax),
            _ => Err(NnError::Config(format!("unknown activation function '{s}'"))),
        }
    }
}
