use thiserror::Error;

/// Every way a layer, loss, network or training run can refuse to proceed.
///
/// All variants are fatal to the operation that produced them; nothing in the
/// core retries.
#[derive(Debug, Error)]
pub enum NnError {
    /// Unsupported activation, empty layer list, broken width chain, or
    /// invalid training hyperparameters.
    #[error("configuration error: {0}")]
    Config(String),

    /// A vector or matrix did not have the length the receiver expected.
    #[error("shape mismatch in {context}: expected {expected}, got {actual}")]
    ShapeMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    /// An operation was called out of the forward → backprop → update → clear order.
    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid network spec JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NnError>;

/// Returns `ShapeMismatch` unless `actual == expected`.
pub(crate) fn check_len(context: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(NnError::ShapeMismatch { context, expected, actual })
    }
}
