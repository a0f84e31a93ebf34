//! XOR classification built layer by layer.
//!
//! Architecture: 2 → 16 (ReLU) → 16 (Sigmoid) → 2 (Identity logits)
//! Loss:         SoftmaxCrossEntropyLoss
//! Optimizer:    per-sample SGD, lr = 0.1, 500 epochs
//!
//! Run with:
//!   RUST_LOG=info cargo run --example xor

use backprop_nn::{
    train_network, ActivationFunction, Dense, Matrix, Network, Result, SoftmaxCrossEntropyLoss,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::filter::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut rng = StdRng::seed_from_u64(2025);
    let mut network = Network::new(
        vec![
            Dense::new(2, 16, ActivationFunction::ReLU, &mut rng)?,
            Dense::new(16, 16, ActivationFunction::Sigmoid, &mut rng)?,
            // Last layer must stay Identity: its pre-activations are the logits.
            Dense::new(16, 2, ActivationFunction::Identity, &mut rng)?,
        ],
        SoftmaxCrossEntropyLoss,
    )?;

    let inputs = Matrix::from_columns(&[
        vec![0.0, 0.0],
        vec![1.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 1.0],
    ])?;
    let expected_outputs = Matrix::from_columns(&[
        vec![1.0, 0.0],
        vec![0.0, 1.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
    ])?;

    let loss = train_network(&mut network, &inputs, &expected_outputs, 500, 0.1)?;
    println!("Final avg loss: {loss:.6}");
    println!("Training accuracy: {}", network.eval(&inputs, &expected_outputs)?);

    for j in 0..inputs.cols {
        let input = inputs.column(j);
        println!("Input: {:?} -> Output: {:.4?}", input, network.predict(&input)?);
    }

    Ok(())
}
