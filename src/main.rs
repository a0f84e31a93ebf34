use clap::Parser;
use tracing::info;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::format;

use backprop_nn::{train, Matrix, NetworkSpec, Result, TrainConfig};

/// Trains a feed-forward classifier on the four-sample XOR problem.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON network spec to train. Defaults to the built-in 2-16-16-2 network.
    #[arg(long)]
    spec: Option<String>,

    /// Overrides the seed stored in the spec.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = 500)]
    epochs: usize,

    #[arg(long, default_value_t = 0.1)]
    learning_rate: f64,

    /// Writes the spec that was used to this path before training.
    #[arg(long)]
    save_spec: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let event_format = format().with_target(false).without_time();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .event_format(event_format)
        .init();

    let mut spec = match &args.spec {
        Some(path) => NetworkSpec::load_json(path)?,
        None => NetworkSpec::xor(),
    };
    if let Some(seed) = args.seed {
        spec.seed = seed;
    }
    if let Some(path) = &args.save_spec {
        spec.save_json(path)?;
    }

    let mut network = spec.build()?;
    info!(name = %spec.name, parameters = network.parameter_count(), "built network");

    let x = Matrix::from_columns(&[
        vec![0.0, 0.0],
        vec![1.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 1.0],
    ])?;
    let y = Matrix::from_columns(&[
        vec![1.0, 0.0],
        vec![0.0, 1.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
    ])?;

    let config = TrainConfig::new(args.epochs, args.learning_rate);
    let history = train(&mut network, &x, &y, &config)?;

    let accuracy = network.eval(&x, &y)?;
    if let Some(last) = history.last() {
        println!("Final avg loss: {:.6}", last.train_loss);
    }
    println!("Training accuracy: {accuracy}");

    for j in 0..x.cols {
        let input = x.column(j);
        let probs = network.predict(&input)?;
        println!("Input: {:?} -> Probabilities: {:.4?}", input, probs);
    }

    Ok(())
}
