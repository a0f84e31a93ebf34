use std::time::Instant;

use tracing::{info, trace};

use crate::error::{check_len, Result};
use crate::loss::loss::Loss;
use crate::math::matrix::Matrix;
use crate::network::network::Network;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;

/// Trains `network` on the columns of `x` (features × samples) against the
/// one-hot columns of `y` (classes × samples).
///
/// Every sample, in dataset order, runs forward → loss → backprop →
/// apply_updates → clear_grads. There is no shuffling and no batching, so
/// a fixed initialization always produces the same run.
///
/// Returns one `EpochStats` per epoch; the average loss is also logged at
/// `info` level. A successful run leaves the network `Idle`, with or without
/// accuracy tracking.
pub fn train<L: Loss>(
    network: &mut Network<L>,
    x: &Matrix,
    y: &Matrix,
    config: &TrainConfig,
) -> Result<Vec<EpochStats>> {
    config.validate()?;
    x.check_shape()?;
    y.check_shape()?;
    check_len("train sample count", x.cols, y.cols)?;
    check_len("train feature count", network.input_size(), x.rows)?;
    check_len("train class count", network.output_size(), y.rows)?;

    let samples: Vec<(Vec<f64>, Vec<f64>)> =
        (0..x.cols).map(|j| (x.column(j), y.column(j))).collect();

    let mut history = Vec::with_capacity(config.epochs);
    for epoch in 1..=config.epochs {
        let t_start = Instant::now();

        let train_loss = run_one_epoch(network, &samples, config.learning_rate)?;
        let elapsed_ms = t_start.elapsed().as_millis() as u64;

        let train_accuracy = if config.track_accuracy {
            let accuracy = network.eval(x, y)?;
            network.clear_grads();
            Some(accuracy)
        } else {
            None
        };

        info!(
            epoch,
            total = config.epochs,
            avg_loss = train_loss,
            accuracy = train_accuracy,
            "epoch finished"
        );

        history.push(EpochStats {
            epoch,
            total_epochs: config.epochs,
            train_loss,
            train_accuracy,
            elapsed_ms,
        });
    }

    Ok(history)
}

/// `train` with the bare `(epochs, learning_rate)` signature. Returns the
/// average loss of the last epoch.
pub fn train_network<L: Loss>(
    network: &mut Network<L>,
    x: &Matrix,
    y: &Matrix,
    epochs: usize,
    learning_rate: f64,
) -> Result<f64> {
    let history = train(network, x, y, &TrainConfig::new(epochs, learning_rate))?;
    Ok(history.last().map_or(0.0, |stats| stats.train_loss))
}

/// One pass of per-sample SGD. Returns the mean loss; an empty dataset
/// averages to 0.
fn run_one_epoch<L: Loss>(
    network: &mut Network<L>,
    samples: &[(Vec<f64>, Vec<f64>)],
    learning_rate: f64,
) -> Result<f64> {
    if samples.is_empty() {
        return Ok(0.0);
    }

    let mut total_loss = 0.0;
    for (i, (input, expected)) in samples.iter().enumerate() {
        network.forward(input)?;
        let loss = network.compute_loss(expected)?;
        total_loss += loss;
        network.backprop(expected)?;
        network.apply_updates(learning_rate);
        network.clear_grads();
        trace!(sample = i, loss, "step");
    }

    Ok(total_loss / samples.len() as f64)
}
