//! Infomax training demo.
//!
//! Trains an overcomplete (optionally recurrent) network on uniform
//! random input batches and reports the mutual-information cost proxy
//! as it falls.

use clap::Parser;
use infomax::{Network, NetworkConfig};
use ndarray::Array2;
use ndarray_rand::RandomExt;
use rand::distributions::Uniform;

#[derive(Parser, Debug)]
#[command(
    name = "infomax-train",
    about = "Train an overcomplete recurrent infomax network on uniform noise"
)]
struct Args {
    /// Input dimensionality
    #[arg(long, default_value_t = 2)]
    inputs: usize,

    /// Output dimensionality (must be >= inputs)
    #[arg(long, default_value_t = 8)]
    outputs: usize,

    /// Samples per training batch
    #[arg(long, default_value_t = 200)]
    batch_size: usize,

    /// Number of training epochs
    #[arg(long, default_value_t = 1000)]
    epochs: usize,

    /// Weight learning rate (eta)
    #[arg(long, default_value_t = 0.01)]
    eta: f64,

    /// Also learn the recurrent (lateral) weights
    #[arg(long)]
    recurrent: bool,

    /// Report cost every N epochs
    #[arg(long, default_value_t = 50)]
    report_every: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = NetworkConfig {
        learning_rate: args.eta,
        learn_rec: args.recurrent,
        ..NetworkConfig::default()
    };
    let mut net = Network::with_config(args.inputs, args.outputs, config)?;

    eprintln!("Infomax training");
    eprintln!("  Network: {} -> {}", net.inputs(), net.outputs());
    eprintln!(
        "  Batch size: {}, Epochs: {}, Eta: {}",
        args.batch_size, args.epochs, args.eta
    );
    eprintln!(
        "  Recurrent learning: {}",
        if args.recurrent { "enabled" } else { "disabled" }
    );
    eprintln!();

    let dist = Uniform::new(-1.0, 1.0);
    for epoch in 0..args.epochs {
        let batch = Array2::random((args.inputs, args.batch_size), dist);
        net.learn(&batch)?;

        if epoch % args.report_every == 0 {
            let cost = net.cost(&batch)?;
            eprintln!("Epoch {}: cost = {:.6}", epoch, cost);
        }
    }

    let final_batch = Array2::random((args.inputs, args.batch_size), dist);
    eprintln!();
    eprintln!("Final cost: {:.6}", net.cost(&final_batch)?);

    Ok(())
}
