//! ml-bench - Main Entry Point
//!
//! Runs the KNN and perceptron benchmarks from the command line.

use clap::Parser;
use ml_bench::cli::{cmd_knn, cmd_perceptron, Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ml_bench=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Knn { data, k, split, class_index, norm, seed, delimiter, json } => {
            cmd_knn(&data, k, split, class_index, norm, seed, delimiter, json)?;
        }
        Commands::Perceptron {
            data,
            folds,
            l_rate,
            epochs,
            class_index,
            norm,
            seed,
            jobs,
            delimiter,
            json,
        } => {
            cmd_perceptron(&data, folds, l_rate, epochs, class_index, norm, seed, jobs, delimiter, json)?;
        }
    }

    Ok(())
}
