//! ml-bench CLI Module
//!
//! Command-line interface for the KNN and perceptron benchmarks.

use clap::{ArgAction, Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};

use crate::evaluation::{Evaluator, KNNBenchmarkConfig, PerceptronBenchmarkConfig};
use crate::preprocessing::{NormalizerConfig, RawTable};
use crate::training::PerceptronConfig;
use crate::utils::{DataLoader, Timer};

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString    { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

fn kv(key: &str, val: &str) {
    println!("  {:<16} {}", muted(key), val.white().bold());
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "ml-bench")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "KNN and perceptron benchmarks over delimited tables")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify a held-out split with k-nearest neighbours
    Knn {
        /// Input data file
        #[arg(short, long)]
        data: PathBuf,

        /// Number of neighbours
        #[arg(short, long, default_value_t = 3)]
        k: usize,

        /// Share of rows used for training
        #[arg(long, default_value_t = 0.6)]
        split: f64,

        /// Class column index (last column when omitted)
        #[arg(long)]
        class_index: Option<usize>,

        /// Min-max normalize even when every column is numeric
        #[arg(long)]
        norm: bool,

        /// Seed for the shuffle
        #[arg(long)]
        seed: Option<u64>,

        /// Field delimiter
        #[arg(long, default_value_t = ',')]
        delimiter: char,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Cross-validate a perceptron
    Perceptron {
        /// Input data file
        #[arg(short, long)]
        data: PathBuf,

        /// Number of folds
        #[arg(long, default_value_t = 3)]
        folds: usize,

        /// Learning rate
        #[arg(long, default_value_t = 0.01)]
        l_rate: f64,

        /// Training epochs per fold
        #[arg(long, default_value_t = 500)]
        epochs: usize,

        /// Class column index (last column when omitted)
        #[arg(long)]
        class_index: Option<usize>,

        /// Min-max normalize even when every column is numeric
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        norm: bool,

        /// Seed for the fold shuffle
        #[arg(long)]
        seed: Option<u64>,

        /// Worker threads for fold evaluation (rayon default when omitted)
        #[arg(long)]
        jobs: Option<usize>,

        /// Field delimiter
        #[arg(long, default_value_t = ',')]
        delimiter: char,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

// ─── Data loading ──────────────────────────────────────────────────────────────

pub fn load_data(path: &Path, delimiter: char) -> anyhow::Result<RawTable> {
    if !delimiter.is_ascii() {
        anyhow::bail!("Delimiter must be a single ASCII character, got {:?}", delimiter);
    }
    let table = DataLoader::new()
        .with_delimiter(delimiter as u8)
        .load_csv(path)?;
    Ok(table)
}

fn normalizer_config(class_index: Option<usize>, norm: bool) -> NormalizerConfig {
    let config = NormalizerConfig::new().with_force_normalize(norm);
    match class_index {
        Some(idx) => config.with_class_index(idx),
        None => config,
    }
}

// ─── Commands ──────────────────────────────────────────────────────────────────

#[allow(clippy::too_many_arguments)]
pub fn cmd_knn(
    data_path: &Path,
    k: usize,
    split: f64,
    class_index: Option<usize>,
    norm: bool,
    seed: Option<u64>,
    delimiter: char,
    json: bool,
) -> anyhow::Result<()> {
    let config = KNNBenchmarkConfig::default()
        .with_k(k)
        .with_split(split)
        .with_normalizer(normalizer_config(class_index, norm));
    config.validate()?;

    if !json {
        section("KNN");
        step_run("Loading data");
    }
    let timer = Timer::start("Loading data");
    let table = load_data(data_path, delimiter)?;
    let elapsed = timer.stop();
    if !json {
        step_done(&format!("{} rows × {} cols in {:?}", table.n_rows(), table.n_cols(), elapsed));
        step_run(&format!("Classifying with k = {}", k.to_string().cyan()));
    }

    let timer = Timer::start("KNN benchmark");
    let report = Evaluator::with_random_state(seed).run_knn(&table, &config)?;
    let elapsed = timer.stop();

    if json {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    step_done(&format!("{:?}", elapsed));
    println!();
    println!("{}", report);
    println!();
    kv("Train rows", &report.train_size.to_string());
    kv("Test rows", &report.test_size.to_string());
    println!();

    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_perceptron(
    data_path: &Path,
    folds: usize,
    l_rate: f64,
    epochs: usize,
    class_index: Option<usize>,
    norm: bool,
    seed: Option<u64>,
    jobs: Option<usize>,
    delimiter: char,
    json: bool,
) -> anyhow::Result<()> {
    let mut config = PerceptronBenchmarkConfig::default()
        .with_folds(folds)
        .with_perceptron(
            PerceptronConfig::default()
                .with_learning_rate(l_rate)
                .with_epochs(epochs),
        )
        .with_normalizer(normalizer_config(class_index, norm));
    if let Some(jobs) = jobs {
        config.cross_validation = config.cross_validation.with_n_jobs(jobs);
    }
    config.validate()?;

    if !json {
        section("Perceptron");
        step_run("Loading data");
    }
    let timer = Timer::start("Loading data");
    let table = load_data(data_path, delimiter)?;
    let elapsed = timer.stop();
    if !json {
        step_done(&format!("{} rows × {} cols in {:?}", table.n_rows(), table.n_cols(), elapsed));
        step_run(&format!("Cross-validating over {} folds", folds.to_string().cyan()));
    }

    let timer = Timer::start("Perceptron benchmark");
    let report = Evaluator::with_random_state(seed).run_perceptron(&table, &config)?;
    let elapsed = timer.stop();

    if json {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    step_done(&format!("{:?}", elapsed));
    println!();
    println!("{}", report);
    println!();
    for (i, score) in report.fold_accuracies.iter().enumerate() {
        kv(&format!("Fold {}", i + 1), &format!("{:.2}", score * 100.0));
    }
    println!();

    Ok(())
}
