// VISION 2060 Scenario Tool
// Evaluate survey scenarios and sample around the 2020 baseline.
//
// Usage:
//   cargo run --bin vision -- baseline
//   cargo run --bin vision -- evaluate scenario.json      # { "lumbershare": 45, ... }
//   cargo run --bin vision -- sample --runs 1000 --seed 42 --spread 10
//   cargo run --bin vision -- --params params.json --json baseline

mod report;
mod sample;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use tracing::info;
use vision_engine::*;

// ─── CLI ────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "vision", about = "Evaluate VISION 2060 forest scenarios")]
struct Args {
    /// JSON file overriding model constants
    #[arg(long, global = true)]
    params: Option<PathBuf>,

    /// JSON file overriding the 2020 baseline table
    #[arg(long, global = true)]
    baseline: Option<PathBuf>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate the 2020 baseline scenario
    Baseline,

    /// Evaluate a scenario given as `{ fieldId: value }`; absent fields keep
    /// their baseline value
    Evaluate {
        scenario: PathBuf,
    },

    /// Seeded Monte Carlo perturbation of the baseline
    Sample {
        #[arg(long, default_value_t = 1000)]
        runs: usize,

        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Maximum relative change per field, in percent
        #[arg(long, default_value_t = 10.0)]
        spread: f64,

        /// Rescale land cover and shares to sum to 100
        #[arg(long)]
        normalize: bool,
    },
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let params: ModelParams = match &args.params {
        Some(path) => read_json(path)?,
        None => ModelParams::default(),
    };
    let baseline: Baseline = match &args.baseline {
        Some(path) => read_json(path)?,
        None => Baseline::default(),
    };
    let mut form = ScenarioForm::with_config(params.clone(), baseline.clone());

    match args.command {
        Command::Baseline => {
            let eval = form.evaluate();
            if args.json {
                print_json(&eval)?;
            } else {
                report::print_evaluation("2020 baseline", &eval, &[]);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Evaluate { scenario } => {
            let values: BTreeMap<String, Option<f64>> = read_json(&scenario)?;
            let eval = form
                .load(&values)
                .with_context(|| format!("loading {}", scenario.display()))?;
            info!(fields = values.len(), balanced = eval.verdict.all_ok(), "scenario loaded");
            if args.json {
                print_json(&eval)?;
            } else {
                let title = format!("Scenario {}", scenario.display());
                report::print_evaluation(&title, &eval, &form.demand_changes());
            }
            Ok(if eval.verdict.all_ok() { ExitCode::SUCCESS } else { ExitCode::from(2) })
        }
        Command::Sample { runs, seed, spread, normalize } => {
            let cfg = sample::SampleConfig { runs, seed, spread_pct: spread, normalize };
            info!(runs, seed, spread, "sampling scenarios");
            let summary = sample::run(&cfg, &params, &baseline);
            if args.json {
                print_json(&summary)?;
            } else {
                report::print_summary(&summary);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
