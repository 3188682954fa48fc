use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hrm_pipeline::testing::{replay_trace, synthetic_trace, SampleTrace};
use hrm_pipeline::HrmConfig;

#[derive(Parser, Debug)]
#[command(
    name = "hrm_cli",
    about = "Deterministic trace harness for the heart-rate pipeline"
)]
struct Cli {
    /// Optional JSON config file (defaults apply when omitted)
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a recorded sample trace and print the surfaced readings
    Replay {
        #[arg(long)]
        trace: PathBuf,
        /// Write readings as JSON instead of human-readable lines
        #[arg(long)]
        json: bool,
    },
    /// Generate a synthetic trace to stdout or a file
    Synth {
        #[arg(long, default_value_t = 1500)]
        steps: usize,
        #[arg(long, default_value_t = 40)]
        poll_interval_ms: u32,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the effective configuration as JSON
    DumpConfig,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => HrmConfig::load_from_file(path),
        None => HrmConfig::default(),
    };

    match cli.command {
        Commands::Replay { trace, json } => run_replay(config, &trace, json),
        Commands::Synth {
            steps,
            poll_interval_ms,
            seed,
            output,
        } => run_synth(steps, poll_interval_ms, seed, output),
        Commands::DumpConfig => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run_replay(config: HrmConfig, trace_path: &PathBuf, json: bool) -> Result<ExitCode> {
    let trace = SampleTrace::load(trace_path)
        .with_context(|| format!("loading trace {}", trace_path.display()))?;
    let events = replay_trace(&trace, config);

    if json {
        println!("{}", serde_json::to_string_pretty(&events)?);
    } else {
        for event in &events {
            println!(
                "step {:5}: {:5.1} bpm (confidence {})",
                event.step,
                event.reading.bpm10 as f64 / 10.0,
                event.reading.confidence
            );
        }
        println!(
            "{} readings surfaced over {} samples",
            events.len(),
            trace.steps.len()
        );
    }
    Ok(ExitCode::SUCCESS)
}

fn run_synth(
    steps: usize,
    poll_interval_ms: u32,
    seed: u64,
    output: Option<PathBuf>,
) -> Result<ExitCode> {
    let trace = synthetic_trace(steps, poll_interval_ms, seed);
    let json = serde_json::to_string_pretty(&trace)?;
    match output {
        Some(path) => {
            fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
            eprintln!("Wrote {} steps to {}", trace.steps.len(), path.display());
        }
        None => println!("{json}"),
    }
    Ok(ExitCode::SUCCESS)
}
