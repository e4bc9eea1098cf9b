//! roster-cli: command-line driver for the roster engine.
//!
//! Reads a scheduling request as JSON (file or stdin), runs the engine, and
//! writes the outcome as JSON. Exit codes follow batch-driver conventions:
//! 0 when a schedule was produced (Optimal/Feasible), 2 when the problem was
//! proven infeasible or the budget ran out (Infeasible/Unknown), 1 on engine
//! errors and bad input.
//!
//! # Commands
//!
//! - `solve`: run the engine on a request file
//! - `validate`: check a request file without solving

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use roster_core::models::{ProgressCallback, SolveRequest, SolveStatus};
use roster_core::{calendar_export, flat_export, solve_with_progress};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "roster-cli")]
#[command(version = "0.1.0")]
#[command(about = "Roster engine CLI - JSON in, schedule out", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the engine on a request file
    Solve {
        /// Input JSON file path (use --stdin to read from stdin)
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,

        /// Read input from stdin instead of a file
        #[arg(long)]
        stdin: bool,

        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,

        /// Output shape: the full outcome, a per-date calendar, or a flat
        /// assignment list
        #[arg(long, value_enum, default_value_t = OutputFormat::Full)]
        format: OutputFormat,

        /// Suppress the progress bar
        #[arg(short, long)]
        quiet: bool,
    },

    /// Validate a request file without solving
    Validate {
        /// Input JSON file path
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,

        /// Read input from stdin instead of a file
        #[arg(long)]
        stdin: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Full,
    Calendar,
    Flat,
}

fn main() -> Result<ExitCode> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            input,
            stdin,
            output,
            pretty,
            format,
            quiet,
        } => cmd_solve(input, stdin, output, pretty, format, quiet),
        Commands::Validate { input, stdin } => cmd_validate(input, stdin),
    }
}

fn read_input(file: Option<PathBuf>, use_stdin: bool) -> Result<String> {
    if use_stdin {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        Ok(buffer)
    } else if let Some(path) = file {
        fs::read_to_string(&path).with_context(|| format!("Failed to read file: {:?}", path))
    } else {
        anyhow::bail!("Either provide an input file or use --stdin")
    }
}

fn cmd_solve(
    input: Option<PathBuf>,
    stdin: bool,
    output: Option<PathBuf>,
    pretty: bool,
    format: OutputFormat,
    quiet: bool,
) -> Result<ExitCode> {
    let json_str = read_input(input, stdin)?;
    let request: SolveRequest =
        serde_json::from_str(&json_str).context("Failed to parse input JSON")?;

    let bar = if quiet {
        None
    } else {
        let bar = ProgressBar::new(1);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner} [{elapsed_precise}] {bar:30} {pos}/{len} iterations {msg}",
            )
            .expect("static template"),
        );
        Some(bar)
    };
    let progress: Option<ProgressCallback> = bar.clone().map(|bar| {
        Box::new(move |update: &roster_core::models::ProgressUpdate| {
            bar.set_length(update.planned_iterations);
            bar.set_position(update.iteration);
            bar.set_message(format!(
                "cost {:.0}, violations {}",
                update.best_cost, update.best_hard_violations
            ));
            true
        }) as ProgressCallback
    });

    let outcome = solve_with_progress(&request, progress.as_ref())
        .map_err(|e| anyhow::anyhow!("Engine rejected the request: {e}"))?;
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }
    log::info!(
        "solve finished: {:?} in {:.2}s",
        outcome.status,
        outcome.diagnostics.wall_time_seconds
    );

    let rendered = match (format, &outcome.schedule) {
        (OutputFormat::Calendar, Some(schedule)) => {
            to_json(&calendar_export(&request, schedule), pretty)?
        }
        (OutputFormat::Flat, Some(schedule)) => to_json(&flat_export(&request, schedule), pretty)?,
        // Without a schedule the full outcome is all there is to show,
        // whatever format was asked for.
        _ => to_json(&outcome, pretty)?,
    };

    if let Some(output_path) = output {
        fs::write(&output_path, &rendered)
            .with_context(|| format!("Failed to write output to {:?}", output_path))?;
        eprintln!("Result written to {:?}", output_path);
    } else {
        println!("{}", rendered);
    }

    Ok(match outcome.status {
        SolveStatus::Optimal | SolveStatus::Feasible => ExitCode::SUCCESS,
        SolveStatus::Infeasible | SolveStatus::Unknown => ExitCode::from(2),
        SolveStatus::Error => ExitCode::from(1),
    })
}

fn cmd_validate(input: Option<PathBuf>, stdin: bool) -> Result<ExitCode> {
    let json_str = read_input(input, stdin)?;
    let request: SolveRequest = match serde_json::from_str(&json_str) {
        Ok(request) => request,
        Err(e) => {
            println!(
                "{}",
                serde_json::json!({"valid": false, "error": e.to_string()})
            );
            return Ok(ExitCode::from(1));
        }
    };

    match roster_core::engine::validation::validate(&request) {
        Ok(()) => {
            println!(
                "{}",
                serde_json::json!({"valid": true, "message": "Request is valid"})
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            println!(
                "{}",
                serde_json::json!({"valid": false, "error": e.to_string()})
            );
            Ok(ExitCode::from(1))
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    Ok(if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    })
}
