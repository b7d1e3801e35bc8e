// ABOUTME: Spotter CLI - offline workout validation and fallback generation
// ABOUTME: Reads JSON files, runs the safety engine in memory, and prints JSON to stdout
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety
//!
//! Usage:
//! ```bash
//! # Validate a plan against a library
//! spotter-cli validate --plan plan.json --library data/exercise_library.json
//!
//! # Validate with injury and experience context
//! spotter-cli validate --plan plan.json --library data/exercise_library.json --context ctx.json
//!
//! # Build a deterministic bodyweight plan for the given constraints
//! spotter-cli generate --constraints constraints.json --library data/exercise_library.json
//! ```

mod commands;
mod helpers;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use spotter_server::logging::LoggingConfig;
use tracing::error;

#[derive(Parser)]
#[command(
    name = "spotter-cli",
    about = "Spotter workout safety CLI",
    long_about = "Offline access to the workout safety engine: validate plans and build fallback workouts without a server."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging on stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Validate a workout plan and print the safety report
    Validate {
        /// Workout plan JSON file
        #[arg(long)]
        plan: PathBuf,

        /// Exercise library JSON file
        #[arg(long)]
        library: PathBuf,

        /// User safety context JSON file
        #[arg(long)]
        context: Option<PathBuf>,
    },

    /// Build a fallback workout plan and print it
    Generate {
        /// Workout constraints JSON file
        #[arg(long)]
        constraints: PathBuf,

        /// Exercise library JSON file
        #[arg(long)]
        library: PathBuf,

        /// User safety context JSON file
        #[arg(long)]
        context: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = LoggingConfig::for_cli(cli.verbose).init() {
        eprintln!("Failed to initialize logging: {e}");
    }

    let result = match cli.command {
        Command::Validate {
            plan,
            library,
            context,
        } => commands::validate::run(&plan, &library, context.as_deref()).await,
        Command::Generate {
            constraints,
            library,
            context,
        } => commands::generate::run(&constraints, &library, context.as_deref()).await,
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}
