//! # shield CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use shield_cli::check::{run_check, CheckArgs};
use shield_cli::generate::{run_generate_id, GenerateIdArgs};
use shield_cli::rules::{run_rules, RulesArgs};

/// Validate anti-piracy back-office records against their rule chains.
#[derive(Parser, Debug)]
#[command(name = "shield", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    /// Ignored when RUST_LOG is set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a record from a JSON or YAML payload and print its export.
    Check(CheckArgs),

    /// Print the field chains a record is validated against.
    Rules(RulesArgs),

    /// Print fresh 32-character record identifiers.
    GenerateId(GenerateIdArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("shield CLI starting");

    let result = match cli.command {
        Commands::Check(args) => run_check(&args),
        Commands::Rules(args) => run_rules(&args),
        Commands::GenerateId(args) => run_generate_id(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
