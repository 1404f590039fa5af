//! # formkit CLI entry point
//!
//! Parses command-line arguments, resolves configuration, installs the
//! tracing subscriber, and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use formkit_cli::config::{CliConfig, DEFAULT_LOG_LEVEL};
use formkit_cli::field::{run_field, FieldArgs};
use formkit_cli::fill::{run_fill, FillArgs};
use formkit_cli::form::{run_form, FormArgs};

/// formkit: build forms, save them, and fill them in.
///
/// Forms are stored as JSON in a single file. Fields can be validated with
/// rules and derived from other fields with arithmetic formulas.
#[derive(Parser, Debug)]
#[command(name = "formkit", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to the form store, overriding configuration.
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create, list, show, rename, and delete forms.
    Form(FormArgs),

    /// Add, update, delete, move, and reorder fields.
    Field(FieldArgs),

    /// Fill in a form and submit it.
    Fill(FillArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = CliConfig::load(cli.config.as_deref(), cli.store.as_deref());

    let level = match (cli.verbose, &config) {
        (0, Ok(config)) => config.log_level.clone(),
        (0, Err(_)) => DEFAULT_LOG_LEVEL.to_string(),
        (1, _) => "info".to_string(),
        (2, _) => "debug".to_string(),
        _ => "trace".to_string(),
    };
    let filter = EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::from(1);
        }
    };

    tracing::debug!(store = %config.store_path.display(), "formkit starting");

    let result = match &cli.command {
        Commands::Form(args) => run_form(args, &config),
        Commands::Field(args) => run_field(args, &config),
        Commands::Fill(args) => run_fill(args, &config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
