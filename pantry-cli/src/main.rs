//! Pantry CLI - Command-line interface
//!
//! Inspects, validates and exports package metadata using the pantry library.

mod commands;
mod error;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::config::ConfigCommands;
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "pantry", version, about = "Inspect and validate package metadata")]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load a package and print a summary
    Show {
        /// Package directory or manifest file
        path: PathBuf,

        /// Also print the long description
        #[arg(long)]
        readme: bool,
    },

    /// Print the compiled metadata.json form of a package
    Json {
        /// Package directory or manifest file
        path: PathBuf,
    },

    /// Check a package for problems
    Validate {
        /// Package directory or manifest file
        path: PathBuf,

        /// Treat warnings as failures
        #[arg(long)]
        strict: bool,
    },

    /// List the packages in a registry directory
    List {
        /// Directory whose subdirectories are packages
        dir: PathBuf,
    },

    /// View or modify configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Show { path, readme } => commands::show::run(&path, readme),
        Commands::Json { path } => commands::json::run(&path),
        Commands::Validate { path, strict } => commands::validate::run(&path, strict),
        Commands::List { dir } => commands::list::run(&dir),
        Commands::Config(command) => commands::config::run(command),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
