//! lint-gate CLI tool.
//!
//! Usage:
//! ```bash
//! lint-gate check [OPTIONS] [PATH]
//! lint-gate list-rules
//! lint-gate init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Runs Rust sources through the syntax and style engines and fails when
/// either reports a problem
#[derive(Parser)]
#[command(name = "lint-gate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate every Rust file under a directory
    Check {
        /// Path to check (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format for diagnostics
        #[arg(short, long, value_enum, default_value_t = Format::Stylish)]
        format: Format,

        /// Exclude patterns (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,
    },

    /// List available rules
    ListRules,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// Grouped per file.
    #[default]
    Stylish,
    /// One line per diagnostic.
    Compact,
    /// JSON arrays.
    Json,
}

impl From<Format> for lint_gate_engines::OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Stylish => Self::Stylish,
            Format::Compact => Self::Compact,
            Format::Json => Self::Json,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            path,
            format,
            exclude,
        } => {
            let source = config_resolver::resolve(&path, cli.config.as_deref());
            let outcome = commands::check::run(&path, format.into(), exclude, &source)?;
            if outcome == commands::check::Outcome::Failed {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::ListRules => {
            commands::list_rules::run();
            Ok(())
        }
        Commands::Init { force } => commands::init::run(std::path::Path::new("."), force),
    }
}
