//! CLI interface using clap
//!
//! Provides the command-line interface for DocGap

mod commands;
mod render;

pub use commands::*;
pub use render::*;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// DocGap - Is this documentation still accurate?
#[derive(Parser, Debug)]
#[command(name = "docgap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the repository (defaults to current directory)
    #[arg(short, long, global = true, default_value = ".")]
    pub path: PathBuf,

    /// Config file (defaults to .docgap.toml in the repository root)
    #[arg(short, long, global = true, env = "DOCGAP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json)
    #[arg(short = 'o', long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check every rule for documentation drift (default)
    Check(CheckArgs),

    /// Report how many declared entities each doc mentions
    Coverage,

    /// Write a default configuration file
    Init(InitArgs),

    /// Show the effective configuration and resolved rules
    Config,

    /// Watch for changes and re-run the check
    Watch(WatchArgs),
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Arguments for check command
#[derive(Parser, Debug, Default, Clone, Copy)]
pub struct CheckArgs {
    /// Also report entity coverage for each rule
    #[arg(long)]
    pub coverage: bool,

    /// Treat UNKNOWN verdicts as failures
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for init command
#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Overwrite an existing configuration
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for watch command
#[derive(Parser, Debug)]
pub struct WatchArgs {
    /// Debounce interval in milliseconds
    #[arg(short, long, default_value = "1000")]
    pub debounce: u64,

    /// Also report entity coverage on each run
    #[arg(long)]
    pub coverage: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
