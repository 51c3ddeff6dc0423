//! Command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// GitHub-to-task-service reconciler.
#[derive(Debug, Parser)]
#[command(name = "issuesync", version, about)]
pub struct Cli {
    /// Path to a YAML config file (default: issuesync.yaml in the
    /// working directory)
    #[arg(long, global = true, env = "ISSUESYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log every mutating action instead of performing it
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Enable debug-level logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run reconciliation cycles on the configured interval until ctrl-c
    Run,
    /// Run a single reconciliation cycle and exit
    Once,
}
