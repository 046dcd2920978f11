//! Command-line interface definitions for indicators-demo.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use logging::LogArgs;

/// Command-line interface for the `indicators-demo` binary.
#[derive(Parser, Debug)]
#[command(
    name = "indicators-demo",
    about = "Drive widget indicators from the terminal",
    version
)]
pub struct Cli {
    /// Logging controls shared across our binaries.
    #[command(flatten)]
    pub log: LogArgs,

    /// Optional path to a JSON options file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Ring the bell even when no configured sound file exists.
    #[arg(long)]
    pub bell_always: bool,

    /// Optional subcommand; runs the interactive session when absent.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Top-level demo commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load and validate an options file then exit.
    Check {
        /// Path to the options file (defaults to --config, then to empty options)
        path: Option<PathBuf>,

        /// Dump the validated options as JSON to stdout
        #[arg(long)]
        dump: bool,
    },
}
