//! Command-line argument definitions for the Strata CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, engine selection,
//! the random seed, configuration file selection, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Strata layout tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input graph document (TOML)
    #[arg(help = "Path to the input graph document")]
    pub input: String,

    /// Path to the output layout document; stdout when absent
    #[arg(short, long)]
    pub output: Option<String>,

    /// Layout engine (level, annealing); the configured default when absent
    #[arg(short, long)]
    pub engine: Option<String>,

    /// Seed for the random source; OS entropy when absent
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
