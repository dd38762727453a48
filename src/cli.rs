// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `jobgraph`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "jobgraph",
    version,
    about = "Run a frame's job graph on a dependency-aware worker pool.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the frame description (TOML).
    #[arg(long, value_name = "PATH", default_value = "Frame.toml")]
    pub config: String,

    /// Number of worker threads; overrides `[scheduler].worker_threads`.
    ///
    /// 0 means one worker per available hardware thread.
    #[arg(long, value_name = "N")]
    pub threads: Option<usize>,

    /// How many frames to run back to back.
    #[arg(long, value_name = "K", default_value_t = 1)]
    pub frames: u64,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `JOBGRAPH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the job graph, but don't run anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
