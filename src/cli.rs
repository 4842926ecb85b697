// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::default_config_path;

/// Command-line arguments for `shell-relay`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "shell-relay",
    version,
    about = "Relay operator messages to shell commands and stream their output back.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the settings file (TOML).
    ///
    /// Default: `ShellRelay.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// Caller id the console transport attributes messages to.
    ///
    /// Defaults to the first entry of `[access].enabled_users`.
    #[arg(long, value_name = "ID")]
    pub user: Option<i64>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SHELL_RELAY_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Load and validate the settings, print them, and exit.
    #[arg(long)]
    pub check: bool,
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
