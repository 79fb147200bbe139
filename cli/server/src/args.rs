//! CLI argument definitions for cw-server.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::Level;

/// Column-prefetching server.
///
/// Listens for prefetch requests from the query layer and warms the shared
/// cache with Parquet column chunks read from S3.
///
/// ## Example
///
/// Run against a local config:
///   cw-server -c config.json -l debug
#[derive(Parser, Debug)]
#[command(name = "cw-server")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the JSON configuration file
    #[arg(short = 'c', long, default_value = "config.json")]
    pub config: PathBuf,

    /// Log level
    #[arg(short = 'l', long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

/// Log verbosity.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["cw-server"]);
        assert_eq!(cli.config, PathBuf::from("config.json"));
        assert!(matches!(cli.log_level, LogLevel::Info));
    }

    #[test]
    fn test_explicit_args() {
        let cli = Cli::parse_from(["cw-server", "-c", "/etc/cw/config.json", "-l", "trace"]);
        assert_eq!(cli.config, PathBuf::from("/etc/cw/config.json"));
        assert!(matches!(cli.log_level, LogLevel::Trace));
    }
}
