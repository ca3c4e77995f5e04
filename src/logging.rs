//! Logging configuration using the tracing ecosystem.
//!
//! This module configures structured logging with:
//! - A compact stderr layer carrying the operator narrative
//! - An optional daily-rotating log file
//! - Environment-based log level configuration

use std::path::PathBuf;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Default log level if RUST_LOG is not set.
const DEFAULT_LOG_FILTER: &str = "jira_sweep=info,warn";

/// Log level used with `--verbose` when RUST_LOG is not set.
const VERBOSE_LOG_FILTER: &str = "jira_sweep=debug,warn";

/// Logging options chosen on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOptions {
    /// Raise the crate's level to debug.
    pub verbose: bool,
    /// Also write to the rotating log file.
    pub to_file: bool,
}

/// Initialize the logging system.
///
/// `RUST_LOG` takes precedence over `--verbose`:
/// - `RUST_LOG=jira_sweep=debug` - Debug only for this crate
/// - `RUST_LOG=jira_sweep=trace` - Every request attempt
///
/// # Log Directory
///
/// When file logging is on, logs go to the platform-specific local data
/// directory, e.g. `~/.local/share/jira-sweep/logs/` on Linux.
///
/// # Errors
///
/// Returns an error if the log directory cannot be created or the tracing
/// subscriber cannot be set.
pub fn init(options: LogOptions) -> anyhow::Result<()> {
    let default_filter = if options.verbose {
        VERBOSE_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .compact();

    let file_layer = if options.to_file {
        let log_dir = get_log_directory()?;
        std::fs::create_dir_all(&log_dir)?;
        let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "jira-sweep.log");
        Some(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
    } else {
        None
    };

    let subscriber = tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .with(filter);

    tracing::subscriber::set_global_default(subscriber)?;

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "jira-sweep starting up");
    if options.to_file {
        if let Some(dir) = log_directory() {
            tracing::debug!(log_dir = %dir.display(), "Log directory");
        }
    }

    Ok(())
}

/// Get the log directory path.
///
/// Returns the platform-specific local data directory with `jira-sweep/logs` appended.
fn get_log_directory() -> anyhow::Result<PathBuf> {
    let base_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;

    Ok(base_dir.join("jira-sweep").join("logs"))
}

/// Get the path where logs are stored.
pub fn log_directory() -> Option<PathBuf> {
    get_log_directory().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_directory_has_expected_structure() {
        if let Some(dir) = log_directory() {
            assert!(dir.ends_with("jira-sweep/logs"));
        }
    }

    #[test]
    fn test_default_options_log_to_stderr_only() {
        let options = LogOptions::default();
        assert!(!options.verbose);
        assert!(!options.to_file);
    }
}
