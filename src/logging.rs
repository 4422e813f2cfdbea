//! Logging configuration using the tracing ecosystem.
//!
//! Logs go to a daily rolling file so they never draw over the terminal UI.
//! The level comes from `RUST_LOG` when set, otherwise from the `--debug`
//! flag.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Default log filter if RUST_LOG is not set.
const DEFAULT_LOG_FILTER: &str = "bugdesk=info,warn";

/// Log filter used with `--debug`.
const DEBUG_LOG_FILTER: &str = "bugdesk=debug,info";

/// Log file name prefix.
const LOG_FILE: &str = "bugdesk.log";

/// Initialize the logging system.
///
/// Logs are written to the platform-specific local data directory:
/// - Linux: `~/.local/share/bugdesk/logs/`
/// - macOS: `~/Library/Application Support/bugdesk/logs/`
/// - Windows: `C:\Users\<User>\AppData\Local\bugdesk\logs\`
///
/// Configure via `RUST_LOG`, e.g. `RUST_LOG=bugdesk::form=debug` to trace
/// form state changes and option loads.
///
/// The returned guard flushes buffered lines when dropped; keep it alive
/// until the terminal is restored.
///
/// # Errors
///
/// Returns an error if the log directory cannot be determined or created,
/// or if a global subscriber is already set.
pub fn init(debug: bool) -> anyhow::Result<WorkerGuard> {
    let log_dir = get_log_directory()?;
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let subscriber = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .with(filter(debug));

    tracing::subscriber::set_global_default(subscriber)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "bugdesk starting up");
    tracing::debug!(log_dir = %log_dir.display(), "Log directory");

    Ok(guard)
}

fn filter(debug: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(debug)))
}

fn default_directive(debug: bool) -> &'static str {
    if debug {
        DEBUG_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    }
}

fn get_log_directory() -> anyhow::Result<PathBuf> {
    let base_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;

    Ok(base_dir.join("bugdesk").join("logs"))
}

/// Get the path where logs are stored, for showing to users.
pub fn log_directory() -> Option<PathBuf> {
    get_log_directory().ok()
}

/// Log application shutdown.
pub fn shutdown() {
    tracing::info!("bugdesk shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_directory_has_expected_structure() {
        if let Some(dir) = log_directory() {
            assert!(dir.ends_with("bugdesk/logs"));
        }
    }

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(false), "bugdesk=info,warn");
        assert_eq!(default_directive(true), "bugdesk=debug,info");
    }
}
