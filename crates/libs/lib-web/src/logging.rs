//! # Logging Initialization
//!
//! Configures the global `tracing` subscriber for the whole service.
//!
//! Development: colorized console output at DEBUG.
//! Production: console at INFO plus daily-rotated files under `logs/`,
//! with rolled files older than the retention window removed at startup.
//!
//! `RUST_LOG` overrides the environment-derived default filter. Must run
//! before any other component logs; repeated calls are no-ops (the first
//! registered subscriber stays in place).

use lib_core::config::AppSettings;
use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Directory for production log files.
pub const LOG_DIR: &str = "logs";

/// Rolled log files are named `email_agent.YYYY-MM-DD`.
const LOG_FILE_PREFIX: &str = "email_agent";

/// Keep seven days of rolled logs.
const LOG_RETENTION: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Initialize the global logging subscriber.
///
/// Safe to call multiple times; only the first call installs sinks.
pub fn init_logging(app: &AppSettings) {
    let default_directive = if app.is_development() { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    if app.is_production() {
        // Logging is not up yet, so directory problems go to stderr.
        if let Err(e) = fs::create_dir_all(LOG_DIR) {
            eprintln!("Warning: failed to create log directory {LOG_DIR}: {e}");
        }
        prune_old_logs(Path::new(LOG_DIR), LOG_RETENTION);

        let file_appender = tracing_appender::rolling::daily(LOG_DIR, LOG_FILE_PREFIX);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let console_layer = fmt::layer().with_target(true);
        let file_layer = fmt::layer()
            .with_writer(non_blocking)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false);

        let installed = tracing_subscriber::registry()
            .with(filter)
            .with(console_layer)
            .with(file_layer)
            .try_init()
            .is_ok();

        if installed {
            // The writer guard must live as long as the process, otherwise
            // buffered log lines are dropped at the next flush.
            std::mem::forget(guard);
        }
    } else {
        let _ = fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_line_number(true)
            .with_ansi(true)
            .try_init();
    }

    tracing::info!(environment = %app.env, "Logger ready");
}

/// Delete rolled log files older than the retention window.
///
/// Only files carrying the application prefix are touched; anything else in
/// the directory is left alone.
fn prune_old_logs(dir: &Path, retention: Duration) {
    let cutoff = SystemTime::now()
        .checked_sub(retention)
        .unwrap_or(SystemTime::UNIX_EPOCH);

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return,
    };

    for entry in entries.flatten() {
        let name = entry.file_name();
        if !name.to_string_lossy().starts_with(LOG_FILE_PREFIX) {
            continue;
        }

        let expired = entry
            .metadata()
            .and_then(|meta| meta.modified())
            .map(|modified| modified < cutoff)
            .unwrap_or(false);

        if expired {
            if let Err(e) = fs::remove_file(entry.path()) {
                eprintln!("Warning: failed to remove old log {:?}: {e}", entry.path());
            }
        }
    }
}
