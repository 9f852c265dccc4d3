//! Tracing subscriber setup.
//!
//! The TUI owns the terminal, so it logs to a file in the cache directory.
//! The command-line renderer logs to stderr. Both honor `RUST_LOG` and fall
//! back to `lyricloud=info`.

use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid.
const DEFAULT_FILTER: &str = "lyricloud=info";

/// Log file name inside the cache directory.
const LOG_FILE: &str = "lyricloud.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Cache directory for the application, created if needed.
fn log_dir() -> Option<PathBuf> {
    let dir = dirs::cache_dir()?.join("lyricloud");
    fs_err::create_dir_all(&dir).ok()?;
    Some(dir)
}

/// Send logs to a file so they do not tear the terminal UI.
///
/// Returns the log file path, or `None` when no writable location exists or
/// a subscriber is already installed. Logging is optional; failures here
/// never stop the app.
pub fn init_file_logging() -> Option<PathBuf> {
    let path = log_dir()?.join(LOG_FILE);
    let file = fs_err::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .ok()?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .ok()?;

    tracing::info!("Logging to {}", path.display());
    Some(path)
}

/// Send logs to stderr.
pub fn init_stderr_logging() {
    // A second init in the same process is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init();
}
