//! Structured logging and tracing for the star map.
//!
//! Provides structured, span-based, filterable logging via the `tracing` ecosystem.
//! Console output carries uptime timestamps and module paths; debug builds also
//! write a JSON log file for post-mortem analysis. The level is taken from the
//! configuration unless `RUST_LOG` overrides it.

use std::fs::File;
use std::path::{Path, PathBuf};

use starmap_config::Config;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt};

const LOG_FILE: &str = "starmap.log";

/// Filter used when neither `RUST_LOG` nor the config names a level.
pub const DEFAULT_FILTER: &str = "info";

/// Resolve the filter string from an optional config.
///
/// An empty `debug.log_level` falls back to [`DEFAULT_FILTER`].
pub fn filter_from_config(config: Option<&Config>) -> String {
    match config {
        Some(config) if !config.debug.log_level.is_empty() => config.debug.log_level.clone(),
        _ => DEFAULT_FILTER.to_string(),
    }
}

/// Initialize the tracing subscriber.
///
/// Sets up structured logging with:
/// - Console output with uptime timestamps, module paths, and severity levels
/// - JSON file logging (`starmap.log`) in debug builds when `log_dir` is given
/// - Environment-based filtering (respects RUST_LOG)
///
/// Fails if a global subscriber is already installed.
///
/// # Examples
///
/// ```no_run
/// use starmap_log::init_logging;
/// use starmap_config::Config;
///
/// let config = Config::default();
/// init_logging(None, false, Some(&config)).expect("logging already initialized");
/// ```
pub fn init_logging(
    log_dir: Option<&Path>,
    debug_build: bool,
    config: Option<&Config>,
) -> Result<(), TryInitError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_from_config(config)));

    let file_layer = log_dir
        .filter(|_| debug_build)
        .and_then(open_log_file)
        .map(|file| {
            fmt::layer()
                .json()
                .with_writer(file)
                .with_ansi(false)
                .with_timer(fmt::time::uptime())
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_thread_names(true)
                .with_timer(fmt::time::uptime()),
        )
        .with(file_layer)
        .try_init()
}

/// Where the JSON log lands inside `log_dir`.
pub fn log_file_path(log_dir: &Path) -> PathBuf {
    log_dir.join(LOG_FILE)
}

/// Truncates the log file; `None` if the directory cannot be written, in which
/// case only the console layer is installed.
fn open_log_file(log_dir: &Path) -> Option<File> {
    std::fs::create_dir_all(log_dir).ok()?;
    File::create(log_file_path(log_dir)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_defaults_without_config() {
        assert_eq!(filter_from_config(None), "info");
    }

    #[test]
    fn test_filter_uses_config_level() {
        let mut config = Config::default();
        config.debug.log_level = "debug,starmap_star=trace".to_string();
        assert_eq!(filter_from_config(Some(&config)), "debug,starmap_star=trace");
    }

    #[test]
    fn test_empty_config_level_falls_back() {
        let mut config = Config::default();
        config.debug.log_level.clear();
        assert_eq!(filter_from_config(Some(&config)), DEFAULT_FILTER);
    }

    #[test]
    fn test_log_file_created_in_dir() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("logs");

        assert!(open_log_file(&logs).is_some());
        assert!(log_file_path(&logs).is_file());
        assert_eq!(log_file_path(&logs).file_name().unwrap(), "starmap.log");
    }

    #[test]
    fn test_env_filter_parsing() {
        let valid_filters = ["info", "debug,starmap_star=trace", "warn,starmap_demo=debug"];

        for filter_str in &valid_filters {
            let result = EnvFilter::try_new(filter_str);
            assert!(result.is_ok(), "Failed to parse filter: {}", filter_str);
        }
    }
}
