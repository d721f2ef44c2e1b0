//! Process-wide `tracing` setup for the bundle tools.
//!
//! Events go to a daily rolling file per component (`<component>.<date>.log`)
//! and optionally to stderr. `RUST_LOG` overrides the `info` default.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::error::{BundleError, Result};

pub const LOG_DIR_ENV: &str = "LSIF_BUNDLE_LOG_DIR";

/// Log directory relative to `$HOME` when [`LOG_DIR_ENV`] is unset.
pub const DEFAULT_LOG_DIR: &str = ".lsif-bundle/logs";

/// Daily files kept per component before the oldest is pruned.
pub const MAX_LOG_FILES: usize = 14;

/// Log directory for this process, honouring [`LOG_DIR_ENV`].
pub fn log_dir() -> PathBuf {
    resolve_log_dir(
        std::env::var(LOG_DIR_ENV).ok().as_deref(),
        std::env::var("HOME").ok().as_deref(),
    )
}

pub fn resolve_log_dir(dir_override: Option<&str>, home: Option<&str>) -> PathBuf {
    match dir_override.filter(|dir| !dir.is_empty()) {
        Some(dir) => PathBuf::from(dir),
        None => Path::new(home.unwrap_or(".")).join(DEFAULT_LOG_DIR),
    }
}

/// Installs the global subscriber. Keep the guard alive until exit or
/// buffered file events are lost.
pub fn init_logging(component: &str, log_dir: &Path, to_stderr: bool) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(component)
        .filename_suffix("log")
        .max_log_files(MAX_LOG_FILES)
        .build(log_dir)
        .map_err(|e| BundleError::Logging(e.to_string()))?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);
    let stderr_layer = to_stderr.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| BundleError::Logging(e.to_string()))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_directory_wins_over_home() {
        assert_eq!(
            resolve_log_dir(Some("/var/log/lsif"), Some("/home/dev")),
            PathBuf::from("/var/log/lsif")
        );
        assert_eq!(
            resolve_log_dir(Some(""), Some("/home/dev")),
            PathBuf::from("/home/dev/.lsif-bundle/logs")
        );
        assert_eq!(resolve_log_dir(None, None), PathBuf::from("./.lsif-bundle/logs"));
    }

    #[test]
    fn component_log_file_lands_in_the_log_dir() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("logs");

        let guard = init_logging("unit", &log_dir, false).unwrap();
        tracing::info!("logging initialised");
        drop(guard);

        let names: Vec<String> = std::fs::read_dir(&log_dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert!(
            names.iter().any(|n| n.starts_with("unit.") && n.ends_with(".log")),
            "{names:?}"
        );

        // the subscriber is process-wide
        assert!(matches!(
            init_logging("unit", &log_dir, false),
            Err(BundleError::Logging(_))
        ));
    }
}
