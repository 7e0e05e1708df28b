use crate::error::{DiscoveryError, DiscoveryResult};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// `$HOME/.classglob/logs`, or `./.classglob/logs` without a home directory
pub fn default_log_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".classglob/logs")
}

/// Install the global subscriber.
///
/// Writes to a daily-rolling file named after `component` inside `log_dir`
/// (default [`default_log_dir`]) and, when `to_stderr` is set, to stderr.
/// The level defaults to `info` and can be overridden with `RUST_LOG`.
/// Keep the returned guard alive for as long as logs should be flushed.
pub fn init_logging(
    component: &str,
    log_dir: Option<&Path>,
    to_stderr: bool,
) -> DiscoveryResult<WorkerGuard> {
    let log_dir = log_dir.map(Path::to_path_buf).unwrap_or_else(default_log_dir);
    std::fs::create_dir_all(&log_dir).map_err(|e| {
        DiscoveryError::Logging(format!("cannot create {}: {}", log_dir.display(), e))
    })?;

    // Files like discovery.log.2024-01-21
    let file_appender = tracing_appender::rolling::daily(&log_dir, format!("{component}.log"));
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);

    let installed = if to_stderr {
        let stderr_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false);
        registry.with(stderr_layer).try_init()
    } else {
        registry.try_init()
    };
    installed.map_err(|e| DiscoveryError::Logging(e.to_string()))?;

    Ok(guard)
}
