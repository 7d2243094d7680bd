//! Dual event/access logging (§6.4), reproducing the split between the
//! original's `eventLog` and `accessLog` on top of `tracing`.
//!
//! Grounded in the teacher's single `tracing_subscriber::fmt().init()` call
//! in `main.rs`, extended into a registry of layers so a second file sink
//! can be targeted at access-log events only.

use std::path::Path;

use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Keeps the non-blocking writer threads alive for the process lifetime.
/// Dropping this early would silently stop log delivery.
pub struct LoggingGuards {
    _event_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
    _access_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
}

fn file_appender(path: &Path) -> tracing_appender::rolling::RollingFileAppender {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| Path::new("."));
    let filename = path.file_name().unwrap_or_else(|| std::ffi::OsStr::new("pacserver.log"));
    tracing_appender::rolling::never(dir, filename)
}

/// Install the global subscriber. `event_log_file`/`access_log_file` absent
/// degrades that sink to stdout-only, matching the original's tolerance
/// for unset log paths.
pub fn init(event_log_file: Option<&Path>, access_log_file: Option<&Path>) -> LoggingGuards {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = fmt::layer();

    let (event_layer, event_guard) = match event_log_file {
        Some(path) => {
            let (writer, guard) = tracing_appender::non_blocking(file_appender(path));
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(filter_fn(|meta| meta.target() != "access"));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let (access_layer, access_guard) = match access_log_file {
        Some(path) => {
            let (writer, guard) = tracing_appender::non_blocking(file_appender(path));
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(filter_fn(|meta| meta.target() == "access"));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(event_layer)
        .with(access_layer)
        .init();

    LoggingGuards {
        _event_guard: event_guard,
        _access_guard: access_guard,
    }
}

/// Emit one access-log line. Routed to the `access` target so it lands
/// only in the access-log sink (when configured), never the event log.
pub fn log_access(remote: &str, path: &str, status: u16) {
    tracing::info!(target: "access", remote, path, status, "request served");
}
