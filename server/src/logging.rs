//! Logging setup for the UI server.
//!
//! Always logs to stdout. With a log directory, also writes `topsql-ui.log`
//! there, rotated at 10 MB. `DEBUG_LOGGING=1` turns on debug output for the
//! server and request tracing; `RUST_LOG` overrides both.

use std::path::Path;

use rolling_file::{BasicRollingFileAppender, RollingConditionBasic};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const LOG_FILE_NAME: &str = "topsql-ui.log";
const MAX_LOG_BYTES: u64 = 10 * 1024 * 1024;

fn filter(debug_logging: bool) -> EnvFilter {
    let directive = if debug_logging {
        "info,topsql_server=debug,tower_http=debug"
    } else {
        "info"
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive))
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop and must be held until
/// shutdown. `None` means stdout-only, either by request or because the log
/// file could not be opened.
pub fn init(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let debug_logging = std::env::var("DEBUG_LOGGING").is_ok();

    let Some(log_dir) = log_dir else {
        init_stdout_only(debug_logging);
        return None;
    };

    if let Err(e) = std::fs::create_dir_all(log_dir) {
        // No subscriber yet
        eprintln!("Failed to create log directory {log_dir:?}: {e}, using stdout only");
        init_stdout_only(debug_logging);
        return None;
    }

    let log_path = log_dir.join(LOG_FILE_NAME);
    let file_appender = match BasicRollingFileAppender::new(
        &log_path,
        RollingConditionBasic::new().max_size(MAX_LOG_BYTES),
        1,
    ) {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("Failed to open log file {log_path:?}: {e}, using stdout only");
            init_stdout_only(debug_logging);
            return None;
        }
    };
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout_layer)
        .with(filter(debug_logging))
        .init();

    tracing::info!(log_file = ?log_path, debug_logging, "Logging initialized");
    Some(guard)
}

fn init_stdout_only(debug_logging: bool) {
    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(filter(debug_logging))
        .init();

    tracing::info!(debug_logging, "Logging initialized (stdout only)");
}
