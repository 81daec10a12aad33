//! Process-wide tracing setup for the REPL.
//!
//! Every event goes to the console (stderr, so prompts and command output on
//! stdout stay readable) and, when the config directory is usable, to
//! `<config dir>/cartera/cartera.log`, rotated by size. `DEBUG_LOGGING`
//! raises the cartera crates to debug.

use std::io;
use std::path::{Path, PathBuf};

use rolling_file::{BasicRollingFileAppender, RollingConditionBasic};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, fmt, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt,
};

pub const DEBUG_ENV: &str = "DEBUG_LOGGING";
pub const LOG_FILE_NAME: &str = "cartera.log";

const MAX_LOG_BYTES: u64 = 10 * 1024 * 1024;
/// Rotated files kept next to the live one
const KEPT_LOG_FILES: usize = 1;

/// Install the global subscriber.
///
/// The returned guard flushes the file writer when dropped; hold it until
/// the process exits. `None` means the file sink could not be opened and
/// only the console receives events.
pub fn init() -> Option<WorkerGuard> {
    let debug_logging = std::env::var_os(DEBUG_ENV).is_some();

    let file_sink = dirs::config_dir()
        .map(|dir| dir.join("cartera"))
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no config directory"))
        .and_then(|dir| open_log_file(&dir));

    let (file_layer, guard, log_file) = match file_sink {
        Ok((appender, path)) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_span_events(FmtSpan::NONE);
            (Some(layer), Some(guard), Some(path))
        }
        Err(e) => {
            // no subscriber yet, so report directly
            eprintln!("file logging disabled: {e}");
            (None, None, None)
        }
    };

    let console_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .with(EnvFilter::new(filter_directive(debug_logging)))
        .init();

    tracing::info!(?log_file, debug_logging, "logging initialized");
    guard
}

/// Filter applied to both sinks
pub fn filter_directive(debug_logging: bool) -> &'static str {
    if debug_logging {
        "info,cartera=debug,cartera_core=debug"
    } else {
        "info"
    }
}

/// Create `dir` if needed and open the size-rotated log file inside it.
pub fn open_log_file(dir: &Path) -> io::Result<(BasicRollingFileAppender, PathBuf)> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(LOG_FILE_NAME);
    let appender = BasicRollingFileAppender::new(
        &path,
        RollingConditionBasic::new().max_size(MAX_LOG_BYTES),
        KEPT_LOG_FILES,
    )?;
    Ok((appender, path))
}
