//! Tracing initialization.
//!
//! The diagnostic log is separate from the journal's audit log: this is
//! developer-facing output on stdout (compact or JSON), optionally copied
//! to a file through a non-blocking appender. File logging is refused when
//! an ancestor of the log path is a symlink.

use anyhow::Result;
use chrono::Local;
use datesort::output as out;
use datesort::{LogLevel, config::path_has_symlink_ancestor};
use std::fmt as stdfmt;
use std::fs::OpenOptions;
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt as tsfmt;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry;
use tracing_subscriber::util::SubscriberInitExt;

/// Wall-clock timestamps in local time for log lines.
struct LocalClock;
impl FormatTime for LocalClock {
    fn format_time(&self, w: &mut tsfmt::format::Writer<'_>) -> stdfmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S"))
    }
}

fn filter_for(lvl: &LogLevel) -> EnvFilter {
    // Console verbosity maps one step finer than tracing's levels so that
    // "info" surfaces debug events and "debug" surfaces everything.
    EnvFilter::new(match lvl {
        LogLevel::Quiet => "error",
        LogLevel::Normal => "info",
        LogLevel::Info => "debug",
        LogLevel::Debug => "trace",
    })
}

/// Open the log file for append behind a non-blocking writer, refusing
/// symlinked ancestors. Failures disable file logging rather than abort.
fn file_writer(path: &Path) -> Option<(NonBlocking, WorkerGuard)> {
    match path_has_symlink_ancestor(path) {
        Ok(false) => {}
        Ok(true) => {
            out::print_warn(&format!(
                "Refusing to log to {}: an ancestor is a symlink. Logs stay on stdout.",
                path.display()
            ));
            return None;
        }
        Err(e) => {
            out::print_warn(&format!(
                "Could not check log path {} for symlinks ({e}). Logs stay on stdout.",
                path.display()
            ));
            return None;
        }
    }

    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    match OpenOptions::new().append(true).create(true).open(path) {
        Ok(file) => Some(tracing_appender::non_blocking(file)),
        Err(e) => {
            out::print_warn(&format!(
                "Failed to open log file {} ({e}). Logs stay on stdout.",
                path.display()
            ));
            None
        }
    }
}

/// Initialize the global subscriber. Returns the appender guard when a
/// file layer was added; the caller must hold it until exit so buffered
/// lines flush.
pub fn init_tracing(
    lvl: &LogLevel,
    log_file: Option<&Path>,
    json: bool,
) -> Result<Option<WorkerGuard>> {
    let filter = filter_for(lvl);
    let file = log_file.and_then(file_writer);

    // The fmt layer's type differs between json and compact, so each
    // combination is initialized in its own branch.
    match (json, file) {
        (true, Some((writer, guard))) => {
            registry()
                .with(filter)
                .with(tsfmt::layer().event_format(tsfmt::format().json()).with_timer(LocalClock))
                .with(
                    tsfmt::layer()
                        .event_format(tsfmt::format().json())
                        .with_timer(LocalClock)
                        .with_writer(writer),
                )
                .init();
            Ok(Some(guard))
        }
        (false, Some((writer, guard))) => {
            registry()
                .with(filter)
                .with(tsfmt::layer().with_timer(LocalClock).compact())
                .with(tsfmt::layer().with_timer(LocalClock).compact().with_writer(writer))
                .init();
            Ok(Some(guard))
        }
        (true, None) => {
            registry()
                .with(filter)
                .with(tsfmt::layer().event_format(tsfmt::format().json()).with_timer(LocalClock))
                .init();
            Ok(None)
        }
        (false, None) => {
            registry()
                .with(filter)
                .with(tsfmt::layer().with_timer(LocalClock).compact())
                .init();
            Ok(None)
        }
    }
}
