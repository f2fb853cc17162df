//! Log writer module
//!
//! Installs the global tracing subscriber with two sinks: application events
//! go to stderr or the error log file, access lines (target `access`) go to
//! stdout or the access log file.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Tracing target carrying access log lines
pub const ACCESS_TARGET: &str = "access";

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<File> {
    // Create parent directories if they don't exist
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

fn make_writer(path: Option<&str>, fallback: fn() -> BoxMakeWriter) -> io::Result<BoxMakeWriter> {
    Ok(match path {
        Some(path) => BoxMakeWriter::new(Mutex::new(open_log_file(path)?)),
        None => fallback(),
    })
}

/// Level filter: `RUST_LOG` when set, else the configured level with access lines on
pub fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{level},{ACCESS_TARGET}=info")))
}

/// Initialize the global subscriber
///
/// This should be called once at application startup.
/// Returns error if log files cannot be opened or a subscriber is already set.
pub fn init(
    level: &str,
    access_log_file: Option<&str>,
    error_log_file: Option<&str>,
) -> io::Result<()> {
    let access_writer = make_writer(access_log_file, || BoxMakeWriter::new(io::stdout))?;
    let error_writer = make_writer(error_log_file, || BoxMakeWriter::new(io::stderr))?;

    let app_layer = fmt::layer()
        .with_writer(error_writer)
        .with_ansi(error_log_file.is_none())
        .with_filter(filter_fn(|meta| meta.target() != ACCESS_TARGET));

    // Access lines are preformatted; print the message alone
    let access_layer = fmt::layer()
        .with_writer(access_writer)
        .with_ansi(false)
        .without_time()
        .with_level(false)
        .with_target(false)
        .with_filter(filter_fn(|meta| meta.target() == ACCESS_TARGET));

    tracing_subscriber::registry()
        .with(build_filter(level))
        .with(app_layer)
        .with(access_layer)
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::AlreadyExists, e))
}
