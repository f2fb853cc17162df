//! Logger module
//!
//! Provides logging utilities for the site server including:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - File-based logging support
//!
//! Everything goes through `tracing`; access lines use the `access` target so
//! the subscriber can route them to their own sink.

mod format;
pub mod writer;

pub use format::AccessLogEntry;
pub use writer::ACCESS_TARGET;

use crate::config::Config;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        &config.logging.level,
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    tracing::info!("======================================");
    tracing::info!("Site server started");
    tracing::info!("Listening on: http://{addr}");
    tracing::info!("Log level: {}", config.logging.level);
    if let Some(workers) = config.server.workers {
        tracing::info!("Worker threads: {workers}");
    }
    if let Some(ref path) = config.logging.access_log_file {
        tracing::info!("Access log: {path}");
    }
    if let Some(ref path) = config.logging.error_log_file {
        tracing::info!("Error log: {path}");
    }
    tracing::info!("Static export: {}", config.site.public_dir);
    tracing::info!(
        "Content: {} (products), {} (blog)",
        config.content.products_dir,
        config.content.blog_dir
    );
    tracing::info!("Subdomains: {}", config.routing.subdomains.len());
    tracing::info!("======================================");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    tracing::debug!("[Connection] Accepted from: {peer_addr}");
}

pub fn log_connection_rejected(peer_addr: &SocketAddr, active: u64) {
    tracing::warn!("[Connection] Rejected {peer_addr}: {active} connections active");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    tracing::error!("Failed to serve connection: {err:?}");
}

pub fn log_shutdown(active: u64) {
    tracing::info!("Shutdown signal received, draining {active} connection(s)");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    tracing::info!(target: ACCESS_TARGET, "{}", entry.format(format));
}
