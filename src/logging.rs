//! Process-wide logging setup.
//!
//! Both binaries install a single `tracing` subscriber at startup and log
//! through the `tracing` macros everywhere else. Startup lines carry the
//! service name and pid.

use tracing_subscriber::EnvFilter;

/// Service name stamped on startup log lines.
pub const SERVICE_NAME: &str = "rcmd";

/// Install the process-wide subscriber.
///
/// `RUST_LOG` takes precedence over `level` when set. Must be called at
/// most once per process.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
