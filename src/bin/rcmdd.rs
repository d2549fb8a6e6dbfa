//! rcmdd: the remote command execution server.
//!
//! Loads the config and allowed-users files, binds the configured socket
//! and serves requests forever. Any startup failure is logged and exits
//! the process non-zero; once serving, the dispatch loop never exits.

use clap::Parser;
use rcmd::auth::Allowlist;
use rcmd::config::{CliArgs, ServerConfig};
use rcmd::listener::Listener;
use rcmd::{logging, server};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    logging::init(&args.log_level);

    info!(
        service = logging::SERVICE_NAME,
        pid = std::process::id(),
        "Starting rcmdd"
    );

    let config = match ServerConfig::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };
    info!(
        port = config.port,
        transport = ?config.transport,
        "Configuration loaded"
    );

    let allowlist = match Allowlist::load(&args.allowlist) {
        Ok(allowlist) => allowlist,
        Err(e) => {
            error!(error = %e, "Failed to load users file");
            std::process::exit(1);
        }
    };
    info!(users = allowlist.len(), "Loaded allowed users");

    let listener = match Listener::open(&config) {
        Ok(listener) => listener,
        Err(e) => {
            error!(port = config.port, error = %e, "Failed to bind socket");
            std::process::exit(1);
        }
    };
    info!(port = config.port, "Server started");

    if let Err(e) = server::serve(listener, allowlist).await {
        error!(error = %e, "Server loop failed");
        std::process::exit(1);
    }
}
