//! rcmd: the remote command execution client.
//!
//! Builds a single request from the CLI flags and the invoking user's
//! login, sends it and prints the server's raw reply.

use clap::Parser;
use rcmd::client::{self, CliArgs};
use rcmd::logging;
use tracing::error;

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    logging::init("info");

    match client::run(&args).await {
        Ok(reply) => println!("Server response: {reply}"),
        Err(e) => {
            error!(error = %e, "Request failed");
            std::process::exit(1);
        }
    }
}
