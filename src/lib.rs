//! rcmd: a minimal remote command execution service.
//!
//! A server (`rcmdd`) listens on a TCP or UDP socket, receives a single
//! framed request carrying a caller login and a shell command, checks the
//! login against an allowlist, runs the command through the host shell and
//! replies with its captured output. A companion client (`rcmd`) builds
//! such requests and prints the server's reply.
//!
//! The protocol trusts the self-asserted login string: authorization is
//! advisory, not security-enforcing. Do not expose the server beyond a
//! trusted network.

pub mod auth;
pub mod client;
pub mod config;
pub mod executor;
pub mod listener;
pub mod logging;
pub mod protocol;
pub mod server;
