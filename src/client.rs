//! Companion client: build a request frame, send it over the selected
//! transport and return the server's raw reply.
//!
//! The caller identity is resolved from the invoking user's passwd entry
//! and asserted as-is; the server side decides whether it is allowed.

use crate::config::Transport;
use crate::protocol::{self, MAX_FRAME};
use bytes::BytesMut;
use clap::Parser;
use std::io;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, UdpSocket};
use tracing::info;

/// Command-line arguments for the client
#[derive(Parser, Debug)]
#[command(name = "rcmd")]
#[command(version = "0.1.0")]
#[command(about = "Remote command execution client", long_about = None)]
pub struct CliArgs {
    /// Server address or hostname
    #[arg(short = 'H', long)]
    pub host: String,

    /// Server port
    #[arg(short, long)]
    pub port: u16,

    /// Use stream transport (TCP, the default)
    #[arg(short, long, conflicts_with = "dgram")]
    pub stream: bool,

    /// Use datagram transport (UDP)
    #[arg(short, long)]
    pub dgram: bool,

    /// Shell command to execute remotely
    #[arg(short, long)]
    pub command: String,
}

impl CliArgs {
    /// Transport selected by the flags; stream unless `--dgram` is given.
    pub fn transport(&self) -> Transport {
        if self.dgram {
            Transport::Datagram
        } else {
            Transport::Stream
        }
    }
}

/// Send one request and return the reply as (lossy) text.
pub async fn run(args: &CliArgs) -> io::Result<String> {
    let login = resolve_identity();
    let frame = protocol::encode_request(&login, &args.command);
    info!(login = %login, host = %args.host, port = args.port, "Sending request");

    let reply = match args.transport() {
        Transport::Stream => send_stream(&args.host, args.port, &frame).await?,
        Transport::Datagram => send_datagram(&args.host, args.port, &frame).await?,
    };
    Ok(String::from_utf8_lossy(&reply).into_owned())
}

/// One connection, one request, one bounded read of the reply.
async fn send_stream(host: &str, port: u16, frame: &[u8]) -> io::Result<Vec<u8>> {
    let mut stream = TcpStream::connect((host, port)).await?;
    stream.write_all(frame).await?;

    let mut reply = BytesMut::with_capacity(MAX_FRAME);
    stream.read_buf(&mut reply).await?;
    Ok(reply.to_vec())
}

/// One datagram out, one datagram back.
async fn send_datagram(host: &str, port: u16, frame: &[u8]) -> io::Result<Vec<u8>> {
    let socket = UdpSocket::bind("0.0.0.0:0").await?;
    socket.connect((host, port)).await?;
    socket.send(frame).await?;

    let mut buf = [0u8; MAX_FRAME];
    let len = socket.recv(&mut buf).await?;
    Ok(buf[..len].to_vec())
}

/// Resolve the invoking user's login name.
///
/// Reads the passwd entry for the real uid; falls back to `$USER`, then
/// to `"unknown"`.
pub fn resolve_identity() -> String {
    // getpwuid returns a pointer into static storage; copy the name out
    // before any other libc call can overwrite it.
    unsafe {
        let pw = libc::getpwuid(libc::getuid());
        if !pw.is_null() {
            let name = std::ffi::CStr::from_ptr((*pw).pw_name);
            if let Ok(name) = name.to_str() {
                if !name.is_empty() {
                    return name.to_string();
                }
            }
        }
    }
    std::env::var("USER").unwrap_or_else(|_| "unknown".to_string())
}
