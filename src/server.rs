//! The dispatch loop: receive, parse, authorize, execute, respond.
//!
//! One request is in flight at a time. Stream transport accepts one
//! connection per request and closes it after the reply; datagram
//! transport answers each datagram at the peer address it was received
//! from. Every failure below this loop is caught, logged, and turned
//! into either a canned error reply or a skipped iteration; nothing
//! here terminates the process.

use crate::auth::Allowlist;
use crate::executor;
use crate::listener::Listener;
use crate::protocol::{self, Response, ResponseCode, MAX_FRAME};
use bytes::BytesMut;
use std::io;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, UdpSocket};
use tracing::{error, info, warn};

/// Serve requests forever on the given listener.
pub async fn serve(listener: Listener, allowlist: Allowlist) -> io::Result<()> {
    info!("Waiting for requests");
    match listener {
        Listener::Stream(listener) => serve_stream(listener, &allowlist).await,
        Listener::Datagram(socket) => serve_datagram(socket, &allowlist).await,
    }
}

/// Accept loop for stream transport: one connection, one request, one
/// reply, close.
async fn serve_stream(listener: TcpListener, allowlist: &Allowlist) -> io::Result<()> {
    loop {
        let (mut stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!(error = %e, "Failed to accept connection");
                continue;
            }
        };
        info!(peer = %peer, "New connection");

        let mut frame = BytesMut::with_capacity(MAX_FRAME);
        if let Err(e) = stream.read_buf(&mut frame).await {
            error!(peer = %peer, error = %e, "Failed to receive request");
            continue; // connection closes on drop
        }

        let reply = dispatch(&frame, allowlist).await;
        if let Err(e) = stream.write_all(&reply).await {
            error!(peer = %peer, error = %e, "Failed to send response");
        }
    }
}

/// Receive loop for datagram transport: the reply goes back to the
/// captured peer address, on the shared socket.
async fn serve_datagram(socket: UdpSocket, allowlist: &Allowlist) -> io::Result<()> {
    let mut buf = [0u8; MAX_FRAME];
    loop {
        let (len, peer) = match socket.recv_from(&mut buf).await {
            Ok(received) => received,
            Err(e) => {
                error!(error = %e, "Failed to receive datagram");
                continue;
            }
        };
        info!(peer = %peer, len, "Datagram received");

        let reply = dispatch(&buf[..len], allowlist).await;
        if let Err(e) = socket.send_to(&reply, peer).await {
            error!(peer = %peer, error = %e, "Failed to send response");
        }
    }
}

/// Run one request frame through parse, authorize and execute, producing
/// the reply frame. Always returns a well-formed response.
async fn dispatch(frame: &[u8], allowlist: &Allowlist) -> BytesMut {
    info!(request = %String::from_utf8_lossy(frame), "Request received");

    let request = match protocol::decode_request(frame) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "Invalid request format");
            return BytesMut::from(protocol::INVALID_REQUEST);
        }
    };

    info!(user = %request.login, command = %request.command, "Processing command");

    if !allowlist.is_allowed(&request.login) {
        warn!(user = %request.login, "Unauthorized user");
        return BytesMut::from(protocol::UNAUTHORIZED);
    }

    match executor::run(&request.command).await {
        Ok(outcome) => {
            info!(status = outcome.status, "Command executed");
            let code = if outcome.status == 0 {
                ResponseCode::Ok
            } else {
                ResponseCode::Error
            };
            protocol::encode_response(&Response {
                code,
                result: String::from_utf8_lossy(&outcome.output).into_owned(),
            })
        }
        Err(e) => {
            error!(error = %e, "Command execution failed");
            protocol::encode_response(&Response {
                code: ResponseCode::Error,
                result: "Command execution failed".to_string(),
            })
        }
    }
}
