//! Listening socket setup for both transports.
//!
//! The listener binds `0.0.0.0:<port>` once at startup. A bind or listen
//! failure is fatal to the process; there is nothing to serve without a
//! socket.

use crate::config::{ServerConfig, Transport};
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use tokio::net::{TcpListener, UdpSocket};

/// Pending-connection backlog for stream listeners.
const LISTEN_BACKLOG: i32 = 128;

/// The bound listening socket, one variant per transport.
pub enum Listener {
    Stream(TcpListener),
    Datagram(UdpSocket),
}

impl Listener {
    /// Bind the listening socket described by `config`.
    ///
    /// Must be called from within a tokio runtime; the socket is
    /// registered non-blocking with the reactor.
    pub fn open(config: &ServerConfig) -> io::Result<Self> {
        let addr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, config.port));

        match config.transport {
            Transport::Stream => {
                let socket = Socket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP))?;
                socket.set_reuse_address(true)?;
                socket.set_nonblocking(true)?;
                socket.bind(&addr.into())?;
                socket.listen(LISTEN_BACKLOG)?;
                Ok(Listener::Stream(TcpListener::from_std(socket.into())?))
            }
            Transport::Datagram => {
                let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
                socket.set_reuse_address(true)?;
                socket.set_nonblocking(true)?;
                socket.bind(&addr.into())?;
                Ok(Listener::Datagram(UdpSocket::from_std(socket.into())?))
            }
        }
    }

    /// Address the socket is actually bound to.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        match self {
            Listener::Stream(listener) => listener.local_addr(),
            Listener::Datagram(socket) => socket.local_addr(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_stream_on_ephemeral_port() {
        let config = ServerConfig {
            port: 0,
            transport: Transport::Stream,
        };
        let listener = Listener::open(&config).unwrap();
        let addr = listener.local_addr().unwrap();
        assert!(matches!(listener, Listener::Stream(_)));
        assert_ne!(addr.port(), 0);
    }

    #[tokio::test]
    async fn test_open_datagram_on_ephemeral_port() {
        let config = ServerConfig {
            port: 0,
            transport: Transport::Datagram,
        };
        let listener = Listener::open(&config).unwrap();
        let addr = listener.local_addr().unwrap();
        assert!(matches!(listener, Listener::Datagram(_)));
        assert_ne!(addr.port(), 0);
    }

    #[tokio::test]
    async fn test_open_fails_on_occupied_port() {
        let config = ServerConfig {
            port: 0,
            transport: Transport::Stream,
        };
        let first = Listener::open(&config).unwrap();
        let taken = ServerConfig {
            port: first.local_addr().unwrap().port(),
            transport: Transport::Stream,
        };
        assert!(Listener::open(&taken).is_err());
    }
}
