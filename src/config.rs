//! Server configuration.
//!
//! Runtime settings come from a plain `key = value` config file; the CLI
//! only selects file locations and the log level. Lines starting with `#`
//! and blank lines are ignored, as are unknown keys.

use clap::Parser;
use std::path::{Path, PathBuf};

/// Default location of the server config file.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/rcmd/rcmd.conf";

/// Default location of the allowed-users file.
pub const DEFAULT_ALLOWLIST_PATH: &str = "/etc/rcmd/users.conf";

/// Command-line arguments for the server
#[derive(Parser, Debug)]
#[command(name = "rcmdd")]
#[command(version = "0.1.0")]
#[command(about = "Remote command execution server", long_about = None)]
pub struct CliArgs {
    /// Path to the server configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Path to the allowed-users file
    #[arg(short, long, default_value = DEFAULT_ALLOWLIST_PATH)]
    pub allowlist: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Socket transport selected by the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// Connection-oriented (TCP); one accepted connection per request.
    Stream,
    /// Connectionless (UDP); one datagram per request.
    Datagram,
}

/// Resolved server configuration, immutable after load.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub transport: Transport,
}

impl ServerConfig {
    /// Load configuration from a `key = value` file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_path_buf(), e))?;
        Self::parse(&contents)
    }

    /// Parse config file contents. Recognized keys: `port`, `socket_type`.
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let mut port: Option<u16> = None;
        let mut transport: Option<Transport> = None;

        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            match (key.trim(), value.trim()) {
                ("port", v) => {
                    let parsed = v
                        .parse::<u16>()
                        .map_err(|_| ConfigError::InvalidPort(v.to_string()))?;
                    if parsed == 0 {
                        return Err(ConfigError::InvalidPort(v.to_string()));
                    }
                    port = Some(parsed);
                }
                ("socket_type", "stream") => transport = Some(Transport::Stream),
                ("socket_type", "dgram") => transport = Some(Transport::Datagram),
                ("socket_type", v) => {
                    return Err(ConfigError::InvalidTransport(v.to_string()));
                }
                _ => {} // unknown keys are ignored
            }
        }

        Ok(ServerConfig {
            port: port.ok_or(ConfigError::MissingKey("port"))?,
            transport: transport.ok_or(ConfigError::MissingKey("socket_type"))?,
        })
    }
}

/// Configuration loading errors
#[derive(Debug)]
pub enum ConfigError {
    FileRead(PathBuf, std::io::Error),
    MissingKey(&'static str),
    InvalidPort(String),
    InvalidTransport(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::FileRead(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::MissingKey(key) => write!(f, "Missing config key '{}'", key),
            ConfigError::InvalidPort(value) => {
                write!(f, "Invalid port '{}': expected 1-65535", value)
            }
            ConfigError::InvalidTransport(value) => {
                write!(
                    f,
                    "Invalid socket_type '{}': expected 'stream' or 'dgram'",
                    value
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_stream_config() {
        let config = ServerConfig::parse("port = 9000\nsocket_type = stream\n").unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.transport, Transport::Stream);
    }

    #[test]
    fn test_parse_dgram_config() {
        let config = ServerConfig::parse("port=1234\nsocket_type=dgram").unwrap();
        assert_eq!(config.port, 1234);
        assert_eq!(config.transport, Transport::Datagram);
    }

    #[test]
    fn test_parse_skips_comments_and_unknown_keys() {
        let contents = "\
# server settings
port = 9000

socket_type = stream
backlog = 42
not a key value line
";
        let config = ServerConfig::parse(contents).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.transport, Transport::Stream);
    }

    #[test]
    fn test_parse_missing_port() {
        match ServerConfig::parse("socket_type = stream\n") {
            Err(ConfigError::MissingKey("port")) => {}
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_parse_missing_socket_type() {
        match ServerConfig::parse("port = 9000\n") {
            Err(ConfigError::MissingKey("socket_type")) => {}
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_parse_invalid_port() {
        assert!(matches!(
            ServerConfig::parse("port = hello\nsocket_type = stream\n"),
            Err(ConfigError::InvalidPort(_))
        ));
        assert!(matches!(
            ServerConfig::parse("port = 0\nsocket_type = stream\n"),
            Err(ConfigError::InvalidPort(_))
        ));
        assert!(matches!(
            ServerConfig::parse("port = 70000\nsocket_type = stream\n"),
            Err(ConfigError::InvalidPort(_))
        ));
    }

    #[test]
    fn test_parse_invalid_transport() {
        match ServerConfig::parse("port = 9000\nsocket_type = sctp\n") {
            Err(ConfigError::InvalidTransport(v)) => assert_eq!(v, "sctp"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = 9000").unwrap();
        writeln!(file, "socket_type = dgram").unwrap();

        let config = ServerConfig::load(file.path()).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.transport, Transport::Datagram);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            ServerConfig::load(Path::new("/nonexistent/rcmd.conf")),
            Err(ConfigError::FileRead(_, _))
        ));
    }
}
