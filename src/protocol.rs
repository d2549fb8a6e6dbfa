//! Wire codec for the request/response frames.
//!
//! A request is a single frame of literal text:
//!
//! ```text
//! {"login":"<login>","command":"<command>"}
//! ```
//!
//! and a response mirrors it:
//!
//! ```text
//! {"code":<0|1>,"result":"<output or error text>"}
//! ```
//!
//! This is deliberately not JSON parsing. The decoder is a single-pass,
//! order-dependent scan: it finds the `login` marker, its closing quote,
//! then the `command` marker strictly after the login value. Field
//! reordering, nesting and quote escaping are all unsupported and decode
//! as a malformed request. Likewise the encoder copies `result` between
//! its quote delimiters verbatim, so output containing a `"` produces a
//! frame the peer cannot split cleanly. Both limitations are part of the
//! wire contract.

use bytes::BytesMut;

/// Maximum size of a single wire frame, either direction.
pub const MAX_FRAME: usize = 2048;

/// Canned reply for frames that fail to decode.
pub const INVALID_REQUEST: &[u8] = br#"{"code":1,"result":"Invalid request format"}"#;

/// Canned reply for logins missing from the allowlist.
pub const UNAUTHORIZED: &[u8] = br#"{"code":1,"result":"Unauthorized user"}"#;

const LOGIN_MARKER: &[u8] = br#""login":""#;
const COMMAND_MARKER: &[u8] = br#""command":""#;

/// A decoded request. Lives for one dispatch iteration only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub login: String,
    pub command: String,
}

/// Response status code carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCode {
    Ok = 0,
    Error = 1,
}

/// A response about to be encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub code: ResponseCode,
    pub result: String,
}

/// Request decoding errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A field marker was not found in scan order.
    MissingField(&'static str),
    /// A field value has no closing quote.
    UnterminatedField(&'static str),
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::MissingField(field) => write!(f, "Missing '{}' field", field),
            DecodeError::UnterminatedField(field) => {
                write!(f, "Unterminated '{}' field", field)
            }
        }
    }
}

impl std::error::Error for DecodeError {}

/// Decode a request frame.
///
/// The `login` marker must appear before the `command` marker; anything
/// else is malformed. Field values are taken as raw bytes up to the next
/// quote and converted lossily, so the decoder itself never fails on
/// non-UTF-8 input.
pub fn decode_request(frame: &[u8]) -> Result<Request, DecodeError> {
    let (login, after_login) = scan_field(frame, LOGIN_MARKER, "login")?;
    let (command, _) = scan_field(after_login, COMMAND_MARKER, "command")?;

    Ok(Request {
        login: String::from_utf8_lossy(login).into_owned(),
        command: String::from_utf8_lossy(command).into_owned(),
    })
}

/// Find `marker` in `buf`, then the value up to the next `"`. Returns the
/// value bytes and the remainder of the buffer after the closing quote.
fn scan_field<'a>(
    buf: &'a [u8],
    marker: &[u8],
    name: &'static str,
) -> Result<(&'a [u8], &'a [u8]), DecodeError> {
    let start = find(buf, marker).ok_or(DecodeError::MissingField(name))? + marker.len();
    let len = find(&buf[start..], b"\"").ok_or(DecodeError::UnterminatedField(name))?;
    Ok((&buf[start..start + len], &buf[start + len + 1..]))
}

/// First occurrence of `needle` in `haystack`.
fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.len() > haystack.len() {
        return None;
    }
    (0..=haystack.len() - needle.len()).find(|&i| &haystack[i..i + needle.len()] == needle)
}

/// Encode a request frame (client side).
pub fn encode_request(login: &str, command: &str) -> BytesMut {
    let mut frame = BytesMut::with_capacity(login.len() + command.len() + 32);
    frame.extend_from_slice(b"{\"login\":\"");
    frame.extend_from_slice(login.as_bytes());
    frame.extend_from_slice(b"\",\"command\":\"");
    frame.extend_from_slice(command.as_bytes());
    frame.extend_from_slice(b"\"}");
    frame
}

/// Encode a response frame. `result` is copied verbatim, unescaped.
pub fn encode_response(response: &Response) -> BytesMut {
    let mut frame = BytesMut::with_capacity(response.result.len() + 32);
    frame.extend_from_slice(b"{\"code\":");
    frame.extend_from_slice(if response.code == ResponseCode::Ok {
        b"0"
    } else {
        b"1"
    });
    frame.extend_from_slice(b",\"result\":\"");
    frame.extend_from_slice(response.result.as_bytes());
    frame.extend_from_slice(b"\"}");
    frame
}
