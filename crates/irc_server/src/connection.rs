//! Per-socket connection state: registration fields, the `\r\n`-framed
//! input/output byte buffers, and the set of joined channels. A
//! `Connection` never holds a `Channel` directly — only the channel's
//! (case-folded) key, resolved back through the `Server`'s channel table.

use std::collections::BTreeSet;
use std::io::{self, Read, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use mio::net::TcpStream;

use crate::errors::ConnectionError;

/// Identifies one accepted socket. Wraps the `mio::Token` used to register
/// the socket with the event loop's poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnectionId(pub usize);

impl From<mio::Token> for ConnectionId {
    fn from(token: mio::Token) -> Self {
        ConnectionId(token.0)
    }
}

impl From<ConnectionId> for mio::Token {
    fn from(id: ConnectionId) -> Self {
        mio::Token(id.0)
    }
}

/// Maximum number of bytes read from the socket in one receive step (§4.2).
const RECV_CHUNK: usize = 512;

#[derive(Debug, Default)]
pub struct Registration {
    pub pass: Option<String>,
    pub nick: Option<String>,
    pub user: Option<String>,
    pub realname: Option<String>,
    pub authenticated: bool,
}

impl Registration {
    pub fn is_complete(&self) -> bool {
        self.nick.is_some() && self.user.is_some()
    }
}

pub struct Connection {
    pub id: ConnectionId,
    pub stream: TcpStream,
    pub host: String,
    pub registration: Registration,
    pub in_buf: Vec<u8>,
    pub out_buf: Vec<u8>,
    pub write_interest: bool,
    pub wants_to_quit: bool,
    pub quit_reason: Option<String>,
    pub joined_at: Option<u64>,
    /// Channel keys (case-folded names) this connection currently belongs to.
    pub channels: BTreeSet<String>,
}

impl Connection {
    pub fn new(id: ConnectionId, stream: TcpStream, host: String) -> Self {
        Connection {
            id,
            stream,
            host,
            registration: Registration::default(),
            in_buf: Vec::new(),
            out_buf: Vec::new(),
            write_interest: false,
            wants_to_quit: false,
            quit_reason: None,
            joined_at: None,
            channels: BTreeSet::new(),
        }
    }

    pub fn nick(&self) -> &str {
        self.registration.nick.as_deref().unwrap_or("*")
    }

    pub fn user(&self) -> &str {
        self.registration.user.as_deref().unwrap_or("*")
    }

    pub fn is_authenticated(&self) -> bool {
        self.registration.authenticated
    }

    pub fn prefix(&self) -> String {
        format!("{}!~{}@{}", self.nick(), self.user(), self.host)
    }

    pub fn mark_authenticated(&mut self) {
        self.registration.authenticated = true;
        self.joined_at = Some(now_unix());
    }

    pub fn idle_seconds(&self) -> u64 {
        self.joined_at.map(|t| now_unix().saturating_sub(t)).unwrap_or(0)
    }

    /// Queues `line` for sending, appending the `\r\n` terminator, and marks
    /// write-interest so the event loop re-registers for POLLOUT.
    pub fn queue_line(&mut self, line: &str) {
        self.out_buf.extend_from_slice(line.as_bytes());
        self.out_buf.extend_from_slice(b"\r\n");
        self.write_interest = true;
    }

    /// Reads up to `RECV_CHUNK` bytes and extracts every complete `\r\n`
    /// framed line from the input buffer, invoking `on_line` for each one in
    /// arrival order. A zero-length read means the peer disconnected.
    pub fn receive(&mut self, mut on_line: impl FnMut(&mut Connection, String)) -> Result<(), ConnectionError> {
        let mut chunk = [0u8; RECV_CHUNK];
        loop {
            match self.stream.read(&mut chunk) {
                Ok(0) => return Err(ConnectionError::Disconnected),
                Ok(n) => self.in_buf.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(ConnectionError::Io(e)),
            }
        }

        while let Some(pos) = find_crlf(&self.in_buf) {
            let line = self.in_buf.drain(..pos + 2).collect::<Vec<u8>>();
            let line = String::from_utf8_lossy(&line[..line.len() - 2]).into_owned();
            on_line(self, line);
        }
        Ok(())
    }

    /// Drains as much of the output buffer as the socket accepts. Clears
    /// write-interest once the buffer is empty.
    pub fn send_pending(&mut self) -> Result<(), ConnectionError> {
        while !self.out_buf.is_empty() {
            match self.stream.write(&self.out_buf) {
                Ok(0) => return Err(ConnectionError::Disconnected),
                Ok(n) => {
                    self.out_buf.drain(..n);
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(()),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(ConnectionError::Io(e)),
            }
        }
        self.write_interest = false;
        Ok(())
    }
}

fn find_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == b"\r\n")
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_crlf_locates_terminator() {
        assert_eq!(find_crlf(b"NICK a\r\nJOIN"), Some(6));
        assert_eq!(find_crlf(b"partial"), None);
    }

    #[test]
    fn registration_is_complete_once_nick_and_user_set() {
        let mut reg = Registration::default();
        assert!(!reg.is_complete());
        reg.nick = Some("alice".into());
        assert!(!reg.is_complete());
        reg.user = Some("alice".into());
        assert!(reg.is_complete());
    }
}
