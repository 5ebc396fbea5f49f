use std::io;

use thiserror::Error;

/// Fatal at bind time: the process exits before the event loop starts.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("failed to bind {family} listener on port {port}: {source}")]
    Bind {
        family: &'static str,
        port: u16,
        #[source]
        source: io::Error,
    },

    #[error("no listening socket could be bound on port {0}")]
    NoListenerBound(u16),
}

/// Recoverable at the level of one connection: caught by the event loop and
/// converted into a removal, never propagated past `Connection::receive`/
/// `Connection::send_pending`.
#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("connection closed by peer")]
    Disconnected,
}
