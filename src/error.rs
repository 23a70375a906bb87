//! Error types for multimail

use crate::session::SessionState;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Host unreachable, TLS failure, or transport not connected.
    #[error("connection error: {0}")]
    Connect(String),

    /// The server rejected the supplied credentials.
    #[error("authentication error: {0}")]
    Auth(String),

    /// An operation was invoked outside the `Authenticated` state.
    /// This is a usage defect, not a recoverable condition.
    #[error("{op} invoked in {state} state")]
    InvalidState {
        op: &'static str,
        state: SessionState,
    },

    /// An encoded header word declared a charset the decoding
    /// runtime does not support.
    #[error("header decode error: {0}")]
    Decode(String),

    /// Message structure exceeds the configured nesting bound or
    /// cannot be parsed at all.
    #[error("malformed message: {0}")]
    MalformedMessage(String),

    /// A delete/flag operation failed on the server.
    #[error("remove failed: {0}")]
    Remove(String),

    /// A message could not be sent, including the local case of an
    /// empty destination list.
    #[error("send failed: {0}")]
    Send(String),

    /// A file transfer failed mid-stream.
    #[error("transfer failed: {0}")]
    Transfer(String),

    /// A protocol command failed after authentication.
    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
