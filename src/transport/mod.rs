//! Transport capability traits
//!
//! The session layer never speaks wire protocols itself; it drives a
//! transport collaborator through one narrow trait per protocol.
//! Implementations own framing, TLS, and timeouts. The bundled
//! adapters cover IMAP ([`TlsImapTransport`]) and SMTP
//! ([`RelaySmtpTransport`]); POP3 and FTP transports are supplied by
//! the embedding application.
//!
//! All methods take `&mut self`: a transport is exclusively owned by
//! one session and every call is sequential.

mod imap;
mod smtp;

pub use imap::TlsImapTransport;
pub use smtp::RelaySmtpTransport;

use crate::config::Credentials;
use crate::error::Result;
use futures::stream::BoxStream;

/// A stream of file-transfer chunks.
pub type ByteStream<'a> = BoxStream<'a, Result<Vec<u8>>>;

/// POP3 mailbox access (RFC 1939 command set, framed elsewhere).
#[allow(async_fn_in_trait)]
pub trait Pop3Transport {
    /// Connect and authenticate (USER/PASS) in one step.
    async fn connect(&mut self, credentials: &Credentials) -> Result<()>;

    /// STAT: message count and total mailbox size in bytes.
    async fn stat(&mut self) -> Result<(u32, u64)>;

    /// LIST: `(index, size)` per message, in server order.
    async fn list(&mut self) -> Result<Vec<(u32, u64)>>;

    /// TOP n 0: the raw header lines of one message.
    async fn top(&mut self, index: u32) -> Result<Vec<Vec<u8>>>;

    /// RETR: the complete raw message.
    async fn retr(&mut self, index: u32) -> Result<Vec<u8>>;

    /// DELE: mark one message for deletion. The server applies
    /// deletions only at QUIT; implementations must not commit
    /// early.
    async fn dele(&mut self, index: u32) -> Result<()>;

    /// QUIT: commit pending deletions and close.
    async fn quit(&mut self) -> Result<()>;
}

/// IMAP mailbox access (RFC 3501 command set, framed elsewhere).
#[allow(async_fn_in_trait)]
pub trait ImapTransport {
    /// Connect and LOGIN.
    async fn login(&mut self, credentials: &Credentials) -> Result<()>;

    /// SELECT INBOX; returns the message count.
    async fn select_inbox(&mut self) -> Result<u32>;

    /// SEARCH ALL; sequence numbers in ascending order.
    async fn search_all(&mut self) -> Result<Vec<u32>>;

    /// FETCH (RFC822): the complete raw message.
    async fn fetch(&mut self, sequence: u32) -> Result<Vec<u8>>;

    /// STORE +FLAGS (\Deleted): mark for deletion without expunging.
    async fn mark_deleted(&mut self, sequence: u32) -> Result<()>;

    /// EXPUNGE: permanently remove marked messages.
    async fn expunge(&mut self) -> Result<()>;

    /// LOGOUT and close.
    async fn logout(&mut self) -> Result<()>;
}

/// SMTP submission (framed elsewhere).
#[allow(async_fn_in_trait)]
pub trait SmtpTransport {
    /// Connect and authenticate.
    async fn connect(&mut self, credentials: &Credentials) -> Result<()>;

    /// Build and submit one message to the given recipients. The
    /// caller guarantees `to` is non-empty.
    async fn send(&mut self, to: &[String], subject: &str, body: &str) -> Result<()>;

    /// QUIT and close.
    async fn quit(&mut self) -> Result<()>;
}

/// FTP file access (framed elsewhere).
#[allow(async_fn_in_trait)]
pub trait FtpTransport {
    /// Connect and login.
    async fn connect(&mut self, credentials: &Credentials) -> Result<()>;

    /// CWD: change the working directory.
    async fn cwd(&mut self, dir: &str) -> Result<()>;

    /// LIST: directory listing lines, in server order.
    async fn list(&mut self) -> Result<Vec<String>>;

    /// RETR: stream one remote file as chunks. A chunk error means
    /// the transfer failed mid-way.
    async fn retr(&mut self, name: &str) -> Result<ByteStream<'_>>;

    /// STOR: upload one file.
    async fn stor(&mut self, name: &str, data: Vec<u8>) -> Result<()>;

    /// Close the control connection.
    async fn quit(&mut self) -> Result<()>;
}
