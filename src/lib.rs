//! Multi-protocol mail and file-transfer client core
//!
//! Sequential session drivers for POP3, IMAP, SMTP, and FTP:
//! authenticate, list/fetch/delete remote messages or files, decode
//! encoded-word headers, flatten MIME multipart bodies into
//! displayable text, and hand the results to an operator supplied by
//! the embedding application.
//!
//! Wire framing and TLS belong to transport collaborators behind the
//! [`transport`] traits; bundled adapters cover IMAP (async-imap
//! over rustls) and SMTP (lettre). Presentation and prompting live
//! behind the [`operator`] traits.

mod config;
mod driver;
mod error;
pub mod header;
mod mime;
mod operator;
mod protocol;
pub mod session;
pub mod transport;

pub use config::{Config, Credentials};
pub use driver::SessionDriver;
pub use error::{Error, Result};
pub use mime::{DEFAULT_MAX_DEPTH, MessagePart, MimeFlattener};
pub use operator::{Draft, FileAction, FileOperator, ItemDecision, MailOperator, SendOperator};
pub use protocol::Protocol;
pub use session::{
    FtpSession, ImapSession, ItemDescriptor, MailboxSummary, Pop3Session, SessionState,
    SmtpSession,
};
pub use transport::{
    ByteStream, FtpTransport, ImapTransport, Pop3Transport, RelaySmtpTransport, SmtpTransport,
    TlsImapTransport,
};
