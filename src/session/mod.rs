//! Protocol sessions
//!
//! One session owns one authenticated transport and enforces the
//! lifecycle
//!
//! ```text
//! Disconnected -> Connected -> Authenticated -> {Listing <-> Acting}
//!     -> Closing -> Closed
//! ```
//!
//! The `connect` constructors run the Disconnected/Connected phases
//! internally and only ever hand out a session that is already
//! `Authenticated`, so pre-auth operations are unrepresentable.
//! `Closing` is entered exactly once, always attempts protocol-native
//! cleanup, and always ends in `Closed` even when cleanup fails.

mod ftp;
mod imap;
mod pop3;
mod smtp;

pub use ftp::FtpSession;
pub use imap::ImapSession;
pub use pop3::Pop3Session;
pub use smtp::SmtpSession;

use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;

/// Observable lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Logged in; list/fetch/act operations are accepted.
    Authenticated,
    /// Cleanup in progress; entered exactly once.
    Closing,
    /// Terminal. No further operations are accepted.
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Authenticated => "authenticated",
            Self::Closing => "closing",
            Self::Closed => "closed",
        })
    }
}

impl SessionState {
    /// Guard for list/fetch/act operations.
    pub(crate) fn ensure_open(self, op: &'static str) -> Result<()> {
        if self == Self::Authenticated {
            Ok(())
        } else {
            Err(Error::InvalidState { op, state: self })
        }
    }

    /// Guard for entering `Closing`; rejects a second close.
    pub(crate) fn ensure_can_close(self) -> Result<()> {
        self.ensure_open("close")
    }
}

/// Mailbox snapshot taken once at connect time.
///
/// Deliberately not refreshed after deletions; the driver presents
/// the state of the mailbox as it was when the pass started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MailboxSummary {
    /// Number of items.
    pub count: u32,
    /// Total size in bytes, when the protocol reports one (POP3
    /// STAT does, IMAP SELECT does not).
    pub total_size: Option<u64>,
}

/// One listed item: a message or a remote file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ItemDescriptor {
    /// 1-based protocol-native index.
    pub index: u32,
    /// Size in bytes, when the listing reports one.
    pub size: Option<u64>,
}
