//! IMAP session

use super::{ItemDescriptor, MailboxSummary, SessionState};
use crate::config::Credentials;
use crate::error::{Error, Result};
use crate::header;
use crate::transport::ImapTransport;
use tracing::{debug, info, warn};

/// An authenticated IMAP session on the INBOX.
///
/// [`remove`](Self::remove) only marks messages with `\Deleted`;
/// [`close`](Self::close) expunges before logging out.
pub struct ImapSession<T: ImapTransport> {
    transport: T,
    state: SessionState,
    summary: MailboxSummary,
}

impl<T: ImapTransport> ImapSession<T> {
    /// Connect, LOGIN, and SELECT the INBOX for the count snapshot.
    ///
    /// # Errors
    ///
    /// Returns `Error::Connect` or `Error::Auth` from the transport,
    /// or the error from the initial SELECT.
    pub async fn connect(mut transport: T, credentials: &Credentials) -> Result<Self> {
        transport.login(credentials).await?;
        let count = transport.select_inbox().await?;
        info!(count, "IMAP session opened");
        Ok(Self {
            transport,
            state: SessionState::Authenticated,
            summary: MailboxSummary {
                count,
                total_size: None,
            },
        })
    }

    /// The snapshot taken at connect time.
    #[must_use]
    pub const fn summary(&self) -> MailboxSummary {
        self.summary
    }

    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// List message sequence numbers in ascending order.
    ///
    /// # Errors
    ///
    /// Fails with `Error::InvalidState` outside `Authenticated`, or
    /// with the transport's error.
    pub async fn list(&mut self) -> Result<Vec<ItemDescriptor>> {
        self.state.ensure_open("SEARCH")?;
        let sequences = self.transport.search_all().await?;
        Ok(sequences
            .into_iter()
            .map(|index| ItemDescriptor { index, size: None })
            .collect())
    }

    /// Fetch the allow-listed header lines of one message.
    ///
    /// IMAP has no TOP equivalent in this capability set; the header
    /// section is split out of the full RFC822 fetch.
    ///
    /// # Errors
    ///
    /// Fails with `Error::InvalidState` outside `Authenticated`, or
    /// with the transport's error.
    pub async fn fetch_headers(&mut self, index: u32) -> Result<Vec<Vec<u8>>> {
        self.state.ensure_open("FETCH")?;
        let raw = self.transport.fetch(index).await?;
        Ok(header::filter(header_section(&raw)))
    }

    /// Fetch the complete raw message.
    ///
    /// # Errors
    ///
    /// Fails with `Error::InvalidState` outside `Authenticated`, or
    /// with the transport's error.
    pub async fn fetch_body(&mut self, index: u32) -> Result<Vec<u8>> {
        self.state.ensure_open("FETCH")?;
        self.transport.fetch(index).await
    }

    /// Mark one message `\Deleted`; removed at `close()`'s expunge.
    ///
    /// # Errors
    ///
    /// Fails with `Error::InvalidState` outside `Authenticated`, or
    /// with `Error::Remove` when the STORE fails.
    pub async fn remove(&mut self, index: u32) -> Result<()> {
        self.state.ensure_open("STORE")?;
        self.transport
            .mark_deleted(index)
            .await
            .map_err(|e| Error::Remove(e.to_string()))
    }

    /// EXPUNGE marked messages, then LOGOUT.
    ///
    /// A failed expunge does not prevent the logout attempt, and
    /// neither failure prevents reaching `Closed`; the first error
    /// is returned for reporting.
    ///
    /// # Errors
    ///
    /// Fails with `Error::InvalidState` if closing was already
    /// entered, or with the first cleanup failure.
    pub async fn close(&mut self) -> Result<()> {
        self.state.ensure_can_close()?;
        self.state = SessionState::Closing;
        debug!("closing IMAP session");

        let expunged = self.transport.expunge().await;
        if let Err(e) = &expunged {
            warn!("expunge failed: {e}");
        }
        let logout = self.transport.logout().await;
        self.state = SessionState::Closed;
        expunged.and(logout)
    }
}

/// Split the header section (everything before the first blank line)
/// of a raw message into lines.
fn header_section(raw: &[u8]) -> Vec<Vec<u8>> {
    raw.split(|b| *b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .take_while(|line| !line.is_empty())
        .map(<[u8]>::to_vec)
        .collect()
}
