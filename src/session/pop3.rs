//! POP3 session

use super::{ItemDescriptor, MailboxSummary, SessionState};
use crate::config::Credentials;
use crate::error::{Error, Result};
use crate::header;
use crate::transport::Pop3Transport;
use tracing::{debug, info};

/// An authenticated POP3 session.
///
/// Deletions issued through [`remove`](Self::remove) are deferred by
/// the protocol: the server applies them only when
/// [`close`](Self::close) sends QUIT.
pub struct Pop3Session<T: Pop3Transport> {
    transport: T,
    state: SessionState,
    summary: MailboxSummary,
}

impl<T: Pop3Transport> Pop3Session<T> {
    /// Connect, authenticate, and take the STAT snapshot.
    ///
    /// # Errors
    ///
    /// Returns `Error::Connect` or `Error::Auth` from the transport,
    /// or the error from the initial STAT.
    pub async fn connect(mut transport: T, credentials: &Credentials) -> Result<Self> {
        transport.connect(credentials).await?;
        let (count, total_size) = transport.stat().await?;
        info!(count, total_size, "POP3 session opened");
        Ok(Self {
            transport,
            state: SessionState::Authenticated,
            summary: MailboxSummary {
                count,
                total_size: Some(total_size),
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

    /// List messages in server order.
    ///
    /// # Errors
    ///
    /// Fails with `Error::InvalidState` outside `Authenticated`, or
    /// with the transport's error.
    pub async fn list(&mut self) -> Result<Vec<ItemDescriptor>> {
        self.state.ensure_open("LIST")?;
        let listing = self.transport.list().await?;
        Ok(listing
            .into_iter()
            .map(|(index, size)| ItemDescriptor {
                index,
                size: Some(size),
            })
            .collect())
    }

    /// Fetch the allow-listed header lines of one message.
    ///
    /// # Errors
    ///
    /// Fails with `Error::InvalidState` outside `Authenticated`, or
    /// with the transport's error.
    pub async fn fetch_headers(&mut self, index: u32) -> Result<Vec<Vec<u8>>> {
        self.state.ensure_open("TOP")?;
        let lines = self.transport.top(index).await?;
        Ok(header::filter(lines))
    }

    /// Fetch the complete raw message.
    ///
    /// # Errors
    ///
    /// Fails with `Error::InvalidState` outside `Authenticated`, or
    /// with the transport's error.
    pub async fn fetch_body(&mut self, index: u32) -> Result<Vec<u8>> {
        self.state.ensure_open("RETR")?;
        self.transport.retr(index).await
    }

    /// Mark one message for deletion. Takes effect at `close()`.
    ///
    /// # Errors
    ///
    /// Fails with `Error::InvalidState` outside `Authenticated`, or
    /// with `Error::Remove` when the server rejects the DELE.
    pub async fn remove(&mut self, index: u32) -> Result<()> {
        self.state.ensure_open("DELE")?;
        self.transport
            .dele(index)
            .await
            .map_err(|e| Error::Remove(e.to_string()))
    }

    /// QUIT, committing pending deletions.
    ///
    /// Always reaches `Closed`, even when QUIT itself fails; the
    /// failure is returned for reporting.
    ///
    /// # Errors
    ///
    /// Fails with `Error::InvalidState` if closing was already
    /// entered, or with the QUIT failure.
    pub async fn close(&mut self) -> Result<()> {
        self.state.ensure_can_close()?;
        self.state = SessionState::Closing;
        debug!("closing POP3 session");
        let quit = self.transport.quit().await;
        self.state = SessionState::Closed;
        quit
    }
}
