//! SMTP session

use super::SessionState;
use crate::config::Credentials;
use crate::error::{Error, Result};
use crate::transport::SmtpTransport;
use tracing::{debug, info};

/// An authenticated SMTP submission session.
pub struct SmtpSession<T: SmtpTransport> {
    transport: T,
    state: SessionState,
}

impl<T: SmtpTransport> SmtpSession<T> {
    /// Connect and authenticate.
    ///
    /// # Errors
    ///
    /// Returns `Error::Connect` or `Error::Auth` from the transport.
    pub async fn connect(mut transport: T, credentials: &Credentials) -> Result<Self> {
        transport.connect(credentials).await?;
        info!("SMTP session opened");
        Ok(Self {
            transport,
            state: SessionState::Authenticated,
        })
    }

    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Submit one message.
    ///
    /// An empty destination list is a user-input error, rejected
    /// here without touching the transport.
    ///
    /// # Errors
    ///
    /// Fails with `Error::InvalidState` outside `Authenticated`, or
    /// with `Error::Send` for an empty destination list or a
    /// transport failure.
    pub async fn send(&mut self, to: &[String], subject: &str, body: &str) -> Result<()> {
        self.state.ensure_open("send")?;
        if to.is_empty() {
            return Err(Error::Send("no destination addresses".to_string()));
        }
        match self.transport.send(to, subject, body).await {
            Ok(()) => Ok(()),
            Err(e @ Error::Send(_)) => Err(e),
            Err(other) => Err(Error::Send(other.to_string())),
        }
    }

    /// QUIT and close.
    ///
    /// Always reaches `Closed`; a QUIT failure is returned for
    /// reporting.
    ///
    /// # Errors
    ///
    /// Fails with `Error::InvalidState` if closing was already
    /// entered, or with the QUIT failure.
    pub async fn close(&mut self) -> Result<()> {
        self.state.ensure_can_close()?;
        self.state = SessionState::Closing;
        debug!("closing SMTP session");
        let quit = self.transport.quit().await;
        self.state = SessionState::Closed;
        quit
    }
}
