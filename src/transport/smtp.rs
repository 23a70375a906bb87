//! SMTP transport over lettre
//!
//! Builds an `AsyncSmtpTransport` relay for `host:port` with implicit
//! TLS and submits messages authored from the login username.

use super::SmtpTransport;
use crate::config::Credentials;
use crate::error::{Error, Result};
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials as SmtpCredentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info};

/// An [`SmtpTransport`] backed by a lettre TLS relay.
#[derive(Default)]
pub struct RelaySmtpTransport {
    relay: Option<AsyncSmtpTransport<Tokio1Executor>>,
    sender: Option<Mailbox>,
}

impl RelaySmtpTransport {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            relay: None,
            sender: None,
        }
    }

    fn relay(&self) -> Result<&AsyncSmtpTransport<Tokio1Executor>> {
        self.relay
            .as_ref()
            .ok_or_else(|| Error::Connect("transport not connected".to_string()))
    }
}

impl SmtpTransport for RelaySmtpTransport {
    async fn connect(&mut self, credentials: &Credentials) -> Result<()> {
        debug!(
            "Connecting to SMTP server at {}:{}",
            credentials.host, credentials.port
        );

        let relay = AsyncSmtpTransport::<Tokio1Executor>::relay(&credentials.host)
            .map_err(|e| Error::Connect(e.to_string()))?
            .port(credentials.port)
            .credentials(SmtpCredentials::new(
                credentials.username.clone(),
                credentials.password.clone(),
            ))
            .build();

        let reachable = relay
            .test_connection()
            .await
            .map_err(|e| Error::Connect(e.to_string()))?;
        if !reachable {
            return Err(Error::Connect("server rejected connection".to_string()));
        }

        self.sender = Some(
            credentials
                .username
                .parse()
                .map_err(|e| Error::Auth(format!("invalid sender address: {e}")))?,
        );
        self.relay = Some(relay);
        info!("Connected to SMTP server");
        Ok(())
    }

    async fn send(&mut self, to: &[String], subject: &str, body: &str) -> Result<()> {
        let sender = self
            .sender
            .clone()
            .ok_or_else(|| Error::Connect("transport not connected".to_string()))?;

        let mut builder = Message::builder().from(sender).subject(subject);
        for address in to {
            let mailbox: Mailbox = address
                .parse()
                .map_err(|e| Error::Send(format!("invalid address {address}: {e}")))?;
            builder = builder.to(mailbox);
        }
        let message = builder
            .body(body.to_string())
            .map_err(|e| Error::Send(e.to_string()))?;

        self.relay()?
            .send(message)
            .await
            .map_err(|e| Error::Send(e.to_string()))?;
        Ok(())
    }

    async fn quit(&mut self) -> Result<()> {
        // lettre closes pooled connections when the transport drops.
        self.relay = None;
        self.sender = None;
        Ok(())
    }
}
