//! IMAP transport over async-imap with implicit TLS
//!
//! Connects to `host:port` over TLS (IMAP4 over SSL), logs in, and
//! serves the [`ImapTransport`] operations from one owned session.

use super::ImapTransport;
use crate::config::Credentials;
use crate::error::{Error, Result};
use async_imap::Session;
use futures::StreamExt;
use rustls::pki_types::ServerName;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tokio_util::compat::{Compat, TokioAsyncReadCompatExt};
use tracing::{debug, info};

type ImapSession = Session<Compat<tokio_rustls::client::TlsStream<TcpStream>>>;

/// An [`ImapTransport`] backed by a TLS async-imap session.
#[derive(Default)]
pub struct TlsImapTransport {
    session: Option<ImapSession>,
}

impl TlsImapTransport {
    #[must_use]
    pub const fn new() -> Self {
        Self { session: None }
    }

    fn session(&mut self) -> Result<&mut ImapSession> {
        self.session
            .as_mut()
            .ok_or_else(|| Error::Connect("transport not connected".to_string()))
    }
}

fn tls_connector() -> TlsConnector {
    let root_store = rustls::RootCertStore {
        roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
    };
    let config = rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();
    TlsConnector::from(Arc::new(config))
}

fn protocol_err(e: &async_imap::error::Error) -> Error {
    Error::Protocol(e.to_string())
}

impl ImapTransport for TlsImapTransport {
    async fn login(&mut self, credentials: &Credentials) -> Result<()> {
        let addr = format!("{}:{}", credentials.host, credentials.port);
        debug!("Connecting to IMAP server at {}", addr);

        let tcp_stream = TcpStream::connect(&addr)
            .await
            .map_err(|e| Error::Connect(e.to_string()))?;

        let server_name = ServerName::try_from(credentials.host.clone())
            .map_err(|e| Error::Connect(format!("Invalid server name: {e}")))?;
        let tls_stream = tls_connector()
            .connect(server_name, tcp_stream)
            .await
            .map_err(|e| Error::Connect(format!("TLS handshake failed: {e}")))?;

        let client = async_imap::Client::new(tls_stream.compat());
        let session = client
            .login(&credentials.username, &credentials.password)
            .await
            .map_err(|(e, _)| Error::Auth(format!("Login failed: {e}")))?;

        info!("Connected to IMAP server");
        self.session = Some(session);
        Ok(())
    }

    async fn select_inbox(&mut self) -> Result<u32> {
        let mailbox = self
            .session()?
            .select("INBOX")
            .await
            .map_err(|e| protocol_err(&e))?;
        Ok(mailbox.exists)
    }

    async fn search_all(&mut self) -> Result<Vec<u32>> {
        let ids = self
            .session()?
            .search("ALL")
            .await
            .map_err(|e| protocol_err(&e))?;
        let mut sequences: Vec<u32> = ids.into_iter().collect();
        sequences.sort_unstable();
        Ok(sequences)
    }

    async fn fetch(&mut self, sequence: u32) -> Result<Vec<u8>> {
        let session = self.session()?;
        let mut messages = session
            .fetch(sequence.to_string(), "(RFC822)")
            .await
            .map_err(|e| protocol_err(&e))?;

        while let Some(message) = messages.next().await {
            let message = message.map_err(|e| protocol_err(&e))?;
            if let Some(body) = message.body() {
                return Ok(body.to_vec());
            }
        }

        Err(Error::Protocol(format!("no body for message {sequence}")))
    }

    async fn mark_deleted(&mut self, sequence: u32) -> Result<()> {
        let session = self.session()?;
        let mut updates = session
            .store(sequence.to_string(), "+FLAGS (\\Deleted)")
            .await
            .map_err(|e| protocol_err(&e))?;
        while let Some(update) = updates.next().await {
            update.map_err(|e| protocol_err(&e))?;
        }
        Ok(())
    }

    async fn expunge(&mut self) -> Result<()> {
        let session = self.session()?;
        let removed = session.expunge().await.map_err(|e| protocol_err(&e))?;
        let mut removed = std::pin::pin!(removed);
        while let Some(id) = removed.next().await {
            id.map_err(|e| protocol_err(&e))?;
        }
        Ok(())
    }

    async fn logout(&mut self) -> Result<()> {
        if let Some(mut session) = self.session.take() {
            session.logout().await.map_err(|e| protocol_err(&e))?;
        }
        Ok(())
    }
}
