//! Connection configuration for the four protocol clients

use crate::error::{Error, Result};
use crate::protocol::Protocol;
use std::env;

/// Credentials and address for one server.
///
/// Immutable once a session starts; always passed explicitly into
/// `connect`, never read from process-wide state.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

/// Configuration for all four protocol clients.
#[derive(Debug, Clone)]
pub struct Config {
    pub pop3: Credentials,
    pub imap: Credentials,
    pub smtp: Credentials,
    pub ftp: Credentials,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Reads from `.env` if present. Required variables:
    /// - `POP3_MAIL_SERVER`, `IMAP_MAIL_SERVER`, `SMTP_MAIL_SERVER`,
    ///   `FTP_SERVER`
    /// - `MAIL_USERNAME`, `MAIL_PASSWORD`
    /// - `FTP_USERNAME`, `FTP_PASSWORD`
    ///
    /// Optional: `POP3_PORT`, `IMAP_PORT`, `SMTP_PORT`, `FTP_PORT`
    /// (default: the protocol's well-known port).
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if any required variable is absent or
    /// a port override fails to parse. This is checked up front so a
    /// broken environment is reported before any session starts.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let username = require("MAIL_USERNAME")?;
        let password = require("MAIL_PASSWORD")?;

        Ok(Self {
            pop3: Credentials {
                host: require("POP3_MAIL_SERVER")?,
                port: port_var("POP3_PORT", Protocol::Pop3)?,
                username: username.clone(),
                password: password.clone(),
            },
            imap: Credentials {
                host: require("IMAP_MAIL_SERVER")?,
                port: port_var("IMAP_PORT", Protocol::Imap)?,
                username: username.clone(),
                password: password.clone(),
            },
            smtp: Credentials {
                host: require("SMTP_MAIL_SERVER")?,
                port: port_var("SMTP_PORT", Protocol::Smtp)?,
                username,
                password,
            },
            ftp: Credentials {
                host: require("FTP_SERVER")?,
                port: port_var("FTP_PORT", Protocol::Ftp)?,
                username: require("FTP_USERNAME")?,
                password: require("FTP_PASSWORD")?,
            },
        })
    }

    /// The credentials for one protocol.
    #[must_use]
    pub const fn for_protocol(&self, protocol: Protocol) -> &Credentials {
        match protocol {
            Protocol::Pop3 => &self.pop3,
            Protocol::Imap => &self.imap,
            Protocol::Smtp => &self.smtp,
            Protocol::Ftp => &self.ftp,
        }
    }
}

fn require(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("{name} not set")))
}

fn port_var(name: &str, protocol: Protocol) -> Result<u16> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|e| Error::Config(format!("Invalid {name}: {e}"))),
        Err(_) => Ok(protocol.default_port()),
    }
}
