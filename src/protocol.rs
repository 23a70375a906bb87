//! Protocol selection
//!
//! A typed enumeration of the supported protocols, selected once by
//! the embedding application before a session driver is invoked.

use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// One of the four supported client protocols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    Pop3,
    Imap,
    Smtp,
    Ftp,
}

impl Protocol {
    /// The canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pop3 => "pop3",
            Self::Imap => "imap",
            Self::Smtp => "smtp",
            Self::Ftp => "ftp",
        }
    }

    /// The well-known port used when no override is configured.
    ///
    /// Mail protocols use their implicit-TLS ports; FTP uses the
    /// plain control port.
    #[must_use]
    pub const fn default_port(self) -> u16 {
        match self {
            Self::Pop3 => 995,
            Self::Imap => 993,
            Self::Smtp => 465,
            Self::Ftp => 21,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pop3" => Ok(Self::Pop3),
            "imap" => Ok(Self::Imap),
            "smtp" => Ok(Self::Smtp),
            "ftp" => Ok(Self::Ftp),
            other => Err(Error::Config(format!("unknown protocol: {other}"))),
        }
    }
}
