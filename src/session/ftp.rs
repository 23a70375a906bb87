//! FTP session

use super::SessionState;
use crate::config::Credentials;
use crate::error::{Error, Result};
use crate::transport::FtpTransport;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// An authenticated FTP session.
pub struct FtpSession<T: FtpTransport> {
    transport: T,
    state: SessionState,
}

impl<T: FtpTransport> FtpSession<T> {
    /// Connect and login.
    ///
    /// # Errors
    ///
    /// Returns `Error::Connect` or `Error::Auth` from the transport.
    pub async fn connect(mut transport: T, credentials: &Credentials) -> Result<Self> {
        transport.connect(credentials).await?;
        info!("FTP session opened");
        Ok(Self {
            transport,
            state: SessionState::Authenticated,
        })
    }

    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Change the remote working directory.
    ///
    /// # Errors
    ///
    /// Fails with `Error::InvalidState` outside `Authenticated`, or
    /// with the transport's error.
    pub async fn change_directory(&mut self, dir: &str) -> Result<()> {
        self.state.ensure_open("CWD")?;
        self.transport.cwd(dir).await
    }

    /// List the remote working directory.
    ///
    /// # Errors
    ///
    /// Fails with `Error::InvalidState` outside `Authenticated`, or
    /// with the transport's error.
    pub async fn list_directory(&mut self) -> Result<Vec<String>> {
        self.state.ensure_open("LIST")?;
        self.transport.list().await
    }

    /// Download one remote file into `dest_dir`, returning the local
    /// path.
    ///
    /// At most one valid artifact: if the transfer fails at any
    /// point, the partially written local file is removed before the
    /// error is reported.
    ///
    /// # Errors
    ///
    /// Fails with `Error::InvalidState` outside `Authenticated`, or
    /// with `Error::Transfer` when the transfer fails mid-way.
    pub async fn download_file(&mut self, remote: &str, dest_dir: &Path) -> Result<PathBuf> {
        self.state.ensure_open("RETR")?;
        let path = dest_dir.join(remote);
        debug!(remote, path = %path.display(), "starting download");

        let mut file = fs::File::create(&path).await?;
        let copied = async {
            let mut chunks = self.transport.retr(remote).await?;
            while let Some(chunk) = chunks.next().await {
                file.write_all(&chunk?).await?;
            }
            file.flush().await?;
            Ok::<(), Error>(())
        }
        .await;
        drop(file);

        if let Err(e) = copied {
            if let Err(remove_err) = fs::remove_file(&path).await {
                warn!(path = %path.display(), "could not remove partial file: {remove_err}");
            }
            return Err(match e {
                transfer @ Error::Transfer(_) => transfer,
                other => Error::Transfer(other.to_string()),
            });
        }
        Ok(path)
    }

    /// Upload one local file under the given remote name.
    ///
    /// No remote cleanup is attempted on failure; whether a partial
    /// remote file should be retracted is left to the server.
    ///
    /// # Errors
    ///
    /// Fails with `Error::InvalidState` outside `Authenticated`, or
    /// with `Error::Transfer` when reading or storing fails.
    pub async fn upload_file(&mut self, local: &Path, remote: &str) -> Result<()> {
        self.state.ensure_open("STOR")?;
        debug!(local = %local.display(), remote, "starting upload");
        let data = fs::read(local)
            .await
            .map_err(|e| Error::Transfer(format!("cannot read {}: {e}", local.display())))?;
        self.transport
            .stor(remote, data)
            .await
            .map_err(|e| Error::Transfer(e.to_string()))
    }

    /// Close the control connection.
    ///
    /// Always reaches `Closed`; a close failure is returned for
    /// reporting.
    ///
    /// # Errors
    ///
    /// Fails with `Error::InvalidState` if closing was already
    /// entered, or with the close failure.
    pub async fn close(&mut self) -> Result<()> {
        self.state.ensure_can_close()?;
        self.state = SessionState::Closing;
        debug!("closing FTP session");
        let quit = self.transport.quit().await;
        self.state = SessionState::Closed;
        quit
    }
}
