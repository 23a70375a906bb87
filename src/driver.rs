//! Session drivers
//!
//! One interactive pass per protocol: connect and authenticate,
//! snapshot the mailbox, enumerate, act on each item as the operator
//! decides, and close on every exit path. Connect and authentication
//! failures abort the pass; per-item failures are reported through
//! the operator and the pass continues.

use crate::config::Credentials;
use crate::error::Result;
use crate::header;
use crate::mime::{MessagePart, MimeFlattener};
use crate::operator::{FileAction, FileOperator, MailOperator, SendOperator};
use crate::session::{FtpSession, ImapSession, Pop3Session, SmtpSession};
use crate::transport::{FtpTransport, ImapTransport, Pop3Transport, SmtpTransport};
use tracing::warn;

/// Drives one interactive pass over a protocol session.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionDriver {
    flattener: MimeFlattener,
}

impl SessionDriver {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            flattener: MimeFlattener::new(),
        }
    }

    /// Use a non-default flattener (e.g. a different nesting bound).
    #[must_use]
    pub const fn with_flattener(flattener: MimeFlattener) -> Self {
        Self { flattener }
    }

    /// Run one POP3 pass. Items are presented in server listing
    /// order; deletions commit when the session closes.
    ///
    /// # Errors
    ///
    /// Returns connect/authentication failures and any enumeration
    /// or fetch failure. The session is closed on every exit path.
    pub async fn run_pop3<T, O>(
        &self,
        transport: T,
        credentials: &Credentials,
        operator: &mut O,
    ) -> Result<()>
    where
        T: Pop3Transport,
        O: MailOperator,
    {
        let mut session = Pop3Session::connect(transport, credentials).await?;
        let outcome = self.pop3_pass(&mut session, operator).await;
        if let Err(e) = session.close().await {
            operator.warn(&format!("session cleanup failed: {e}"));
        }
        outcome
    }

    async fn pop3_pass<T, O>(&self, session: &mut Pop3Session<T>, operator: &mut O) -> Result<()>
    where
        T: Pop3Transport,
        O: MailOperator,
    {
        operator.session_opened(&session.summary());
        let items = session.list().await?;

        for item in items {
            let lines = session.fetch_headers(item.index).await?;
            let decoded = decode_lines(&lines, operator);
            operator.headers(&item, &decoded);

            let decision = operator.review(&item);
            if decision.show_body {
                let raw = session.fetch_body(item.index).await?;
                self.present_body(&raw, operator);
            }
            if decision.delete {
                if let Err(e) = session.remove(item.index).await {
                    operator.warn(&e.to_string());
                }
            }
            if decision.stop {
                break;
            }
        }
        Ok(())
    }

    /// Run one IMAP pass. Items are presented newest-first; marked
    /// messages are expunged when the session closes.
    ///
    /// # Errors
    ///
    /// Returns connect/authentication failures and any enumeration
    /// or fetch failure. The session is closed on every exit path.
    pub async fn run_imap<T, O>(
        &self,
        transport: T,
        credentials: &Credentials,
        operator: &mut O,
    ) -> Result<()>
    where
        T: ImapTransport,
        O: MailOperator,
    {
        let mut session = ImapSession::connect(transport, credentials).await?;
        let outcome = self.imap_pass(&mut session, operator).await;
        if let Err(e) = session.close().await {
            operator.warn(&format!("session cleanup failed: {e}"));
        }
        outcome
    }

    async fn imap_pass<T, O>(&self, session: &mut ImapSession<T>, operator: &mut O) -> Result<()>
    where
        T: ImapTransport,
        O: MailOperator,
    {
        operator.session_opened(&session.summary());
        let items = session.list().await?;

        // Newest first: walk the ascending listing backwards.
        for item in items.into_iter().rev() {
            let lines = session.fetch_headers(item.index).await?;
            let decoded = decode_lines(&lines, operator);
            operator.headers(&item, &decoded);

            let decision = operator.review(&item);
            if decision.show_body {
                let raw = session.fetch_body(item.index).await?;
                self.present_body(&raw, operator);
            }
            if decision.delete {
                if let Err(e) = session.remove(item.index).await {
                    operator.warn(&e.to_string());
                }
            }
            if decision.stop {
                break;
            }
        }
        Ok(())
    }

    /// Run one SMTP pass: send drafts until the operator stops
    /// composing. Send failures are reported and the pass continues.
    ///
    /// # Errors
    ///
    /// Returns connect/authentication failures. The session is
    /// closed on every exit path.
    pub async fn run_smtp<T, O>(
        &self,
        transport: T,
        credentials: &Credentials,
        operator: &mut O,
    ) -> Result<()>
    where
        T: SmtpTransport,
        O: SendOperator,
    {
        let mut session = SmtpSession::connect(transport, credentials).await?;

        while let Some(draft) = operator.compose() {
            if draft.to.is_empty() {
                operator.warn("wrong destination address(es)");
                continue;
            }
            match session.send(&draft.to, &draft.subject, &draft.body).await {
                Ok(()) => operator.sent(&draft),
                Err(e) => operator.warn(&e.to_string()),
            }
        }

        if let Err(e) = session.close().await {
            operator.warn(&format!("session cleanup failed: {e}"));
        }
        Ok(())
    }

    /// Run one FTP pass: execute operator commands until `Quit`.
    /// Transfer failures are reported and the pass continues; a
    /// failed download leaves no partial local file behind.
    ///
    /// # Errors
    ///
    /// Returns connect/authentication failures. The session is
    /// closed on every exit path.
    pub async fn run_ftp<T, O>(
        &self,
        transport: T,
        credentials: &Credentials,
        operator: &mut O,
    ) -> Result<()>
    where
        T: FtpTransport,
        O: FileOperator,
    {
        let mut session = FtpSession::connect(transport, credentials).await?;

        loop {
            match operator.next_action() {
                FileAction::ChangeDir(dir) => {
                    if let Err(e) = session.change_directory(&dir).await {
                        operator.warn(&e.to_string());
                    }
                }
                FileAction::Download { remote, dest } => {
                    match session.download_file(&remote, &dest).await {
                        Ok(path) => operator.downloaded(&path),
                        Err(e) => operator.warn(&e.to_string()),
                    }
                }
                FileAction::Upload { local, remote } => {
                    if let Err(e) = session.upload_file(&local, &remote).await {
                        operator.warn(&e.to_string());
                    }
                }
                FileAction::List => match session.list_directory().await {
                    Ok(entries) => operator.listing(&entries),
                    Err(e) => operator.warn(&e.to_string()),
                },
                FileAction::Quit => break,
            }
        }

        if let Err(e) = session.close().await {
            operator.warn(&format!("session cleanup failed: {e}"));
        }
        Ok(())
    }

    /// Parse and flatten a raw message body for presentation. A
    /// truncated flatten is shown with a warning; an unparsable
    /// message is reported and skipped.
    fn present_body<O: MailOperator>(&self, raw: &[u8], operator: &mut O) {
        match MessagePart::parse(raw) {
            Ok(tree) => {
                let (text, truncated) = self.flattener.flatten_partial(&tree);
                if truncated {
                    operator.warn("message nesting exceeds bound, body truncated");
                }
                operator.body(&text);
            }
            Err(e) => operator.warn(&e.to_string()),
        }
    }
}

/// Decode header lines, falling back to the raw line when the
/// declared charset is unsupported.
fn decode_lines<O: MailOperator>(lines: &[Vec<u8>], operator: &mut O) -> Vec<String> {
    lines
        .iter()
        .map(|line| match header::decode(line) {
            Ok(text) => text,
            Err(e) => {
                warn!("header decode failed: {e}");
                operator.warn(&e.to_string());
                String::from_utf8_lossy(line).trim().to_string()
            }
        })
        .collect()
}
