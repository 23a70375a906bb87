//! Presentation boundary
//!
//! The core produces decoded strings and asks the operator what to do
//! next; rendering (terminal, HTML viewer) and prompting live behind
//! these traits in the embedding application.

use crate::session::{ItemDescriptor, MailboxSummary};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Per-item choices for a mail pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemDecision {
    /// Fetch and show the flattened body.
    pub show_body: bool,
    /// Delete (POP3) or mark deleted (IMAP) this item.
    pub delete: bool,
    /// Stop enumerating after this item.
    pub stop: bool,
}

/// Operator of a POP3 or IMAP pass.
pub trait MailOperator {
    /// The connect-time mailbox snapshot.
    fn session_opened(&mut self, summary: &MailboxSummary);

    /// Decoded allow-listed header lines for one item.
    fn headers(&mut self, item: &ItemDescriptor, lines: &[String]);

    /// The flattened body text of one item.
    fn body(&mut self, text: &str);

    /// A recovered problem worth surfacing.
    fn warn(&mut self, message: &str);

    /// Decide what to do with one item.
    fn review(&mut self, item: &ItemDescriptor) -> ItemDecision;
}

/// A message to be sent through an SMTP pass.
#[derive(Debug, Clone, Serialize)]
pub struct Draft {
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

/// Operator of an SMTP pass.
pub trait SendOperator {
    /// The next message to send, or `None` to end the pass.
    fn compose(&mut self) -> Option<Draft>;

    /// The draft was accepted by the server.
    fn sent(&mut self, draft: &Draft);

    /// A recovered problem worth surfacing.
    fn warn(&mut self, message: &str);
}

/// One command in an FTP pass.
#[derive(Debug, Clone)]
pub enum FileAction {
    ChangeDir(String),
    Download { remote: String, dest: PathBuf },
    Upload { local: PathBuf, remote: String },
    List,
    Quit,
}

/// Operator of an FTP pass.
pub trait FileOperator {
    /// The next command, `FileAction::Quit` to end the pass.
    fn next_action(&mut self) -> FileAction;

    /// A directory listing, one line per entry.
    fn listing(&mut self, entries: &[String]);

    /// A download completed at this local path.
    fn downloaded(&mut self, path: &Path);

    /// A recovered problem worth surfacing.
    fn warn(&mut self, message: &str);
}
