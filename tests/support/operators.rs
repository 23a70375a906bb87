//! Scripted operators: queued decisions in, observed output out.

use multimail::{
    Draft, FileAction, FileOperator, ItemDecision, ItemDescriptor, MailOperator, MailboxSummary,
    SendOperator,
};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// A mail operator that replays queued [`ItemDecision`]s and records
/// everything presented to it.
#[derive(Default)]
pub struct ScriptedMailOperator {
    decisions: VecDeque<ItemDecision>,
    pub summary: Option<MailboxSummary>,
    /// `(index, decoded lines)` per presented item, in order.
    pub headers_seen: Vec<(u32, Vec<String>)>,
    pub bodies: Vec<String>,
    pub warnings: Vec<String>,
}

impl ScriptedMailOperator {
    pub fn new(decisions: Vec<ItemDecision>) -> Self {
        Self {
            decisions: decisions.into(),
            ..Self::default()
        }
    }
}

impl MailOperator for ScriptedMailOperator {
    fn session_opened(&mut self, summary: &MailboxSummary) {
        self.summary = Some(*summary);
    }

    fn headers(&mut self, item: &ItemDescriptor, lines: &[String]) {
        self.headers_seen.push((item.index, lines.to_vec()));
    }

    fn body(&mut self, text: &str) {
        self.bodies.push(text.to_string());
    }

    fn warn(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }

    fn review(&mut self, _item: &ItemDescriptor) -> ItemDecision {
        self.decisions.pop_front().unwrap_or_default()
    }
}

/// A send operator that replays queued drafts.
#[derive(Default)]
pub struct ScriptedSendOperator {
    drafts: VecDeque<Draft>,
    pub sent: Vec<Draft>,
    pub warnings: Vec<String>,
}

impl ScriptedSendOperator {
    pub fn new(drafts: Vec<Draft>) -> Self {
        Self {
            drafts: drafts.into(),
            ..Self::default()
        }
    }
}

impl SendOperator for ScriptedSendOperator {
    fn compose(&mut self) -> Option<Draft> {
        self.drafts.pop_front()
    }

    fn sent(&mut self, draft: &Draft) {
        self.sent.push(draft.clone());
    }

    fn warn(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }
}

/// A file operator that replays queued [`FileAction`]s.
#[derive(Default)]
pub struct ScriptedFileOperator {
    actions: VecDeque<FileAction>,
    pub listings: Vec<Vec<String>>,
    pub downloads: Vec<PathBuf>,
    pub warnings: Vec<String>,
}

impl ScriptedFileOperator {
    pub fn new(actions: Vec<FileAction>) -> Self {
        Self {
            actions: actions.into(),
            ..Self::default()
        }
    }
}

impl FileOperator for ScriptedFileOperator {
    fn next_action(&mut self) -> FileAction {
        self.actions.pop_front().unwrap_or(FileAction::Quit)
    }

    fn listing(&mut self, entries: &[String]) {
        self.listings.push(entries.to_vec());
    }

    fn downloaded(&mut self, path: &Path) {
        self.downloads.push(path.to_path_buf());
    }

    fn warn(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }
}
