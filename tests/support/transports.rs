//! Scripted fake transports, one per protocol trait.

use futures::StreamExt;
use multimail::{
    ByteStream, Credentials, Error, FtpTransport, ImapTransport, Pop3Transport, Result,
    SmtpTransport,
};
use std::sync::{Arc, Mutex};

fn message_at(messages: &[Vec<u8>], index: u32) -> Result<Vec<u8>> {
    let position = usize::try_from(index)
        .ok()
        .and_then(|i| i.checked_sub(1))
        .ok_or_else(|| Error::Protocol(format!("bad index {index}")))?;
    messages
        .get(position)
        .cloned()
        .ok_or_else(|| Error::Protocol(format!("no such message {index}")))
}

// ── POP3 ───────────────────────────────────────────────────────────

/// Server-visible effects of a POP3 conversation.
#[derive(Debug, Default, Clone)]
pub struct Pop3Log {
    /// Indices marked by DELE, in order.
    pub marked: Vec<u32>,
    /// Deletions actually applied; only ever set by QUIT.
    pub committed: Vec<u32>,
    pub quits: u32,
}

pub struct FakePop3 {
    messages: Vec<Vec<u8>>,
    fail_auth: bool,
    fail_retr: bool,
    log: Arc<Mutex<Pop3Log>>,
}

impl FakePop3 {
    pub fn new(messages: Vec<Vec<u8>>) -> Self {
        Self {
            messages,
            fail_auth: false,
            fail_retr: false,
            log: Arc::default(),
        }
    }

    pub fn rejecting_auth(mut self) -> Self {
        self.fail_auth = true;
        self
    }

    pub fn failing_retr(mut self) -> Self {
        self.fail_retr = true;
        self
    }

    pub fn log(&self) -> Arc<Mutex<Pop3Log>> {
        self.log.clone()
    }
}

impl Pop3Transport for FakePop3 {
    async fn connect(&mut self, _credentials: &Credentials) -> Result<()> {
        if self.fail_auth {
            return Err(Error::Auth("invalid credentials".to_string()));
        }
        Ok(())
    }

    async fn stat(&mut self) -> Result<(u32, u64)> {
        let count = u32::try_from(self.messages.len()).unwrap();
        let size = self.messages.iter().map(|m| m.len() as u64).sum();
        Ok((count, size))
    }

    async fn list(&mut self) -> Result<Vec<(u32, u64)>> {
        Ok(self
            .messages
            .iter()
            .enumerate()
            .map(|(i, m)| (u32::try_from(i).unwrap() + 1, m.len() as u64))
            .collect())
    }

    async fn top(&mut self, index: u32) -> Result<Vec<Vec<u8>>> {
        let raw = message_at(&self.messages, index)?;
        Ok(super::header_lines(&raw))
    }

    async fn retr(&mut self, index: u32) -> Result<Vec<u8>> {
        if self.fail_retr {
            return Err(Error::Protocol("RETR refused".to_string()));
        }
        message_at(&self.messages, index)
    }

    async fn dele(&mut self, index: u32) -> Result<()> {
        self.log.lock().unwrap().marked.push(index);
        Ok(())
    }

    async fn quit(&mut self) -> Result<()> {
        let mut log = self.log.lock().unwrap();
        log.committed = log.marked.clone();
        log.quits += 1;
        Ok(())
    }
}

// ── IMAP ───────────────────────────────────────────────────────────

/// Server-visible effects of an IMAP conversation.
#[derive(Debug, Default, Clone)]
pub struct ImapLog {
    /// Command names in the order received.
    pub ops: Vec<String>,
    /// Sequence numbers flagged `\Deleted`.
    pub marked: Vec<u32>,
    pub expunged: bool,
    pub logged_out: bool,
}

pub struct FakeImap {
    messages: Vec<Vec<u8>>,
    fail_expunge: bool,
    log: Arc<Mutex<ImapLog>>,
}

impl FakeImap {
    pub fn new(messages: Vec<Vec<u8>>) -> Self {
        Self {
            messages,
            fail_expunge: false,
            log: Arc::default(),
        }
    }

    pub fn failing_expunge(mut self) -> Self {
        self.fail_expunge = true;
        self
    }

    pub fn log(&self) -> Arc<Mutex<ImapLog>> {
        self.log.clone()
    }

    fn record(&self, op: &str) {
        self.log.lock().unwrap().ops.push(op.to_string());
    }
}

impl ImapTransport for FakeImap {
    async fn login(&mut self, _credentials: &Credentials) -> Result<()> {
        self.record("login");
        Ok(())
    }

    async fn select_inbox(&mut self) -> Result<u32> {
        self.record("select");
        Ok(u32::try_from(self.messages.len()).unwrap())
    }

    async fn search_all(&mut self) -> Result<Vec<u32>> {
        self.record("search");
        Ok((1..=u32::try_from(self.messages.len()).unwrap()).collect())
    }

    async fn fetch(&mut self, sequence: u32) -> Result<Vec<u8>> {
        self.record("fetch");
        message_at(&self.messages, sequence)
    }

    async fn mark_deleted(&mut self, sequence: u32) -> Result<()> {
        self.record("store");
        self.log.lock().unwrap().marked.push(sequence);
        Ok(())
    }

    async fn expunge(&mut self) -> Result<()> {
        self.record("expunge");
        if self.fail_expunge {
            return Err(Error::Protocol("EXPUNGE refused".to_string()));
        }
        self.log.lock().unwrap().expunged = true;
        Ok(())
    }

    async fn logout(&mut self) -> Result<()> {
        self.record("logout");
        self.log.lock().unwrap().logged_out = true;
        Ok(())
    }
}

// ── SMTP ───────────────────────────────────────────────────────────

/// Server-visible effects of an SMTP conversation.
#[derive(Debug, Default, Clone)]
pub struct SmtpLog {
    /// `(to, subject, body)` per accepted message.
    pub sent: Vec<(Vec<String>, String, String)>,
    pub quits: u32,
}

#[derive(Default)]
pub struct FakeSmtp {
    fail_send: bool,
    log: Arc<Mutex<SmtpLog>>,
}

impl FakeSmtp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_send(mut self) -> Self {
        self.fail_send = true;
        self
    }

    pub fn log(&self) -> Arc<Mutex<SmtpLog>> {
        self.log.clone()
    }
}

impl SmtpTransport for FakeSmtp {
    async fn connect(&mut self, _credentials: &Credentials) -> Result<()> {
        Ok(())
    }

    async fn send(&mut self, to: &[String], subject: &str, body: &str) -> Result<()> {
        if self.fail_send {
            return Err(Error::Send("mailbox unavailable".to_string()));
        }
        self.log
            .lock()
            .unwrap()
            .sent
            .push((to.to_vec(), subject.to_string(), body.to_string()));
        Ok(())
    }

    async fn quit(&mut self) -> Result<()> {
        self.log.lock().unwrap().quits += 1;
        Ok(())
    }
}

// ── FTP ────────────────────────────────────────────────────────────

/// Server-visible effects of an FTP conversation.
#[derive(Debug, Default, Clone)]
pub struct FtpLog {
    pub cwd: Vec<String>,
    /// `(name, data)` per stored file.
    pub stored: Vec<(String, Vec<u8>)>,
    pub quits: u32,
}

pub struct FakeFtp {
    files: Vec<(String, Vec<u8>)>,
    /// Fail a download after yielding this many chunks.
    fail_download_after: Option<usize>,
    fail_stor: bool,
    log: Arc<Mutex<FtpLog>>,
}

impl FakeFtp {
    pub fn new(files: Vec<(String, Vec<u8>)>) -> Self {
        Self {
            files,
            fail_download_after: None,
            fail_stor: false,
            log: Arc::default(),
        }
    }

    pub fn failing_download_after(mut self, chunks: usize) -> Self {
        self.fail_download_after = Some(chunks);
        self
    }

    pub fn failing_stor(mut self) -> Self {
        self.fail_stor = true;
        self
    }

    pub fn log(&self) -> Arc<Mutex<FtpLog>> {
        self.log.clone()
    }
}

impl FtpTransport for FakeFtp {
    async fn connect(&mut self, _credentials: &Credentials) -> Result<()> {
        Ok(())
    }

    async fn cwd(&mut self, dir: &str) -> Result<()> {
        self.log.lock().unwrap().cwd.push(dir.to_string());
        Ok(())
    }

    async fn list(&mut self) -> Result<Vec<String>> {
        Ok(self.files.iter().map(|(name, _)| name.clone()).collect())
    }

    async fn retr(&mut self, name: &str) -> Result<ByteStream<'_>> {
        let data = self
            .files
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, d)| d.clone())
            .ok_or_else(|| Error::Protocol(format!("no such file {name}")))?;

        let mut chunks: Vec<Result<Vec<u8>>> =
            data.chunks(4).map(|c| Ok(c.to_vec())).collect();
        if let Some(after) = self.fail_download_after {
            chunks.truncate(after);
            chunks.push(Err(Error::Transfer("connection reset".to_string())));
        }
        Ok(futures::stream::iter(chunks).boxed())
    }

    async fn stor(&mut self, name: &str, data: Vec<u8>) -> Result<()> {
        if self.fail_stor {
            return Err(Error::Protocol("STOR refused".to_string()));
        }
        self.log
            .lock()
            .unwrap()
            .stored
            .push((name.to_string(), data));
        Ok(())
    }

    async fn quit(&mut self) -> Result<()> {
        self.log.lock().unwrap().quits += 1;
        Ok(())
    }
}
