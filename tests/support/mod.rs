//! In-process fakes for integration testing
//!
//! Each protocol gets a scripted transport that records the commands
//! it receives behind an `Arc<Mutex<..>>` log, so tests can assert on
//! server-visible effects after the driver has consumed the
//! transport. Operators are scripted the same way: queued decisions
//! in, observed presentations out.

#![allow(dead_code)]

pub mod operators;
pub mod transports;

pub use operators::{ScriptedFileOperator, ScriptedMailOperator, ScriptedSendOperator};
pub use transports::{FakeFtp, FakeImap, FakePop3, FakeSmtp};

use multimail::Credentials;

/// Build a minimal valid RFC 2822 email.
pub fn make_raw_email(from: &str, to: &str, subject: &str, body: &str) -> Vec<u8> {
    format!(
        "From: {from}\r\n\
         To: {to}\r\n\
         Subject: {subject}\r\n\
         Date: Mon, 01 Jan 2024 12:00:00 +0000\r\n\
         Message-ID: <test-{subject}@fake.test>\r\n\
         Content-Type: text/plain; charset=utf-8\r\n\
         \r\n\
         {body}"
    )
    .into_bytes()
}

/// An email carrying ten header fields, only three of which are on
/// the allow-list.
pub fn make_noisy_email(subject: &str, body: &str) -> Vec<u8> {
    format!(
        "Return-Path: <bounce@fake.test>\r\n\
         Received: from mx.fake.test\r\n\
         Delivered-To: bob@example.com\r\n\
         From: alice@example.com\r\n\
         To: bob@example.com\r\n\
         Subject: {subject}\r\n\
         Date: Mon, 01 Jan 2024 12:00:00 +0000\r\n\
         Message-ID: <noisy-{subject}@fake.test>\r\n\
         MIME-Version: 1.0\r\n\
         Content-Type: text/plain; charset=utf-8\r\n\
         \r\n\
         {body}"
    )
    .into_bytes()
}

pub fn test_credentials() -> Credentials {
    Credentials {
        host: "127.0.0.1".to_string(),
        port: 0,
        username: "testuser@example.com".to_string(),
        password: "testpass".to_string(),
    }
}

/// The header section of a raw message, split into lines.
pub fn header_lines(raw: &[u8]) -> Vec<Vec<u8>> {
    raw.split(|b| *b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .take_while(|line| !line.is_empty())
        .map(<[u8]>::to_vec)
        .collect()
}
