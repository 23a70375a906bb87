//! Header filtering and encoded-word decoding
//!
//! Raw header lines pass through a fixed allow-list before decoding;
//! everything except `From:`, `To:` and `Subject:` is dropped. Lines
//! containing an encoded word (RFC 2047, `=?charset?encoding?payload?=`)
//! are decoded only for the `B` (base64) encoding; any other marker
//! leaves the line untouched.

use crate::error::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Header fields that survive filtering.
pub const ALLOW_LIST: [&str; 3] = ["From:", "To:", "Subject:"];

/// Keep only allow-listed header lines, preserving their order.
#[must_use]
pub fn filter(lines: Vec<Vec<u8>>) -> Vec<Vec<u8>> {
    lines.into_iter().filter(|line| is_allowed(line)).collect()
}

fn is_allowed(line: &[u8]) -> bool {
    ALLOW_LIST
        .iter()
        .any(|field| line.starts_with(field.as_bytes()))
}

/// Decode one allow-listed header line into a display string.
///
/// Lines without a `?` marker are decoded as text and trimmed.
/// Encoded words split into charset, encoding marker, and payload;
/// only the `B` marker is decoded, replacing everything after the
/// field name with the decoded text. A malformed split or an invalid
/// base64 payload falls back to the raw line.
///
/// # Errors
///
/// Returns `Error::Decode` only when the declared charset is not
/// supported by the decoding runtime. Callers are expected to catch
/// this and show the raw line instead of aborting the session.
pub fn decode(line: &[u8]) -> Result<String> {
    if !line.contains(&b'?') {
        return Ok(raw_text(line));
    }

    let parts: Vec<&[u8]> = line.split(|b| *b == b'?').collect();
    if parts.len() < 4 {
        return Ok(raw_text(line));
    }
    let (charset, marker, payload) = (parts[1], parts[2], parts[3]);

    if marker != b"B" {
        return Ok(raw_text(line));
    }

    let Ok(decoded) = STANDARD.decode(payload) else {
        return Ok(raw_text(line));
    };

    let label = String::from_utf8_lossy(charset);
    let Some(encoding) = encoding_rs::Encoding::for_label(label.as_bytes()) else {
        return Err(Error::Decode(format!("unsupported charset: {label}")));
    };
    let (text, _, _) = encoding.decode(&decoded);

    let prefix = raw_text(parts[0]);
    let field = prefix.split_whitespace().next().unwrap_or_default();
    Ok(format!("{field} {text}"))
}

fn raw_text(line: &[u8]) -> String {
    String::from_utf8_lossy(line).trim().to_string()
}
