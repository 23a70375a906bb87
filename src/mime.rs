//! MIME tree flattening
//!
//! A fetched message body parses into a [`MessagePart`] tree: leaves
//! carry a declared charset and payload bytes, containers carry
//! children. [`MimeFlattener`] walks the tree depth-first and
//! concatenates every decodable leaf into one displayable string.
//!
//! Leaves that declare no charset (binary attachments, bare
//! `text/plain` parts without a `charset` parameter) contribute
//! nothing, so attachments never corrupt the text stream.

use crate::error::{Error, Result};
use mail_parser::{Message, MessageParser, MimeHeaders, PartType};
use tracing::warn;

/// One node of a parsed message body.
///
/// Constructed once per fetched message and discarded after
/// rendering; never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessagePart {
    /// A multipart container; children in listed order.
    Container(Vec<MessagePart>),
    /// A leaf part. `charset` is the part's declared charset, or
    /// `None` when the part declared none.
    Leaf {
        charset: Option<String>,
        payload: Vec<u8>,
    },
}

impl MessagePart {
    /// A leaf part.
    #[must_use]
    pub fn leaf(charset: Option<&str>, payload: impl Into<Vec<u8>>) -> Self {
        Self::Leaf {
            charset: charset.map(str::to_string),
            payload: payload.into(),
        }
    }

    /// A container part.
    #[must_use]
    pub const fn container(children: Vec<Self>) -> Self {
        Self::Container(children)
    }

    /// Parse a raw RFC 2822 message into a part tree.
    ///
    /// Parsing is delegated to `mail-parser`; text bodies arrive
    /// already converted to UTF-8, so text leaves carry a `utf-8`
    /// charset when (and only when) the part declared one. Binary
    /// leaves keep their declared charset verbatim.
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedMessage` if the bytes cannot be
    /// parsed as a message at all.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let message = MessageParser::default()
            .parse(raw)
            .ok_or_else(|| Error::MalformedMessage("unparsable message".to_string()))?;
        Ok(Self::from_message(&message))
    }

    fn from_message(message: &Message<'_>) -> Self {
        Self::convert(message, 0)
    }

    fn convert(message: &Message<'_>, id: usize) -> Self {
        let Some(part) = message.parts.get(id) else {
            return Self::Leaf {
                charset: None,
                payload: Vec::new(),
            };
        };
        let declared = part
            .content_type()
            .and_then(|ct| ct.attribute("charset"))
            .map(str::to_ascii_lowercase);

        match &part.body {
            PartType::Multipart(children) => Self::Container(
                children
                    .iter()
                    .map(|child| Self::convert(message, *child))
                    .collect(),
            ),
            PartType::Message(nested) => Self::Container(vec![Self::from_message(nested)]),
            PartType::Text(text) | PartType::Html(text) => Self::Leaf {
                charset: declared.map(|_| "utf-8".to_string()),
                payload: text.as_bytes().to_vec(),
            },
            PartType::Binary(data) | PartType::InlineBinary(data) => Self::Leaf {
                charset: declared,
                payload: data.to_vec(),
            },
        }
    }
}

/// Default recursion bound, matching typical MIME nesting.
pub const DEFAULT_MAX_DEPTH: usize = 16;

/// Flattens a [`MessagePart`] tree into displayable text.
#[derive(Debug, Clone, Copy)]
pub struct MimeFlattener {
    max_depth: usize,
}

impl Default for MimeFlattener {
    fn default() -> Self {
        Self::new()
    }
}

impl MimeFlattener {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Override the nesting bound.
    #[must_use]
    pub const fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Flatten the tree, failing if the nesting bound is exceeded.
    ///
    /// The message tree is produced fresh per fetch and acyclic, but
    /// the bound keeps adversarial nesting from growing the stack
    /// without limit.
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedMessage` when nesting exceeds the
    /// bound.
    pub fn flatten(&self, root: &MessagePart) -> Result<String> {
        let (text, truncated) = self.flatten_partial(root);
        if truncated {
            return Err(Error::MalformedMessage(format!(
                "nesting exceeds {} levels",
                self.max_depth
            )));
        }
        Ok(text)
    }

    /// Flatten the tree, cutting subtrees beyond the nesting bound.
    ///
    /// Returns the concatenated text and whether anything was cut,
    /// so callers can show a partial body with a warning instead of
    /// dropping the message.
    #[must_use]
    pub fn flatten_partial(&self, root: &MessagePart) -> (String, bool) {
        let mut out = String::new();
        let truncated = self.walk(root, 0, &mut out);
        (out, truncated)
    }

    /// Returns `true` if the depth bound was hit anywhere below.
    fn walk(&self, part: &MessagePart, depth: usize, out: &mut String) -> bool {
        if depth > self.max_depth {
            return true;
        }
        match part {
            MessagePart::Leaf { charset: None, .. } => false,
            MessagePart::Leaf {
                charset: Some(label),
                payload,
            } => {
                if let Some(encoding) = encoding_rs::Encoding::for_label(label.as_bytes()) {
                    let (text, _, _) = encoding.decode(payload);
                    out.push_str(&text);
                } else {
                    warn!(charset = %label, "skipping part with unknown charset");
                }
                false
            }
            MessagePart::Container(children) => {
                let mut truncated = false;
                for child in children {
                    truncated |= self.walk(child, depth + 1, out);
                }
                truncated
            }
        }
    }
}
