//! MIME message structure and serialization.

use crate::content_type::ContentType;
use crate::encoding::{decode_base64, decode_quoted_printable};
use crate::error::Result;
use crate::header::Headers;
use std::fmt;

/// Transfer encoding types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransferEncoding {
    /// 7-bit ASCII.
    SevenBit,
    /// 8-bit binary.
    EightBit,
    /// Base64 encoding.
    Base64,
    /// Quoted-Printable encoding.
    QuotedPrintable,
    /// Binary (no encoding).
    Binary,
}

impl TransferEncoding {
    /// Parses transfer encoding from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "8bit" => Self::EightBit,
            "base64" => Self::Base64,
            "quoted-printable" => Self::QuotedPrintable,
            "binary" => Self::Binary,
            _ => Self::SevenBit, // Default (includes "7bit")
        }
    }
}

impl fmt::Display for TransferEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SevenBit => write!(f, "7bit"),
            Self::EightBit => write!(f, "8bit"),
            Self::Base64 => write!(f, "base64"),
            Self::QuotedPrintable => write!(f, "quoted-printable"),
            Self::Binary => write!(f, "binary"),
        }
    }
}

/// Body of a message or part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// Already transfer-encoded content.
    Encoded(String),
    /// Nested parts separated by `boundary`.
    Multipart {
        /// Boundary string (without leading dashes).
        boundary: String,
        /// Child parts, in order.
        parts: Vec<Part>,
    },
}

/// MIME message part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// Part headers.
    pub headers: Headers,
    /// Part body.
    pub body: Body,
}

impl Part {
    /// Creates a new part.
    #[must_use]
    pub const fn new(headers: Headers, body: Body) -> Self {
        Self { headers, body }
    }

    /// Gets the content type, defaulting to `text/plain`.
    ///
    /// # Errors
    ///
    /// Returns an error if content type header is invalid.
    pub fn content_type(&self) -> Result<ContentType> {
        self.headers
            .get("content-type")
            .map_or_else(|| Ok(ContentType::text_plain()), ContentType::parse)
    }

    /// Gets the transfer encoding.
    #[must_use]
    pub fn transfer_encoding(&self) -> TransferEncoding {
        self.headers
            .get("content-transfer-encoding")
            .map_or(TransferEncoding::SevenBit, TransferEncoding::parse)
    }

    /// Gets the `Content-ID` without angle brackets.
    #[must_use]
    pub fn content_id(&self) -> Option<&str> {
        self.headers
            .get("content-id")
            .map(|id| id.trim().trim_start_matches('<').trim_end_matches('>'))
    }

    /// Child parts of a multipart body (empty for leaf parts).
    #[must_use]
    pub fn parts(&self) -> &[Part] {
        match &self.body {
            Body::Multipart { parts, .. } => parts,
            Body::Encoded(_) => &[],
        }
    }

    /// Decodes a leaf body according to its transfer encoding.
    ///
    /// Multipart bodies decode to an empty vector.
    ///
    /// # Errors
    ///
    /// Returns an error if decoding fails.
    pub fn decode_body(&self) -> Result<Vec<u8>> {
        let Body::Encoded(raw) = &self.body else {
            return Ok(Vec::new());
        };

        match self.transfer_encoding() {
            TransferEncoding::Base64 => decode_base64(raw),
            TransferEncoding::QuotedPrintable => Ok(decode_quoted_printable(raw)?.into_bytes()),
            _ => Ok(raw.as_bytes().to_vec()),
        }
    }

    /// Gets the decoded body as a string.
    ///
    /// # Errors
    ///
    /// Returns an error if decoding or UTF-8 conversion fails.
    pub fn body_text(&self) -> Result<String> {
        String::from_utf8(self.decode_body()?).map_err(Into::into)
    }

    /// Depth-first iterator over this part and all descendants.
    pub fn walk(&self) -> impl Iterator<Item = &Self> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let part = stack.pop()?;
            stack.extend(part.parts().iter().rev());
            Some(part)
        })
    }

    fn write_to(&self, out: &mut String) {
        out.push_str(&self.headers.to_string());
        out.push_str("\r\n");

        match &self.body {
            Body::Encoded(raw) => out.push_str(raw),
            Body::Multipart { boundary, parts } => {
                for part in parts {
                    out.push_str("--");
                    out.push_str(boundary);
                    out.push_str("\r\n");
                    part.write_to(out);
                    if !out.ends_with("\r\n") {
                        out.push_str("\r\n");
                    }
                }
                out.push_str("--");
                out.push_str(boundary);
                out.push_str("--\r\n");
            }
        }
    }
}

/// A complete MIME message plus its envelope recipients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    root: Part,
    envelope_recipients: Vec<String>,
}

impl Message {
    /// Creates a message from its root part and the full recipient list
    /// (To, Cc and Bcc) used by the transport.
    #[must_use]
    pub const fn new(root: Part, envelope_recipients: Vec<String>) -> Self {
        Self {
            root,
            envelope_recipients,
        }
    }

    /// Top-level headers.
    #[must_use]
    pub const fn headers(&self) -> &Headers {
        &self.root.headers
    }

    /// Root part (top-level headers and body).
    #[must_use]
    pub const fn root(&self) -> &Part {
        &self.root
    }

    /// Every address the transport must deliver to, Bcc included.
    #[must_use]
    pub fn envelope_recipients(&self) -> &[String] {
        &self.envelope_recipients
    }

    /// Gets the From header.
    #[must_use]
    pub fn from(&self) -> Option<&str> {
        self.headers().get("from")
    }

    /// Gets the To header.
    #[must_use]
    pub fn to(&self) -> Option<&str> {
        self.headers().get("to")
    }

    /// Gets the Subject header (possibly RFC 2047 encoded).
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.headers().get("subject")
    }

    /// Gets the Message-ID header.
    #[must_use]
    pub fn message_id(&self) -> Option<&str> {
        self.headers().get("message-id")
    }

    /// Finds the first leaf part with the given `type/subtype`.
    #[must_use]
    pub fn find_part(&self, essence: &str) -> Option<&Part> {
        self.root.walk().find(|part| {
            matches!(part.body, Body::Encoded(_))
                && part
                    .content_type()
                    .is_ok_and(|ct| ct.essence().eq_ignore_ascii_case(essence))
        })
    }

    /// Finds the part carrying the given Content-ID.
    #[must_use]
    pub fn find_content_id(&self, content_id: &str) -> Option<&Part> {
        self.root.walk().find(|part| part.content_id() == Some(content_id))
    }

    /// Decoded text/plain body.
    #[must_use]
    pub fn text_body(&self) -> Option<String> {
        self.find_part("text/plain").and_then(|p| p.body_text().ok())
    }

    /// Decoded text/html body.
    #[must_use]
    pub fn html_body(&self) -> Option<String> {
        self.find_part("text/html").and_then(|p| p.body_text().ok())
    }

    /// Serializes the message with CRLF line endings.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.root.write_to(&mut out);
        f.write_str(&out)
    }
}
