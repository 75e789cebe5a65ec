//! Message builder for HTML mails with inline parts and attachments.
//!
//! The generated structure nests only as deep as needed:
//!
//! ```text
//! multipart/mixed                 (only with file attachments)
//! └── multipart/related           (only with inline parts)
//!     └── multipart/alternative   (only with both text and html)
//!         ├── text/plain
//!         └── text/html
//! ```

use chrono::{DateTime, FixedOffset, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::content_type::ContentType;
use crate::encoding::{encode_base64_wrapped, encode_quoted_printable, encode_rfc2047};
use crate::error::{Error, Result};
use crate::header::Headers;
use crate::message::{Body, Message, Part, TransferEncoding};

/// A binary part referenced from the HTML body through `cid:` URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlinePart {
    /// Content-ID without angle brackets.
    pub content_id: String,
    /// MIME type of the data.
    pub content_type: ContentType,
    /// Raw bytes.
    pub data: Vec<u8>,
}

impl InlinePart {
    /// Creates a new inline part.
    #[must_use]
    pub fn new(content_id: impl Into<String>, content_type: ContentType, data: Vec<u8>) -> Self {
        Self {
            content_id: content_id.into(),
            content_type,
            data,
        }
    }
}

/// A regular file attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// File name offered to the recipient.
    pub filename: String,
    /// MIME type of the data.
    pub content_type: ContentType,
    /// Optional Content-ID, for clients that reference attachments by id.
    pub content_id: Option<String>,
    /// Raw bytes.
    pub data: Vec<u8>,
}

impl Attachment {
    /// Creates a new attachment.
    #[must_use]
    pub fn new(filename: impl Into<String>, content_type: ContentType, data: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type,
            content_id: None,
            data,
        }
    }

    /// Sets the Content-ID.
    #[must_use]
    pub fn with_content_id(mut self, content_id: impl Into<String>) -> Self {
        self.content_id = Some(content_id.into());
        self
    }
}

/// Builder for [`Message`].
#[derive(Debug, Clone, Default)]
pub struct MessageBuilder {
    from: Option<String>,
    to: Vec<String>,
    cc: Vec<String>,
    bcc: Vec<String>,
    subject: String,
    text: Option<String>,
    html: Option<String>,
    inline: Vec<InlinePart>,
    attachments: Vec<Attachment>,
    headers: Vec<(String, String)>,
    message_id: Option<String>,
    date: Option<DateTime<FixedOffset>>,
    seed: Option<u64>,
}

impl MessageBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sender.
    #[must_use]
    pub fn from(mut self, address: impl Into<String>) -> Self {
        self.from = Some(address.into());
        self
    }

    /// Adds a primary recipient.
    #[must_use]
    pub fn to(mut self, address: impl Into<String>) -> Self {
        self.to.push(address.into());
        self
    }

    /// Adds a carbon-copy recipient.
    #[must_use]
    pub fn cc(mut self, address: impl Into<String>) -> Self {
        self.cc.push(address.into());
        self
    }

    /// Adds a blind carbon-copy recipient (envelope only, never a header).
    #[must_use]
    pub fn bcc(mut self, address: impl Into<String>) -> Self {
        self.bcc.push(address.into());
        self
    }

    /// Sets the subject.
    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// Sets the plain-text body.
    #[must_use]
    pub fn text_body(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Sets the HTML body.
    #[must_use]
    pub fn html_body(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    /// Adds an inline part referenced from the HTML body.
    #[must_use]
    pub fn inline(mut self, part: InlinePart) -> Self {
        self.inline.push(part);
        self
    }

    /// Adds a file attachment.
    #[must_use]
    pub fn attach(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Adds an extra top-level header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Uses a fixed Message-ID (without angle brackets).
    #[must_use]
    pub fn message_id(mut self, id: impl Into<String>) -> Self {
        self.message_id = Some(id.into());
        self
    }

    /// Uses a fixed `Date` header.
    #[must_use]
    pub const fn date(mut self, date: DateTime<FixedOffset>) -> Self {
        self.date = Some(date);
        self
    }

    /// Seeds boundary and Message-ID generation, for reproducible output.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builds the message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingHeader`] without a sender,
    /// [`Error::EmptyBody`] without text and html bodies, and
    /// [`Error::InvalidHeader`] for header values that contain line breaks.
    pub fn build(self) -> Result<Message> {
        let from = self
            .from
            .clone()
            .ok_or_else(|| Error::MissingHeader("From".to_string()))?;
        if self.text.is_none() && self.html.is_none() {
            return Err(Error::EmptyBody);
        }

        let mut rng = self.seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

        let mut headers = Headers::new();
        let date = self
            .date
            .unwrap_or_else(|| Utc::now().fixed_offset());
        headers.add("Date", date.to_rfc2822())?;
        headers.add("From", from.as_str())?;
        if !self.to.is_empty() {
            headers.add("To", self.to.join(", "))?;
        }
        if !self.cc.is_empty() {
            headers.add("Cc", self.cc.join(", "))?;
        }
        headers.add("Subject", encode_rfc2047(&self.subject, "utf-8"))?;
        let message_id = self
            .message_id
            .clone()
            .unwrap_or_else(|| generate_message_id(&from, &mut rng));
        headers.add("Message-ID", format!("<{message_id}>"))?;
        for (name, value) in &self.headers {
            headers.add(name.as_str(), encode_rfc2047(value, "utf-8"))?;
        }
        headers.add("MIME-Version", "1.0")?;

        let mut body = self.body_part(&mut rng)?;

        if !self.inline.is_empty() {
            let mut parts = vec![body];
            for inline in &self.inline {
                parts.push(inline_part(inline)?);
            }
            body = multipart("related", parts, &mut rng)?;
        }

        if !self.attachments.is_empty() {
            let mut parts = vec![body];
            for attachment in &self.attachments {
                parts.push(attachment_part(attachment)?);
            }
            body = multipart("mixed", parts, &mut rng)?;
        }

        for (name, value) in body.headers.iter() {
            headers.add(name, value)?;
        }

        let envelope = self
            .to
            .iter()
            .chain(&self.cc)
            .chain(&self.bcc)
            .cloned()
            .collect();

        Ok(Message::new(Part::new(headers, body.body), envelope))
    }

    fn body_part(&self, rng: &mut StdRng) -> Result<Part> {
        match (&self.text, &self.html) {
            (Some(text), Some(html)) => multipart(
                "alternative",
                vec![
                    text_part(ContentType::text_plain(), text)?,
                    text_part(ContentType::text_html(), html)?,
                ],
                rng,
            ),
            (Some(text), None) => text_part(ContentType::text_plain(), text),
            (None, Some(html)) => text_part(ContentType::text_html(), html),
            (None, None) => Err(Error::EmptyBody),
        }
    }
}

fn generate_boundary(rng: &mut StdRng) -> String {
    format!("=_mailforge_{:016x}{:016x}", rng.r#gen::<u64>(), rng.r#gen::<u64>())
}

fn generate_message_id(from: &str, rng: &mut StdRng) -> String {
    let domain = from
        .rsplit_once('@')
        .map(|(_, domain)| domain.trim_end_matches('>').trim())
        .filter(|domain| !domain.is_empty())
        .unwrap_or("localhost");
    format!("{}.{:016x}@{domain}", Utc::now().timestamp(), rng.r#gen::<u64>())
}

fn multipart(sub_type: &str, parts: Vec<Part>, rng: &mut StdRng) -> Result<Part> {
    let boundary = generate_boundary(rng);
    let content_type = ContentType::new("multipart", sub_type).with_parameter("boundary", &boundary);
    let mut headers = Headers::new();
    headers.add("Content-Type", content_type.to_string())?;
    Ok(Part::new(headers, Body::Multipart { boundary, parts }))
}

fn text_part(content_type: ContentType, text: &str) -> Result<Part> {
    let mut headers = Headers::new();
    headers.add("Content-Type", content_type.to_string())?;
    headers.add(
        "Content-Transfer-Encoding",
        TransferEncoding::QuotedPrintable.to_string(),
    )?;
    Ok(Part::new(headers, Body::Encoded(encode_quoted_printable(text))))
}

fn binary_headers(content_type: &ContentType) -> Result<Headers> {
    let mut headers = Headers::new();
    headers.add("Content-Type", content_type.to_string())?;
    headers.add("Content-Transfer-Encoding", TransferEncoding::Base64.to_string())?;
    Ok(headers)
}

fn inline_part(inline: &InlinePart) -> Result<Part> {
    let mut headers = binary_headers(&inline.content_type)?;
    headers.add("Content-ID", format!("<{}>", inline.content_id))?;
    headers.add(
        "Content-Disposition",
        format!("inline; filename=\"{}\"", quote(&inline.content_id)),
    )?;
    Ok(Part::new(headers, Body::Encoded(encode_base64_wrapped(&inline.data))))
}

fn attachment_part(attachment: &Attachment) -> Result<Part> {
    let mut headers = binary_headers(&attachment.content_type)?;
    if let Some(content_id) = &attachment.content_id {
        headers.add("Content-ID", format!("<{content_id}>"))?;
    }
    headers.add(
        "Content-Disposition",
        format!("attachment; filename=\"{}\"", quote(&attachment.filename)),
    )?;
    Ok(Part::new(headers, Body::Encoded(encode_base64_wrapped(&attachment.data))))
}

fn quote(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn base() -> MessageBuilder {
        MessageBuilder::new()
            .from("Sender <sender@example.com>")
            .to("a@example.com")
            .subject("Report")
            .seed(7)
    }

    #[test]
    fn test_requires_sender_and_body() {
        let err = MessageBuilder::new().text_body("x").build().unwrap_err();
        assert!(matches!(err, Error::MissingHeader(_)));

        let err = MessageBuilder::new().from("a@example.com").build().unwrap_err();
        assert!(matches!(err, Error::EmptyBody));
    }

    #[test]
    fn test_text_only_is_single_part() {
        let message = base().text_body("hello").build().unwrap();
        let ct = message.root().content_type().unwrap();
        assert_eq!(ct.essence(), "text/plain");
        assert_eq!(message.text_body().as_deref(), Some("hello"));
    }

    #[test]
    fn test_alternative_inside_related() {
        let message = base()
            .text_body("plain")
            .html_body("<img src=\"cid:logo\">")
            .inline(InlinePart::new(
                "logo",
                ContentType::from_extension("image", "png"),
                vec![1, 2, 3],
            ))
            .build()
            .unwrap();

        let root = message.root();
        assert_eq!(root.content_type().unwrap().essence(), "multipart/related");
        assert_eq!(
            root.parts()[0].content_type().unwrap().essence(),
            "multipart/alternative"
        );
        let logo = message.find_content_id("logo").unwrap();
        assert_eq!(logo.decode_body().unwrap(), vec![1, 2, 3]);
        assert_eq!(
            logo.headers.get("content-disposition"),
            Some("inline; filename=\"logo\"")
        );
    }

    #[test]
    fn test_attachments_wrap_in_mixed() {
        let message = base()
            .html_body("<p>hi</p>")
            .attach(Attachment::new(
                "report.pdf",
                ContentType::from_extension("application", "pdf"),
                b"%PDF".to_vec(),
            ))
            .build()
            .unwrap();

        let root = message.root();
        assert_eq!(root.content_type().unwrap().essence(), "multipart/mixed");
        assert_eq!(root.parts().len(), 2);
        assert_eq!(root.parts()[0].content_type().unwrap().essence(), "text/html");
        assert!(message.to_string().contains("attachment; filename=\"report.pdf\""));
    }

    #[test]
    fn test_bcc_only_on_envelope() {
        let message = base()
            .cc("c@example.com")
            .bcc("hidden@example.com")
            .text_body("x")
            .build()
            .unwrap();

        assert!(message.headers().get("bcc").is_none());
        assert!(!message.to_string().contains("hidden@example.com"));
        assert_eq!(
            message.envelope_recipients(),
            ["a@example.com", "c@example.com", "hidden@example.com"]
        );
    }

    #[test]
    fn test_seed_is_reproducible() {
        let date = DateTime::parse_from_rfc2822("Tue, 1 Jul 2025 10:00:00 +0000").unwrap();
        let first = base().date(date).message_id("id@x").html_body("<p>x</p>").text_body("x");
        let second = first.clone();
        assert_eq!(first.build().unwrap().to_string(), second.build().unwrap().to_string());
    }

    #[test]
    fn test_generated_message_id_uses_sender_domain() {
        let message = base().text_body("x").build().unwrap();
        assert!(message.message_id().unwrap().ends_with("@example.com>"));
    }

    #[test]
    fn test_non_ascii_subject_is_encoded() {
        let message = base().subject("Grüße").text_body("x").build().unwrap();
        assert!(message.subject().unwrap().starts_with("=?utf-8?B?"));
    }
}
