//! The root of an e-mail: addressing, style table, top-level items and
//! attachments.

use indexmap::IndexMap;
use mailforge_mime::{Attachment as MimeAttachment, InlinePart, Message, MessageBuilder};
use tracing::{debug, info};

use crate::attachment::{Attachment, AttachmentRegistry};
use crate::components::{Child, row};
use crate::config::{Config, RenderOptions};
use crate::error::Result;
use crate::export::{DraftExporter, DraftOutcome};
use crate::markup::{open_tag, parse_text};
use crate::render::{Element, PlainContext, RenderContext};
use crate::style::StyleTable;

/// Keys the outer table of a table-mode body is styled from.
const BODY_KEYS: [&str; 2] = ["body", "root"];

/// Output of one HTML pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// The HTML body.
    pub html: String,
    /// Every part the body references through `cid:`.
    pub attachments: AttachmentRegistry,
}

/// An e-mail under construction.
///
/// ```
/// use mailforge::{Document, Leaf};
///
/// let mut email = Document::new("Weekly digest", "news@example.com")
///     .to("reader@example.com");
/// email.append(Leaf::header("Hello"));
/// email.append("Plain *text* line");
///
/// assert!(email.html().unwrap().starts_with("<h1"));
/// assert_eq!(email.plain(), "# Hello #\n\nPlain *text* line\n");
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    subject: String,
    sender: String,
    to: Vec<String>,
    cc: Vec<String>,
    bcc: Vec<String>,
    style: StyleTable,
    options: RenderOptions,
    items: Vec<Child>,
    attachments: AttachmentRegistry,
    files: AttachmentRegistry,
}

impl Document {
    /// Creates an empty document using the default style table.
    #[must_use]
    pub fn new(subject: impl Into<String>, sender: impl Into<String>) -> Self {
        let options = RenderOptions::default();
        Self {
            subject: subject.into(),
            sender: sender.into(),
            to: Vec::new(),
            cc: Vec::new(),
            bcc: Vec::new(),
            style: StyleTable::email_defaults(),
            attachments: AttachmentRegistry::new(options.content_id_policy),
            files: AttachmentRegistry::new(options.content_id_policy),
            options,
            items: Vec::new(),
        }
    }

    /// Adds a `To` recipient.
    #[must_use]
    pub fn to(mut self, address: impl Into<String>) -> Self {
        self.to.push(address.into());
        self
    }

    /// Adds a `Cc` recipient.
    #[must_use]
    pub fn cc(mut self, address: impl Into<String>) -> Self {
        self.cc.push(address.into());
        self
    }

    /// Adds a blind-copy recipient. It reaches the envelope only.
    #[must_use]
    pub fn bcc(mut self, address: impl Into<String>) -> Self {
        self.bcc.push(address.into());
        self
    }

    /// Merges `overrides` over the current style table.
    #[must_use]
    pub fn with_style(mut self, overrides: &StyleTable) -> Self {
        self.style.merge(overrides);
        self
    }

    /// Replaces the render options.
    ///
    /// File attachments added so far are re-registered under the new
    /// content-id policy.
    #[must_use]
    pub fn with_options(mut self, options: RenderOptions) -> Self {
        let policy = options.content_id_policy;
        let mut files = AttachmentRegistry::new(policy);
        for entry in std::mem::take(&mut self.files).into_entries() {
            files.attach(
                &entry.content,
                &entry.media_type,
                &entry.extension,
                Some(entry.content_id.as_str()),
            );
        }
        self.files = files;
        self.attachments = AttachmentRegistry::new(policy);
        self.options = options;
        self
    }

    /// Applies a loaded [`Config`]: its options, and its style merged over
    /// the current table.
    #[must_use]
    pub fn with_config(self, config: &Config) -> Self {
        self.with_options(config.options.clone()).with_style(&config.style)
    }

    /// Appends a top-level node or line of text.
    pub fn append(&mut self, item: impl Into<Child>) {
        self.items.push(item.into());
    }

    /// Adds a file attachment that no markup references, returning its
    /// content-id. Identical bytes are stored once.
    pub fn attach(
        &mut self,
        content: &[u8],
        media_type: &str,
        extension: &str,
        content_id: Option<&str>,
    ) -> String {
        self.files.attach(content, media_type, extension, content_id)
    }

    /// Subject line.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Sender address.
    #[must_use]
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// The style table items render against.
    #[must_use]
    pub const fn style(&self) -> &StyleTable {
        &self.style
    }

    /// Active render options.
    #[must_use]
    pub const fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Top-level items in order.
    #[must_use]
    pub fn items(&self) -> &[Child] {
        &self.items
    }

    /// Parts referenced by the last [`Document::html`] call.
    #[must_use]
    pub const fn attachments(&self) -> &AttachmentRegistry {
        &self.attachments
    }

    /// Out-of-band file attachments.
    #[must_use]
    pub fn files(&self) -> &[Attachment] {
        self.files.entries()
    }

    /// Renders the HTML body without touching the document.
    ///
    /// # Errors
    ///
    /// Returns an error if any item fails to render, typically an image
    /// whose file cannot be read.
    pub fn render(&self) -> Result<Rendered> {
        let mut ctx = RenderContext::new(self.options.clone());
        let table_mode = ctx.table_mode();
        let mut body = String::new();

        for item in &self.items {
            let html = match item {
                Child::Node(node) => node.html(&mut ctx, &self.style)?,
                Child::Text(text) => format!("{}<br/>", parse_text(text)),
            };
            if table_mode {
                body.push_str(&row(item, &ctx, html));
            } else {
                body.push_str(&html);
            }
        }

        if table_mode {
            let mut properties = IndexMap::new();
            properties.insert("width".to_string(), "100%".to_string());
            properties.insert("cellpadding".to_string(), "0".to_string());
            properties.insert("cellspacing".to_string(), "0".to_string());
            let resolved = self.style.resolve(&BODY_KEYS);
            body = format!("{}{body}</table>", open_tag("table", &resolved, &properties));
        }

        let attachments = ctx.into_attachments();
        debug!(
            items = self.items.len(),
            bytes = body.len(),
            attachments = attachments.len(),
            "Rendered HTML body"
        );
        Ok(Rendered {
            html: body,
            attachments,
        })
    }

    /// Renders the HTML body, replacing the attachment registry with the
    /// parts this pass referenced.
    ///
    /// # Errors
    ///
    /// See [`Document::render`].
    pub fn html(&mut self) -> Result<String> {
        self.attachments.clear();
        let rendered = self.render()?;
        self.attachments = rendered.attachments;
        Ok(rendered.html)
    }

    /// Renders the plain-text fallback.
    #[must_use]
    pub fn plain(&self) -> String {
        let ctx = PlainContext::new(self.options.tab_size);
        let mut plain = String::new();
        for item in &self.items {
            match item {
                Child::Node(node) => plain.push_str(&node.plain(&ctx)),
                Child::Text(text) => {
                    plain.push_str(text);
                    plain.push('\n');
                }
            }
        }
        plain
    }

    /// Assembles the complete MIME message: plain and HTML alternatives,
    /// referenced images as inline parts, and file attachments.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails or the message cannot be built
    /// (for instance, an empty sender).
    pub fn message(&mut self) -> Result<Message> {
        let html = self.html()?;
        let mut builder = MessageBuilder::new()
            .from(self.sender.as_str())
            .subject(self.subject.as_str())
            .text_body(self.plain())
            .html_body(html);

        for address in &self.to {
            builder = builder.to(address.as_str());
        }
        for address in &self.cc {
            builder = builder.cc(address.as_str());
        }
        for address in &self.bcc {
            builder = builder.bcc(address.as_str());
        }
        for part in self.attachments.entries() {
            builder = builder.inline(InlinePart::new(
                part.content_id.as_str(),
                part.content_type.clone(),
                part.content.clone(),
            ));
        }
        for file in self.files.entries() {
            builder = builder.attach(
                MimeAttachment::new(file.filename(), file.content_type.clone(), file.content.clone())
                    .with_content_id(file.content_id.as_str()),
            );
        }

        let message = builder.build()?;
        info!(
            subject = self.subject.as_str(),
            inline = self.attachments.len(),
            files = self.files.len(),
            "Message assembled"
        );
        Ok(message)
    }

    /// Serializes the assembled message with CRLF line endings.
    ///
    /// # Errors
    ///
    /// See [`Document::message`].
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        Ok(self.message()?.to_bytes())
    }

    /// Hands the assembled message to `exporter` as a draft.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be assembled or the exporter
    /// fails to write it.
    pub fn export(&mut self, exporter: &dyn DraftExporter) -> Result<DraftOutcome> {
        let message = self.message()?;
        exporter.export(&message)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::attachment::ContentIdPolicy;
    use crate::components::{Container, Image, Leaf, Styled};

    fn distinct() -> RenderOptions {
        RenderOptions {
            content_id_policy: ContentIdPolicy::Distinct,
            ..RenderOptions::default()
        }
    }

    #[test]
    fn test_file_attachments_follow_policy() {
        let mut canonical = Document::new("s", "a@example.com");
        assert_eq!(canonical.attach(b"same", "text", "csv", Some("a")), "a");
        assert_eq!(canonical.attach(b"same", "text", "csv", Some("b")), "a");
        assert_eq!(canonical.files().len(), 1);

        let mut distinct = Document::new("s", "a@example.com").with_options(distinct());
        assert_eq!(distinct.attach(b"same", "text", "csv", Some("a")), "a");
        assert_eq!(distinct.attach(b"same", "text", "csv", Some("b")), "b");
        assert_eq!(distinct.files().len(), 2);
    }

    #[test]
    fn test_with_options_keeps_earlier_files() {
        let mut email = Document::new("s", "a@example.com");
        email.attach(b"report", "application", "pdf", Some("report"));

        let mut email = email.with_options(distinct());
        assert_eq!(email.files().len(), 1);
        assert_eq!(email.files()[0].content_id, "report");
        assert_eq!(email.files()[0].content_type.essence(), "application/pdf");
        assert_eq!(email.attach(b"report", "application", "pdf", Some("copy")), "copy");
        assert_eq!(email.files().len(), 2);
    }

    #[test]
    fn test_text_items() {
        let mut email = Document::new("s", "a@example.com");
        email.append("**hi**");
        assert_eq!(email.html().unwrap(), "<b>hi</b><br/>");
        assert_eq!(email.plain(), "**hi**\n");
    }

    #[test]
    fn test_style_overrides_merge_per_attribute() {
        let overrides = StyleTable::new().with_rule("header", [("color", "navy")]);
        let email = Document::new("s", "a@example.com").with_style(&overrides);
        let header = email.style().get("header").unwrap();
        assert_eq!(header.get("color"), Some("navy"));
        assert_eq!(header.get("font-size"), Some("48px"));
    }

    #[test]
    fn test_registry_rebuilt_each_pass() {
        let mut email = Document::new("s", "a@example.com");
        email.append(Image::from_bytes(b"png".to_vec(), "png").alt("x"));
        email.html().unwrap();
        email.html().unwrap();
        assert_eq!(email.attachments().len(), 1);
    }

    #[test]
    fn test_table_mode_body_wrapper() {
        let mut email = Document::new("s", "a@example.com").with_options(RenderOptions {
            table_mode: true,
            ..RenderOptions::default()
        });
        email.append(Container::new().style("padding", "4px").child("row"));
        email.append(Leaf::paragraph("loose"));

        let html = email.html().unwrap();
        assert!(html.starts_with(
            "<table style=\"background-color: #FFFFFF !important;\" \
             width=\"100%\" cellpadding=\"0\" cellspacing=\"0\"><tr><td style=\""
        ));
        assert!(html.contains("<tr><td><p style="));
        assert!(html.ends_with("</p></td></tr></table>"));
    }

    #[test]
    fn test_out_of_band_files_are_separate() {
        let mut email = Document::new("s", "a@example.com");
        let id = email.attach(b"%PDF", "application", "pdf", Some("report"));
        assert_eq!(id, "report");
        email.append("body");
        email.html().unwrap();

        assert!(email.attachments().is_empty());
        assert_eq!(email.files().len(), 1);
        assert_eq!(email.files()[0].filename(), "report.pdf");
    }
}
