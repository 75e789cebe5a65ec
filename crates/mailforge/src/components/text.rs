//! Text blocks: headers, subheaders and paragraphs.

use tracing::trace;

use super::Base;
use crate::error::Result;
use crate::markup::parse_text;
use crate::render::{Element, PlainContext, RenderContext};
use crate::style::StyleTable;

/// Kind of text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeafKind {
    /// Top-level heading (`<h1>`).
    Header,
    /// Second-level heading (`<h2>`).
    SubHeader,
    /// Body paragraph (`<p>`), with inline markup.
    Paragraph,
}

impl LeafKind {
    /// Selector key matching this kind.
    #[must_use]
    pub const fn category(self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::SubHeader => "subheader",
            Self::Paragraph => "paragraph",
        }
    }

    /// HTML element name.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Header => "h1",
            Self::SubHeader => "h2",
            Self::Paragraph => "p",
        }
    }
}

/// A block of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    base: Base,
    kind: LeafKind,
    content: String,
}

impl Leaf {
    /// Creates a text block of the given kind.
    #[must_use]
    pub fn new(kind: LeafKind, content: impl Into<String>) -> Self {
        Self {
            base: Base::new(&[kind.category()]),
            kind,
            content: content.into(),
        }
    }

    /// Creates a header.
    #[must_use]
    pub fn header(content: impl Into<String>) -> Self {
        Self::new(LeafKind::Header, content)
    }

    /// Creates a subheader.
    #[must_use]
    pub fn subheader(content: impl Into<String>) -> Self {
        Self::new(LeafKind::SubHeader, content)
    }

    /// Creates a paragraph.
    #[must_use]
    pub fn paragraph(content: impl Into<String>) -> Self {
        Self::new(LeafKind::Paragraph, content)
    }

    /// Kind of block.
    #[must_use]
    pub const fn kind(&self) -> LeafKind {
        self.kind
    }

    /// Raw text, before inline markup is applied.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}

styled!(Leaf => base);

impl Element for Leaf {
    fn keys(&self) -> &[String] {
        self.base.keys()
    }

    fn html(&self, _ctx: &mut RenderContext, inherited: &StyleTable) -> Result<String> {
        let resolved = self.base.resolve(inherited);
        let tag = self.kind.tag();
        trace!(tag, attributes = resolved.len(), "Rendering text block");

        let body = match self.kind {
            LeafKind::Paragraph => parse_text(&self.content),
            LeafKind::Header | LeafKind::SubHeader => self.content.clone(),
        };
        Ok(format!("{}{body}</{tag}>", self.base.open_tag(tag, &resolved)))
    }

    fn plain(&self, _ctx: &PlainContext) -> String {
        match self.kind {
            LeafKind::Header => format!("# {} #\n\n", self.content),
            LeafKind::SubHeader => format!("## {} ##\n\n", self.content),
            LeafKind::Paragraph => format!("{}\n", self.content),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::components::Styled;

    #[test]
    fn test_keys_end_with_category() {
        assert_eq!(Leaf::header("x").keys(), ["global", "header"]);
        assert_eq!(Leaf::paragraph("x").keys(), ["global", "paragraph"]);
    }

    #[test]
    fn test_paragraph_html_applies_markup() {
        let table = StyleTable::new().with_rule("paragraph", [("margin-bottom", "12px")]);
        let html = Leaf::paragraph("a **b**")
            .html(&mut RenderContext::default(), &table)
            .unwrap();
        assert_eq!(html, "<p style=\"margin-bottom: 12px !important;\">a <b>b</b></p>");
    }

    #[test]
    fn test_local_style_wins() {
        let table = StyleTable::email_defaults();
        let html = Leaf::header("Title")
            .style("font-size", "30px")
            .html(&mut RenderContext::default(), &table)
            .unwrap();
        assert!(html.starts_with("<h1 style=\""));
        assert!(html.contains("font-size: 30px !important;"));
        assert!(!html.contains("48px"));
    }

    #[test]
    fn test_plain_shapes() {
        let ctx = PlainContext::default();
        assert_eq!(Leaf::header("Hi").plain(&ctx), "# Hi #\n\n");
        assert_eq!(Leaf::subheader("Hi").plain(&ctx), "## Hi ##\n\n");
        assert_eq!(Leaf::paragraph("*Hi*").plain(&ctx), "*Hi*\n");
    }
}
