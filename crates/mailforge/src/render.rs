//! Render capability and per-pass context.
//!
//! Nodes never store render state. Everything a pass needs (options,
//! attachment registry, current indentation) travels through these context
//! values, so one tree can be rendered repeatedly or from several threads.

use crate::attachment::AttachmentRegistry;
use crate::config::RenderOptions;
use crate::error::Result;
use crate::style::StyleTable;

/// State shared by every node during one HTML pass.
#[derive(Debug)]
pub struct RenderContext {
    options: RenderOptions,
    attachments: AttachmentRegistry,
}

impl RenderContext {
    /// Starts a pass with an empty attachment registry.
    #[must_use]
    pub fn new(options: RenderOptions) -> Self {
        let attachments = AttachmentRegistry::new(options.content_id_policy);
        Self {
            options,
            attachments,
        }
    }

    /// Options of this pass.
    #[must_use]
    pub const fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Whether containers render as table rows.
    #[must_use]
    pub const fn table_mode(&self) -> bool {
        self.options.table_mode
    }

    /// Registers a binary part and returns the id markup must reference.
    pub fn attach(
        &mut self,
        content: &[u8],
        media_type: &str,
        extension: &str,
        content_id: Option<&str>,
    ) -> String {
        self.attachments.attach(content, media_type, extension, content_id)
    }

    /// Attachments registered so far.
    #[must_use]
    pub const fn attachments(&self) -> &AttachmentRegistry {
        &self.attachments
    }

    /// Ends the pass, returning the registry.
    #[must_use]
    pub fn into_attachments(self) -> AttachmentRegistry {
        self.attachments
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

/// Indentation state for the plain-text walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainContext {
    indent: String,
    tab_size: usize,
}

impl PlainContext {
    /// Root context with no indentation.
    #[must_use]
    pub const fn new(tab_size: usize) -> Self {
        Self {
            indent: String::new(),
            tab_size,
        }
    }

    /// Current indentation prefix.
    #[must_use]
    pub fn indent(&self) -> &str {
        &self.indent
    }

    /// Spaces per list level.
    #[must_use]
    pub const fn tab_size(&self) -> usize {
        self.tab_size
    }

    /// Same settings with a different indentation.
    #[must_use]
    pub fn with_indent(&self, indent: impl Into<String>) -> Self {
        Self {
            indent: indent.into(),
            tab_size: self.tab_size,
        }
    }

    /// Current indentation plus one list level.
    #[must_use]
    pub fn tabbed(&self) -> String {
        format!("{}{}", self.indent, " ".repeat(self.tab_size))
    }
}

impl Default for PlainContext {
    fn default() -> Self {
        Self::new(RenderOptions::default().tab_size)
    }
}

/// Something that renders to HTML and plain text.
pub trait Element {
    /// Selector keys this element matches, most general first.
    fn keys(&self) -> &[String];

    /// Renders HTML against the inherited style table.
    ///
    /// # Errors
    ///
    /// Returns an error if a resource (such as an image file) cannot be read.
    fn html(&self, ctx: &mut RenderContext, inherited: &StyleTable) -> Result<String>;

    /// Renders the plain-text fallback.
    fn plain(&self, ctx: &PlainContext) -> String;
}
