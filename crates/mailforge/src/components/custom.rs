//! Raw passthrough node.

use super::Base;
use crate::error::Result;
use crate::render::{Element, PlainContext, RenderContext};
use crate::style::StyleTable;

/// Pre-rendered HTML and plain text, emitted verbatim.
///
/// Style is neither resolved nor applied; the node only carries keys so it
/// can sit anywhere in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Custom {
    base: Base,
    html: String,
    plain: String,
}

impl Custom {
    /// Creates a passthrough node.
    #[must_use]
    pub fn new(html: impl Into<String>, plain: impl Into<String>) -> Self {
        Self {
            base: Base::new(&["custom"]),
            html: html.into(),
            plain: plain.into(),
        }
    }
}

styled!(Custom => base);

impl Element for Custom {
    fn keys(&self) -> &[String] {
        self.base.keys()
    }

    fn html(&self, _ctx: &mut RenderContext, _inherited: &StyleTable) -> Result<String> {
        Ok(self.html.clone())
    }

    fn plain(&self, _ctx: &PlainContext) -> String {
        self.plain.clone()
    }
}
