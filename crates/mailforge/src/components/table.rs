//! Layout tables.

use super::container::line_break;
use super::{Child, Container, Styled, row};
use crate::error::Result;
use crate::render::{Element, PlainContext, RenderContext};
use crate::style::StyleTable;

/// A `<table>` whose children are rows.
///
/// Generic containers already render as rows in table mode; every other
/// child is wrapped in a single-cell row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    container: Container,
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

impl Table {
    /// Creates a full-width table without padding or spacing.
    #[must_use]
    pub fn new() -> Self {
        Self {
            container: Container::with_categories(&["container", "table"]),
        }
        .property("width", "100%")
        .property("cellpadding", "0")
        .property("cellspacing", "0")
    }

    /// Appends a row.
    pub fn push(&mut self, child: impl Into<Child>) {
        self.container.push(child);
    }

    /// Builder-style [`Table::push`].
    #[must_use]
    pub fn child(mut self, child: impl Into<Child>) -> Self {
        self.push(child);
        self
    }

    /// Rows in order.
    #[must_use]
    pub fn children(&self) -> &[Child] {
        self.container.children()
    }
}

styled!(Table => container.base);

impl Element for Table {
    fn keys(&self) -> &[String] {
        self.container.base.keys()
    }

    fn html(&self, ctx: &mut RenderContext, inherited: &StyleTable) -> Result<String> {
        let resolved = self.container.base.resolve(inherited);
        let rows = self
            .container
            .render_children(ctx, inherited, &resolved, |child, html, ctx| {
                row(child, ctx, line_break(child, html))
            })?;
        Ok(format!("{}{rows}</table>", self.container.base.open_tag("table", &resolved)))
    }

    fn plain(&self, ctx: &PlainContext) -> String {
        self.container.plain_children(ctx)
    }
}
