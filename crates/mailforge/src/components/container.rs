//! Generic block container and the cascade shared by every composite node.

use tracing::trace;

use super::{Base, Child, Node, row};
use crate::error::Result;
use crate::render::{Element, PlainContext, RenderContext};
use crate::style::{Declarations, GLOBAL, PROMOTED_ATTRIBUTES, StyleTable};

pub(super) const NESTED_TABLE: &str = "<table width=\"100%\" cellpadding=\"0\" cellspacing=\"0\">";

/// Ordered children under a `<div>`, or a table row in table mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub(super) base: Base,
    pub(super) children: Vec<Child>,
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Container {
    /// Creates an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::with_categories(&["container"])
    }

    pub(crate) fn with_categories(categories: &[&str]) -> Self {
        Self {
            base: Base::new(categories),
            children: Vec::new(),
        }
    }

    /// Appends a child.
    pub fn push(&mut self, child: impl Into<Child>) {
        self.children.push(child.into());
    }

    /// Builder-style [`Container::push`].
    #[must_use]
    pub fn child(mut self, child: impl Into<Child>) -> Self {
        self.push(child);
        self
    }

    /// Appends every child of `children`.
    pub fn extend<I>(&mut self, children: I)
    where
        I: IntoIterator,
        I::Item: Into<Child>,
    {
        self.children.extend(children.into_iter().map(Into::into));
    }

    /// Children in order.
    #[must_use]
    pub fn children(&self) -> &[Child] {
        &self.children
    }

    /// Number of children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns `true` when the container has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// The table children render against.
    ///
    /// Every category key of this container is bound to its local style, and
    /// the typographic attributes of `resolved` are promoted into `"global"`
    /// so leaves of any category pick them up.
    #[must_use]
    pub fn derive_table(&self, inherited: &StyleTable, resolved: &Declarations) -> StyleTable {
        let mut derived = inherited.clone();
        for key in self.base.keys().iter().filter(|key| key.as_str() != GLOBAL) {
            derived.set(key.as_str(), self.base.style().clone());
        }

        let global = derived.rule_mut(GLOBAL);
        for attribute in PROMOTED_ATTRIBUTES {
            if let Some(value) = resolved.get(attribute) {
                global.set(attribute, value);
            }
        }
        derived
    }

    /// Renders every child against the derived table. `wrap` receives each
    /// child with its markup (the raw text for text children).
    pub(crate) fn render_children<F>(
        &self,
        ctx: &mut RenderContext,
        inherited: &StyleTable,
        resolved: &Declarations,
        mut wrap: F,
    ) -> Result<String>
    where
        F: FnMut(&Child, String, &RenderContext) -> String,
    {
        let derived = self.derive_table(inherited, resolved);
        let mut html = String::new();
        for child in &self.children {
            let rendered = match child {
                Child::Node(node) => node.html(ctx, &derived)?,
                Child::Text(text) => text.clone(),
            };
            html.push_str(&wrap(child, rendered, ctx));
        }
        Ok(html)
    }

    /// Plain text of the children at the current indentation.
    pub(crate) fn plain_children(&self, ctx: &PlainContext) -> String {
        let indent = ctx.indent();
        let mut plain = String::new();
        for child in &self.children {
            match child {
                Child::Node(node) if node.is_container() => plain.push_str(&node.plain(ctx)),
                Child::Node(node) => {
                    plain.push_str(indent);
                    plain.push_str(&node.plain(ctx));
                    plain.push('\n');
                }
                Child::Text(text) => {
                    plain.push_str(indent);
                    plain.push_str(text);
                    plain.push('\n');
                }
            }
        }
        plain
    }

    fn has_container_child(&self) -> bool {
        self.children
            .iter()
            .any(|child| matches!(child, Child::Node(Node::Container(_))))
    }
}

/// Text children end with a line break; node markup passes through.
pub(crate) fn line_break(child: &Child, html: String) -> String {
    match child {
        Child::Text(_) => format!("{html}<br/>"),
        Child::Node(_) => html,
    }
}

styled!(Container => base);

impl Element for Container {
    fn keys(&self) -> &[String] {
        self.base.keys()
    }

    fn html(&self, ctx: &mut RenderContext, inherited: &StyleTable) -> Result<String> {
        let resolved = self.base.resolve(inherited);
        trace!(children = self.children.len(), table_mode = ctx.table_mode(), "Rendering container");

        if !ctx.table_mode() {
            let body = self.render_children(ctx, inherited, &resolved, |child, html, _| {
                line_break(child, html)
            })?;
            return Ok(format!("{}{body}</div>", self.base.open_tag("div", &resolved)));
        }

        let cell = self.base.open_tag("td", &resolved);
        if self.has_container_child() {
            let rows = self.render_children(ctx, inherited, &resolved, |child, html, ctx| {
                row(child, ctx, line_break(child, html))
            })?;
            Ok(format!("<tr>{cell}{NESTED_TABLE}{rows}</table></td></tr>"))
        } else {
            let body = self.render_children(ctx, inherited, &resolved, |child, html, _| {
                line_break(child, html)
            })?;
            Ok(format!("<tr>{cell}{body}</td></tr>"))
        }
    }

    fn plain(&self, ctx: &PlainContext) -> String {
        self.plain_children(ctx)
    }
}
