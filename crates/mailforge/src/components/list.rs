//! Ordered and unordered lists.
//!
//! In plain text every item starts on a marker line indented one tab past the
//! enclosing level. Nested lists of the same kind continue the marker scheme
//! (`2.1.` for ordered lists, the bare decorator for unordered ones); any
//! other nested container hangs under its marker.

use super::container::NESTED_TABLE;
use super::{Child, Container, Node};
use crate::error::Result;
use crate::render::{Element, PlainContext, RenderContext};
use crate::style::StyleTable;

/// A row cannot sit directly in `<li>`, so it gets its own table.
fn list_item(child: &Child, html: String, ctx: &RenderContext) -> String {
    if child.is_row(ctx) {
        format!("<li>{NESTED_TABLE}{html}</table></li>")
    } else {
        format!("<li>{html}</li>")
    }
}

/// Renders a nested container so its first line follows `marker` and the
/// rest align under the text after it.
fn hanging(node: &Node, ctx: &PlainContext, tab: &str, marker: &str) -> String {
    let hang = format!("{tab}{}", " ".repeat(marker.chars().count() + 1));
    let plain = node.plain(&ctx.with_indent(hang.as_str()));
    if plain.is_empty() {
        return format!("{tab}{marker}\n");
    }
    let rest = plain.strip_prefix(hang.as_str()).unwrap_or(&plain);
    format!("{tab}{marker} {rest}")
}

/// A single-line item: leaf plain text loses its trailing blank lines.
fn item(tab: &str, marker: &str, text: &str) -> String {
    format!("{tab}{marker} {}\n", text.trim_end_matches('\n'))
}

/// Numbered list (`<ol>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedList {
    container: Container,
}

impl Default for OrderedList {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderedList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            container: Container::with_categories(&["container", "list"]),
        }
    }

    /// Appends an item.
    pub fn push(&mut self, child: impl Into<Child>) {
        self.container.push(child);
    }

    /// Builder-style [`OrderedList::push`].
    #[must_use]
    pub fn child(mut self, child: impl Into<Child>) -> Self {
        self.push(child);
        self
    }

    /// Items in order.
    #[must_use]
    pub fn children(&self) -> &[Child] {
        self.container.children()
    }

    /// Plain text with every marker prefixed by `prefix` (`"2."` for a list
    /// nested as the second item of another).
    #[must_use]
    pub fn plain_numbered(&self, ctx: &PlainContext, prefix: &str) -> String {
        let tab = ctx.tabbed();
        let mut plain = String::new();
        for (index, child) in self.container.children.iter().enumerate() {
            let marker = format!("{prefix}{}.", index + 1);
            let line = match child {
                Child::Node(Node::OrderedList(list)) => {
                    list.plain_numbered(&ctx.with_indent(tab.as_str()), &marker)
                }
                Child::Node(node) if node.is_container() => hanging(node, ctx, &tab, &marker),
                Child::Node(node) => item(&tab, &marker, &node.plain(ctx)),
                Child::Text(text) => item(&tab, &marker, text),
            };
            plain.push_str(&line);
        }
        plain
    }
}

styled!(OrderedList => container.base);

impl Element for OrderedList {
    fn keys(&self) -> &[String] {
        self.container.base.keys()
    }

    fn html(&self, ctx: &mut RenderContext, inherited: &StyleTable) -> Result<String> {
        let resolved = self.container.base.resolve(inherited);
        let items = self
            .container
            .render_children(ctx, inherited, &resolved, list_item)?;
        Ok(format!("{}{items}</ol>", self.container.base.open_tag("ol", &resolved)))
    }

    fn plain(&self, ctx: &PlainContext) -> String {
        self.plain_numbered(ctx, "")
    }
}

/// Bulleted list (`<ul>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnorderedList {
    container: Container,
    decorator: String,
}

impl Default for UnorderedList {
    fn default() -> Self {
        Self::new()
    }
}

impl UnorderedList {
    /// Creates an empty list using `*` as the plain-text bullet.
    #[must_use]
    pub fn new() -> Self {
        Self {
            container: Container::with_categories(&["container", "list"]),
            decorator: "*".to_string(),
        }
    }

    /// Replaces the plain-text bullet.
    #[must_use]
    pub fn decorator(mut self, decorator: impl Into<String>) -> Self {
        self.decorator = decorator.into();
        self
    }

    /// Appends an item.
    pub fn push(&mut self, child: impl Into<Child>) {
        self.container.push(child);
    }

    /// Builder-style [`UnorderedList::push`].
    #[must_use]
    pub fn child(mut self, child: impl Into<Child>) -> Self {
        self.push(child);
        self
    }

    /// Items in order.
    #[must_use]
    pub fn children(&self) -> &[Child] {
        self.container.children()
    }
}

styled!(UnorderedList => container.base);

impl Element for UnorderedList {
    fn keys(&self) -> &[String] {
        self.container.base.keys()
    }

    fn html(&self, ctx: &mut RenderContext, inherited: &StyleTable) -> Result<String> {
        let resolved = self.container.base.resolve(inherited);
        let items = self
            .container
            .render_children(ctx, inherited, &resolved, list_item)?;
        Ok(format!("{}{items}</ul>", self.container.base.open_tag("ul", &resolved)))
    }

    fn plain(&self, ctx: &PlainContext) -> String {
        let tab = ctx.tabbed();
        let marker = self.decorator.as_str();
        let mut plain = String::new();
        for child in &self.container.children {
            let line = match child {
                Child::Node(Node::UnorderedList(list)) => list.plain(&ctx.with_indent(tab.as_str())),
                Child::Node(node) if node.is_container() => hanging(node, ctx, &tab, marker),
                Child::Node(node) => item(&tab, marker, &node.plain(ctx)),
                Child::Text(text) => item(&tab, marker, text),
            };
            plain.push_str(&line);
        }
        plain
    }
}
