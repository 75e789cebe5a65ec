//! Renderable nodes of the e-mail content tree.
//!
//! The node set is closed: [`Node`] enumerates every kind and dispatches
//! through [`Element`]. Leaf kinds live in [`text`], [`image`] and
//! [`custom`]; composite kinds in [`container`], [`list`] and [`table`].

/// Implements [`Styled`] for a node type by naming the path to its [`Base`].
macro_rules! styled {
    ($type:ty => $($path:ident).+) => {
        impl $crate::components::Styled for $type {
            fn base(&self) -> &$crate::components::Base {
                &self.$($path).+
            }

            fn base_mut(&mut self) -> &mut $crate::components::Base {
                &mut self.$($path).+
            }
        }
    };
}

pub mod container;
pub mod custom;
pub mod image;
pub mod list;
pub mod table;
pub mod text;

use indexmap::IndexMap;

use crate::error::Result;
use crate::markup::open_tag;
use crate::render::{Element, PlainContext, RenderContext};
use crate::style::{Declarations, GLOBAL, StyleTable};

pub use container::Container;
pub use custom::Custom;
pub use image::{Image, ImageSource};
pub use list::{OrderedList, UnorderedList};
pub use table::Table;
pub use text::{Leaf, LeafKind};

/// State every node carries: local style, markup attributes and selector
/// keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Base {
    style: Declarations,
    properties: IndexMap<String, String>,
    keys: Vec<String>,
}

impl Base {
    /// Keys are `"global"` followed by `categories`.
    pub(crate) fn new(categories: &[&str]) -> Self {
        let keys = std::iter::once(GLOBAL)
            .chain(categories.iter().copied())
            .map(str::to_string)
            .collect();
        Self {
            style: Declarations::new(),
            properties: IndexMap::new(),
            keys,
        }
    }

    /// Local style overrides.
    #[must_use]
    pub const fn style(&self) -> &Declarations {
        &self.style
    }

    /// Extra markup attributes.
    #[must_use]
    pub const fn properties(&self) -> &IndexMap<String, String> {
        &self.properties
    }

    /// Selector keys, most general first.
    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Inherited rules matching this node's keys, then local overrides.
    #[must_use]
    pub fn resolve(&self, inherited: &StyleTable) -> Declarations {
        inherited.resolve(&self.keys).overlaid(&self.style)
    }

    pub(crate) fn open_tag(&self, name: &str, resolved: &Declarations) -> String {
        open_tag(name, resolved, &self.properties)
    }
}

/// Builder methods shared by every node type.
pub trait Styled: Sized {
    /// Shared node state.
    fn base(&self) -> &Base;

    /// Mutable shared node state.
    fn base_mut(&mut self) -> &mut Base;

    /// Sets one local style attribute.
    #[must_use]
    fn style(mut self, attribute: impl Into<String>, value: impl Into<String>) -> Self {
        self.base_mut().style.set(attribute, value);
        self
    }

    /// Applies a block of local style attributes.
    #[must_use]
    fn with_style(mut self, declarations: impl Into<Declarations>) -> Self {
        self.base_mut().style.apply(&declarations.into());
        self
    }

    /// Sets a markup attribute such as `width` or `align`.
    #[must_use]
    fn property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.base_mut().properties.insert(name.into(), value.into());
        self
    }

    /// Adds a custom selector key after the built-in ones.
    #[must_use]
    fn category(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        let keys = &mut self.base_mut().keys;
        if !keys.contains(&key) {
            keys.push(key);
        }
        self
    }
}

/// Every kind of renderable node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Header, subheader or paragraph.
    Leaf(Leaf),
    /// Inline image backed by an attachment.
    Image(Image),
    /// Raw HTML and plain-text passthrough.
    Custom(Custom),
    /// Generic block container.
    Container(Container),
    /// Numbered list.
    OrderedList(OrderedList),
    /// Bulleted list.
    UnorderedList(UnorderedList),
    /// Table whose children are rows.
    Table(Table),
}

impl Node {
    /// Whether this node holds children.
    #[must_use]
    pub const fn is_container(&self) -> bool {
        matches!(
            self,
            Self::Container(_) | Self::OrderedList(_) | Self::UnorderedList(_) | Self::Table(_)
        )
    }

    /// Whether this node renders as a `<tr>` on its own.
    #[must_use]
    pub const fn is_row(&self, ctx: &RenderContext) -> bool {
        matches!(self, Self::Container(_)) && ctx.table_mode()
    }

    fn element(&self) -> &dyn Element {
        match self {
            Self::Leaf(leaf) => leaf,
            Self::Image(image) => image,
            Self::Custom(custom) => custom,
            Self::Container(container) => container,
            Self::OrderedList(list) => list,
            Self::UnorderedList(list) => list,
            Self::Table(table) => table,
        }
    }
}

impl Element for Node {
    fn keys(&self) -> &[String] {
        self.element().keys()
    }

    fn html(&self, ctx: &mut RenderContext, inherited: &StyleTable) -> Result<String> {
        self.element().html(ctx, inherited)
    }

    fn plain(&self, ctx: &PlainContext) -> String {
        self.element().plain(ctx)
    }
}

/// A child slot: a node or opaque text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Child {
    /// Renderable node.
    Node(Node),
    /// Literal text.
    Text(String),
}

impl Child {
    /// The node, if this child is one.
    #[must_use]
    pub const fn as_node(&self) -> Option<&Node> {
        match self {
            Self::Node(node) => Some(node),
            Self::Text(_) => None,
        }
    }

    /// Whether this child renders as a `<tr>` on its own.
    #[must_use]
    pub fn is_row(&self, ctx: &RenderContext) -> bool {
        self.as_node().is_some_and(|node| node.is_row(ctx))
    }
}

/// Wraps non-row content in a single-cell row.
pub(crate) fn row(child: &Child, ctx: &RenderContext, html: String) -> String {
    if child.is_row(ctx) {
        html
    } else {
        format!("<tr><td>{html}</td></tr>")
    }
}

impl From<Node> for Child {
    fn from(node: Node) -> Self {
        Self::Node(node)
    }
}

impl From<String> for Child {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Child {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

macro_rules! node_conversions {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Node {
                fn from(value: $variant) -> Self {
                    Self::$variant(value)
                }
            }

            impl From<$variant> for Child {
                fn from(value: $variant) -> Self {
                    Self::Node(Node::$variant(value))
                }
            }
        )*
    };
}

node_conversions!(Leaf, Image, Custom, Container, OrderedList, UnorderedList, Table);
