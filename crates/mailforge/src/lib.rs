//! # mailforge
//!
//! Build HTML e-mails and their plain-text fallbacks from a tree of styled
//! components, then package them with inline images into a MIME message.
//!
//! ## Features
//!
//! - **Components**: headers, paragraphs, images, raw passthrough, containers,
//!   ordered/unordered lists and tables
//! - **Style cascade**: selector-keyed rules resolved per node and inlined as
//!   `style` attributes, with typography flowing from containers to leaves
//! - **Table mode**: containers become table rows for clients with weak CSS
//! - **Attachments**: images are content-addressed, so repeated images become
//!   one inline part
//! - **Drafts**: hand the finished message to a desktop mail client
//!
//! ## Quick Start
//!
//! ```
//! use mailforge::{Container, Document, Leaf, OrderedList, Styled};
//!
//! let mut email = Document::new("Release 2.0", "team@example.com")
//!     .to("users@example.com");
//!
//! email.append(Leaf::header("What's new"));
//! email.append(
//!     Container::new()
//!         .style("color", "#333333")
//!         .child(Leaf::paragraph("Highlights of this **major** release:"))
//!         .child(OrderedList::new().child("Faster sync").child("Dark mode")),
//! );
//!
//! let plain = email.plain();
//! assert!(plain.contains("  1. Faster sync\n"));
//!
//! let html = email.html().unwrap();
//! assert!(html.contains("<b>major</b>"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod attachment;
pub mod components;
pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod markup;
pub mod render;
pub mod style;

pub use attachment::{Attachment, AttachmentRegistry, ContentIdPolicy};
pub use components::{
    Child, Container, Custom, Image, ImageSource, Leaf, LeafKind, Node, OrderedList, Styled,
    Table, UnorderedList,
};
pub use config::{Config, RenderOptions};
pub use document::{Document, Rendered};
pub use error::{Error, Result};
pub use export::{DraftExporter, DraftHandle, DraftOutcome, EmlDraftExporter, Unsupported, platform_exporter};
pub use markup::parse_text;
pub use render::{Element, PlainContext, RenderContext};
pub use style::{Declarations, StyleTable};
