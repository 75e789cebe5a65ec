//! # mailforge-mime
//!
//! MIME message model and generation library for HTML e-mails.
//!
//! ## Features
//!
//! - **Message generation**: build messages with text/HTML alternatives,
//!   inline `cid:` parts and file attachments
//! - **Encoding/Decoding**: Base64, Quoted-Printable, RFC 2047 header encoding
//! - **Content types**: MIME content types with ordered parameters
//! - **Multipart**: mixed, alternative and related structures, nested only as
//!   deep as the content requires
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailforge_mime::{ContentType, InlinePart, MessageBuilder};
//!
//! let message = MessageBuilder::new()
//!     .from("sender@example.com")
//!     .to("recipient@example.com")
//!     .subject("Monthly report")
//!     .text_body("Plain text version")
//!     .html_body("<img src=\"cid:chart.png\">")
//!     .inline(InlinePart::new("chart.png", ContentType::from_extension("image", "png"), png))
//!     .build()?;
//!
//! let wire = message.to_bytes();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod builder;
mod content_type;
mod error;
mod header;
mod message;

pub mod encoding;

pub use builder::{Attachment, InlinePart, MessageBuilder};
pub use content_type::ContentType;
pub use error::{Error, Result};
pub use header::Headers;
pub use message::{Body, Message, Part, TransferEncoding};
