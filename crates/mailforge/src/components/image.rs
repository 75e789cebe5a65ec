//! Inline images backed by `cid:` attachments.

use std::borrow::Cow;
use std::ffi::OsStr;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use html_escape::encode_double_quoted_attribute;
use tracing::debug;

use super::Base;
use crate::attachment::content_digest;
use crate::error::{Error, Result};
use crate::render::{Element, PlainContext, RenderContext};
use crate::style::StyleTable;

/// Where the image bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// A file read at render time.
    File(PathBuf),
    /// Bytes already in memory, with the extension naming their format.
    Bytes {
        /// Encoded image.
        data: Vec<u8>,
        /// Extension without the dot (`"png"`).
        extension: String,
    },
}

impl ImageSource {
    fn extension(&self) -> &str {
        match self {
            Self::File(path) => path.extension().and_then(OsStr::to_str).unwrap_or_default(),
            Self::Bytes { extension, .. } => extension,
        }
    }

    fn read(&self) -> Result<Cow<'_, [u8]>> {
        match self {
            Self::File(path) => std::fs::read(path)
                .map(Cow::Owned)
                .map_err(|e| Error::io(path, e)),
            Self::Bytes { data, .. } => Ok(Cow::Borrowed(data)),
        }
    }
}

/// An `<img>` whose bytes travel as an inline MIME part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    base: Base,
    source: ImageSource,
    alt: String,
    content_id: Option<String>,
}

impl Image {
    fn new(source: ImageSource) -> Self {
        Self {
            base: Base::new(&["image"]),
            source,
            alt: String::new(),
            content_id: None,
        }
    }

    /// Image read from `path` when rendered.
    #[must_use]
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self::new(ImageSource::File(path.into()))
    }

    /// Image from in-memory bytes.
    #[must_use]
    pub fn from_bytes(data: impl Into<Vec<u8>>, extension: impl Into<String>) -> Self {
        Self::new(ImageSource::Bytes {
            data: data.into(),
            extension: extension.into(),
        })
    }

    /// Sets the alternative text, also used as the plain-text rendering.
    #[must_use]
    pub fn alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = alt.into();
        self
    }

    /// Requests a specific content-id.
    #[must_use]
    pub fn content_id(mut self, content_id: impl Into<String>) -> Self {
        self.content_id = Some(content_id.into());
        self
    }

    /// Image source.
    #[must_use]
    pub const fn source(&self) -> &ImageSource {
        &self.source
    }

    /// The content-id this image asks for: the explicit one, else the file
    /// name, else the hex digest of the bytes.
    fn requested_id(&self, bytes: &[u8]) -> String {
        if let Some(id) = &self.content_id {
            return id.clone();
        }
        match &self.source {
            ImageSource::File(path) => file_name(path).unwrap_or_else(|| content_digest(bytes)),
            ImageSource::Bytes { .. } => content_digest(bytes),
        }
    }
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name().and_then(OsStr::to_str).map(str::to_string)
}

styled!(Image => base);

impl Element for Image {
    fn keys(&self) -> &[String] {
        self.base.keys()
    }

    fn html(&self, ctx: &mut RenderContext, inherited: &StyleTable) -> Result<String> {
        let bytes = self.source.read()?;
        let requested = self.requested_id(&bytes);
        let content_id = ctx.attach(&bytes, "image", self.source.extension(), Some(requested.as_str()));
        if content_id != requested {
            debug!(
                requested = requested.as_str(),
                content_id = content_id.as_str(),
                "Image shares an existing attachment"
            );
        }

        let resolved = self.base.resolve(inherited);
        let mut tag = format!(
            "<img src=\"cid:{}\" style=\"{resolved}\" alt=\"{}\"",
            encode_double_quoted_attribute(&content_id),
            encode_double_quoted_attribute(&self.alt)
        );
        for (name, value) in self.base.properties() {
            let _ = write!(tag, " {name}=\"{}\"", encode_double_quoted_attribute(value));
        }
        tag.push_str(" />");
        Ok(tag)
    }

    fn plain(&self, _ctx: &PlainContext) -> String {
        format!("{}\n", self.alt)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::attachment::ContentIdPolicy;
    use crate::components::Styled;
    use crate::config::RenderOptions;

    #[test]
    fn test_bytes_default_id_is_digest() {
        let mut ctx = RenderContext::default();
        let html = Image::from_bytes(b"abc".to_vec(), "png")
            .alt("logo")
            .html(&mut ctx, &StyleTable::email_defaults())
            .unwrap();

        let digest = content_digest(b"abc");
        assert!(html.starts_with(&format!("<img src=\"cid:{digest}\"")));
        assert!(html.contains("width: 100% !important;"));
        assert!(html.ends_with("alt=\"logo\" />"));
        assert_eq!(ctx.attachments().entries()[0].content_type.essence(), "image/png");
    }

    #[test]
    fn test_file_default_id_is_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("banner.jpg");
        std::fs::write(&path, b"jpeg bytes").unwrap();

        let mut ctx = RenderContext::default();
        let html = Image::from_file(&path)
            .property("width", "600")
            .html(&mut ctx, &StyleTable::new())
            .unwrap();
        assert_eq!(html, "<img src=\"cid:banner.jpg\" style=\"\" alt=\"\" width=\"600\" />");
        assert_eq!(ctx.attachments().entries()[0].content_type.essence(), "image/jpeg");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Image::from_file("/nonexistent/mailforge/pic.png")
            .html(&mut RenderContext::default(), &StyleTable::new())
            .unwrap_err();
        assert!(matches!(err, Error::Io { ref path, .. } if path.ends_with("pic.png")));
    }

    #[test]
    fn test_reference_follows_registry() {
        let mut ctx = RenderContext::default();
        let first = Image::from_bytes(b"same".to_vec(), "gif").content_id("a");
        let second = Image::from_bytes(b"same".to_vec(), "gif").content_id("b");

        first.html(&mut ctx, &StyleTable::new()).unwrap();
        let html = second.html(&mut ctx, &StyleTable::new()).unwrap();
        assert!(html.contains("cid:a"));
        assert_eq!(ctx.attachments().len(), 1);

        let mut ctx = RenderContext::new(RenderOptions {
            content_id_policy: ContentIdPolicy::Distinct,
            ..RenderOptions::default()
        });
        first.html(&mut ctx, &StyleTable::new()).unwrap();
        let html = second.html(&mut ctx, &StyleTable::new()).unwrap();
        assert!(html.contains("cid:b"));
        assert_eq!(ctx.attachments().len(), 2);
    }

    #[test]
    fn test_plain_is_alt() {
        let image = Image::from_bytes(Vec::new(), "png").alt("Company logo");
        assert_eq!(image.plain(&PlainContext::default()), "Company logo\n");
    }
}
