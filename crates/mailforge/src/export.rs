//! Handing finished messages to a desktop mail client as drafts.
//!
//! Export is optional: a platform without a usable drafts location answers
//! [`DraftOutcome::Unavailable`] instead of failing.

use std::path::{Path, PathBuf};

use mailforge_mime::Message;
use mailforge_mime::encoding::decode_rfc2047;
use tracing::{info, warn};

use crate::error::{Error, Result};

/// Where an exported draft ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftHandle {
    /// The written `.eml` file.
    pub path: PathBuf,
}

/// Result of an export attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftOutcome {
    /// The draft was written.
    Created(DraftHandle),
    /// No exporter is available here; the reason is for display.
    Unavailable(String),
}

/// Something that can store a message as an unsent draft.
pub trait DraftExporter {
    /// Exports `message`.
    ///
    /// # Errors
    ///
    /// Returns an error when the exporter exists but writing the draft
    /// failed.
    fn export(&self, message: &Message) -> Result<DraftOutcome>;
}

/// Exporter for platforms without draft support.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unsupported;

impl DraftExporter for Unsupported {
    fn export(&self, _message: &Message) -> Result<DraftOutcome> {
        Ok(DraftOutcome::Unavailable(
            "draft export is not supported on this platform".to_string(),
        ))
    }
}

/// Writes drafts as `.eml` files marked `X-Unsent: 1`, which desktop mail
/// clients open as editable messages.
#[derive(Debug, Clone)]
pub struct EmlDraftExporter {
    dir: PathBuf,
    open: bool,
}

impl EmlDraftExporter {
    /// Exporter writing into `dir`, without opening the result.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            open: false,
        }
    }

    /// Whether to open each draft with the default handler after writing.
    #[must_use]
    pub const fn open(mut self, open: bool) -> Self {
        self.open = open;
        self
    }

    /// Drafts directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DraftExporter for EmlDraftExporter {
    fn export(&self, message: &Message) -> Result<DraftOutcome> {
        std::fs::create_dir_all(&self.dir).map_err(|e| Error::io(&self.dir, e))?;

        let subject = message
            .subject()
            .map(|raw| decode_rfc2047(raw).unwrap_or_else(|_| raw.to_string()))
            .unwrap_or_default();
        let path = self.dir.join(format!("{}.eml", slug(&subject)));

        let mut contents = b"X-Unsent: 1\r\n".to_vec();
        contents.extend_from_slice(&message.to_bytes());
        std::fs::write(&path, contents).map_err(|e| Error::io(&path, e))?;
        info!(path = %path.display(), "Draft written");

        if self.open {
            if let Err(e) = opener::open(&path) {
                warn!(path = %path.display(), error = %e, "Could not open draft");
            }
        }

        Ok(DraftOutcome::Created(DraftHandle { path }))
    }
}

/// File-name-safe form of a subject line.
fn slug(subject: &str) -> String {
    let mut slug = String::with_capacity(subject.len());
    for c in subject.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "draft".to_string()
    } else {
        slug.to_string()
    }
}

/// The exporter for this machine: `.eml` drafts under the user data
/// directory, or [`Unsupported`] when the platform has none.
#[must_use]
pub fn platform_exporter(open: bool) -> Box<dyn DraftExporter> {
    match dirs::data_dir() {
        Some(data) => Box::new(EmlDraftExporter::new(data.join("mailforge").join("drafts")).open(open)),
        None => {
            warn!("No user data directory, draft export disabled");
            Box::new(Unsupported)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mailforge_mime::MessageBuilder;

    use super::*;

    fn message(subject: &str) -> Message {
        MessageBuilder::new()
            .from("a@example.com")
            .subject(subject)
            .text_body("hi")
            .build()
            .unwrap()
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("Weekly Digest: #42!"), "weekly-digest-42");
        assert_eq!(slug("  ***  "), "draft");
        assert_eq!(slug("Été"), "été");
    }

    #[test]
    fn test_unsupported_is_unavailable() {
        let outcome = Unsupported.export(&message("x")).unwrap();
        assert!(matches!(outcome, DraftOutcome::Unavailable(_)));
    }

    #[test]
    fn test_eml_draft_written() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = EmlDraftExporter::new(dir.path().join("drafts"));

        let outcome = exporter.export(&message("Release notes")).unwrap();
        let DraftOutcome::Created(handle) = outcome else {
            panic!("expected a draft");
        };
        assert_eq!(handle.path, dir.path().join("drafts").join("release-notes.eml"));

        let written = std::fs::read_to_string(&handle.path).unwrap();
        assert!(written.starts_with("X-Unsent: 1\r\n"));
        assert!(written.contains("Subject: Release notes\r\n"));
    }
}
