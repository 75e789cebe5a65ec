//! Content-addressed attachment registry.
//!
//! Every binary part referenced from rendered markup is registered here.
//! Entries are keyed by the SHA-256 digest of their bytes so the same image
//! used twice in a document ends up as a single MIME part.

use chrono::Utc;
use mailforge_mime::ContentType;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, trace};

/// How content-ids behave when identical bytes are attached under
/// different ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentIdPolicy {
    /// One entry per digest. The first id registered for some content is
    /// the one every later reference receives.
    #[default]
    Canonical,
    /// One entry per `(digest, id)` pair. Every reference keeps its own id,
    /// at the cost of repeating identical bytes under each id.
    Distinct,
}

/// A registered binary part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Raw bytes.
    pub content: Vec<u8>,
    /// MIME type derived from the media type and extension.
    pub content_type: ContentType,
    /// Content-ID referenced as `cid:<id>`.
    pub content_id: String,
    /// Media family (`"image"`, `"application"`, ...).
    pub media_type: String,
    /// File extension without the dot.
    pub extension: String,
    /// Hex SHA-256 of `content`.
    pub digest: String,
}

impl Attachment {
    /// File name offered to mail clients: the content-id, with the extension
    /// appended when the id does not already end with it.
    #[must_use]
    pub fn filename(&self) -> String {
        let suffix = format!(".{}", self.extension);
        if self.extension.is_empty() || self.content_id.ends_with(&suffix) {
            self.content_id.clone()
        } else {
            format!("{}{suffix}", self.content_id)
        }
    }
}

/// Hex SHA-256 digest of `content`.
#[must_use]
pub fn content_digest(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}

/// Generates a unique content-id in the `time.random@host` shape of
/// Message-IDs.
#[must_use]
pub fn generate_content_id() -> String {
    let mut rng = rand::thread_rng();
    format!(
        "{}.{:016x}@mailforge",
        Utc::now().timestamp_micros(),
        rng.r#gen::<u64>()
    )
}

/// Ordered, deduplicated collection of attachments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachmentRegistry {
    policy: ContentIdPolicy,
    entries: Vec<Attachment>,
}

impl AttachmentRegistry {
    /// Creates an empty registry with the given policy.
    #[must_use]
    pub const fn new(policy: ContentIdPolicy) -> Self {
        Self {
            policy,
            entries: Vec::new(),
        }
    }

    /// Registers `content` and returns the content-id that references it.
    ///
    /// Without an explicit id a unique one is generated. When the content is
    /// already registered (see [`ContentIdPolicy`]) nothing is added and the
    /// existing id is returned.
    pub fn attach(
        &mut self,
        content: &[u8],
        media_type: &str,
        extension: &str,
        content_id: Option<&str>,
    ) -> String {
        let digest = content_digest(content);

        if let Some(existing) = self.find_duplicate(&digest, content_id) {
            debug!(
                content_id = existing.content_id.as_str(),
                requested = content_id,
                "Attachment already registered"
            );
            return existing.content_id.clone();
        }

        let content_id = content_id.map_or_else(generate_content_id, str::to_string);
        let extension = extension.trim_start_matches('.').to_string();
        trace!(content_id = content_id.as_str(), bytes = content.len(), "Registering attachment");

        self.entries.push(Attachment {
            content: content.to_vec(),
            content_type: ContentType::from_extension(media_type, &extension),
            content_id: content_id.clone(),
            media_type: media_type.to_string(),
            extension,
            digest,
        });
        content_id
    }

    fn find_duplicate(&self, digest: &str, content_id: Option<&str>) -> Option<&Attachment> {
        self.entries.iter().find(|entry| {
            entry.digest == digest
                && match self.policy {
                    ContentIdPolicy::Canonical => true,
                    ContentIdPolicy::Distinct => {
                        content_id.is_none_or(|id| id == entry.content_id)
                    }
                }
        })
    }

    /// Looks up an entry by content-id.
    #[must_use]
    pub fn get(&self, content_id: &str) -> Option<&Attachment> {
        self.entries.iter().find(|entry| entry.content_id == content_id)
    }

    /// Registered entries, in registration order.
    #[must_use]
    pub fn entries(&self) -> &[Attachment] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The active content-id policy.
    #[must_use]
    pub const fn policy(&self) -> ContentIdPolicy {
        self.policy
    }

    /// Drops every entry, keeping the policy.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Consumes the registry, returning its entries.
    #[must_use]
    pub fn into_entries(self) -> Vec<Attachment> {
        self.entries
    }
}
