//! Render options and JSON configuration files.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::attachment::ContentIdPolicy;
use crate::error::{Error, Result};
use crate::style::StyleTable;

/// Knobs that change how a document renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Render containers as table rows and wrap the body in a table, for mail
    /// clients with poor `div` support.
    pub table_mode: bool,
    /// Spaces added per list nesting level in plain text.
    pub tab_size: usize,
    /// Content-id behaviour for identical attachments.
    pub content_id_policy: ContentIdPolicy,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            table_mode: false,
            tab_size: 2,
            content_id_policy: ContentIdPolicy::Canonical,
        }
    }
}

/// Configuration file contents: render options plus style overrides.
///
/// ```json
/// {
///   "options": { "table_mode": true, "tab_size": 4 },
///   "style": { "global": { "font-family": "Georgia, serif" } }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Render options.
    pub options: RenderOptions,
    /// Style overrides, merged over the document defaults.
    pub style: StyleTable,
}

impl Config {
    /// Parses a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid JSON or options have the
    /// wrong type.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Loads a configuration file; a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config = Self::from_json_str(&contents)?;
        info!(path = %path.display(), rules = config.style.len(), "Config loaded");
        Ok(config)
    }

    /// Writes the configuration as pretty JSON, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents).map_err(|e| Error::io(path, e))?;
        info!(path = %path.display(), "Config saved");
        Ok(())
    }
}
