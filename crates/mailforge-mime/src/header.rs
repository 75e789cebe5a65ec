//! MIME header handling.

use crate::error::{Error, Result};
use std::fmt;

/// Ordered collection of message or part headers.
///
/// Lookups are case-insensitive; names are written back with the casing they
/// were added with, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    /// Creates a new empty header collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header value.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or contains control characters,
    /// spaces or `:`, or if the value contains a bare line break.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let name = name.into();
        let value = value.into();
        validate(&name, &value)?;
        self.entries.push((name, value));
        Ok(())
    }

    /// Sets a header value, replacing any existing values.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Headers::add`].
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let name = name.into();
        self.remove(&name);
        self.add(name, value)
    }

    /// Gets the first value for a header.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Gets all values for a header.
    #[must_use]
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Removes all values for a header.
    pub fn remove(&mut self, name: &str) {
        self.entries.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
    }

    /// Returns the number of header lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no headers are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over all headers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Parses a header block (up to the first empty line).
    ///
    /// Continuation lines (starting with space or tab) are unfolded.
    ///
    /// # Errors
    ///
    /// Returns an error if a header line has no `:` separator.
    pub fn parse(text: &str) -> Result<Self> {
        let mut headers = Self::new();
        let mut current: Option<(String, String)> = None;

        for line in text.lines() {
            if line.is_empty() {
                break;
            }

            if line.starts_with(' ') || line.starts_with('\t') {
                if let Some((_, value)) = current.as_mut() {
                    value.push(' ');
                    value.push_str(line.trim());
                }
                continue;
            }

            if let Some((name, value)) = current.take() {
                headers.add(name, value)?;
            }

            let (name, value) = line
                .split_once(':')
                .ok_or_else(|| Error::InvalidHeader(line.to_string()))?;
            current = Some((name.trim().to_string(), value.trim().to_string()));
        }

        if let Some((name, value)) = current {
            headers.add(name, value)?;
        }

        Ok(headers)
    }
}

fn validate(name: &str, value: &str) -> Result<()> {
    if name.is_empty() || name.chars().any(|c| c.is_control() || c == ':' || c == ' ') {
        return Err(Error::InvalidHeader(format!("Invalid header name: {name:?}")));
    }
    if value.contains(['\r', '\n']) {
        return Err(Error::InvalidHeader(format!("Line break in value of {name}")));
    }
    Ok(())
}

/// Folds a header line at whitespace so lines stay within 78 characters.
fn fold(line: &str) -> String {
    if line.len() <= 78 {
        return line.to_string();
    }

    let mut result = String::new();
    let mut current = String::new();

    for word in line.split(' ') {
        if current.is_empty() {
            current.push_str(word);
        } else if current.len() + 1 + word.len() <= 76 {
            current.push(' ');
            current.push_str(word);
        } else {
            result.push_str(&current);
            result.push_str("\r\n ");
            current = word.to_string();
        }
    }

    result.push_str(&current);
    result
}

impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.entries {
            write!(f, "{}\r\n", fold(&format!("{name}: {value}")))?;
        }
        Ok(())
    }
}
