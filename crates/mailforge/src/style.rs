//! Style tables and the shallow cascade.
//!
//! A [`StyleTable`] maps selector keys (`"global"`, `"header"`, `"image"`,
//! a container category, ...) to [`Declarations`]. Nodes carry an ordered
//! list of keys; resolving a node folds the declarations of every matching
//! key in that order, last write wins per attribute.

use std::fmt;

use html_escape::encode_double_quoted_attribute;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

/// Selector key matched by every node.
pub const GLOBAL: &str = "global";

/// Attributes a container pushes into the `"global"` rule of its children.
pub const PROMOTED_ATTRIBUTES: [&str; 4] = ["color", "font-family", "font-size", "font-weight"];

/// Ordered CSS-like `attribute: value` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Declarations(IndexMap<String, String>);

impl Declarations {
    /// Creates an empty declaration block.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an attribute, replacing an existing value in place.
    pub fn set(&mut self, attribute: impl Into<String>, value: impl Into<String>) {
        self.0.insert(attribute.into(), value.into());
    }

    /// Builder-style [`Declarations::set`].
    #[must_use]
    pub fn with(mut self, attribute: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(attribute, value);
        self
    }

    /// Gets an attribute value.
    #[must_use]
    pub fn get(&self, attribute: &str) -> Option<&str> {
        self.0.get(attribute).map(String::as_str)
    }

    /// Removes an attribute.
    pub fn remove(&mut self, attribute: &str) -> Option<String> {
        self.0.shift_remove(attribute)
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when no attribute is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(attribute, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Applies every attribute of `other` on top of `self`.
    pub fn apply(&mut self, other: &Self) {
        for (attribute, value) in other.iter() {
            self.set(attribute, value);
        }
    }

    /// `self` overlaid with `other`; `other` wins per attribute.
    #[must_use]
    pub fn overlaid(mut self, other: &Self) -> Self {
        self.apply(other);
        self
    }

    /// Renders the block for an inline `style` attribute, every declaration
    /// marked `!important`.
    #[must_use]
    pub fn to_inline(&self) -> String {
        self.iter()
            .map(|(attribute, value)| format!("{attribute}: {value} !important;"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Lenient conversion from JSON: string and number values are kept,
    /// anything else is skipped.
    fn from_json_object(selector: &str, object: &serde_json::Map<String, Value>) -> Self {
        let mut declarations = Self::new();
        for (attribute, value) in object {
            match value {
                Value::String(s) => declarations.set(attribute.as_str(), s.as_str()),
                Value::Number(n) => declarations.set(attribute.as_str(), n.to_string()),
                other => warn!(selector, attribute, value = %other, "Skipping non-scalar style value"),
            }
        }
        declarations
    }
}

impl fmt::Display for Declarations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_double_quoted_attribute(&self.to_inline()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Declarations {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Declarations {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<'de> Deserialize<'de> for Declarations {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(value
            .as_object()
            .map(|object| Self::from_json_object("inline", object))
            .unwrap_or_default())
    }
}

/// Cascading style rules keyed by selector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StyleTable(IndexMap<String, Declarations>);

impl StyleTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The default rules every document starts from.
    #[must_use]
    pub fn email_defaults() -> Self {
        Self::new()
            .with_rule(
                GLOBAL,
                [
                    ("color", "#000000"),
                    ("font-family", "sans-serif"),
                    ("font-size", "12px"),
                ],
            )
            .with_rule("body", [("background-color", "#FFFFFF")])
            .with_rule("header", [("font-size", "48px")])
            .with_rule("subheader", [("font-size", "24px")])
            .with_rule("paragraph", [("margin-bottom", "12px")])
            .with_rule("image", [("width", "100%")])
            .with_rule("table", [("background-color", "white")])
    }

    /// Builder-style rule insertion (replaces an existing rule).
    #[must_use]
    pub fn with_rule(mut self, selector: impl Into<String>, declarations: impl Into<Declarations>) -> Self {
        self.set(selector, declarations.into());
        self
    }

    /// Replaces the rule for `selector`.
    pub fn set(&mut self, selector: impl Into<String>, declarations: Declarations) {
        self.0.insert(selector.into(), declarations);
    }

    /// Gets the rule for `selector`.
    #[must_use]
    pub fn get(&self, selector: &str) -> Option<&Declarations> {
        self.0.get(selector)
    }

    /// Mutable access to a rule, creating an empty one if missing.
    pub fn rule_mut(&mut self, selector: &str) -> &mut Declarations {
        self.0.entry(selector.to_string()).or_default()
    }

    /// Whether a rule exists for `selector`.
    #[must_use]
    pub fn contains(&self, selector: &str) -> bool {
        self.0.contains_key(selector)
    }

    /// Iterates over `(selector, declarations)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Declarations)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when the table has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Applies `overrides` attribute by attribute. Selectors and attributes
    /// the overrides do not mention are kept untouched.
    pub fn merge(&mut self, overrides: &Self) {
        for (selector, declarations) in overrides.iter() {
            self.rule_mut(selector).apply(declarations);
        }
    }

    /// Builder-style [`StyleTable::merge`].
    #[must_use]
    pub fn merged(mut self, overrides: &Self) -> Self {
        self.merge(overrides);
        self
    }

    /// Folds the rules of every key in `keys` (in that order) that exists in
    /// this table. Later keys win per attribute.
    #[must_use]
    pub fn resolve<S: AsRef<str>>(&self, keys: &[S]) -> Declarations {
        let mut resolved = Declarations::new();
        for key in keys {
            if let Some(declarations) = self.get(key.as_ref()) {
                resolved.apply(declarations);
            }
        }
        resolved
    }

    /// Builds a table from JSON, skipping selectors whose value is not an
    /// object and attribute values that are not strings or numbers.
    #[must_use]
    pub fn from_json_value(value: &Value) -> Self {
        let mut table = Self::new();
        let Some(object) = value.as_object() else {
            warn!(value = %value, "Style table is not an object, ignoring");
            return table;
        };

        for (selector, rule) in object {
            match rule.as_object() {
                Some(rule) => table.set(selector.as_str(), Declarations::from_json_object(selector, rule)),
                None => warn!(selector = selector.as_str(), "Skipping non-object style rule"),
            }
        }
        table
    }

    /// Parses a JSON style table.
    ///
    /// # Errors
    ///
    /// Returns an error only if the text is not valid JSON; shape problems
    /// are skipped.
    pub fn from_json_str(text: &str) -> crate::Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Ok(Self::from_json_value(&value))
    }
}

impl<'de> Deserialize<'de> for StyleTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_json_value(&value))
    }
}
