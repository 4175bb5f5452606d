//! HTML fragment building blocks.
//!
//! This module provides [`Attributes`], an insertion-ordered attribute set
//! rendered onto tags, plus the escaping and void-element helpers used for
//! head tags and meta entries.

use std::fmt::Write;

/// Escape a string for use in an HTML attribute value or text node.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render a void element with its attributes.
pub fn element(tag: &str, attributes: &Attributes) -> String {
    format!("<{}{}>", tag, attributes.render())
}

/// An ordered set of HTML tag attributes.
///
/// Entries render in insertion order. A keyed entry renders as
/// `key="value"` with the value escaped; a value-less entry renders as a
/// bare flag (`defer`, `async`). Setting an existing key replaces its
/// value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, Option<String>)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a keyed attribute, replacing any existing entry with the same key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.insert(key.into(), Some(value.into()));
        self
    }

    /// Set a bare flag attribute.
    pub fn flag(&mut self, key: impl Into<String>) -> &mut Self {
        self.insert(key.into(), None);
        self
    }

    /// Builder form of [`Attributes::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Builder form of [`Attributes::flag`].
    pub fn with_flag(mut self, key: impl Into<String>) -> Self {
        self.flag(key);
        self
    }

    fn insert(&mut self, key: String, value: Option<String>) {
        match self.entries.iter().position(|(k, _)| *k == key) {
            Some(index) => self.entries[index] = (key, value),
            None => self.entries.push((key, value)),
        }
    }

    /// Whether an attribute with the given key is present (keyed or flag).
    pub fn has(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Value of a keyed attribute. `None` for flags and missing keys.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> + '_ {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Append all entries from another set, replacing duplicate keys.
    pub fn extend(&mut self, other: &Attributes) {
        for (key, value) in &other.entries {
            self.insert(key.clone(), value.clone());
        }
    }

    /// Render as a tag suffix: one leading space per attribute.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.entries {
            match value {
                Some(v) => {
                    let _ = write!(out, " {}=\"{}\"", key, escape(v));
                }
                None => {
                    let _ = write!(out, " {}", key);
                }
            }
        }
        out
    }
}
