//! A single registered asset.
//!
//! A [`Resource`] is one CSS/JS asset: an external or local reference, or
//! an inline content block. It knows how to render itself as a tag and how
//! to describe itself as an HTTP/2 preload hint. Identity is a SHA-256
//! digest of the resolved path (or of the content for content-based
//! resources), which the registry uses as its deduplication key.

use crate::html::Attributes;
use crate::registry::ResourceRegistry;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs;
use std::str::FromStr;

/// The kind of asset a resource renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Css,
    Js,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Css => "css",
            ResourceKind::Js => "js",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render target slot for a resource.
///
/// `Ready` defers JS until document-ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    Header,
    Footer,
    HeaderInline,
    FooterInline,
    Inline,
    Ready,
}

impl Location {
    pub fn as_str(self) -> &'static str {
        match self {
            Location::Header => "header",
            Location::Footer => "footer",
            Location::HeaderInline => "header-inline",
            Location::FooterInline => "footer-inline",
            Location::Inline => "inline",
            Location::Ready => "ready",
        }
    }

    /// Inline slots render content rather than a link or script reference.
    pub fn is_inline(self) -> bool {
        matches!(
            self,
            Location::HeaderInline | Location::FooterInline | Location::Inline | Location::Ready
        )
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Location {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "header" => Ok(Location::Header),
            "footer" => Ok(Location::Footer),
            "header-inline" => Ok(Location::HeaderInline),
            "footer-inline" => Ok(Location::FooterInline),
            "inline" => Ok(Location::Inline),
            "ready" => Ok(Location::Ready),
            _ => Err(()),
        }
    }
}

/// One registered CSS/JS asset or inline content block.
#[derive(Debug, Clone)]
pub struct Resource {
    path: String,
    content: String,
    kind: Option<ResourceKind>,
    location: Location,
    hash: String,
    attributes: Attributes,
    priority: i32,
}

/// Default priority within a (kind, location) bucket. Lower renders first.
pub const DEFAULT_PRIORITY: i32 = 100;

impl Resource {
    /// Build a resource from a path.
    ///
    /// The kind is resolved from the path's extension through the
    /// registry's mapping; an unrecognized extension leaves it unset and
    /// the resource renders to nothing. An unset location defaults per
    /// kind. Paths outside the application root are resolved to a
    /// servable URL first.
    pub fn by_path(
        path: &str,
        location: Option<Location>,
        attributes: Attributes,
        registry: &ResourceRegistry,
    ) -> Resource {
        let app_root = registry.paths().app_root.to_string_lossy().to_string();
        let resolved = if !app_root.is_empty() && path.starts_with(&app_root) {
            path.to_string()
        } else {
            registry.url(path)
        };

        let (kind, location) = registry.parse_extension(&resolved, location);

        Resource {
            hash: digest(&resolved),
            path: resolved,
            content: String::new(),
            kind,
            location: location.unwrap_or(Location::Footer),
            attributes,
            priority: DEFAULT_PRIORITY,
        }
    }

    /// Build a resource from raw content. Content-based resources always
    /// render inline.
    pub fn by_content(kind: ResourceKind, content: &str, location: Location) -> Resource {
        Resource {
            path: String::new(),
            hash: digest(content),
            content: content.to_string(),
            kind: Some(kind),
            location,
            attributes: Attributes::new(),
            priority: DEFAULT_PRIORITY,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn kind(&self) -> Option<ResourceKind> {
        self.kind
    }

    pub fn location(&self) -> Location {
        self.location
    }

    /// Deduplication key: hex SHA-256 of the resolved path or content.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn set_priority(&mut self, priority: i32) -> &mut Self {
        self.priority = priority;
        self
    }

    pub fn set_location(&mut self, location: Location) -> &mut Self {
        self.location = location;
        self
    }

    pub fn set_attributes(&mut self, attributes: Attributes) -> &mut Self {
        self.attributes = attributes;
        self
    }

    /// Replace the content, recomputing the identity hash.
    pub fn set_content(&mut self, content: &str) -> &mut Self {
        self.content = content.to_string();
        self.hash = digest(content);
        self
    }

    /// Whether the path already points at an external URL.
    pub fn is_external(&self) -> bool {
        let lower = self.path.to_ascii_lowercase();
        lower.starts_with("//") || lower.starts_with("http://") || lower.starts_with("https://")
    }

    /// Whether this resource renders inline.
    pub fn is_inline(&self) -> bool {
        self.location.is_inline()
    }

    /// The servable URL for this resource.
    ///
    /// External paths pass through unchanged; otherwise the registry's
    /// domain is applied.
    pub fn url(&self, registry: &ResourceRegistry) -> String {
        if self.is_external() {
            return self.path.clone();
        }

        registry.resource_url(&self.path)
    }

    /// Render this resource as markup.
    ///
    /// Returns an empty string when the kind is unresolved or an inline
    /// source file is missing.
    pub fn render(&self, registry: &ResourceRegistry) -> String {
        if self.is_inline() {
            return self.render_inline();
        }

        match self.kind {
            Some(ResourceKind::Js) => format!(
                r#"<script src="{}"{}></script>"#,
                self.url(registry),
                self.attributes.render()
            ),
            Some(ResourceKind::Css) => format!(
                r#"<link rel="stylesheet" type="text/css" href="{}"{}>"#,
                self.url(registry),
                self.attributes.render()
            ),
            None => String::new(),
        }
    }

    fn render_inline(&self) -> String {
        let content = if self.content.is_empty() {
            match fs::read_to_string(&self.path) {
                Ok(content) => content,
                Err(_) => {
                    tracing::debug!("inline source missing: {}", self.path);
                    return String::new();
                }
            }
        } else {
            self.content.clone()
        };

        let content = if self.kind == Some(ResourceKind::Js) && self.location == Location::Ready {
            format!("$(function(){{ {} }});", content)
        } else {
            content
        };

        match self.kind {
            Some(ResourceKind::Css) => format!(r#"<style type="text/css">{}</style>"#, content),
            Some(ResourceKind::Js) => {
                format!(r#"<script type="text/javascript">{}</script>"#, content)
            }
            None => String::new(),
        }
    }

    /// HTTP/2 preload header value for this resource, when it qualifies.
    ///
    /// Inline resources and resources carrying an `integrity` attribute
    /// are never preloaded.
    pub fn http2(&self, registry: &ResourceRegistry) -> Option<String> {
        if self.is_inline() {
            return None;
        }

        if self.attributes.has("integrity") {
            return None;
        }

        let link_as = match self.kind? {
            ResourceKind::Js => "script",
            ResourceKind::Css => "style",
        };

        Some(format!(
            "<{}>; rel=preload; as={}",
            self.url(registry),
            link_as
        ))
    }
}

fn digest(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}
