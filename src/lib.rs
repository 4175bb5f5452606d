//! Asset registration and rendering for server-side templates.
//!
//! asset-include lets application code and reusable packages declare
//! CSS/JS resources, by public path or inline content, and renders the
//! final markup for each page slot. Resources are deduplicated by content
//! hash, ordered by priority, and resolved against an optional build
//! manifest of revisioned filenames and subresource-integrity digests.
//!
//! # Modules
//!
//! - [`config`] - Typed configuration schema and YAML loading
//! - [`error`] - Error types and result alias
//! - [`html`] - Attribute sets and tag rendering
//! - [`manifest`] - Revision/integrity manifest lookups
//! - [`package`] - Named resource bundles with CDN/local variants
//! - [`registry`] - The request-scoped resource registry and renderer
//! - [`resource`] - A single registered asset
//!
//! # Example
//!
//! ```
//! use asset_include::config::{AppPaths, AssetConfig};
//! use asset_include::html::Attributes;
//! use asset_include::manifest::Manifest;
//! use asset_include::registry::ResourceRegistry;
//!
//! let mut registry = ResourceRegistry::new(
//!     AssetConfig::default(),
//!     Manifest::new(),
//!     AppPaths::new("/srv/app"),
//! );
//!
//! registry.add("https://cdn.example.com/app.js", None, Attributes::new(), None);
//! let footer = registry.footer();
//! assert!(footer.contains("https://cdn.example.com/app.js"));
//! ```
//!
//! A registry instance is scoped to one request: construct it when the
//! request starts, register resources while the page renders, and emit the
//! header/footer blocks into the template output.

pub mod config;
pub mod error;
pub mod html;
pub mod manifest;
pub mod package;
pub mod registry;
pub mod resource;

pub use error::{AssetIncludeError, Result};
