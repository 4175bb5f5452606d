//! Configuration schema definitions.
//!
//! This module contains the struct definitions that map to the asset
//! configuration file format, plus [`AppPaths`], the filesystem roots the
//! registry resolves against.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Root configuration for the asset registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Collect HTTP/2 preload header values for registered resources.
    pub http2: bool,

    /// Prefer package CDN hooks over local hooks.
    pub cdn: bool,

    /// Register auto-included files as inline content instead of links.
    pub inline: bool,

    /// Serving source for manifest-revisioned files.
    pub source: String,

    /// Application environment.
    pub env: AppEnv,

    /// Named package definitions.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub packages: HashMap<String, PackageEntry>,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            http2: default_true(),
            cdn: default_true(),
            inline: false,
            source: default_source(),
            env: AppEnv::default(),
            packages: HashMap::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_source() -> String {
    "build".to_string()
}

/// Application environment, as it affects rendering output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppEnv {
    Local,
    #[default]
    Production,
}

impl AppEnv {
    pub fn is_local(self) -> bool {
        self == AppEnv::Local
    }
}

/// A configured package.
///
/// Either the positional `[class, version]` list form or the keyed
/// `{class, version, integrity}` form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PackageEntry {
    /// `[class]` or `[class, version]`.
    Positional(Vec<String>),

    /// `{class, version, integrity}`.
    Detailed {
        class: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        version: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        integrity: Option<IntegrityEntry>,
    },
}

impl PackageEntry {
    /// The class identity this entry maps to.
    pub fn class(&self) -> Option<&str> {
        match self {
            PackageEntry::Positional(items) => items.first().map(String::as_str),
            PackageEntry::Detailed { class, .. } => Some(class.as_str()),
        }
    }

    /// The configured version, with the legacy positional fallback.
    pub fn version(&self) -> Option<&str> {
        match self {
            PackageEntry::Positional(items) => items.get(1).map(String::as_str),
            PackageEntry::Detailed { version, .. } => version.as_deref(),
        }
    }

    /// Integrity digest for one of the package's assets.
    pub fn integrity(&self, asset: &str) -> Option<&str> {
        match self {
            PackageEntry::Positional(_) => None,
            PackageEntry::Detailed { integrity, .. } => {
                integrity.as_ref().and_then(|entry| entry.for_asset(asset))
            }
        }
    }
}

/// Subresource-integrity digests for a package.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntegrityEntry {
    /// One digest covering the package's single asset.
    Single(String),

    /// Digest per sub-asset path.
    PerAsset(HashMap<String, String>),
}

impl IntegrityEntry {
    pub fn for_asset(&self, asset: &str) -> Option<&str> {
        match self {
            IntegrityEntry::Single(digest) => Some(digest.as_str()),
            IntegrityEntry::PerAsset(map) => map.get(asset).map(String::as_str),
        }
    }
}

/// Filesystem roots the registry resolves against.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Application root. Paths under it are treated as local files and
    /// bypass URL resolution.
    pub app_root: PathBuf,

    /// Public web root served at `/`.
    pub public_root: PathBuf,

    /// View sources scanned by auto-include.
    pub views_root: PathBuf,
}

impl AppPaths {
    /// Derive the conventional layout under a single application root.
    pub fn new(app_root: impl Into<PathBuf>) -> Self {
        let app_root = app_root.into();
        Self {
            public_root: app_root.join("public"),
            views_root: app_root.join("resources").join("views"),
            app_root,
        }
    }

    pub fn with_public_root(mut self, public_root: impl Into<PathBuf>) -> Self {
        self.public_root = public_root.into();
        self
    }

    pub fn with_views_root(mut self, views_root: impl Into<PathBuf>) -> Self {
        self.views_root = views_root.into();
        self
    }
}
