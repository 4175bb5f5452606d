//! Build-manifest lookups.
//!
//! An asset build emits two JSON maps: a revision manifest from logical
//! path to revisioned filename (`app.js` → `app.abc123.js`) and an
//! integrity manifest from logical path to a subresource-integrity digest.
//! Both are consumed read-only here; a missing or malformed manifest means
//! "no revision available", never a render failure.

use crate::error::{AssetIncludeError, Result};
use anyhow::Context;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Revision and integrity maps for built assets.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    revisions: HashMap<String, String>,
    integrity: HashMap<String, String>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a manifest from already-loaded maps.
    pub fn from_maps(
        revisions: HashMap<String, String>,
        integrity: HashMap<String, String>,
    ) -> Self {
        Self {
            revisions,
            integrity,
        }
    }

    /// Load manifests from JSON files. Either file may be absent from the
    /// build; pass `None` to leave that map empty.
    ///
    /// # Errors
    ///
    /// Returns `ManifestParse` for invalid JSON, `Io` for unreadable files.
    pub fn from_json_files(revisions: Option<&Path>, integrity: Option<&Path>) -> Result<Self> {
        let revisions = match revisions {
            Some(path) => load_map(path)?,
            None => HashMap::new(),
        };
        let integrity = match integrity {
            Some(path) => load_map(path)?,
            None => HashMap::new(),
        };

        Ok(Self {
            revisions,
            integrity,
        })
    }

    /// Like [`Manifest::from_json_files`], but a missing or malformed file
    /// degrades to an empty map instead of failing.
    pub fn from_json_files_lossy(revisions: Option<&Path>, integrity: Option<&Path>) -> Self {
        Self {
            revisions: load_map_lossy(revisions),
            integrity: load_map_lossy(integrity),
        }
    }

    /// Revisioned filename for a logical path.
    pub fn revision(&self, path: &str) -> Option<&str> {
        self.revisions.get(path).map(String::as_str)
    }

    pub fn has_revision(&self, path: &str) -> bool {
        self.revisions.contains_key(path)
    }

    /// Integrity digest for a logical path.
    pub fn integrity(&self, path: &str) -> Option<&str> {
        self.integrity.get(path).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.revisions.is_empty() && self.integrity.is_empty()
    }
}

fn load_map(path: &Path) -> Result<HashMap<String, String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest {:?}", path))?;

    serde_json::from_str(&content).map_err(|e| AssetIncludeError::ManifestParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn load_map_lossy(path: Option<&Path>) -> HashMap<String, String> {
    let Some(path) = path else {
        return HashMap::new();
    };

    match load_map(path) {
        Ok(map) => map,
        Err(e) => {
            tracing::warn!("Failed to load manifest {}: {}", path.display(), e);
            HashMap::new()
        }
    }
}
