//! Configuration for the asset registry.
//!
//! This module handles both halves of configuration:
//! - Schema definitions in [`schema`]
//! - File loading in [`loader`]
//!
//! # Example
//!
//! ```
//! use asset_include::config::{load_config_file, AssetConfig};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let path = temp.path().join("assets.yml");
//! fs::write(&path, "cdn: false").unwrap();
//!
//! let config = load_config_file(&path).unwrap();
//! assert!(!config.cdn);
//! ```

pub mod loader;
pub mod schema;

// Schema re-exports
pub use schema::{AppEnv, AppPaths, AssetConfig, IntegrityEntry, PackageEntry};

// Loader re-exports
pub use loader::{load_config_file, parse_config};
