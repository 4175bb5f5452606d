//! Error types for asset-include operations.
//!
//! This module defines [`AssetIncludeError`], the primary error type used
//! throughout the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Loading configuration and manifest files is the only fallible surface
//! - Registration and rendering never fail: a resource that cannot be
//!   resolved degrades to omitted markup, not a broken page
//! - Use `anyhow::Error` (via `AssetIncludeError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for asset-include operations.
#[derive(Debug, Error)]
pub enum AssetIncludeError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// Failed to parse a manifest file.
    #[error("Failed to parse manifest at {path}: {message}")]
    ManifestParse { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for asset-include operations.
pub type Result<T> = std::result::Result<T, AssetIncludeError>;
