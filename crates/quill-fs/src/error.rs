//! Error types for the filesystem backends.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for filesystem operations.
pub type Result<T> = std::result::Result<T, FsError>;

/// Errors that can occur in filesystem operations.
#[derive(Debug, Error)]
pub enum FsError {
    /// No extension registered under this id.
    #[error("extension not installed: {0}")]
    ExtensionNotFound(String),

    /// An extension with this id is already registered.
    #[error("extension already installed: {0}")]
    ExtensionExists(String),

    /// Manifest names a different extension than its directory.
    #[error("manifest in '{dir}' names extension '{name}'")]
    ManifestMismatch { dir: String, name: String },

    /// Workspace path is not an existing directory.
    #[error("workspace not found at '{0}'")]
    WorkspaceNotFound(PathBuf),

    /// VS Code extensions directory missing.
    #[error("VS Code extensions directory not found at '{0}'")]
    VscodeDirNotFound(PathBuf),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Core library error.
    #[error("core error: {0}")]
    Core(#[from] quill_core::CoreError),
}
