//! Error types for quill-core.

use thiserror::Error;

/// Result type alias for quill-core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can occur in quill-core operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Extension id cannot name a directory under the extensions root.
    #[error("invalid extension id: '{0}'")]
    InvalidExtensionId(String),

    /// File category name not recognized.
    #[error("unknown file category: {0}")]
    UnknownCategory(String),
}
