//! quill-core: Domain models for the extension registry and workspace index.
//!
//! This crate provides:
//! - `ExtensionId`, `ExtensionRecord`, `ExtensionManifest`: installed extension metadata
//! - `FileCategory`, `WorkspaceFileEntry`: classified workspace files
//! - `Workspace`: the currently open workspace root
//! - `ScanReport`: outcome of bulk operations that tolerate per-item failures

pub mod error;
pub mod extension;
pub mod file;
pub mod scan;
pub mod workspace;

pub use error::{CoreError, Result};
pub use extension::{Engines, ExtensionId, ExtensionManifest, ExtensionRecord};
pub use file::{relative_path, FileCategory, WorkspaceFileEntry};
pub use scan::{ScanFailure, ScanReport};
pub use workspace::Workspace;
