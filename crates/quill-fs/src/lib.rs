//! Filesystem backends for the quill editor shell.
//!
//! Extensions live one per directory under the extensions root:
//! - `<id>/manifest.yml`: Extension metadata
//! - `<id>/<entry point>`: Placeholder entry-point file
//!
//! Workspaces are plain directories; nothing is written into them.

pub mod config;
pub mod error;
pub mod import;
pub mod index;
pub mod registry;

pub use config::{ExtensionDefaults, HostConfig};
pub use error::{FsError, Result};
pub use import::{import_vscode_extensions, ImportFilter};
pub use index::WorkspaceIndex;
pub use registry::ExtensionRegistry;
