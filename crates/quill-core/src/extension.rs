//! Extension identity, registry records and on-disk manifests.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::path::PathBuf;

/// Version written to manifests when the installer does not name one.
pub const DEFAULT_VERSION: &str = "1.0.0";
/// Host version range written to new manifests.
pub const DEFAULT_HOST_RANGE: &str = "^1.0.0";
/// Placeholder entry-point file created on install.
pub const DEFAULT_ENTRY_POINT: &str = "extension.js";

/// Identifier of an installed extension, `<publisher>.<name>`.
///
/// The id doubles as the directory name under the extensions root, so it
/// must be a single normal path segment.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExtensionId(String);

impl ExtensionId {
    /// Parse and validate an extension id.
    ///
    /// # Errors
    /// Returns `InvalidExtensionId` if the id is empty, `.`/`..`, or contains
    /// a path separator or NUL.
    pub fn parse(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        if raw.is_empty() || raw == "." || raw == ".." || raw.contains(['/', '\\', '\0']) {
            return Err(CoreError::InvalidExtensionId(raw));
        }
        Ok(Self(raw))
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Publisher segment: everything before the first `.`, or the whole id.
    #[must_use]
    pub fn publisher(&self) -> &str {
        self.0.split_once('.').map_or(self.0.as_str(), |(publisher, _)| publisher)
    }

    /// Name segment: everything after the first `.`, or the whole id.
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.split_once('.').map_or(self.0.as_str(), |(_, name)| name)
    }
}

impl TryFrom<String> for ExtensionId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<ExtensionId> for String {
    fn from(id: ExtensionId) -> Self {
        id.0
    }
}

impl Borrow<str> for ExtensionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExtensionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// An installed extension as tracked by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionRecord {
    /// Unique id, also the install directory name.
    pub id: ExtensionId,

    /// Opaque version string.
    pub version: String,

    /// `<extensions root>/<id>`.
    pub install_path: PathBuf,

    /// Whether the extension is enabled. Not persisted.
    pub enabled: bool,
}

impl ExtensionRecord {
    /// Create an enabled record.
    #[must_use]
    pub fn new(id: ExtensionId, version: impl Into<String>, install_path: impl Into<PathBuf>) -> Self {
        Self {
            id,
            version: version.into(),
            install_path: install_path.into(),
            enabled: true,
        }
    }

    /// Publisher segment of the id.
    #[must_use]
    pub fn publisher(&self) -> &str {
        self.id.publisher()
    }
}

/// Host engine compatibility declared by a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engines {
    /// Range of host versions the extension runs on.
    #[serde(rename = "hostVersionRange", default = "default_host_range")]
    pub host_version_range: String,
}

fn default_host_range() -> String {
    DEFAULT_HOST_RANGE.to_string()
}

impl Default for Engines {
    fn default() -> Self {
        Self {
            host_version_range: default_host_range(),
        }
    }
}

/// Per-extension metadata stored as `manifest.yml` in the extension directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionManifest {
    /// Extension id.
    pub name: String,

    /// Extension version.
    pub version: String,

    /// Publisher, the id prefix before the first `.`.
    pub publisher: String,

    /// Engine compatibility.
    #[serde(default)]
    pub engines: Engines,

    /// Entry-point file name relative to the extension directory.
    #[serde(default = "default_entry_point")]
    pub main: String,
}

fn default_entry_point() -> String {
    DEFAULT_ENTRY_POINT.to_string()
}

impl ExtensionManifest {
    /// Build the manifest written when installing `id` at `version`.
    #[must_use]
    pub fn for_install(id: &ExtensionId, version: impl Into<String>) -> Self {
        Self {
            name: id.to_string(),
            version: version.into(),
            publisher: id.publisher().to_string(),
            engines: Engines::default(),
            main: default_entry_point(),
        }
    }

    /// Set the host version range.
    #[must_use]
    pub fn with_host_range(mut self, range: impl Into<String>) -> Self {
        self.engines.host_version_range = range.into();
        self
    }

    /// Set the entry-point file name.
    #[must_use]
    pub fn with_main(mut self, main: impl Into<String>) -> Self {
        self.main = main.into();
        self
    }

    /// Validated id named by this manifest.
    ///
    /// # Errors
    /// Returns `InvalidExtensionId` if `name` is not a valid id.
    pub fn id(&self) -> Result<ExtensionId> {
        ExtensionId::parse(self.name.as_str())
    }
}
