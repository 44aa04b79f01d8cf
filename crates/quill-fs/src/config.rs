//! Host configuration.

use crate::error::Result;
use quill_core::extension::{DEFAULT_ENTRY_POINT, DEFAULT_HOST_RANGE, DEFAULT_VERSION};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extensions directory used when the configuration names none.
pub const DEFAULT_EXTENSIONS_DIR: &str = ".quill/extensions";

/// Host configuration, usually loaded from a YAML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostConfig {
    /// Root directory holding one subdirectory per installed extension.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions_dir: Option<PathBuf>,

    /// Values written into newly installed extensions.
    #[serde(default)]
    pub extensions: ExtensionDefaults,
}

/// Values used when installing an extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionDefaults {
    /// Version recorded when the installer names none.
    #[serde(default = "default_extension_version")]
    pub default_version: String,

    /// Host version range written to `engines.hostVersionRange`.
    #[serde(default = "default_host_version_range")]
    pub host_version_range: String,

    /// Entry-point file name created in the extension directory.
    #[serde(default = "default_entry_point")]
    pub entry_point: String,
}

fn default_extension_version() -> String {
    DEFAULT_VERSION.to_string()
}

fn default_host_version_range() -> String {
    DEFAULT_HOST_RANGE.to_string()
}

fn default_entry_point() -> String {
    DEFAULT_ENTRY_POINT.to_string()
}

impl Default for ExtensionDefaults {
    fn default() -> Self {
        Self {
            default_version: default_extension_version(),
            host_version_range: default_host_version_range(),
            entry_point: default_entry_point(),
        }
    }
}

impl HostConfig {
    /// Load a config file.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or is not valid YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;

        debug!(path = %path.display(), "Loaded host config");

        Ok(config)
    }

    /// Set the extensions directory.
    #[must_use]
    pub fn with_extensions_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.extensions_dir = Some(dir.into());
        self
    }

    /// Configured extensions directory, or the default.
    #[must_use]
    pub fn extensions_dir(&self) -> PathBuf {
        self.extensions_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_EXTENSIONS_DIR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = HostConfig::default();
        assert_eq!(config.extensions_dir(), PathBuf::from(DEFAULT_EXTENSIONS_DIR));
        assert_eq!(config.extensions.default_version, "1.0.0");
        assert_eq!(config.extensions.entry_point, "extension.js");
    }

    #[test]
    fn test_load_partial_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.yml");
        fs::write(
            &path,
            "extensions_dir: /opt/quill/extensions\nextensions:\n  default_version: 0.1.0\n",
        )
        .unwrap();

        let config = HostConfig::load(&path).unwrap();
        assert_eq!(config.extensions_dir(), PathBuf::from("/opt/quill/extensions"));
        assert_eq!(config.extensions.default_version, "0.1.0");
        assert_eq!(config.extensions.host_version_range, "^1.0.0");
    }

    #[test]
    fn test_load_rejects_unknown_shape() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.yml");
        fs::write(&path, "extensions: [not, a, map]\n").unwrap();

        assert!(HostConfig::load(&path).is_err());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let tmp = TempDir::new().unwrap();
        assert!(HostConfig::load(tmp.path().join("absent.yml")).is_err());
    }

    #[test]
    fn test_with_extensions_dir_overrides() {
        let config = HostConfig::default().with_extensions_dir("/data/ext");
        assert_eq!(config.extensions_dir(), PathBuf::from("/data/ext"));
    }
}
