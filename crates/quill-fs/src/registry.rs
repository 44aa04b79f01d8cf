//! Installed extension registry.

use crate::config::ExtensionDefaults;
use crate::error::{FsError, Result};
use quill_core::{ExtensionId, ExtensionManifest, ExtensionRecord, ScanReport};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Manifest file name within an extension directory.
const MANIFEST_FILE: &str = "manifest.yml";
/// Staging file the manifest is written to before being renamed into place.
const MANIFEST_TMP_FILE: &str = "manifest.yml.tmp";
/// Contents of the entry-point file created on install.
const ENTRY_POINT_PLACEHOLDER: &str = "// Extension entry point\n";

/// Tracks installed extensions, one directory per extension under `root`.
///
/// The directory tree is the durable state. The in-memory map is rebuilt by
/// [`ExtensionRegistry::initialize`] and kept in step by the mutating calls.
#[derive(Debug)]
pub struct ExtensionRegistry {
    /// Extensions root directory.
    root: PathBuf,
    /// Values written into new manifests.
    defaults: ExtensionDefaults,
    /// Registered extensions by id.
    extensions: BTreeMap<ExtensionId, ExtensionRecord>,
}

impl ExtensionRegistry {
    /// Create a registry over `root`, creating the directory if needed.
    ///
    /// The registry starts empty; call [`initialize`](Self::initialize) to
    /// load what is already installed.
    ///
    /// # Errors
    /// Returns error if the root cannot be created or resolved.
    pub fn new(root: impl AsRef<Path>, defaults: ExtensionDefaults) -> Result<Self> {
        let root = std::path::absolute(root.as_ref())?;

        if !root.exists() {
            fs::create_dir_all(&root)?;
            info!(path = %root.display(), "Created extensions directory");
        }

        Ok(Self {
            root,
            defaults,
            extensions: BTreeMap::new(),
        })
    }

    /// Get the extensions root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Rebuild the registry from the extension directories on disk.
    ///
    /// Directories with a missing, unparsable or mismatched manifest are
    /// skipped and reported. Every loaded extension starts enabled.
    ///
    /// # Errors
    /// Returns error only if the root itself cannot be read.
    pub fn initialize(&mut self) -> Result<ScanReport> {
        info!(path = %self.root.display(), "Scanning installed extensions");

        self.extensions.clear();
        let mut report = ScanReport::default();

        for dir in list_subdirectories(&self.root, &mut report)? {
            match self.load_record(&dir) {
                Ok(record) => {
                    debug!(id = %record.id, version = %record.version, "Loaded extension");
                    self.extensions.insert(record.id.clone(), record);
                    report.record_success();
                }
                Err(e) => {
                    warn!(dir = %dir.display(), error = %e, "Skipping extension directory");
                    report.record_failure(dir, e);
                }
            }
        }

        info!(
            loaded = report.succeeded,
            failed = report.failed(),
            "Loaded installed extensions"
        );

        Ok(report)
    }

    /// All registered extensions, ordered by id.
    pub fn installed(&self) -> impl Iterator<Item = &ExtensionRecord> {
        self.extensions.values()
    }

    /// Get an extension by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ExtensionRecord> {
        self.extensions.get(id)
    }

    /// Check whether an extension is registered.
    #[must_use]
    pub fn is_installed(&self, id: &str) -> bool {
        self.extensions.contains_key(id)
    }

    /// Registered extensions whose id or publisher contains `query`, ignoring case.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&ExtensionRecord> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        self.extensions
            .values()
            .filter(|r| {
                r.id.as_str().to_lowercase().contains(&query)
                    || r.publisher().to_lowercase().contains(&query)
            })
            .collect()
    }

    /// Install an extension.
    ///
    /// Creates `<root>/<id>` with a manifest and a placeholder entry point,
    /// then registers the extension as enabled. An already registered id is
    /// never overwritten. On failure nothing is registered, and a directory
    /// created by this call is removed again.
    ///
    /// # Errors
    /// Returns error if the id is invalid or already installed, or IO fails.
    pub fn install(&mut self, id: &str, version: Option<&str>) -> Result<ExtensionRecord> {
        let id = ExtensionId::parse(id)?;
        let version = version.unwrap_or(&self.defaults.default_version).to_string();

        info!(id = %id, version = %version, "Installing extension");

        if self.extensions.contains_key(&id) {
            warn!(id = %id, "Extension is already installed");
            return Err(FsError::ExtensionExists(id.to_string()));
        }

        let dir = self.extension_dir(&id);
        let created = !dir.exists();
        let manifest = ExtensionManifest::for_install(&id, &version)
            .with_host_range(&self.defaults.host_version_range)
            .with_main(&self.defaults.entry_point);

        if let Err(e) = write_layout(&dir, &manifest) {
            error!(id = %id, error = %e, "Failed to install extension");
            if created {
                if let Err(cleanup) = fs::remove_dir_all(&dir) {
                    warn!(dir = %dir.display(), error = %cleanup, "Failed to remove partial install");
                }
            }
            return Err(e);
        }

        let record = ExtensionRecord::new(id.clone(), version, dir);
        self.extensions.insert(id, record.clone());

        Ok(record)
    }

    /// Uninstall an extension, deleting its directory.
    ///
    /// The record is dropped only after the directory is gone, so a failed
    /// delete leaves the extension registered.
    ///
    /// # Errors
    /// Returns error if the extension is not installed or deletion fails.
    pub fn uninstall(&mut self, id: &str) -> Result<ExtensionRecord> {
        info!(id = %id, "Uninstalling extension");

        let Some(record) = self.extensions.get(id) else {
            warn!(id = %id, "Extension is not installed");
            return Err(FsError::ExtensionNotFound(id.to_string()));
        };

        match fs::remove_dir_all(&record.install_path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(id = %id, "Extension directory already removed");
            }
            Err(e) => {
                error!(id = %id, error = %e, "Failed to remove extension directory");
                return Err(e.into());
            }
        }

        self.extensions
            .remove(id)
            .ok_or_else(|| FsError::ExtensionNotFound(id.to_string()))
    }

    /// Enable an extension. Not persisted.
    ///
    /// # Errors
    /// Returns error if the extension is not installed.
    pub fn enable(&mut self, id: &str) -> Result<()> {
        self.set_enabled(id, true)
    }

    /// Disable an extension. Not persisted.
    ///
    /// # Errors
    /// Returns error if the extension is not installed.
    pub fn disable(&mut self, id: &str) -> Result<()> {
        self.set_enabled(id, false)
    }

    // Private helpers

    fn set_enabled(&mut self, id: &str, enabled: bool) -> Result<()> {
        let record = self
            .extensions
            .get_mut(id)
            .ok_or_else(|| FsError::ExtensionNotFound(id.to_string()))?;

        if record.enabled != enabled {
            record.enabled = enabled;
            info!(id = %id, enabled, "Changed extension state");
        }

        Ok(())
    }

    fn extension_dir(&self, id: &ExtensionId) -> PathBuf {
        self.root.join(id.as_str())
    }

    fn load_record(&self, dir: &Path) -> Result<ExtensionRecord> {
        let manifest = read_manifest(dir)?;
        let id = manifest.id()?;

        let dir_name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if id.as_str() != dir_name {
            return Err(FsError::ManifestMismatch {
                dir: dir_name,
                name: manifest.name,
            });
        }

        let install_path = self.extension_dir(&id);
        Ok(ExtensionRecord::new(id, manifest.version, install_path))
    }
}

/// Immediate subdirectories of `dir`, sorted by path.
///
/// Entries that cannot be read are recorded in `report` and skipped.
pub(crate) fn list_subdirectories(dir: &Path, report: &mut ScanReport) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();

    for entry in fs::read_dir(dir)? {
        match entry {
            Ok(entry) => {
                let path = entry.path();
                if path.is_dir() {
                    dirs.push(path);
                }
            }
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "Failed to read directory entry");
                report.record_failure(dir, e);
            }
        }
    }

    dirs.sort();
    Ok(dirs)
}

fn read_manifest(dir: &Path) -> Result<ExtensionManifest> {
    let content = fs::read_to_string(dir.join(MANIFEST_FILE))?;
    let manifest: ExtensionManifest = serde_yaml::from_str(&content)?;
    Ok(manifest)
}

fn write_manifest(dir: &Path, manifest: &ExtensionManifest) -> Result<()> {
    let tmp_path = dir.join(MANIFEST_TMP_FILE);
    fs::write(&tmp_path, serde_yaml::to_string(manifest)?)?;

    if let Err(e) = fs::rename(&tmp_path, dir.join(MANIFEST_FILE)) {
        fs::remove_file(&tmp_path).ok();
        return Err(e.into());
    }

    Ok(())
}

/// Lay out an extension directory. The manifest rename is the last step, so a
/// failure anywhere leaves no manifest for the next scan to pick up.
fn write_layout(dir: &Path, manifest: &ExtensionManifest) -> Result<()> {
    fs::create_dir_all(dir)?;
    fs::write(dir.join(&manifest.main), ENTRY_POINT_PLACEHOLDER)?;
    write_manifest(dir, manifest)
}
