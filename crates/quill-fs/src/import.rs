//! Import of extensions from a VS Code user data directory.

use crate::error::{FsError, Result};
use crate::registry::{list_subdirectories, ExtensionRegistry};
use quill_core::ScanReport;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Extensions directory inside the VS Code data directory.
const VSCODE_EXTENSIONS_DIR: &str = "extensions";
/// Package file of a VS Code extension.
const PACKAGE_FILE: &str = "package.json";

/// Which VS Code extensions to import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImportFilter {
    /// Every extension.
    #[default]
    All,
    /// Only extensions contributing color themes.
    Themes,
}

/// The parts of a VS Code `package.json` the importer reads.
#[derive(Debug, Deserialize)]
struct Package {
    name: String,
    #[serde(default)]
    publisher: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    contributes: Contributes,
}

#[derive(Debug, Default, Deserialize)]
struct Contributes {
    #[serde(default)]
    themes: Vec<Value>,
}

impl Package {
    fn extension_id(&self) -> String {
        match self.publisher.as_deref() {
            Some(publisher) if !publisher.is_empty() => format!("{publisher}.{}", self.name),
            _ => self.name.clone(),
        }
    }

    fn contributes_themes(&self) -> bool {
        !self.contributes.themes.is_empty()
    }
}

/// Install every extension found under `<vscode_dir>/extensions` into `registry`.
///
/// Packages that cannot be read, are already installed, or fail to install
/// are recorded in the report; the import carries on.
///
/// # Errors
/// Returns error if the VS Code extensions directory is missing or unreadable.
pub fn import_vscode_extensions(
    registry: &mut ExtensionRegistry,
    vscode_dir: impl AsRef<Path>,
    filter: ImportFilter,
) -> Result<ScanReport> {
    let extensions_dir = vscode_dir.as_ref().join(VSCODE_EXTENSIONS_DIR);
    info!(path = %extensions_dir.display(), ?filter, "Importing VS Code extensions");

    if !extensions_dir.is_dir() {
        warn!(path = %extensions_dir.display(), "VS Code extensions directory not found");
        return Err(FsError::VscodeDirNotFound(extensions_dir));
    }

    let mut report = ScanReport::default();

    for dir in list_subdirectories(&extensions_dir, &mut report)? {
        let package = match read_package(&dir) {
            Ok(package) => package,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "Skipping unreadable package");
                report.record_failure(dir, e);
                continue;
            }
        };

        if filter == ImportFilter::Themes && !package.contributes_themes() {
            debug!(dir = %dir.display(), "No themes contributed, skipping");
            continue;
        }

        match registry.install(&package.extension_id(), package.version.as_deref()) {
            Ok(record) => {
                debug!(id = %record.id, "Imported extension");
                report.record_success();
            }
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "Failed to import extension");
                report.record_failure(dir, e);
            }
        }
    }

    info!(
        imported = report.succeeded,
        attempted = report.attempted,
        "Finished VS Code import"
    );

    Ok(report)
}

fn read_package(dir: &Path) -> Result<Package> {
    let content = fs::read_to_string(dir.join(PACKAGE_FILE))?;
    let package: Package = serde_json::from_str(&content)?;
    Ok(package)
}
