//! CLI command implementations.

use crate::output::{self, OutputFormat};
use anyhow::{Context, Result};
use quill_core::{FileCategory, ScanReport, Workspace, WorkspaceFileEntry};
use quill_fs::{import_vscode_extensions, ExtensionRegistry, HostConfig, ImportFilter, WorkspaceIndex};
use serde::Serialize;
use std::path::Path;

/// Open the configured registry and load what is installed.
fn open_registry(config: &HostConfig) -> Result<ExtensionRegistry> {
    let mut registry = ExtensionRegistry::new(config.extensions_dir(), config.extensions.clone())
        .context("Failed to open extensions directory")?;

    let report = registry
        .initialize()
        .context("Failed to scan extensions directory")?;
    warn_failures(&report);

    Ok(registry)
}

fn warn_failures(report: &ScanReport) {
    for failure in &report.failures {
        output::print_warning(&format!(
            "skipped {}: {}",
            failure.path.display(),
            failure.reason
        ));
    }
}

/// List installed extensions.
pub fn list(config: &HostConfig, format: OutputFormat) -> Result<()> {
    let registry = open_registry(config)?;
    let records: Vec<_> = registry.installed().collect();
    output::print_extension_list(&records, format)
}

/// Show one installed extension.
pub fn show(config: &HostConfig, id: &str, format: OutputFormat) -> Result<()> {
    let registry = open_registry(config)?;
    let record = registry
        .get(id)
        .with_context(|| format!("Extension not installed: {id}"))?;
    output::print(record, format)
}

/// Install an extension.
pub fn install(
    config: &HostConfig,
    id: &str,
    version: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let mut registry = open_registry(config)?;
    let record = registry
        .install(id, version)
        .with_context(|| format!("Failed to install {id}"))?;
    output::print(&record, format)
}

/// Uninstall an extension.
pub fn uninstall(config: &HostConfig, id: &str, format: OutputFormat) -> Result<()> {
    let mut registry = open_registry(config)?;
    registry
        .uninstall(id)
        .with_context(|| format!("Failed to uninstall {id}"))?;
    output::print_success(&format!("Uninstalled {id}"), format)
}

/// Search installed extensions.
pub fn search(config: &HostConfig, query: &str, format: OutputFormat) -> Result<()> {
    let registry = open_registry(config)?;
    let results = registry.search(query);
    output::print_extension_list(&results, format)
}

/// Import extensions from a VS Code data directory.
pub fn import(
    config: &HostConfig,
    vscode_dir: &Path,
    themes_only: bool,
    format: OutputFormat,
) -> Result<()> {
    let mut registry = open_registry(config)?;
    let filter = if themes_only {
        ImportFilter::Themes
    } else {
        ImportFilter::All
    };

    let report = import_vscode_extensions(&mut registry, vscode_dir, filter)
        .context("Failed to import VS Code extensions")?;
    output::print(&report, format)
}

/// Workspace index as printed by `files` in JSON and YAML output.
#[derive(Serialize)]
struct WorkspaceListing<'a> {
    workspace: &'a Workspace,
    files: Vec<&'a WorkspaceFileEntry>,
    scan: &'a ScanReport,
}

/// Index a workspace and list its files.
pub fn files(path: &Path, category: Option<FileCategory>, format: OutputFormat) -> Result<()> {
    let mut index = WorkspaceIndex::new();
    index
        .open_workspace(path)
        .with_context(|| format!("Failed to open workspace {}", path.display()))?;

    let Some(workspace) = index.current_workspace() else {
        anyhow::bail!("No workspace open");
    };
    let files: Vec<_> = match category {
        Some(category) => index.files_by_category(category).collect(),
        None => index.files().iter().collect(),
    };

    if matches!(format, OutputFormat::Human) {
        println!("{}", output::HumanDisplay::human_display(workspace));
        output::print_file_list(&files, format)?;
        warn_failures(index.last_scan());
        return Ok(());
    }

    output::print_structured(
        &WorkspaceListing {
            workspace,
            files,
            scan: index.last_scan(),
        },
        format,
    )
}
