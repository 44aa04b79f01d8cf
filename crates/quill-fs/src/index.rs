//! Index of the files in the open workspace.

use crate::error::{FsError, Result};
use quill_core::{FileCategory, ScanReport, Workspace, WorkspaceFileEntry};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Holds at most one open workspace and the flat list of its visible files.
#[derive(Debug, Default)]
pub struct WorkspaceIndex {
    /// Currently open workspace.
    workspace: Option<Workspace>,
    /// Indexed files, in walk order.
    files: Vec<WorkspaceFileEntry>,
    /// Outcome of the last scan.
    last_scan: ScanReport,
}

impl WorkspaceIndex {
    /// Create an index with no workspace open.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `path` as the workspace, replacing any open one, and index it.
    ///
    /// Entries that cannot be read during the scan are skipped and recorded
    /// in [`last_scan`](Self::last_scan); the workspace still opens.
    ///
    /// # Errors
    /// Returns `WorkspaceNotFound` if `path` is not an existing directory.
    /// The current workspace is left open in that case.
    pub fn open_workspace(&mut self, path: impl AsRef<Path>) -> Result<&Workspace> {
        let path = path.as_ref();
        info!(path = %path.display(), "Opening workspace");

        if !path.is_dir() {
            warn!(path = %path.display(), "Workspace directory does not exist");
            return Err(FsError::WorkspaceNotFound(path.to_path_buf()));
        }

        let workspace = Workspace::new(std::path::absolute(path)?);
        self.close_workspace();

        let (files, report) = scan_files(&workspace);
        info!(
            path = %workspace.root().display(),
            files = files.len(),
            failed = report.failed(),
            "Indexed workspace"
        );

        self.files = files;
        self.last_scan = report;

        Ok(&*self.workspace.insert(workspace))
    }

    /// Close the open workspace, if any, and drop its index.
    pub fn close_workspace(&mut self) {
        let Some(workspace) = self.workspace.take() else {
            return;
        };

        info!(path = %workspace.root.display(), "Closing workspace");

        self.files.clear();
        self.last_scan = ScanReport::default();
    }

    /// Get the open workspace.
    #[must_use]
    pub const fn current_workspace(&self) -> Option<&Workspace> {
        self.workspace.as_ref()
    }

    /// Indexed files of the open workspace; empty when none is open.
    #[must_use]
    pub fn files(&self) -> &[WorkspaceFileEntry] {
        &self.files
    }

    /// Look up an indexed file by its exact absolute path.
    #[must_use]
    pub fn file(&self, path: impl AsRef<Path>) -> Option<&WorkspaceFileEntry> {
        let path = path.as_ref();
        self.files.iter().find(|f| f.path == path)
    }

    /// Indexed files in one category.
    pub fn files_by_category(
        &self,
        category: FileCategory,
    ) -> impl Iterator<Item = &WorkspaceFileEntry> {
        self.files.iter().filter(move |f| f.category == category)
    }

    /// Outcome of the scan that built the current index.
    #[must_use]
    pub const fn last_scan(&self) -> &ScanReport {
        &self.last_scan
    }
}

/// Walk the workspace root and collect its visible files.
fn scan_files(workspace: &Workspace) -> (Vec<WorkspaceFileEntry>, ScanReport) {
    let root = workspace.root();
    let mut files = Vec::new();
    let mut report = ScanReport::default();
    let mut hidden_dirs: HashSet<PathBuf> = HashSet::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().unwrap_or(root).to_path_buf();
                warn!(path = %path.display(), error = %e, "Skipping unreadable workspace entry");
                report.record_failure(path, e);
                continue;
            }
        };

        // Directories are yielded before their contents.
        if entry.file_type().is_dir() {
            if is_hidden_dir(&entry) {
                hidden_dirs.insert(entry.path().to_path_buf());
            }
            continue;
        }

        if !is_file(&entry) {
            continue;
        }

        if is_hidden_file(&entry, &hidden_dirs) {
            debug!(path = %entry.path().display(), "Skipping hidden file");
            continue;
        }

        let path = entry.into_path();
        if !workspace.contains(&path) {
            debug!(path = %path.display(), "Skipping file outside the workspace");
            continue;
        }

        if let Some(file) = WorkspaceFileEntry::new(root, path) {
            files.push(file);
            report.record_success();
        }
    }

    (files, report)
}

fn is_file(entry: &DirEntry) -> bool {
    entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
}

/// A file is hidden if its name starts with `.` or its direct parent is hidden.
///
/// Only the direct parent counts: a file under `.git/objects/` is visible.
fn is_hidden_file(entry: &DirEntry, hidden_dirs: &HashSet<PathBuf>) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
        || entry
            .path()
            .parent()
            .is_some_and(|parent| hidden_dirs.contains(parent))
}

#[cfg(windows)]
fn is_hidden_dir(entry: &DirEntry) -> bool {
    use std::os::windows::fs::MetadataExt;

    const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;

    entry
        .metadata()
        .is_ok_and(|m| m.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0)
}

#[cfg(not(windows))]
fn is_hidden_dir(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    /// Scratch directory whose own name does not start with a dot.
    fn workspace_dir() -> TempDir {
        tempfile::Builder::new().prefix("ws").tempdir().unwrap()
    }

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn relative_paths(index: &WorkspaceIndex) -> Vec<&str> {
        index.files().iter().map(|f| f.relative_path.as_str()).collect()
    }

    #[test]
    fn test_open_missing_directory() {
        let tmp = workspace_dir();
        let mut index = WorkspaceIndex::new();

        let result = index.open_workspace(tmp.path().join("absent"));
        assert!(matches!(result, Err(FsError::WorkspaceNotFound(_))));
        assert!(index.current_workspace().is_none());
    }

    #[test]
    fn test_open_file_is_not_a_workspace() {
        let tmp = workspace_dir();
        touch(tmp.path(), "file.txt");
        let mut index = WorkspaceIndex::new();

        let result = index.open_workspace(tmp.path().join("file.txt"));
        assert!(matches!(result, Err(FsError::WorkspaceNotFound(_))));
    }

    #[test]
    fn test_open_indexes_and_classifies() {
        let tmp = workspace_dir();
        touch(tmp.path(), "src/main.py");
        touch(tmp.path(), "README.md");
        touch(tmp.path(), "image.PNG");
        touch(tmp.path(), "data.bin");

        let mut index = WorkspaceIndex::new();
        let workspace = index.open_workspace(tmp.path()).unwrap();
        assert_eq!(workspace.root, tmp.path());
        assert_eq!(
            workspace.name,
            tmp.path().file_name().unwrap().to_string_lossy()
        );

        assert_eq!(
            relative_paths(&index),
            vec!["README.md", "data.bin", "image.PNG", "src/main.py"]
        );

        let category = |rel: &str| index.file(tmp.path().join(rel)).unwrap().category;
        assert_eq!(category("src/main.py"), FileCategory::Code);
        assert_eq!(category("README.md"), FileCategory::Document);
        assert_eq!(category("image.PNG"), FileCategory::Image);
        assert_eq!(category("data.bin"), FileCategory::Other);

        let main = index.file(tmp.path().join("src/main.py")).unwrap();
        assert_eq!(main.name, "main.py");
        assert_eq!(index.last_scan().succeeded, 4);
        assert!(index.last_scan().is_clean());
    }

    #[test]
    fn test_open_folds_parent_components() {
        let tmp = workspace_dir();
        touch(tmp.path(), "sub/notes.md");

        let mut index = WorkspaceIndex::new();
        let workspace = index.open_workspace(tmp.path().join("sub").join("..")).unwrap();
        assert_eq!(workspace.root, tmp.path());
        assert_eq!(
            workspace.name,
            tmp.path().file_name().unwrap().to_string_lossy()
        );

        assert_eq!(relative_paths(&index), vec!["sub/notes.md"]);
        assert!(index.file(tmp.path().join("sub/notes.md")).is_some());
    }

    #[cfg(not(windows))]
    #[test]
    fn test_hidden_files_and_parents_excluded() {
        let tmp = workspace_dir();
        touch(tmp.path(), "src/main.py");
        touch(tmp.path(), ".env");
        touch(tmp.path(), "src/.secret.json");
        touch(tmp.path(), ".git/config");
        touch(tmp.path(), "README.md");

        let mut index = WorkspaceIndex::new();
        index.open_workspace(tmp.path()).unwrap();

        assert_eq!(relative_paths(&index), vec!["README.md", "src/main.py"]);
        assert!(index.file(tmp.path().join(".git/config")).is_none());
    }

    #[cfg(not(windows))]
    #[test]
    fn test_hidden_rule_checks_only_direct_parent() {
        let tmp = workspace_dir();
        touch(tmp.path(), ".git/HEAD");
        touch(tmp.path(), ".git/objects/pack-1.idx");

        let mut index = WorkspaceIndex::new();
        index.open_workspace(tmp.path()).unwrap();

        assert_eq!(relative_paths(&index), vec![".git/objects/pack-1.idx"]);
    }

    #[test]
    fn test_reopen_replaces_index() {
        let first = workspace_dir();
        let second = workspace_dir();
        touch(first.path(), "a.rs");
        touch(second.path(), "b.ts");

        let mut index = WorkspaceIndex::new();
        index.open_workspace(first.path()).unwrap();
        index.open_workspace(second.path()).unwrap();

        assert_eq!(relative_paths(&index), vec!["b.ts"]);
        assert_eq!(index.current_workspace().unwrap().root, second.path());
        assert!(index.file(first.path().join("a.rs")).is_none());
    }

    #[test]
    fn test_failed_open_keeps_current_workspace() {
        let tmp = workspace_dir();
        touch(tmp.path(), "a.md");

        let mut index = WorkspaceIndex::new();
        index.open_workspace(tmp.path()).unwrap();
        assert!(index.open_workspace(tmp.path().join("absent")).is_err());

        assert_eq!(index.current_workspace().unwrap().root, tmp.path());
        assert_eq!(index.files().len(), 1);
    }

    #[test]
    fn test_close_clears_everything() {
        let tmp = workspace_dir();
        touch(tmp.path(), "notes.txt");

        let mut index = WorkspaceIndex::new();
        index.open_workspace(tmp.path()).unwrap();
        let path = tmp.path().join("notes.txt");
        assert!(index.file(&path).is_some());

        index.close_workspace();
        assert!(index.current_workspace().is_none());
        assert!(index.files().is_empty());
        assert!(index.file(&path).is_none());

        // Closing twice is a no-op.
        index.close_workspace();
        assert!(index.current_workspace().is_none());
    }

    #[test]
    fn test_file_lookup_is_exact() {
        let tmp = workspace_dir();
        touch(tmp.path(), "src/lib.ts");

        let mut index = WorkspaceIndex::new();
        index.open_workspace(tmp.path()).unwrap();

        assert!(index.file("src/lib.ts").is_none());
        assert!(index.file(tmp.path().join("src/lib.TS")).is_none());
        assert!(index.file(tmp.path().join("src/lib.ts")).is_some());
    }

    #[test]
    fn test_files_by_category() {
        let tmp = workspace_dir();
        touch(tmp.path(), "a.json");
        touch(tmp.path(), "b.yml");
        touch(tmp.path(), "c.py");

        let mut index = WorkspaceIndex::new();
        index.open_workspace(tmp.path()).unwrap();

        let configs: Vec<_> = index
            .files_by_category(FileCategory::Config)
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(configs, vec!["a.json", "b.yml"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_skipped() {
        let tmp = workspace_dir();
        touch(tmp.path(), "real.txt");
        std::os::unix::fs::symlink(tmp.path().join("gone.txt"), tmp.path().join("link.txt"))
            .unwrap();
        std::os::unix::fs::symlink(tmp.path().join("real.txt"), tmp.path().join("alias.txt"))
            .unwrap();

        let mut index = WorkspaceIndex::new();
        index.open_workspace(tmp.path()).unwrap();

        assert_eq!(relative_paths(&index), vec!["alias.txt", "real.txt"]);
        assert!(index.last_scan().is_clean());
    }
}
