//! The open workspace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// A directory opened as the editor's workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    /// Root directory.
    pub root: PathBuf,

    /// Final segment of the root path.
    pub name: String,

    /// When the workspace was opened.
    pub opened_at: DateTime<Utc>,
}

impl Workspace {
    /// Create a workspace rooted at `root`, opened now.
    ///
    /// `.` and `..` segments are folded so the name is the real last segment.
    #[must_use]
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = fold_dots(root.as_ref());
        let name = root
            .file_name()
            .map_or_else(|| root.display().to_string(), |n| n.to_string_lossy().into_owned());

        Self {
            root,
            name,
            opened_at: Utc::now(),
        }
    }

    /// Root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// True if `path` lies inside this workspace.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        path.starts_with(&self.root)
    }
}

/// Lexically drop `.` segments and resolve `..` against the preceding segment.
fn fold_dots(path: &Path) -> PathBuf {
    let mut folded = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(folded.components().next_back(), Some(Component::Normal(_))) {
                    folded.pop();
                } else if !folded.has_root() {
                    folded.push(component);
                }
            }
            other => folded.push(other),
        }
    }

    folded
}
