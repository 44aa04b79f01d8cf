//! Workspace file entries and their classification.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

/// Coarse file category, derived from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    /// Source code.
    Code,
    /// Configuration and structured data.
    Config,
    /// Prose documents.
    Document,
    /// Raster and vector images.
    Image,
    /// Anything else.
    Other,
}

impl FileCategory {
    /// Classify a bare extension (without the leading dot), ignoring case.
    #[must_use]
    pub fn from_extension(extension: &str) -> Self {
        match extension.to_ascii_lowercase().as_str() {
            "cs" | "cpp" | "h" | "hpp" | "js" | "ts" | "py" | "java" => Self::Code,
            "json" | "xml" | "yaml" | "yml" | "toml" | "ini" => Self::Config,
            "md" | "txt" | "rtf" => Self::Document,
            "png" | "jpg" | "jpeg" | "gif" | "bmp" | "svg" => Self::Image,
            _ => Self::Other,
        }
    }

    /// Classify a path by its extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(OsStr::to_str)
            .map_or(Self::Other, Self::from_extension)
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Code => "code",
            Self::Config => "config",
            Self::Document => "document",
            Self::Image => "image",
            Self::Other => "other",
        })
    }
}

impl FromStr for FileCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "code" => Ok(Self::Code),
            "config" => Ok(Self::Config),
            "document" => Ok(Self::Document),
            "image" => Ok(Self::Image),
            "other" => Ok(Self::Other),
            _ => Err(CoreError::UnknownCategory(s.to_string())),
        }
    }
}

/// Path of `path` relative to `root`, `/`-separated, without a leading separator.
///
/// Returns `None` if `path` is not under `root`.
#[must_use]
pub fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let segments: Vec<_> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            _ => None,
        })
        .collect();
    Some(segments.join("/"))
}

/// A non-hidden file inside the open workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceFileEntry {
    /// Absolute path.
    pub path: PathBuf,

    /// Final path segment.
    pub name: String,

    /// Path relative to the workspace root.
    pub relative_path: String,

    /// Category from the file extension.
    pub category: FileCategory,
}

impl WorkspaceFileEntry {
    /// Build the entry for `path` inside the workspace at `root`.
    ///
    /// Returns `None` if `path` is not a descendant of `root`.
    #[must_use]
    pub fn new(root: &Path, path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let relative_path = relative_path(root, &path)?;
        let name = path.file_name()?.to_string_lossy().into_owned();
        let category = FileCategory::from_path(&path);

        Some(Self {
            path,
            name,
            relative_path,
            category,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_classification_table() {
        let cases = [
            ("main.py", FileCategory::Code),
            ("lib.hpp", FileCategory::Code),
            ("Program.cs", FileCategory::Code),
            ("settings.json", FileCategory::Config),
            ("ci.yml", FileCategory::Config),
            ("Cargo.toml", FileCategory::Config),
            ("README.md", FileCategory::Document),
            ("notes.rtf", FileCategory::Document),
            ("logo.svg", FileCategory::Image),
            ("photo.jpeg", FileCategory::Image),
            ("archive.tar.gz", FileCategory::Other),
            ("Makefile", FileCategory::Other),
        ];

        for (name, expected) in cases {
            assert_eq!(FileCategory::from_path(Path::new(name)), expected, "{name}");
        }
    }

    #[test]
    fn test_classification_ignores_case() {
        assert_eq!(FileCategory::from_path(Path::new("image.PNG")), FileCategory::Image);
        assert_eq!(FileCategory::from_path(Path::new("App.Java")), FileCategory::Code);
        assert_eq!(FileCategory::from_extension("YAML"), FileCategory::Config);
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("Image".parse::<FileCategory>(), Ok(FileCategory::Image));
        assert_eq!(
            "binary".parse::<FileCategory>(),
            Err(CoreError::UnknownCategory("binary".to_string()))
        );
    }

    #[test]
    fn test_relative_path_normalizes_separators() {
        let root = Path::new("/work/project");
        assert_eq!(
            relative_path(root, Path::new("/work/project/src/main.py")),
            Some("src/main.py".to_string())
        );
        assert_eq!(
            relative_path(root, Path::new("/work/project/README.md")),
            Some("README.md".to_string())
        );
        assert_eq!(relative_path(root, Path::new("/elsewhere/file.txt")), None);
    }

    #[test]
    fn test_entry_new() {
        let root = Path::new("/work/project");
        let entry = WorkspaceFileEntry::new(root, "/work/project/src/main.py").unwrap();

        assert_eq!(entry.name, "main.py");
        assert_eq!(entry.relative_path, "src/main.py");
        assert_eq!(entry.category, FileCategory::Code);
        assert!(WorkspaceFileEntry::new(root, "/tmp/main.py").is_none());
    }
}
