//! File System Access
//!
//! Path resolution and file I/O for the driver: expands directories into
//! their Python files with a gitignore-aware walk, reads and writes
//! source text.

use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use tracing::debug;

use crate::constants::fs::PYTHON_EXTENSION;
use crate::types::Result;

/// Path resolution and source file I/O.
pub struct FileSystemService;

impl FileSystemService {
    pub fn new() -> Self {
        Self
    }

    /// True when every given path exists and at least one was given.
    pub fn is_valid_paths(&self, paths: &[PathBuf]) -> bool {
        !paths.is_empty() && paths.iter().all(|p| p.exists())
    }

    pub fn read_file(&self, path: &Path) -> Result<String> {
        Ok(fs::read_to_string(path)?)
    }

    pub fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        Ok(fs::write(path, content)?)
    }

    /// Expand a mixed list of files and directories into an ordered list
    /// of Python file paths. Explicitly named files pass through as-is;
    /// directories are walked.
    pub fn resolve_paths(&self, paths: &[PathBuf]) -> Vec<PathBuf> {
        let mut resolved = Vec::new();
        for path in paths {
            if path.is_dir() {
                resolved.extend(self.find_python_files(path));
            } else {
                resolved.push(path.clone());
            }
        }
        resolved
    }

    /// Recursively collect `.py` files under `root`, honoring gitignore
    /// rules, skipping hidden entries, and not following symlinks.
    pub fn find_python_files(&self, root: &Path) -> Vec<PathBuf> {
        let walker = WalkBuilder::new(root)
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .follow_links(false)
            .build();

        let mut files: Vec<PathBuf> = walker
            .filter_map(|e| e.ok())
            .filter(|entry| entry.path().is_file() && is_python_file(entry.path()))
            .map(|entry| entry.path().to_path_buf())
            .collect();
        files.sort();

        debug!(
            "Found {} Python files under {}",
            files.len(),
            root.display()
        );
        files
    }
}

impl Default for FileSystemService {
    fn default() -> Self {
        Self::new()
    }
}

fn is_python_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(PYTHON_EXTENSION)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, "x = 1\n").unwrap();
        path
    }

    #[test]
    fn test_is_valid_paths() {
        let dir = TempDir::new().unwrap();
        let file = touch(dir.path(), "a.py");
        let service = FileSystemService::new();

        assert!(service.is_valid_paths(&[file.clone()]));
        assert!(service.is_valid_paths(&[file, dir.path().to_path_buf()]));
        assert!(!service.is_valid_paths(&[dir.path().join("missing.py")]));
        assert!(!service.is_valid_paths(&[]));
    }

    #[test]
    fn test_read_write_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.py");
        let service = FileSystemService::new();

        service.write_file(&path, "def f():\n    pass\n").unwrap();
        assert_eq!(service.read_file(&path).unwrap(), "def f():\n    pass\n");
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let service = FileSystemService::new();

        let err = service.read_file(&dir.path().join("nope.py")).unwrap_err();
        assert!(matches!(err, crate::types::DocweaveError::Io(_)));
    }

    #[test]
    fn test_find_python_files_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        let a = touch(dir.path(), "a.py");
        touch(dir.path(), "notes.txt");
        let nested = touch(dir.path(), "pkg/mod.py");
        touch(dir.path(), ".hidden/secret.py");

        let found = FileSystemService::new().find_python_files(dir.path());
        assert_eq!(found, vec![a, nested]);
    }

    #[test]
    fn test_resolve_paths_mixes_files_and_directories() {
        let dir = TempDir::new().unwrap();
        let explicit = touch(dir.path(), "explicit.txt");
        let inside = touch(dir.path(), "sub/inner.py");
        touch(dir.path(), "sub/skipped.txt");

        let service = FileSystemService::new();
        let resolved =
            service.resolve_paths(&[explicit.clone(), dir.path().join("sub")]);

        assert_eq!(resolved, vec![explicit, inside]);
    }
}
