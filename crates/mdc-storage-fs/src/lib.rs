//! Filesystem storage implementation for mdc-docs.
//!
//! This crate provides [`FsStorage`], a filesystem-based implementation of the
//! [`Storage`](mdc_storage::Storage) trait. It handles:
//!
//! - Recursive directory scanning for rule files (`*.mdc` by default)
//! - Canonical `/`-separated paths regardless of host separator
//! - Raw content and modification time retrieval
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use mdc_storage::Storage;
//! use mdc_storage_fs::FsStorage;
//!
//! let storage = FsStorage::new(PathBuf::from(".cursor/rules"));
//! for path in storage.scan()? {
//!     println!("{path}");
//! }
//! ```

mod scanner;

use std::fs;
use std::path::PathBuf;
use std::time::UNIX_EPOCH;

use mdc_storage::{Storage, StorageError, StorageErrorKind};

use scanner::Scanner;

const BACKEND: &str = "Fs";

/// Default rule file extension.
const DEFAULT_EXTENSION: &str = "mdc";

/// Filesystem storage implementation.
///
/// Scans a source directory recursively for rule files. Paths handed out and
/// accepted are canonical (relative, `/`-separated, with extension).
pub struct FsStorage {
    /// Root directory for rule documents.
    source_dir: PathBuf,
    /// Scanner for document discovery.
    scanner: Scanner,
}

impl FsStorage {
    /// Create a new filesystem storage for `.mdc` rules.
    ///
    /// # Arguments
    ///
    /// * `source_dir` - Root directory containing rule files
    #[must_use]
    pub fn new(source_dir: PathBuf) -> Self {
        Self::with_extension(source_dir, DEFAULT_EXTENSION)
    }

    /// Create a new filesystem storage with a custom rule extension.
    ///
    /// # Arguments
    ///
    /// * `source_dir` - Root directory containing rule files
    /// * `extension` - Rule extension, with or without the leading dot
    #[must_use]
    pub fn with_extension(source_dir: PathBuf, extension: &str) -> Self {
        let extension = extension.trim_start_matches('.').to_owned();
        let scanner = Scanner::new(source_dir.clone(), extension);
        Self {
            source_dir,
            scanner,
        }
    }

    /// Reject paths that could escape the source directory.
    fn validate_path(path: &str) -> Result<(), StorageError> {
        let escapes = path.starts_with('/')
            || path.starts_with('\\')
            || path.split(['/', '\\']).any(|segment| segment == "..");
        if path.is_empty() || escapes {
            return Err(StorageError::new(StorageErrorKind::InvalidPath)
                .with_path(path)
                .with_backend(BACKEND));
        }
        Ok(())
    }

    /// Map a canonical path to a file under the source directory.
    fn full_path(&self, path: &str) -> PathBuf {
        path.split(['/', '\\'])
            .filter(|segment| !segment.is_empty() && *segment != ".")
            .fold(self.source_dir.clone(), |acc, segment| acc.join(segment))
    }
}

impl Storage for FsStorage {
    fn scan(&self) -> Result<Vec<String>, StorageError> {
        if !self.source_dir.exists() {
            tracing::warn!(
                source_dir = %self.source_dir.display(),
                "Rules directory does not exist"
            );
        }
        let paths = self.scanner.scan();
        tracing::debug!(count = paths.len(), "Rules directory scanned");
        Ok(paths)
    }

    fn read(&self, path: &str) -> Result<String, StorageError> {
        Self::validate_path(path)?;
        fs::read_to_string(self.full_path(path))
            .map_err(|e| StorageError::io(e, Some(PathBuf::from(path))).with_backend(BACKEND))
    }

    fn mtime(&self, path: &str) -> Result<f64, StorageError> {
        Self::validate_path(path)?;
        let modified = fs::metadata(self.full_path(path))
            .and_then(|m| m.modified())
            .map_err(|e| StorageError::io(e, Some(PathBuf::from(path))).with_backend(BACKEND))?;
        Ok(modified
            .duration_since(UNIX_EPOCH)
            .map_or(0.0, |d| d.as_secs_f64()))
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use pretty_assertions::assert_eq;

    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_fs_storage_is_send_sync() {
        assert_send_sync::<FsStorage>();
    }

    fn create_test_dir() -> tempfile::TempDir {
        tempfile::tempdir().unwrap()
    }

    fn write_rules(dir: &Path) {
        fs::write(
            dir.join("main.mdc"),
            "---\nsidebarPosition: 1\n---\n# Main\n\nSee ./modes/plan.mdc\n",
        )
        .unwrap();
        let modes = dir.join("modes");
        fs::create_dir(&modes).unwrap();
        fs::write(modes.join("plan.mdc"), "# Plan\n").unwrap();
    }

    #[test]
    fn test_scan_empty_dir() {
        let temp_dir = create_test_dir();
        let storage = FsStorage::new(temp_dir.path().to_path_buf());

        assert!(storage.scan().unwrap().is_empty());
    }

    #[test]
    fn test_scan_missing_dir() {
        let storage = FsStorage::new(PathBuf::from("/nonexistent/rules"));

        assert!(storage.scan().unwrap().is_empty());
    }

    #[test]
    fn test_scan_nested_structure() {
        let temp_dir = create_test_dir();
        write_rules(temp_dir.path());
        let storage = FsStorage::new(temp_dir.path().to_path_buf());

        assert_eq!(storage.scan().unwrap(), vec!["main.mdc", "modes/plan.mdc"]);
    }

    #[test]
    fn test_read_nested() {
        let temp_dir = create_test_dir();
        write_rules(temp_dir.path());
        let storage = FsStorage::new(temp_dir.path().to_path_buf());

        assert_eq!(storage.read("modes/plan.mdc").unwrap(), "# Plan\n");
    }

    #[test]
    fn test_read_accepts_backslash_separator() {
        let temp_dir = create_test_dir();
        write_rules(temp_dir.path());
        let storage = FsStorage::new(temp_dir.path().to_path_buf());

        assert_eq!(storage.read("modes\\plan.mdc").unwrap(), "# Plan\n");
    }

    #[test]
    fn test_read_missing() {
        let temp_dir = create_test_dir();
        let storage = FsStorage::new(temp_dir.path().to_path_buf());

        let err = storage.read("missing.mdc").unwrap_err();

        assert_eq!(err.kind, StorageErrorKind::NotFound);
        assert_eq!(err.backend, Some("Fs"));
    }

    #[test]
    fn test_read_rejects_traversal() {
        let temp_dir = create_test_dir();
        let storage = FsStorage::new(temp_dir.path().to_path_buf());

        for path in ["../secret.mdc", "modes/../../x.mdc", "/etc/passwd", ""] {
            let err = storage.read(path).unwrap_err();
            assert_eq!(err.kind, StorageErrorKind::InvalidPath, "path: {path}");
        }
    }

    #[test]
    fn test_mtime() {
        let temp_dir = create_test_dir();
        write_rules(temp_dir.path());
        let storage = FsStorage::new(temp_dir.path().to_path_buf());

        assert!(storage.mtime("main.mdc").unwrap() > 0.0);
        assert!(storage.mtime("missing.mdc").is_err());
    }

    #[test]
    fn test_load_parses_frontmatter() {
        let temp_dir = create_test_dir();
        write_rules(temp_dir.path());
        let storage = FsStorage::new(temp_dir.path().to_path_buf());

        let source = storage.load("main.mdc").unwrap();

        assert_eq!(source.metadata.position, Some(1.0));
        assert_eq!(source.body, "# Main\n\nSee ./modes/plan.mdc\n");
        assert!(source.mtime.is_some());
    }

    #[test]
    fn test_with_extension_strips_dot() {
        let temp_dir = create_test_dir();
        fs::write(temp_dir.path().join("guide.md"), "# Guide").unwrap();
        fs::write(temp_dir.path().join("rule.mdc"), "# Rule").unwrap();
        let storage = FsStorage::with_extension(temp_dir.path().to_path_buf(), ".md");

        assert_eq!(storage.scan().unwrap(), vec!["guide.md"]);
    }
}
