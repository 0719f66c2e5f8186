//! Mock storage implementation for testing.
//!
//! Provides [`MockStorage`] for unit testing without filesystem access.

use std::collections::{HashMap, HashSet};

use crate::storage::{Storage, StorageError, StorageErrorKind};

const BACKEND: &str = "Mock";

/// Mock storage for testing.
///
/// Stores rule documents in memory and returns them from `scan()` in
/// insertion order. Use the builder methods to configure the mock with test
/// data.
///
/// # Example
///
/// ```ignore
/// use mdc_storage::{MockStorage, Storage};
///
/// let storage = MockStorage::new()
///     .with_file("main.mdc", "---\nsidebarPosition: 1\n---\n# Main")
///     .with_file("modes/plan.mdc", "# Plan");
///
/// let paths = storage.scan().unwrap();
/// let source = storage.load("main.mdc").unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MockStorage {
    order: Vec<String>,
    contents: HashMap<String, String>,
    mtimes: HashMap<String, f64>,
    unreadable: HashSet<String>,
    scan_error: bool,
}

impl MockStorage {
    /// Create a new empty mock storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule document with the given raw content.
    ///
    /// Re-adding a path replaces its content but keeps its scan position.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        let path = path.into();
        if !self.contents.contains_key(&path) {
            self.order.push(path.clone());
        }
        self.contents.insert(path, content.into());
        self
    }

    /// Set modification time for a path.
    ///
    /// # Arguments
    ///
    /// * `path` - Canonical rule path
    /// * `mtime` - Modification time as seconds since Unix epoch
    #[must_use]
    pub fn with_mtime(mut self, path: impl Into<String>, mtime: f64) -> Self {
        self.mtimes.insert(path.into(), mtime);
        self
    }

    /// List a path in `scan()` whose `read()` fails with permission denied.
    #[must_use]
    pub fn with_unreadable(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.order.push(path.clone());
        self.unreadable.insert(path);
        self
    }

    /// Make `scan()` fail.
    #[must_use]
    pub fn with_scan_error(mut self) -> Self {
        self.scan_error = true;
        self
    }
}

impl Storage for MockStorage {
    fn scan(&self) -> Result<Vec<String>, StorageError> {
        if self.scan_error {
            return Err(StorageError::new(StorageErrorKind::Other).with_backend(BACKEND));
        }
        Ok(self.order.clone())
    }

    fn read(&self, path: &str) -> Result<String, StorageError> {
        if self.unreadable.contains(path) {
            return Err(StorageError::new(StorageErrorKind::PermissionDenied)
                .with_path(path)
                .with_backend(BACKEND));
        }
        self.contents
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::not_found(path).with_backend(BACKEND))
    }

    fn mtime(&self, path: &str) -> Result<f64, StorageError> {
        self.mtimes
            .get(path)
            .copied()
            .ok_or_else(|| StorageError::not_found(path).with_backend(BACKEND))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::RuleMetadata;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_mock_storage_is_send_sync() {
        assert_send_sync::<MockStorage>();
    }

    #[test]
    fn test_new_empty() {
        let storage = MockStorage::new();
        assert!(storage.scan().unwrap().is_empty());
    }

    #[test]
    fn test_scan_preserves_insertion_order() {
        let storage = MockStorage::new()
            .with_file("modes/plan.mdc", "")
            .with_file("main.mdc", "")
            .with_file("modes/plan.mdc", "# Replaced");

        assert_eq!(storage.scan().unwrap(), vec!["modes/plan.mdc", "main.mdc"]);
        assert_eq!(storage.read("modes/plan.mdc").unwrap(), "# Replaced");
    }

    #[test]
    fn test_read_missing() {
        let err = MockStorage::new().read("missing.mdc").unwrap_err();
        assert_eq!(err.kind, StorageErrorKind::NotFound);
        assert_eq!(err.backend, Some("Mock"));
    }

    #[test]
    fn test_unreadable_is_scanned_but_fails_read() {
        let storage = MockStorage::new().with_unreadable("locked.mdc");

        assert_eq!(storage.scan().unwrap(), vec!["locked.mdc"]);
        let err = storage.read("locked.mdc").unwrap_err();
        assert_eq!(err.kind, StorageErrorKind::PermissionDenied);
    }

    #[test]
    fn test_mtime() {
        let storage = MockStorage::new()
            .with_file("main.mdc", "")
            .with_mtime("main.mdc", 1_700_000_000.0);

        assert!((storage.mtime("main.mdc").unwrap() - 1_700_000_000.0).abs() < f64::EPSILON);
        assert!(storage.mtime("other.mdc").is_err());
    }

    #[test]
    fn test_load_uses_mtime() {
        let storage = MockStorage::new()
            .with_file("main.mdc", "# Main")
            .with_mtime("main.mdc", 42.0);

        let source = storage.load("main.mdc").unwrap();

        assert_eq!(source.mtime, Some(42.0));
        assert_eq!(source.metadata, RuleMetadata::default());
    }

    #[test]
    fn test_scan_error() {
        let storage = MockStorage::new().with_scan_error();
        assert!(storage.scan().is_err());
    }
}
