//! Known rule documents keyed by canonical path.
//!
//! Documents are stored in a flat `Vec<Document>` in discovery order, with a
//! `path_index` `HashMap` for O(1) lookups. [`DocumentRegistry::register`]
//! replaces the whole set, so a registry is always a consistent snapshot of
//! one build.

use std::collections::HashMap;

use crate::document::Document;

/// Registry of the documents known to a build.
#[derive(Debug, Default)]
pub struct DocumentRegistry {
    documents: Vec<Document>,
    path_index: HashMap<String, usize>,
}

impl DocumentRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the known set with `documents`.
    ///
    /// A document whose path is already registered replaces the earlier one
    /// in place.
    pub fn register(&mut self, documents: Vec<Document>) {
        self.documents.clear();
        self.path_index.clear();
        for document in documents {
            if let Some(&idx) = self.path_index.get(document.path()) {
                tracing::warn!(path = document.path(), "Duplicate rule path replaced");
                self.documents[idx] = document;
            } else {
                self.path_index
                    .insert(document.path().to_owned(), self.documents.len());
                self.documents.push(document);
            }
        }
    }

    /// Check whether a path names a known document.
    ///
    /// Tries the path as given, then without a leading `./`, then with `\`
    /// separators normalized to `/`.
    #[must_use]
    pub fn exists(&self, path: &str) -> bool {
        self.lookup(path).is_some()
    }

    /// Get a document by path, with the same normalization as [`exists`](Self::exists).
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Document> {
        self.lookup(path).map(|idx| &self.documents[idx])
    }

    /// All known canonical paths.
    #[must_use]
    pub fn all_paths(&self) -> Vec<&str> {
        self.documents.iter().map(Document::path).collect()
    }

    /// Documents in registration order.
    #[must_use]
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub(crate) fn documents_mut(&mut self) -> &mut [Document] {
        &mut self.documents
    }

    /// Consume the registry, returning its documents in registration order.
    #[must_use]
    pub fn into_documents(self) -> Vec<Document> {
        self.documents
    }

    /// Number of registered documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Check if no documents are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn lookup(&self, path: &str) -> Option<usize> {
        if let Some(&idx) = self.path_index.get(path) {
            return Some(idx);
        }
        let stripped = path.strip_prefix("./").unwrap_or(path);
        if let Some(&idx) = self.path_index.get(stripped) {
            return Some(idx);
        }
        if stripped.contains('\\') {
            return self.path_index.get(&stripped.replace('\\', "/")).copied();
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use mdc_storage::RuleMetadata;
    use pretty_assertions::assert_eq;

    use super::*;

    fn doc(path: &str, title: &str) -> Document {
        Document::new(path, title, "", RuleMetadata::default(), "/rules", "mdc")
    }

    fn registry() -> DocumentRegistry {
        let mut registry = DocumentRegistry::new();
        registry.register(vec![
            doc("main.mdc", "Main"),
            doc("modes/plan.mdc", "Plan"),
            doc("adr-structure.mdc", "ADR"),
        ]);
        registry
    }

    #[test]
    fn test_exists_exact() {
        let registry = registry();
        assert!(registry.exists("main.mdc"));
        assert!(registry.exists("modes/plan.mdc"));
        assert!(!registry.exists("missing.mdc"));
    }

    #[test]
    fn test_exists_with_dot_slash() {
        assert!(registry().exists("./modes/plan.mdc"));
    }

    #[test]
    fn test_exists_with_backslashes() {
        let registry = registry();
        assert!(registry.exists("modes\\plan.mdc"));
        assert!(registry.exists("./modes\\plan.mdc"));
    }

    #[test]
    fn test_exists_requires_extension() {
        assert!(!registry().exists("modes/plan"));
    }

    #[test]
    fn test_register_replaces_known_set() {
        let mut registry = registry();

        registry.register(vec![doc("other.mdc", "Other")]);

        assert_eq!(registry.len(), 1);
        assert!(!registry.exists("main.mdc"));
        assert!(registry.exists("other.mdc"));
    }

    #[test]
    fn test_register_duplicate_path_keeps_one() {
        let mut registry = DocumentRegistry::new();

        registry.register(vec![doc("main.mdc", "First"), doc("main.mdc", "Second")]);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("main.mdc").map(Document::title), Some("Second"));
    }

    #[test]
    fn test_all_paths() {
        let registry = registry();
        let mut paths = registry.all_paths();
        paths.sort_unstable();

        assert_eq!(paths, vec!["adr-structure.mdc", "main.mdc", "modes/plan.mdc"]);
    }

    #[test]
    fn test_empty_registry() {
        let registry = DocumentRegistry::new();
        assert!(registry.is_empty());
        assert!(!registry.exists(""));
        assert!(registry.all_paths().is_empty());
    }
}
