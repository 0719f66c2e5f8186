//! Rule loading from storage.
//!
//! Provides [`ContentLoader`], which turns the rule files of a [`Storage`]
//! backend into resolved [`Document`]s in one stateless pass:
//!
//! 1. Scan storage for rule paths (a scan failure aborts the build)
//! 2. Load each file and build its document (failures are collected)
//! 3. Register all documents, replacing any previous set
//! 4. Resolve cross-references per document in parallel
//! 5. Collect diagnostics for broken references
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use mdc_config::RulesConfig;
//! use mdc_site::ContentLoader;
//! use mdc_storage_fs::FsStorage;
//!
//! let storage = Arc::new(FsStorage::new(PathBuf::from(".cursor/rules")));
//! let loader = ContentLoader::new(storage, RulesConfig::default());
//! let result = loader.load()?;
//! println!("{} rules, {} warnings", result.documents.len(), result.warnings.len());
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant, UNIX_EPOCH};

use chrono::{DateTime, SecondsFormat, Utc};
use mdc_config::RulesConfig;
use mdc_storage::{SourceFile, Storage, StorageError};
use rayon::prelude::*;

use crate::document::{Document, extract_h1, title_from_path};
use crate::link_resolver::{CrossReference, LinkResolver, Resolution, ResolutionStats};
use crate::navigation::{self, NavNode};
use crate::registry::DocumentRegistry;

/// Convert Duration to milliseconds as f64.
fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Error that aborts a whole load.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The rules directory could not be scanned.
    #[error("Failed to scan rules: {0}")]
    Scan(#[from] StorageError),
}

/// Outcome of one load pass.
#[derive(Debug, Default)]
pub struct ProcessingResult {
    /// Documents in discovery order, with cross-references rewritten.
    pub documents: Vec<Document>,
    /// Every cross-reference found, in document then appearance order.
    pub cross_references: Vec<CrossReference>,
    /// Broken cross-reference diagnostics.
    pub warnings: Vec<String>,
    /// Files that could not be turned into documents.
    pub errors: Vec<String>,
}

impl ProcessingResult {
    /// Resolution statistics over all cross-references.
    #[must_use]
    pub fn stats(&self) -> ResolutionStats {
        LinkResolver::stats(&self.cross_references)
    }

    /// Navigation tree for the loaded documents.
    #[must_use]
    pub fn navigation(&self) -> Vec<NavNode> {
        navigation::build(&self.documents)
    }
}

/// Loads rule documents from storage.
pub struct ContentLoader {
    storage: Arc<dyn Storage>,
    config: RulesConfig,
}

impl ContentLoader {
    /// Create a new content loader.
    ///
    /// # Arguments
    ///
    /// * `storage` - Storage backend holding the rule files
    /// * `config` - Resolved rules configuration
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>, config: RulesConfig) -> Self {
        Self { storage, config }
    }

    /// Run a full load pass.
    ///
    /// Per-file failures end up in [`ProcessingResult::errors`] and never
    /// abort the pass.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Scan`] if the storage cannot be scanned.
    pub fn load(&self) -> Result<ProcessingResult, LoadError> {
        let start = Instant::now();

        let paths = self.storage.scan()?;
        let scan_ms = elapsed_ms(start);

        let loaded: Vec<Result<Document, String>> = paths
            .par_iter()
            .map(|path| {
                self.storage
                    .load(path)
                    .map(|source| self.build_document(source))
                    .map_err(|e| format!("Failed to process {path}: {e}"))
            })
            .collect();

        let mut documents = Vec::with_capacity(loaded.len());
        let mut errors = Vec::new();
        for result in loaded {
            match result {
                Ok(document) => documents.push(document),
                Err(message) => {
                    tracing::warn!(error = %message, "Skipping rule file");
                    errors.push(message);
                }
            }
        }

        let mut registry = DocumentRegistry::new();
        registry.register(documents);

        let resolve_start = Instant::now();
        let (resolutions, warnings) = self.resolve_all(&registry);
        let resolve_ms = elapsed_ms(resolve_start);

        let mut cross_references = Vec::new();
        for (document, resolution) in registry.documents_mut().iter_mut().zip(resolutions) {
            document.set_content(resolution.content);
            cross_references.extend(resolution.cross_references);
        }

        let result = ProcessingResult {
            documents: registry.into_documents(),
            cross_references,
            warnings,
            errors,
        };

        let stats = result.stats();
        tracing::info!(
            rule_count = result.documents.len(),
            error_count = result.errors.len(),
            link_count = stats.total,
            broken_count = stats.broken,
            scan_ms,
            resolve_ms,
            elapsed_ms = elapsed_ms(start),
            "Rules loaded"
        );

        Ok(result)
    }

    /// Resolve every registered document and collect diagnostics.
    ///
    /// Resolutions come back in registration order.
    fn resolve_all(&self, registry: &DocumentRegistry) -> (Vec<Resolution>, Vec<String>) {
        let resolver = LinkResolver::new(registry, &self.config);

        let resolved: Vec<(Resolution, Vec<String>)> = registry
            .documents()
            .par_iter()
            .map(|document| {
                let resolution = resolver.resolve(document.content(), document.path());
                let warnings = resolver.diagnostics(&resolution.cross_references, document.path());
                (resolution, warnings)
            })
            .collect();

        let mut resolutions = Vec::with_capacity(resolved.len());
        let mut warnings = Vec::new();
        for (resolution, diagnostics) in resolved {
            resolutions.push(resolution);
            warnings.extend(diagnostics);
        }
        (resolutions, warnings)
    }

    /// Build a document from a loaded source file.
    ///
    /// Title precedence: frontmatter `title`, first `# H1`, then the file
    /// stem. `sourceFile` and `lastModified` are filled in when absent.
    fn build_document(&self, source: SourceFile) -> Document {
        let SourceFile {
            path,
            mut metadata,
            body,
            mtime,
        } = source;
        let extension = &self.config.extension;

        let title = metadata
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_owned)
            .or_else(|| extract_h1(&body))
            .unwrap_or_else(|| title_from_path(&path, extension));

        if metadata.source_file.is_none() {
            metadata.source_file = Some(path.clone());
        }
        if metadata.last_modified.is_none() {
            metadata.last_modified = mtime.and_then(format_mtime);
        }

        Document::new(
            &path,
            title,
            body,
            metadata,
            &self.config.cross_reference_base,
            extension,
        )
    }
}

/// Format seconds since Unix epoch as RFC 3339 with millisecond precision.
fn format_mtime(mtime: f64) -> Option<String> {
    let modified = UNIX_EPOCH + Duration::try_from_secs_f64(mtime).ok()?;
    let modified: DateTime<Utc> = modified.into();
    Some(modified.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[cfg(test)]
mod tests {
    use mdc_storage::MockStorage;
    use pretty_assertions::assert_eq;

    use super::*;

    static_assertions::assert_impl_all!(ContentLoader: Send, Sync);
    static_assertions::assert_impl_all!(ProcessingResult: Send, Sync);

    fn config() -> RulesConfig {
        RulesConfig {
            cross_reference_base: "/rules".to_owned(),
            ..RulesConfig::default()
        }
    }

    fn load(storage: MockStorage) -> ProcessingResult {
        ContentLoader::new(Arc::new(storage), config())
            .load()
            .unwrap()
    }

    fn rule_storage() -> MockStorage {
        MockStorage::new()
            .with_file(
                "main.mdc",
                "---\nsidebarPosition: 1\n---\n# Main Rule\n\nStart with ./modes/plan.mdc.\n",
            )
            .with_file(
                "modes/plan.mdc",
                "---\ntitle: Planning\n---\n# Plan\n\nBack to ./main.mdc or ./modes/missing.mdc\n",
            )
            .with_file("task-levels.mdc", "No heading here.\n")
    }

    #[test]
    fn test_load_empty_storage() {
        let result = load(MockStorage::new());

        assert!(result.documents.is_empty());
        assert!(result.cross_references.is_empty());
        assert!(result.warnings.is_empty());
        assert!(result.errors.is_empty());
        assert!((result.stats().success_rate - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_preserves_discovery_order() {
        let result = load(rule_storage());

        let paths: Vec<_> = result.documents.iter().map(Document::path).collect();
        assert_eq!(paths, vec!["main.mdc", "modes/plan.mdc", "task-levels.mdc"]);
    }

    #[test]
    fn test_load_title_precedence() {
        let result = load(rule_storage());

        let titles: Vec<_> = result.documents.iter().map(Document::title).collect();
        assert_eq!(titles, vec!["Main Rule", "Planning", "Task Levels"]);
    }

    #[test]
    fn test_load_rewrites_content() {
        let result = load(rule_storage());

        assert_eq!(
            result.documents[0].content(),
            "# Main Rule\n\nStart with /rules/modes/plan.\n"
        );
        assert_eq!(
            result.documents[1].content(),
            "# Plan\n\nBack to /rules/main or /rules/modes/missing\n"
        );
    }

    #[test]
    fn test_load_collects_cross_references_and_warnings() {
        let result = load(rule_storage());

        let originals: Vec<_> = result
            .cross_references
            .iter()
            .map(|r| (r.original.as_str(), r.is_valid))
            .collect();
        assert_eq!(
            originals,
            vec![
                ("./modes/plan.mdc", true),
                ("./main.mdc", true),
                ("./modes/missing.mdc", false),
            ]
        );
        assert_eq!(result.warnings.len(), 1);
        assert!(
            result.warnings[0]
                .starts_with("Broken cross-reference in modes/plan.mdc: ./modes/missing.mdc")
        );

        let stats = result.stats();
        assert_eq!((stats.total, stats.valid, stats.broken), (3, 2, 1));
        assert!((stats.success_rate - 66.67).abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_fills_metadata() {
        let storage = rule_storage().with_mtime("main.mdc", 1_700_000_000.5);

        let result = load(storage);

        let main = result.documents[0].metadata();
        assert_eq!(main.source_file.as_deref(), Some("main.mdc"));
        assert_eq!(
            main.last_modified.as_deref(),
            Some("2023-11-14T22:13:20.500Z")
        );
        assert!(result.documents[1].metadata().last_modified.is_none());
    }

    #[test]
    fn test_load_keeps_frontmatter_metadata() {
        let storage = MockStorage::new()
            .with_file(
                "main.mdc",
                "---\nsourceFile: original.mdc\nlastModified: \"2024-01-01\"\n---\n",
            )
            .with_mtime("main.mdc", 1_700_000_000.0);

        let result = load(storage);

        let meta = result.documents[0].metadata();
        assert_eq!(meta.source_file.as_deref(), Some("original.mdc"));
        assert_eq!(meta.last_modified.as_deref(), Some("2024-01-01"));
    }

    #[test]
    fn test_load_collects_per_file_errors() {
        let storage = MockStorage::new()
            .with_file("main.mdc", "# Main\n\nSee ./broken.mdc\n")
            .with_file("broken.mdc", "---\ntitle: [oops\n---\n")
            .with_unreadable("locked.mdc");

        let result = load(storage);

        assert_eq!(result.documents.len(), 1);
        assert_eq!(result.errors.len(), 2);
        assert!(result.errors[0].starts_with("Failed to process broken.mdc: "));
        assert!(result.errors[1].starts_with("Failed to process locked.mdc: "));
        assert!(!result.cross_references[0].is_valid);
    }

    #[test]
    fn test_load_scan_failure_is_fatal() {
        let loader = ContentLoader::new(Arc::new(MockStorage::new().with_scan_error()), config());

        let err = loader.load().unwrap_err();

        assert!(matches!(err, LoadError::Scan(_)));
    }

    #[test]
    fn test_load_navigation() {
        let result = load(rule_storage());

        let labels: Vec<_> = result.navigation().iter().map(|n| n.label().to_owned()).collect();
        assert_eq!(labels, vec!["Main Rule", "Modes", "Task Levels"]);
    }

    #[test]
    fn test_load_is_idempotent() {
        let loader = ContentLoader::new(Arc::new(rule_storage()), config());

        let first = loader.load().unwrap();
        let second = loader.load().unwrap();

        assert_eq!(first.documents, second.documents);
        assert_eq!(first.cross_references, second.cross_references);
    }

    #[test]
    fn test_load_from_filesystem() {
        let temp_dir = tempfile::tempdir().unwrap();
        let rules = temp_dir.path().join(".cursor").join("rules");
        std::fs::create_dir_all(rules.join("modes")).unwrap();
        std::fs::write(
            rules.join("main.mdc"),
            "# Main\n\nSee ./.cursor/rules/modes/plan.mdc and ./modes\\plan.mdc\n",
        )
        .unwrap();
        std::fs::write(rules.join("modes").join("plan.mdc"), "# Plan\n").unwrap();
        let storage = Arc::new(mdc_storage_fs::FsStorage::new(rules));

        let result = ContentLoader::new(storage, config()).load().unwrap();

        assert_eq!(
            result.documents[0].content(),
            "# Main\n\nSee /rules/modes/plan and /rules/modes/plan\n"
        );
        assert!(result.cross_references.iter().all(|r| r.is_valid));
        assert!(result.documents[0].metadata().last_modified.is_some());
    }

    #[test]
    fn test_format_mtime() {
        assert_eq!(format_mtime(0.0).as_deref(), Some("1970-01-01T00:00:00.000Z"));
        assert_eq!(format_mtime(-1.0), None);
    }
}
