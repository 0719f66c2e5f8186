//! Storage trait and error types.
//!
//! Provides the core [`Storage`] trait for abstracting rule discovery and
//! retrieval, along with [`StorageError`] for unified error handling across
//! backends.
//!
//! # Path Convention
//!
//! All path parameters are **canonical rule paths**: relative to the rules
//! directory, `/`-separated, with extension and without a leading `./`
//! (e.g. `"main.mdc"`, `"modes/plan.mdc"`).

use std::path::PathBuf;

use crate::frontmatter::{self, FrontmatterError};
use crate::metadata::RuleMetadata;

/// A rule source file with its frontmatter split from the body.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceFile {
    /// Canonical path (e.g., "modes/plan.mdc").
    pub path: String,
    /// Parsed frontmatter.
    pub metadata: RuleMetadata,
    /// Content after the frontmatter block.
    pub body: String,
    /// Modification time as seconds since Unix epoch, when known.
    pub mtime: Option<f64>,
}

/// Semantic error categories (inspired by Object Store + `OpenDAL`).
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageErrorKind {
    /// Resource does not exist.
    NotFound,
    /// Permission denied.
    PermissionDenied,
    /// Invalid path or identifier.
    InvalidPath,
    /// Content exists but could not be decoded (bad UTF-8, bad frontmatter).
    InvalidData,
    /// Other/unknown error category.
    Other,
}

/// Storage error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StorageError {
    /// Semantic error category.
    pub kind: StorageErrorKind,
    /// Path context (if applicable).
    pub path: Option<PathBuf>,
    /// Backend identifier (e.g., "Fs", "Mock").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StorageError {
    /// Create a new storage error.
    #[must_use]
    pub fn new(kind: StorageErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create a not found error with path.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(StorageErrorKind::NotFound).with_path(path)
    }

    /// Create an invalid data error from a frontmatter failure.
    #[must_use]
    pub fn frontmatter(err: FrontmatterError, path: impl Into<PathBuf>) -> Self {
        Self::new(StorageErrorKind::InvalidData)
            .with_path(path)
            .with_source(err)
    }

    /// Create a storage error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: Option<PathBuf>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => StorageErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => StorageErrorKind::PermissionDenied,
            std::io::ErrorKind::InvalidData => StorageErrorKind::InvalidData,
            _ => StorageErrorKind::Other,
        };
        let mut error = Self::new(kind).with_source(err);
        if let Some(p) = path {
            error = error.with_path(p);
        }
        error
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (path: /foo/bar)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StorageErrorKind::NotFound => "Not found",
            StorageErrorKind::PermissionDenied => "Permission denied",
            StorageErrorKind::InvalidPath => "Invalid path",
            StorageErrorKind::InvalidData => "Invalid data",
            StorageErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }

        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Storage abstraction for rule discovery and retrieval.
///
/// Provides a unified interface for reading rule documents regardless of
/// backend. The site core never touches the filesystem directly.
pub trait Storage: Send + Sync {
    /// Scan and return canonical paths of all rule documents.
    ///
    /// Order is the backend's discovery order and is preserved by consumers.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if scanning fails (e.g., permission denied).
    fn scan(&self) -> Result<Vec<String>, StorageError>;

    /// Read full raw content, frontmatter included.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the document doesn't exist or can't be read.
    fn read(&self, path: &str) -> Result<String, StorageError>;

    /// Get modification time as seconds since Unix epoch.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the document doesn't exist or mtime can't be retrieved.
    fn mtime(&self, path: &str) -> Result<f64, StorageError>;

    /// Read a document and split its frontmatter from the body.
    ///
    /// A missing mtime is not an error; the field is left `None`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the document can't be read or its
    /// frontmatter is malformed.
    fn load(&self, path: &str) -> Result<SourceFile, StorageError> {
        let raw = self.read(path)?;
        let (metadata, body) =
            frontmatter::parse(&raw).map_err(|e| StorageError::frontmatter(e, path))?;
        Ok(SourceFile {
            path: path.to_owned(),
            metadata,
            body: body.to_owned(),
            mtime: self.mtime(path).ok(),
        })
    }
}
