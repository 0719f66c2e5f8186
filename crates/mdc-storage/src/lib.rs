//! Storage abstraction for mdc-docs.
//!
//! This crate provides a [`Storage`] trait that hands the site core a raw
//! listing of rule documents. This enables:
//!
//! - **Unit testing** without touching the real filesystem
//! - **Clean separation** between link/navigation logic and I/O operations
//!
//! # Architecture
//!
//! The crate provides:
//! - [`Storage`] trait with `scan()`, `read()`, `mtime()` and a
//!   provided `load()` that splits frontmatter from the body
//! - [`RuleMetadata`], the typed frontmatter record
//! - [`MockStorage`] for testing (behind `mock` feature flag)
//!
//! The filesystem backend lives in `mdc-storage-fs`.
//!
//! # Example
//!
//! ```ignore
//! use mdc_storage::Storage;
//!
//! for path in storage.scan()? {
//!     let source = storage.load(&path)?;
//!     println!("{}: {:?}", source.path, source.metadata.title);
//! }
//! ```

pub mod frontmatter;
mod metadata;
#[cfg(feature = "mock")]
mod mock;
mod storage;

pub use frontmatter::FrontmatterError;
pub use metadata::RuleMetadata;
#[cfg(feature = "mock")]
pub use mock::MockStorage;
pub use storage::{SourceFile, Storage, StorageError, StorageErrorKind};
