//! Rule documents, cross-reference resolution and navigation for mdc-docs.
//!
//! This crate provides:
//! - [`Document`] and [`DocumentRegistry`]: the known rule set, keyed by canonical path
//! - [`LinkResolver`]: rewrites `./*.mdc` references to site URLs and reports broken ones
//! - [`navigation::build`]: sidebar tree derived from the directory layout
//! - [`ContentLoader`]: one stateless build pass over a [`Storage`](mdc_storage::Storage)
//! - [`SiteManifest`]: JSON output for the rendering layer
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use mdc_config::RulesConfig;
//! use mdc_site::{ContentLoader, SiteManifest};
//! use mdc_storage_fs::FsStorage;
//!
//! let config = RulesConfig::default();
//! let storage = Arc::new(FsStorage::new(config.source_dir.clone()));
//! let result = ContentLoader::new(storage, config.clone()).load()?;
//!
//! for warning in &result.warnings {
//!     eprintln!("{warning}");
//! }
//! let manifest = SiteManifest::new(&result, &config);
//! println!("{}", manifest.to_json()?);
//! # Ok(())
//! # }
//! ```

mod document;
mod link_resolver;
mod loader;
mod manifest;
pub mod navigation;
mod registry;

pub use document::Document;
pub use link_resolver::{CrossReference, LinkResolver, Resolution, ResolutionStats};
pub use loader::{ContentLoader, LoadError, ProcessingResult};
pub use manifest::{Redirect, RuleEntry, SiteManifest};
pub use navigation::NavNode;
pub use registry::DocumentRegistry;
