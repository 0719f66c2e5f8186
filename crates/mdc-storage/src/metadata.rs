//! Rule metadata types for storage backends.
//!
//! Provides the [`RuleMetadata`] struct holding a rule document's frontmatter.
//! This module contains only data types - splitting and parsing live in
//! [`frontmatter`](crate::frontmatter).
//!
//! # Metadata Fields
//!
//! - `title`: Display title (overrides H1 extraction)
//! - `sidebarPosition`: Explicit ordering hint among navigation siblings
//! - `description`: Human description of the rule
//! - `globs`: File patterns the rule applies to
//! - `alwaysApply`: Whether the rule is applied unconditionally
//! - `lastModified`: Last-modified timestamp (RFC 3339)
//! - `sourceFile`: Path of the source file the rule was read from
//!
//! Any other key is preserved verbatim in [`RuleMetadata::extra`].

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Rule metadata loaded from YAML frontmatter.
///
/// All recognized fields are optional. When a field is `None`, it indicates
/// the key was not present in the frontmatter.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleMetadata {
    /// Display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Explicit ordering hint among navigation siblings.
    #[serde(
        default,
        rename = "sidebarPosition",
        alias = "sidebar_position",
        skip_serializing_if = "Option::is_none"
    )]
    pub position: Option<f64>,

    /// Human description of the rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Glob patterns the rule applies to, comma-joined when given as a list.
    #[serde(
        default,
        deserialize_with = "deserialize_globs",
        skip_serializing_if = "Option::is_none"
    )]
    pub globs: Option<String>,

    /// Whether the rule is always applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub always_apply: Option<bool>,

    /// Last-modified timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,

    /// Source file the rule was read from, relative to the rules directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,

    /// Unrecognized frontmatter keys.
    #[serde(flatten, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Accept `globs` as a single string or a list of strings.
///
/// Cursor writes `globs:` with no value for rules that apply everywhere, so
/// null and blank values both map to `None`.
fn deserialize_globs<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Globs {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<Globs>::deserialize(deserializer)? {
        Some(Globs::One(glob)) if !glob.trim().is_empty() => Some(glob),
        Some(Globs::Many(globs)) if !globs.is_empty() => Some(globs.join(", ")),
        _ => None,
    })
}
