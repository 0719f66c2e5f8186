//! Sidebar navigation derived from the rule directory layout.
//!
//! Each document becomes a leaf; each directory on the way to it becomes a
//! category, created the first time a document below it is seen. Siblings
//! are ordered by explicit `sidebarPosition` first, then by discovery order.

use std::cmp::Ordering;

use serde::Serialize;

use crate::document::{Document, titlecase_from_slug};

/// Label for leaves whose document has no usable title.
const UNTITLED: &str = "Untitled";

/// Navigation tree node.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NavNode {
    /// A link to one document.
    Doc {
        /// Document identity (canonical path without extension).
        id: String,
        label: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        position: Option<f64>,
    },
    /// A directory grouping.
    Category {
        label: String,
        /// Directories carry no frontmatter, so this is `None` for built trees.
        #[serde(skip_serializing_if = "Option::is_none")]
        position: Option<f64>,
        items: Vec<NavNode>,
    },
}

impl NavNode {
    /// Display label.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Doc { label, .. } | Self::Category { label, .. } => label,
        }
    }

    /// Explicit ordering hint.
    #[must_use]
    pub fn position(&self) -> Option<f64> {
        match self {
            Self::Doc { position, .. } | Self::Category { position, .. } => *position,
        }
    }
}

/// Category under construction, keyed by directory slug.
///
/// `entries` keeps docs and subcategories interleaved in discovery order;
/// subcategories themselves live in `categories`.
struct CategoryBuilder {
    slug: String,
    entries: Vec<Entry>,
    categories: Vec<CategoryBuilder>,
}

enum Entry {
    Doc(NavNode),
    Category(usize),
}

impl CategoryBuilder {
    fn new(slug: &str) -> Self {
        Self {
            slug: slug.to_owned(),
            entries: Vec::new(),
            categories: Vec::new(),
        }
    }

    /// Descend into the child category named `slug`, creating it if needed.
    fn child(&mut self, slug: &str) -> &mut CategoryBuilder {
        let idx = if let Some(idx) = self.categories.iter().position(|c| c.slug == slug) {
            idx
        } else {
            self.categories.push(Self::new(slug));
            self.entries.push(Entry::Category(self.categories.len() - 1));
            self.categories.len() - 1
        };
        &mut self.categories[idx]
    }

    fn push_doc(&mut self, node: NavNode) {
        self.entries.push(Entry::Doc(node));
    }

    fn finish(self) -> Vec<NavNode> {
        let mut categories: Vec<Option<CategoryBuilder>> =
            self.categories.into_iter().map(Some).collect();
        let mut items: Vec<NavNode> = self
            .entries
            .into_iter()
            .filter_map(|entry| match entry {
                Entry::Doc(node) => Some(node),
                Entry::Category(idx) => categories[idx].take().map(|category| NavNode::Category {
                    label: titlecase_from_slug(&category.slug),
                    position: None,
                    items: category.finish(),
                }),
            })
            .collect();
        items.sort_by(compare_siblings);
        items
    }
}

/// Positioned nodes first in ascending order; unpositioned nodes compare
/// equal so the stable sort keeps discovery order.
fn compare_siblings(a: &NavNode, b: &NavNode) -> Ordering {
    match (a.position(), b.position()) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Build the navigation tree for `documents`, given in discovery order.
///
/// Documents with an empty or malformed path become top-level leaves with an
/// empty id.
#[must_use]
pub fn build(documents: &[Document]) -> Vec<NavNode> {
    let mut root = CategoryBuilder::new("");

    for document in documents {
        let id = document.id();
        let label = if document.title().trim().is_empty() {
            UNTITLED.to_owned()
        } else {
            document.title().to_owned()
        };
        let segments: Vec<&str> = id.split('/').collect();

        if segments.iter().any(|s| s.is_empty()) {
            tracing::debug!(path = document.path(), "Malformed rule path in navigation");
            root.push_doc(NavNode::Doc {
                id: String::new(),
                label,
                position: document.position(),
            });
            continue;
        }

        let dirs = &segments[..segments.len() - 1];
        let parent = dirs.iter().fold(&mut root, |node, slug| node.child(slug));
        parent.push_doc(NavNode::Doc {
            id: id.to_owned(),
            label,
            position: document.position(),
        });
    }

    root.finish()
}
