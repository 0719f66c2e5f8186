//! Cross-reference resolution between rule documents.
//!
//! Rule bodies link to each other with relative references such as
//! `./modes/plan.mdc` or `./.cursor/rules/adr-structure.mdc`. The resolver
//! rewrites each reference to a site-wide URL (`/cursor/rules/modes/plan`)
//! and checks the target against the [`DocumentRegistry`].
//!
//! A broken reference is still rewritten to its best-effort URL. Only a
//! reference with an empty target (e.g. `./.cursor/rules/.mdc`) keeps its
//! original text.

use mdc_config::RulesConfig;
use regex::{Captures, Regex};
use serde::Serialize;

use crate::document::strip_extension;
use crate::registry::DocumentRegistry;

/// Maximum suggestions listed for one broken reference.
const MAX_SUGGESTIONS: usize = 3;

/// Maximum available files listed for one broken reference.
const MAX_AVAILABLE: usize = 5;

/// One cross-reference found in a document body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossReference {
    /// Link text as written (e.g., "./modes/plan.mdc").
    pub original: String,
    /// Resolved URL (e.g., "/cursor/rules/modes/plan").
    pub resolved: String,
    /// Whether the target document exists.
    pub is_valid: bool,
}

/// Rewritten content and the references found in it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    /// Content with every reference replaced by its resolved URL.
    pub content: String,
    /// References in order of appearance.
    pub cross_references: Vec<CrossReference>,
}

/// Aggregate resolution statistics.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionStats {
    pub total: usize,
    pub valid: usize,
    pub broken: usize,
    /// Percentage of valid references, rounded to two decimals.
    pub success_rate: f64,
}

/// Resolves relative rule references against a registry snapshot.
///
/// The registry is borrowed immutably, so one resolver can serve parallel
/// resolution of many documents.
#[derive(Debug)]
pub struct LinkResolver<'r> {
    registry: &'r DocumentRegistry,
    base: String,
    infix: String,
    extension: String,
    pattern: Regex,
}

impl<'r> LinkResolver<'r> {
    /// Create a resolver for the given registry and rules configuration.
    ///
    /// # Panics
    ///
    /// Never in practice: the link pattern is built from an escaped extension.
    #[must_use]
    pub fn new(registry: &'r DocumentRegistry, config: &RulesConfig) -> Self {
        let extension = config.extension.trim_start_matches('.').to_owned();
        let pattern = Regex::new(&format!(r"\./[^\s\)]+\.{}", regex::escape(&extension)))
            .expect("escaped extension forms a valid pattern");
        Self {
            registry,
            base: config.cross_reference_base.trim_end_matches('/').to_owned(),
            infix: config.config_dir_infix.clone(),
            extension,
            pattern,
        }
    }

    /// Rewrite every reference in `content` and report what was found.
    ///
    /// Content without references, including empty and whitespace-only
    /// content, is returned unchanged.
    #[must_use]
    pub fn resolve(&self, content: &str, source: &str) -> Resolution {
        let mut cross_references = Vec::new();
        let rewritten = self.pattern.replace_all(content, |caps: &Captures<'_>| {
            let reference = self.resolve_link(&caps[0]);
            if !reference.is_valid {
                tracing::debug!(source, link = %reference.original, "Broken cross-reference");
            }
            let resolved = reference.resolved.clone();
            cross_references.push(reference);
            resolved
        });
        Resolution {
            content: rewritten.into_owned(),
            cross_references,
        }
    }

    /// Resolve a single matched reference.
    fn resolve_link(&self, original: &str) -> CrossReference {
        let Some(identity) = self.identity(original) else {
            return CrossReference {
                original: original.to_owned(),
                resolved: original.to_owned(),
                is_valid: false,
            };
        };
        CrossReference {
            original: original.to_owned(),
            resolved: format!("{}/{identity}", self.base),
            is_valid: self.registry.exists(self.target(original)),
        }
    }

    /// Target path of a reference, extension included.
    ///
    /// Text after the config directory infix wins; otherwise the leading
    /// `./` is dropped.
    fn target<'a>(&self, original: &'a str) -> &'a str {
        if !self.infix.is_empty()
            && let Some(idx) = original.find(&self.infix)
        {
            return &original[idx + self.infix.len()..];
        }
        original.strip_prefix("./").unwrap_or(original)
    }

    /// Extension-less `/`-separated identity, or `None` if empty.
    fn identity(&self, original: &str) -> Option<String> {
        let identity = strip_extension(self.target(original), &self.extension).replace('\\', "/");
        (!identity.is_empty()).then_some(identity)
    }

    /// Build one warning per broken reference in `refs`.
    ///
    /// Each warning names the source and the link, then suggests up to three
    /// documents with a similar base name, then lists up to five available
    /// documents.
    #[must_use]
    pub fn diagnostics(&self, refs: &[CrossReference], source: &str) -> Vec<String> {
        let broken: Vec<_> = refs.iter().filter(|r| !r.is_valid).collect();
        if broken.is_empty() {
            return Vec::new();
        }

        let mut available: Vec<String> = self
            .registry
            .all_paths()
            .into_iter()
            .map(|p| format!("./{p}"))
            .collect();
        available.sort_unstable();

        broken
            .into_iter()
            .map(|reference| {
                let mut message = format!(
                    "Broken cross-reference in {source}: {}",
                    reference.original
                );
                let suggestions = self.suggestions(&reference.original, &available);
                if !suggestions.is_empty() {
                    message.push_str("\n  Suggestions: ");
                    message.push_str(&suggestions.join(", "));
                }
                message.push_str("\n  Available files: ");
                message.push_str(&available[..available.len().min(MAX_AVAILABLE)].join(", "));
                if available.len() > MAX_AVAILABLE {
                    message.push_str(&format!(" (and {} more)", available.len() - MAX_AVAILABLE));
                }
                message
            })
            .collect()
    }

    /// Candidates whose base name equals, contains or is contained in the
    /// link's base name, compared case-insensitively.
    fn suggestions<'a>(&self, original: &str, available: &'a [String]) -> Vec<&'a str> {
        let wanted = self.basename(original);
        if wanted.is_empty() {
            return Vec::new();
        }
        available
            .iter()
            .filter(|candidate| {
                let name = self.basename(candidate);
                name.contains(&wanted) || wanted.contains(&name)
            })
            .take(MAX_SUGGESTIONS)
            .map(String::as_str)
            .collect()
    }

    fn basename(&self, path: &str) -> String {
        let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
        strip_extension(name, &self.extension).to_lowercase()
    }

    /// Summarize a set of references.
    ///
    /// An empty set has a success rate of 100.
    #[must_use]
    pub fn stats(refs: &[CrossReference]) -> ResolutionStats {
        let total = refs.len();
        let valid = refs.iter().filter(|r| r.is_valid).count();
        #[allow(clippy::cast_precision_loss)]
        let success_rate = if total == 0 {
            100.0
        } else {
            (valid as f64 / total as f64 * 10_000.0).round() / 100.0
        };
        ResolutionStats {
            total,
            valid,
            broken: total - valid,
            success_rate,
        }
    }
}
