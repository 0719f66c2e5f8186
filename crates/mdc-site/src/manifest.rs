//! Site manifest consumed by the rendering layer.
//!
//! The manifest is the single JSON document a build produces: one entry per
//! rule page, the sidebar tree, the redirect from the base URL to the main
//! rule, and the cross-reference report.

use mdc_config::RulesConfig;
use mdc_storage::RuleMetadata;
use serde::Serialize;

use crate::link_resolver::{CrossReference, ResolutionStats};
use crate::loader::ProcessingResult;
use crate::navigation::NavNode;

/// Redirect from the base URL to the main rule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Redirect {
    pub from: String,
    pub to: String,
}

/// One rule page.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RuleEntry {
    /// Canonical path without extension.
    pub id: String,
    pub title: String,
    pub permalink: String,
    /// Markdown body with resolved cross-references.
    pub content: String,
    /// Omitted when metadata output is disabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<RuleMetadata>,
}

/// Build output for the rendering layer.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteManifest {
    /// Route segment rule pages are mounted under.
    pub target_path: String,
    pub redirect: Redirect,
    pub rules: Vec<RuleEntry>,
    pub sidebar: Vec<NavNode>,
    pub cross_references: Vec<CrossReference>,
    pub stats: ResolutionStats,
    pub total_rules: usize,
}

impl SiteManifest {
    /// Assemble the manifest for a load result.
    #[must_use]
    pub fn new(result: &ProcessingResult, config: &RulesConfig) -> Self {
        let from = if config.cross_reference_base.is_empty() {
            "/".to_owned()
        } else {
            config.cross_reference_base.clone()
        };

        let rules = result
            .documents
            .iter()
            .map(|document| RuleEntry {
                id: document.id().to_owned(),
                title: document.title().to_owned(),
                permalink: document.permalink().to_owned(),
                content: document.content().to_owned(),
                metadata: config
                    .include_metadata
                    .then(|| document.metadata().clone()),
            })
            .collect();

        Self {
            target_path: config.target_path.clone(),
            redirect: Redirect {
                from,
                to: config.main_rule_url(),
            },
            rules,
            sidebar: result.navigation(),
            cross_references: result.cross_references.clone(),
            stats: result.stats(),
            total_rules: result.documents.len(),
        }
    }

    /// Serialize as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if a metadata value cannot be represented as JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mdc_storage::MockStorage;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::loader::ContentLoader;

    fn config() -> RulesConfig {
        RulesConfig {
            cross_reference_base: "/rules".to_owned(),
            ..RulesConfig::default()
        }
    }

    fn result(config: &RulesConfig) -> ProcessingResult {
        let storage = MockStorage::new()
            .with_file(
                "main.mdc",
                "---\nsidebarPosition: 1\nalwaysApply: true\n---\n# Main\n\nSee ./plan.mdc\n",
            )
            .with_file("plan.mdc", "# Plan\n");
        ContentLoader::new(Arc::new(storage), config.clone())
            .load()
            .unwrap()
    }

    #[test]
    fn test_manifest_json_shape() {
        let config = config();
        let manifest = SiteManifest::new(&result(&config), &config);

        let json = serde_json::to_value(&manifest).unwrap();

        assert_eq!(
            json,
            json!({
                "targetPath": "rules",
                "redirect": {"from": "/rules", "to": "/rules/main"},
                "rules": [
                    {
                        "id": "main",
                        "title": "Main",
                        "permalink": "/rules/main",
                        "content": "# Main\n\nSee /rules/plan\n",
                        "metadata": {
                            "sidebarPosition": 1.0,
                            "alwaysApply": true,
                            "sourceFile": "main.mdc"
                        }
                    },
                    {
                        "id": "plan",
                        "title": "Plan",
                        "permalink": "/rules/plan",
                        "content": "# Plan\n",
                        "metadata": {"sourceFile": "plan.mdc"}
                    }
                ],
                "sidebar": [
                    {"type": "doc", "id": "main", "label": "Main", "position": 1.0},
                    {"type": "doc", "id": "plan", "label": "Plan"}
                ],
                "crossReferences": [
                    {"original": "./plan.mdc", "resolved": "/rules/plan", "isValid": true}
                ],
                "stats": {"total": 1, "valid": 1, "broken": 0, "successRate": 100.0},
                "totalRules": 2
            })
        );
    }

    #[test]
    fn test_manifest_without_metadata() {
        let config = RulesConfig {
            include_metadata: false,
            ..config()
        };
        let manifest = SiteManifest::new(&result(&config), &config);

        assert!(manifest.rules.iter().all(|rule| rule.metadata.is_none()));
        let json = manifest.to_json().unwrap();
        assert!(!json.contains("\"metadata\""));
    }

    #[test]
    fn test_manifest_root_base_redirect() {
        let config = RulesConfig {
            cross_reference_base: String::new(),
            ..config()
        };
        let manifest = SiteManifest::new(&ProcessingResult::default(), &config);

        assert_eq!(
            manifest.redirect,
            Redirect {
                from: "/".to_owned(),
                to: "/main".to_owned(),
            }
        );
        assert_eq!(manifest.total_rules, 0);
        assert!(manifest.sidebar.is_empty());
    }
}
