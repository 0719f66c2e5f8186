//! Rule document model.
//!
//! A [`Document`] is one rule file after frontmatter parsing: canonical path,
//! display title, body, typed metadata and a permalink derived from the path.

use std::sync::LazyLock;

use mdc_storage::RuleMetadata;
use regex::Regex;

static H1_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#\s+(.+)$").unwrap());

/// A rule document.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    path: String,
    id: String,
    title: String,
    content: String,
    metadata: RuleMetadata,
    permalink: String,
}

impl Document {
    /// Create a document and derive its identity and permalink.
    ///
    /// # Arguments
    ///
    /// * `path` - Path relative to the rules directory; `\` separators and a
    ///   leading `./` are normalized away
    /// * `title` - Display title
    /// * `content` - Markdown body without frontmatter
    /// * `metadata` - Parsed frontmatter
    /// * `base` - Cross-reference base without trailing slash (e.g., "/cursor/rules")
    /// * `extension` - Rule extension without the leading dot (e.g., "mdc")
    #[must_use]
    pub fn new(
        path: &str,
        title: impl Into<String>,
        content: impl Into<String>,
        metadata: RuleMetadata,
        base: &str,
        extension: &str,
    ) -> Self {
        let path = canonical_path(path);
        let id = strip_extension(&path, extension).to_owned();
        let permalink = format!("{base}/{id}");
        Self {
            path,
            id,
            title: title.into(),
            content: content.into(),
            metadata,
            permalink,
        }
    }

    /// Canonical path with extension (e.g., "modes/plan.mdc").
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Canonical path without extension (e.g., "modes/plan").
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Markdown body, with cross-references rewritten once resolved.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Parsed frontmatter.
    #[must_use]
    pub fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    /// Site-wide URL of this document.
    #[must_use]
    pub fn permalink(&self) -> &str {
        &self.permalink
    }

    /// Explicit navigation position from frontmatter.
    #[must_use]
    pub fn position(&self) -> Option<f64> {
        self.metadata.position
    }

    pub(crate) fn set_content(&mut self, content: String) {
        self.content = content;
    }
}

/// Normalize a relative path: `/` separators, no leading `./`.
pub(crate) fn canonical_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    let mut rest = path.as_str();
    while let Some(stripped) = rest.strip_prefix("./") {
        rest = stripped;
    }
    rest.to_owned()
}

/// Strip `.{extension}` from the end of `path` if present.
pub(crate) fn strip_extension<'a>(path: &'a str, extension: &str) -> &'a str {
    path.strip_suffix(extension)
        .and_then(|p| p.strip_suffix('.'))
        .unwrap_or(path)
}

/// Title from the first `# H1` heading of a markdown body.
pub(crate) fn extract_h1(content: &str) -> Option<String> {
    let caps = H1_RE.captures(content)?;
    let title = caps[1].trim();
    (!title.is_empty()).then(|| title.to_owned())
}

/// Title derived from the file stem of a canonical path.
pub(crate) fn title_from_path(path: &str, extension: &str) -> String {
    let stem = strip_extension(path, extension);
    let stem = stem.rsplit('/').next().unwrap_or(stem);
    titlecase_from_slug(&stem.to_lowercase())
}

/// Convert a slug to title case (`task-levels` -> `Task Levels`).
pub(crate) fn titlecase_from_slug(slug: &str) -> String {
    let mut result = String::with_capacity(slug.len());
    for word in slug.split(['-', '_', ' ']).filter(|w| !w.is_empty()) {
        if !result.is_empty() {
            result.push(' ');
        }
        capitalize_first_into(word, &mut result);
    }
    result
}

fn capitalize_first_into(word: &str, buf: &mut String) {
    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        buf.extend(first.to_uppercase());
        buf.push_str(chars.as_str());
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn doc(path: &str) -> Document {
        Document::new(
            path,
            "Title",
            "",
            RuleMetadata::default(),
            "/cursor/rules",
            "mdc",
        )
    }

    #[test]
    fn test_new_derives_id_and_permalink() {
        let doc = doc("modes/plan.mdc");

        assert_eq!(doc.path(), "modes/plan.mdc");
        assert_eq!(doc.id(), "modes/plan");
        assert_eq!(doc.permalink(), "/cursor/rules/modes/plan");
    }

    #[test]
    fn test_new_normalizes_path() {
        let doc = doc(".\\modes\\plan.mdc");

        assert_eq!(doc.path(), "modes/plan.mdc");
        assert_eq!(doc.id(), "modes/plan");
    }

    #[test]
    fn test_new_with_empty_base() {
        let doc = Document::new("main.mdc", "Main", "", RuleMetadata::default(), "", "mdc");
        assert_eq!(doc.permalink(), "/main");
    }

    #[test]
    fn test_position_from_metadata() {
        let metadata = RuleMetadata {
            position: Some(2.0),
            ..Default::default()
        };
        let doc = Document::new("plan.mdc", "Plan", "", metadata, "/r", "mdc");
        assert_eq!(doc.position(), Some(2.0));
    }

    #[test]
    fn test_strip_extension() {
        assert_eq!(strip_extension("modes/plan.mdc", "mdc"), "modes/plan");
        assert_eq!(strip_extension("plan.md", "mdc"), "plan.md");
        assert_eq!(strip_extension("planmdc", "mdc"), "planmdc");
        assert_eq!(strip_extension(".mdc", "mdc"), "");
    }

    #[test]
    fn test_extract_h1() {
        assert_eq!(
            extract_h1("Intro\n\n# Plan Mode \n\n## Steps").as_deref(),
            Some("Plan Mode")
        );
        assert_eq!(extract_h1("## Only H2"), None);
        assert_eq!(extract_h1("#NoSpace"), None);
    }

    #[test]
    fn test_title_from_path() {
        assert_eq!(title_from_path("task-levels.mdc", "mdc"), "Task Levels");
        assert_eq!(title_from_path("modes/VAN_mode.mdc", "mdc"), "Van Mode");
    }

    #[test]
    fn test_titlecase_from_slug() {
        assert_eq!(titlecase_from_slug("task-levels"), "Task Levels");
        assert_eq!(titlecase_from_slug("creative__phase"), "Creative Phase");
        assert_eq!(titlecase_from_slug(""), "");
    }
}
