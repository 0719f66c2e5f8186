//! YAML frontmatter splitting and parsing.
//!
//! A rule document optionally starts with a frontmatter block delimited by
//! `---` lines:
//!
//! ```text
//! ---
//! description: Planning mode
//! sidebarPosition: 2
//! ---
//! # Plan
//! ```

use crate::metadata::RuleMetadata;

/// Error type for frontmatter parsing.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    /// Opening `---` without a closing delimiter.
    #[error("unterminated frontmatter block")]
    Unterminated,
    /// YAML parsing error.
    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Split content into its raw frontmatter block and body.
///
/// Returns `Ok((None, content))` when the content does not open with a `---`
/// line.
///
/// # Errors
///
/// Returns [`FrontmatterError::Unterminated`] when the opening delimiter has
/// no matching closing line.
pub fn split(content: &str) -> Result<(Option<&str>, &str), FrontmatterError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let Some(rest) = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))
    else {
        return Ok((None, content));
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Ok((Some(yaml), body));
        }
        offset += line.len();
    }

    Err(FrontmatterError::Unterminated)
}

/// Parse rule content into metadata and body.
///
/// Content without frontmatter, or with an empty block, yields default
/// metadata.
///
/// # Errors
///
/// Returns an error if the block is unterminated or the YAML is malformed.
pub fn parse(content: &str) -> Result<(RuleMetadata, &str), FrontmatterError> {
    let (yaml, body) = split(content)?;
    let metadata = match yaml.map(str::trim) {
        None | Some("") => RuleMetadata::default(),
        Some(yaml) => serde_yaml::from_str(yaml)?,
    };
    Ok((metadata, body))
}
