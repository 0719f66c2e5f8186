//! Rule discovery by filesystem walking.
//!
//! The scanner only identifies files that could form rule documents and
//! returns their canonical paths. Reading and frontmatter parsing happen
//! later, per document, through `FsStorage`.

use std::fs;
use std::path::{Path, PathBuf};

/// Discovers rule documents by walking the filesystem.
///
/// Entries are visited in name order within each directory, so discovery
/// order is stable across platforms and runs.
pub(crate) struct Scanner {
    source_dir: PathBuf,
    extension: String,
}

impl Scanner {
    /// Create a new Scanner.
    ///
    /// # Arguments
    ///
    /// * `source_dir` - Root directory to scan
    /// * `extension` - Rule extension without the leading dot (e.g., "mdc")
    pub fn new(source_dir: PathBuf, extension: String) -> Self {
        Self {
            source_dir,
            extension,
        }
    }

    /// Scan filesystem and return canonical paths.
    ///
    /// Returns an empty Vec if the source directory doesn't exist.
    pub fn scan(&self) -> Vec<String> {
        let mut paths = Vec::new();
        if self.source_dir.is_dir() {
            self.scan_directory(&self.source_dir, "", &mut paths);
        }
        paths
    }

    /// Collect rule files in `dir_path`, then recurse into subdirectories.
    ///
    /// Files come before subdirectories so a directory's own rules precede
    /// those of its children.
    fn scan_directory(&self, dir_path: &Path, prefix: &str, paths: &mut Vec<String>) {
        let Ok(entries) = fs::read_dir(dir_path) else {
            tracing::debug!(dir = %dir_path.display(), "Skipping unreadable directory");
            return;
        };

        let mut entries: Vec<_> = entries
            .filter_map(Result::ok)
            .map(|e| {
                let is_dir = e.file_type().is_ok_and(|t| t.is_dir());
                let name = e.file_name().to_string_lossy().into_owned();
                (e.path(), is_dir, name)
            })
            .filter(|(_, _, name)| !name.starts_with('.'))
            .collect();
        entries.sort_by(|a, b| a.2.cmp(&b.2));

        let mut subdirs = Vec::new();
        for (path, is_dir, name) in entries {
            let rel = join_canonical(prefix, &name);
            if is_dir {
                subdirs.push((path, rel));
            } else if path.extension().is_some_and(|e| e == self.extension.as_str()) {
                paths.push(rel);
            }
        }

        for (path, rel) in subdirs {
            self.scan_directory(&path, &rel, paths);
        }
    }
}

/// Join a canonical prefix and a name with `/`.
fn join_canonical(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_owned()
    } else {
        format!("{prefix}/{name}")
    }
}
