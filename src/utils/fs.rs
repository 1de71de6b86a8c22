// File system utilities

use anyhow::{Context, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Translate a shell-style glob (`*`, `?`) into an anchored regex
pub fn glob_to_regex(pattern: &str) -> Result<Regex> {
    let mut source = String::from("^");
    for c in pattern.chars() {
        match c {
            '*' => source.push_str(".*"),
            '?' => source.push('.'),
            other => source.push_str(&regex::escape(&other.to_string())),
        }
    }
    source.push('$');

    Regex::new(&source).with_context(|| format!("Invalid search pattern: {}", pattern))
}

/// Recursively find entries under `root` whose file name matches `*query*`.
///
/// `query` may itself contain glob wildcards. Unreadable entries are
/// skipped with a warning.
pub fn search_files<P: AsRef<Path>>(root: P, query: &str) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    let matcher = glob_to_regex(&format!("*{}*", query))?;

    debug!("Searching {} for {}", root.display(), matcher.as_str());

    let mut found = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Error walking directory: {}", e);
                continue;
            }
        };

        if matcher.is_match(&entry.file_name().to_string_lossy()) {
            found.push(entry.into_path());
        }
    }

    Ok(found)
}
