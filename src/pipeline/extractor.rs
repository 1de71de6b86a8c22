//! Pulls candidate shell commands out of free-form model output

use regex::Regex;

/// Language tags models like to put on the first line of a fence.
const SHELL_TAGS: &[&str] = &["bash", "sh", "zsh", "shell", "console"];

/// Extracts commands from fenced (```` ``` ````) or inline (`` ` ``) code spans.
///
/// Fenced spans are preferred. Inline spans are only consulted when the text
/// contains no fenced span at all; the two sets are never merged.
#[derive(Debug, Clone)]
pub struct CommandExtractor {
    fenced: Regex,
    inline: Regex,
}

impl CommandExtractor {
    pub fn new() -> Self {
        Self {
            fenced: Regex::new(r"(?s)```(.*?)```").expect("fenced pattern is valid"),
            inline: Regex::new(r"`([^`\n]*)`").expect("inline pattern is valid"),
        }
    }

    /// Extract commands in document order. An empty result means the text
    /// carries nothing actionable.
    ///
    /// Each command is the trimmed contents of its span, except that a
    /// multi-line fence opening with a shell language tag (`bash`, `sh`...)
    /// loses that first line, so the result can differ from the raw span.
    pub fn extract(&self, text: &str) -> Vec<String> {
        let fenced: Vec<String> = self
            .fenced
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| strip_language_tag(m.as_str()))
            .filter_map(clean)
            .collect();

        if !fenced.is_empty() {
            return fenced;
        }

        self.inline
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .filter_map(clean)
            .collect()
    }
}

impl Default for CommandExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn clean(span: &str) -> Option<String> {
    let trimmed = span.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Drop a leading ```` ```bash ```` style tag when the fence spans several lines.
fn strip_language_tag(span: &str) -> &str {
    match span.split_once('\n') {
        Some((first, rest)) if SHELL_TAGS.contains(&first.trim()) => rest,
        _ => span,
    }
}
