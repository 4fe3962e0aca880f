use regex::{Regex, RegexBuilder};
use thiserror::Error;

use crate::paths::normalize_relative_path;

#[derive(Debug, Error)]
pub enum GlobError {
    #[error("invalid ignore pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },
}

/// Compiled ignore globs, matched against output-relative paths.
///
/// Supported syntax: `*` (any run inside one segment), `**` (any depth,
/// `**/` also matches zero directories) and `?` (one character other than a
/// separator). Matching is case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    patterns: Vec<(String, Regex)>,
}

impl IgnoreRules {
    pub fn new<I, S>(patterns: I) -> Result<Self, GlobError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut compiled = Vec::new();
        for pattern in patterns {
            let raw = pattern.as_ref();
            let normalized = normalize_relative_path(raw);
            if normalized.is_empty() {
                continue;
            }
            let regex = RegexBuilder::new(&glob_to_regex(&normalized))
                .case_insensitive(true)
                .build()
                .map_err(|err| GlobError::InvalidPattern {
                    pattern: raw.to_string(),
                    message: err.to_string(),
                })?;
            compiled.push((raw.to_string(), regex));
        }
        Ok(Self { patterns: compiled })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// True when `path` (either separator style) matches any pattern.
    pub fn is_ignored(&self, path: &str) -> bool {
        self.matching_pattern(path).is_some()
    }

    /// The first pattern that matches `path`, for logging.
    pub fn matching_pattern(&self, path: &str) -> Option<&str> {
        let normalized = normalize_relative_path(path);
        self.patterns
            .iter()
            .find(|(_, regex)| regex.is_match(&normalized))
            .map(|(raw, _)| raw.as_str())
    }
}

fn glob_to_regex(glob: &str) -> String {
    let mut out = String::with_capacity(glob.len() * 2 + 2);
    out.push('^');
    let chars: Vec<char> = glob.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' if chars.get(i + 1) == Some(&'*') => {
                if chars.get(i + 2) == Some(&'/') {
                    out.push_str("(?:.*/)?");
                    i += 3;
                } else {
                    out.push_str(".*");
                    i += 2;
                }
            }
            '*' => {
                out.push_str("[^/]*");
                i += 1;
            }
            '?' => {
                out.push_str("[^/]");
                i += 1;
            }
            other => {
                let mut buf = [0u8; 4];
                out.push_str(&regex::escape(other.encode_utf8(&mut buf)));
                i += 1;
            }
        }
    }
    out.push('$');
    out
}
