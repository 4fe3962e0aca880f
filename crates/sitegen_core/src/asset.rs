use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::paths::normalize_relative_path;

/// A file or directory to copy into the output, relative to the output root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetCopyEntry {
    pub source_path: PathBuf,
    pub target_path: String,
    #[serde(default)]
    pub excluded_extensions: Vec<String>,
}

impl AssetCopyEntry {
    pub fn new(source_path: impl Into<PathBuf>, target_path: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            target_path: target_path.into(),
            excluded_extensions: Vec::new(),
        }
    }

    pub fn excluding<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn target_key(&self) -> String {
        normalize_relative_path(&self.target_path)
    }

    /// Extension comparison is case-insensitive and tolerates a leading dot.
    pub fn is_extension_excluded(&self, extension: &str) -> bool {
        let wanted = extension.trim_start_matches('.');
        self.excluded_extensions
            .iter()
            .any(|ext| ext.trim_start_matches('.').eq_ignore_ascii_case(wanted))
    }
}

/// In-memory generated content, e.g. a search index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentToCreate {
    pub target_path: String,
    pub bytes: Vec<u8>,
}

impl ContentToCreate {
    pub fn new(target_path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            target_path: target_path.into(),
            bytes: bytes.into(),
        }
    }

    pub fn target_key(&self) -> String {
        normalize_relative_path(&self.target_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excluded_extensions_ignore_dot_and_case() {
        let entry = AssetCopyEntry::new("wwwroot", "").excluding([".SCSS", "map"]);
        assert!(entry.is_extension_excluded("scss"));
        assert!(entry.is_extension_excluded(".map"));
        assert!(!entry.is_extension_excluded("css"));
    }
}
