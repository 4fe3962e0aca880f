use serde::{Deserialize, Serialize};

use crate::paths::normalize_relative_path;

/// Generation phase for a page. Buckets run strictly in declaration order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum Priority {
    MustBeFirst,
    #[default]
    Normal,
    /// Content that depends on the rest of the site, such as stylesheet endpoints.
    MustBeLast,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageMetadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub last_modified: Option<String>,
    #[serde(default)]
    pub order: Option<i32>,
}

/// One unit of static output: the URL to fetch and where to write it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageDescriptor {
    pub url: String,
    pub output_file: String,
    #[serde(default)]
    pub metadata: Option<PageMetadata>,
    #[serde(default)]
    pub is_binary: bool,
    #[serde(default)]
    pub priority: Priority,
}

impl PageDescriptor {
    pub fn new(url: impl Into<String>, output_file: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            output_file: output_file.into(),
            metadata: None,
            is_binary: false,
            priority: Priority::Normal,
        }
    }

    pub fn binary(mut self) -> Self {
        self.is_binary = true;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_metadata(mut self, metadata: PageMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Deduplication key: the output file with separators normalized.
    pub fn output_key(&self) -> String {
        normalize_relative_path(&self.output_file)
    }

    /// HTML pages are the ones eligible for link verification.
    pub fn is_html(&self) -> bool {
        if self.is_binary {
            return false;
        }
        let key = self.output_key().to_ascii_lowercase();
        key.ends_with(".html") || key.ends_with(".htm")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priorities_order_first_normal_last() {
        let mut all = vec![Priority::MustBeLast, Priority::Normal, Priority::MustBeFirst];
        all.sort();
        assert_eq!(
            all,
            vec![Priority::MustBeFirst, Priority::Normal, Priority::MustBeLast]
        );
    }

    #[test]
    fn output_key_ignores_leading_slash_and_backslashes() {
        let a = PageDescriptor::new("/about", "/about/index.html");
        let b = PageDescriptor::new("/about", "about\\index.html");
        assert_eq!(a.output_key(), b.output_key());
    }

    #[test]
    fn binary_pages_are_not_html() {
        let page = PageDescriptor::new("/feed", "feed/index.html").binary();
        assert!(!page.is_html());
        assert!(PageDescriptor::new("/", "index.html").is_html());
        assert!(!PageDescriptor::new("/styles.css", "styles.css").is_html());
    }
}
