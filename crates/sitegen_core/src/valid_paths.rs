use std::collections::HashSet;

use crate::paths::{output_file_to_url, strip_base_path, strip_query_and_fragment};
use crate::PageDescriptor;

const INDEX_FILE: &str = "/index.html";

/// Case-insensitive set of site-absolute URL paths considered reachable.
#[derive(Debug, Clone, Default)]
pub struct ValidPathSet {
    paths: HashSet<String>,
}

impl ValidPathSet {
    pub fn new() -> Self {
        let mut set = Self::default();
        set.paths.insert("/".to_string());
        set
    }

    /// Builds the set from every page plus every copied or created asset target.
    pub fn build<'a, P, A>(pages: P, asset_targets: A, base: Option<&str>) -> Self
    where
        P: IntoIterator<Item = &'a PageDescriptor>,
        A: IntoIterator<Item = &'a str>,
    {
        let mut set = Self::new();
        for page in pages {
            set.insert_page(page, base);
        }
        for target in asset_targets {
            set.insert_asset(target, base);
        }
        set
    }

    /// Adds the page URL and its output file, each with lenient variants.
    pub fn insert_page(&mut self, page: &PageDescriptor, base: Option<&str>) {
        let url = strip_base_path(strip_query_and_fragment(page.url.trim()), base);
        self.insert_with_variants(&url);
        let output = output_file_to_url(&page.output_file, base);
        self.insert_with_variants(&output);
    }

    pub fn insert_asset(&mut self, target: &str, base: Option<&str>) {
        let url = output_file_to_url(target, base);
        self.paths.insert(url.to_lowercase());
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(&path.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    fn insert_with_variants(&mut self, path: &str) {
        let lower = path.to_lowercase();
        let mut forms = vec![lower.clone()];
        if let Some(dir) = lower.strip_suffix(INDEX_FILE) {
            forms.push(format!("{dir}/"));
        }

        for form in forms {
            if form.len() > 1 {
                if let Some(trimmed) = form.strip_suffix('/') {
                    self.paths.insert(trimmed.to_string());
                } else {
                    self.paths.insert(format!("{form}/"));
                }
            }
            self.paths.insert(form);
        }
    }
}
