use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use crate::{AssetCopyEntry, ContentToCreate, PageDescriptor, Priority};

/// Collects page descriptors, keeping the first entry per output file.
#[derive(Debug, Clone, Default)]
pub struct PageRegistry {
    pages: Vec<PageDescriptor>,
    seen: HashSet<String>,
    duplicates: usize,
}

impl PageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when an earlier page already claimed the output file.
    pub fn add(&mut self, page: PageDescriptor) -> bool {
        if self.seen.insert(page.output_key()) {
            self.pages.push(page);
            true
        } else {
            self.duplicates += 1;
            false
        }
    }

    pub fn extend<I>(&mut self, pages: I) -> usize
    where
        I: IntoIterator<Item = PageDescriptor>,
    {
        let mut skipped = 0;
        for page in pages {
            if !self.add(page) {
                skipped += 1;
            }
        }
        skipped
    }

    pub fn pages(&self) -> &[PageDescriptor] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    /// Groups pages by priority, preserving collection order inside a bucket.
    pub fn into_buckets(self) -> BTreeMap<Priority, Vec<PageDescriptor>> {
        let mut buckets: BTreeMap<Priority, Vec<PageDescriptor>> = BTreeMap::new();
        for page in self.pages {
            buckets.entry(page.priority).or_default().push(page);
        }
        buckets
    }
}

/// Copy entries deduplicated on source and target, create entries on target
/// path. Copied files that land on the same output path are resolved per
/// file when copying.
#[derive(Debug, Clone, Default)]
pub struct AssetRegistry {
    copies: Vec<AssetCopyEntry>,
    creates: Vec<ContentToCreate>,
    copy_entries: HashSet<(PathBuf, String)>,
    create_targets: HashSet<String>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_copy(&mut self, entry: AssetCopyEntry) -> bool {
        let key = (entry.source_path.clone(), entry.target_key());
        if self.copy_entries.insert(key) {
            self.copies.push(entry);
            true
        } else {
            false
        }
    }

    pub fn add_create(&mut self, entry: ContentToCreate) -> bool {
        if self.create_targets.insert(entry.target_key()) {
            self.creates.push(entry);
            true
        } else {
            false
        }
    }

    pub fn copies(&self) -> &[AssetCopyEntry] {
        &self.copies
    }

    pub fn creates(&self) -> &[ContentToCreate] {
        &self.creates
    }
}
