use pretty_assertions::assert_eq;
use sitegen_core::{
    AssetCopyEntry, AssetRegistry, ContentToCreate, PageDescriptor, PageRegistry, Priority,
};

fn init_logging() {
    sitegen_logging::initialize_for_tests();
}

#[test]
fn duplicate_output_files_keep_the_first_entry() {
    init_logging();
    let mut registry = PageRegistry::new();
    let skipped = registry.extend([
        PageDescriptor::new("/", "index.html"),
        PageDescriptor::new("/about", "about/index.html"),
        PageDescriptor::new("/about-copy", "/about/index.html"),
        PageDescriptor::new("/home", "index.html").binary(),
    ]);

    assert_eq!(skipped, 2);
    assert_eq!(registry.duplicates(), 2);
    let urls: Vec<_> = registry.pages().iter().map(|p| p.url.as_str()).collect();
    assert_eq!(urls, vec!["/", "/about"]);
    assert!(!registry.pages()[0].is_binary);
}

#[test]
fn buckets_follow_priority_order_and_keep_collection_order() {
    let mut registry = PageRegistry::new();
    registry.extend([
        PageDescriptor::new("/styles.css", "styles.css").with_priority(Priority::MustBeLast),
        PageDescriptor::new("/b", "b/index.html"),
        PageDescriptor::new("/robots.txt", "robots.txt").with_priority(Priority::MustBeFirst),
        PageDescriptor::new("/a", "a/index.html"),
    ]);

    let buckets = registry.into_buckets();
    let order: Vec<_> = buckets.keys().copied().collect();
    assert_eq!(
        order,
        vec![Priority::MustBeFirst, Priority::Normal, Priority::MustBeLast]
    );
    let normal: Vec<_> = buckets[&Priority::Normal]
        .iter()
        .map(|p| p.url.as_str())
        .collect();
    assert_eq!(normal, vec!["/b", "/a"]);
}

#[test]
fn copy_entries_are_deduplicated_on_source_and_target() {
    let mut registry = AssetRegistry::new();
    assert!(registry.add_copy(AssetCopyEntry::new("wwwroot", "")));
    assert!(registry.add_copy(AssetCopyEntry::new("static", "")));
    assert!(registry.add_copy(AssetCopyEntry::new("content/img", "img")));
    assert!(!registry.add_copy(AssetCopyEntry::new("content/img", "./img")));
    assert!(!registry.add_copy(AssetCopyEntry::new("wwwroot", "/")));

    let sources: Vec<_> = registry
        .copies()
        .iter()
        .map(|entry| entry.source_path.to_string_lossy().into_owned())
        .collect();
    assert_eq!(sources, vec!["wwwroot", "static", "content/img"]);
}

#[test]
fn created_files_are_deduplicated_by_target_path() {
    let mut registry = AssetRegistry::new();
    assert!(registry.add_create(ContentToCreate::new("search-index.json", "{}")));
    assert!(!registry.add_create(ContentToCreate::new("/search-index.json", "[]")));

    assert_eq!(registry.creates().len(), 1);
    assert_eq!(registry.creates()[0].bytes, b"{}".to_vec());
}
