//! Sitegen core: pure data model and path algorithms for static output generation.
mod asset;
mod broken;
mod glob;
mod page;
mod paths;
mod registry;
mod valid_paths;

pub use asset::{AssetCopyEntry, ContentToCreate};
pub use broken::{BrokenLink, BrokenLinkReport, LinkType};
pub use glob::{GlobError, IgnoreRules};
pub use page::{PageDescriptor, PageMetadata, Priority};
pub use paths::{
    is_external_link, normalize_link, normalize_relative_path, output_file_to_url, resolve_link,
    strip_base_path, strip_query_and_fragment,
};
pub use registry::{AssetRegistry, PageRegistry};
pub use valid_paths::ValidPathSet;
