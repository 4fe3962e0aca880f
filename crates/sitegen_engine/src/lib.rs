//! Sitegen engine: providers, fetching, persistence, asset copying and link verification.
mod copy;
mod decode;
mod fetch;
mod generate;
mod generator;
mod links;
mod persist;
mod provider;
mod types;

pub use copy::{AssetCopier, CopyError, CopyOutcome};
pub use decode::{decode_text, DecodedText};
pub use fetch::{FetchSettings, PageFetcher, ReqwestFetcher};
pub use generate::{FetchAndWrite, WriteReport};
pub use generator::{GenerationOptions, SiteGenerator};
pub use links::LinkVerifier;
pub use persist::{
    ensure_output_dir, prepare_output_dir, resolve_output_path, AtomicFileWriter, PersistError,
};
pub use provider::{route_to_page, ContentProvider, ProviderError, StaticContentProvider};
pub use types::{
    FailedPage, FailureKind, FetchError, FetchMetadata, FetchOutput, GenerationError,
    GenerationSummary,
};
