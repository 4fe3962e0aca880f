//! RON site configuration and its translation into a generator.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sitegen_core::{AssetCopyEntry, ContentToCreate, PageDescriptor, PageMetadata, Priority};
use sitegen_engine::{GenerationOptions, SiteGenerator, StaticContentProvider};

pub const DEFAULT_CONFIG_FILE: &str = "site.ron";
const DEFAULT_APP_URL: &str = "http://localhost:5000";
const DEFAULT_OUTPUT_DIR: &str = "output";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub output_dir: PathBuf,
    /// Path prefix the site is hosted under, e.g. `/docs`.
    pub base_url: Option<String>,
    pub app_url: String,
    pub verify_links: bool,
    /// Resolve relative links against their page instead of the site root.
    pub resolve_relative_links: bool,
    pub ignore_patterns: Vec<String>,
    pub pages: Vec<PageConfig>,
    /// Asset folders served by the application itself; copied to the output root.
    pub asset_dirs: Vec<PathBuf>,
    pub content_roots: Vec<ContentRootConfig>,
    pub copy: Vec<CopyConfig>,
    pub create: Vec<CreateConfig>,
    pub routes: Vec<String>,
    pub request_timeout_secs: Option<u64>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            base_url: None,
            app_url: DEFAULT_APP_URL.to_string(),
            verify_links: true,
            resolve_relative_links: false,
            ignore_patterns: Vec::new(),
            pages: Vec::new(),
            asset_dirs: Vec::new(),
            content_roots: Vec::new(),
            copy: Vec::new(),
            create: Vec::new(),
            routes: Vec::new(),
            request_timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    pub url: String,
    pub output_file: String,
    #[serde(default)]
    pub binary: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub metadata: Option<PageMetadata>,
}

/// Content folder owned by a provider, copied below `target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRootConfig {
    pub source: PathBuf,
    #[serde(default)]
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CopyConfig {
    pub source: PathBuf,
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub exclude_extensions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateConfig {
    pub target: String,
    pub content: String,
}

impl SiteConfig {
    pub fn from_ron(text: &str, path: &Path) -> Result<Self, ConfigError> {
        ron::from_str(text).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&text, path)
    }

    /// Uses `explicit` when given; otherwise `site.ron` if present, else defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::load(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Command line values take precedence over the file.
    pub fn apply_overrides(
        &mut self,
        base_url: Option<String>,
        output_dir: Option<PathBuf>,
        app_url: Option<String>,
    ) {
        if let Some(base_url) = base_url {
            self.base_url = Some(base_url);
        }
        if let Some(output_dir) = output_dir {
            self.output_dir = output_dir;
        }
        if let Some(app_url) = app_url {
            self.app_url = app_url;
        }
    }

    pub fn generation_options(&self) -> GenerationOptions {
        let mut options = GenerationOptions::new(&self.output_dir);
        options.base_path = self
            .base_url
            .clone()
            .filter(|base| !base.trim().is_empty());
        options.verify_links = self.verify_links;
        options.resolve_relative_links = self.resolve_relative_links;
        options.ignore_patterns = self.ignore_patterns.clone();
        options.asset_dirs = self.asset_dirs.clone();
        options.fetch.request_timeout = self.request_timeout_secs.map(Duration::from_secs);
        options
    }

    pub fn provider(&self) -> StaticContentProvider {
        let pages = self.pages.iter().map(PageConfig::to_descriptor).collect();
        let copies = self
            .content_roots
            .iter()
            .map(|root| AssetCopyEntry::new(&root.source, root.target.as_str()))
            .chain(self.copy.iter().map(|copy| {
                AssetCopyEntry::new(&copy.source, copy.target.as_str())
                    .excluding(copy.exclude_extensions.clone())
            }))
            .collect();
        let creates = self
            .create
            .iter()
            .map(|create| ContentToCreate::new(create.target.as_str(), create.content.as_bytes()))
            .collect();

        StaticContentProvider::new("config")
            .with_pages(pages)
            .with_copies(copies)
            .with_creates(creates)
    }

    pub fn build_generator(&self) -> SiteGenerator {
        SiteGenerator::new(self.generation_options())
            .with_provider(Arc::new(self.provider()))
            .with_routes(self.routes.clone())
    }
}

impl PageConfig {
    fn to_descriptor(&self) -> PageDescriptor {
        let mut page =
            PageDescriptor::new(self.url.as_str(), self.output_file.as_str()).with_priority(self.priority);
        if self.binary {
            page = page.binary();
        }
        if let Some(metadata) = &self.metadata {
            page = page.with_metadata(metadata.clone());
        }
        page
    }
}
