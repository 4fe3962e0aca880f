//! Orchestrates one static generation run: collect, copy, create, fetch, verify.

use std::path::PathBuf;
use std::sync::Arc;

use sitegen_core::{
    AssetCopyEntry, AssetRegistry, BrokenLinkReport, IgnoreRules, PageDescriptor, PageRegistry,
    ValidPathSet,
};
use sitegen_logging::{sitegen_debug, sitegen_error, sitegen_info, sitegen_warn};
use tokio_util::sync::CancellationToken;

use crate::copy::AssetCopier;
use crate::fetch::{FetchSettings, PageFetcher, ReqwestFetcher};
use crate::generate::FetchAndWrite;
use crate::links::LinkVerifier;
use crate::persist::{prepare_output_dir, AtomicFileWriter};
use crate::provider::{route_to_page, ContentProvider};
use crate::{FailureKind, FetchError, GenerationError, GenerationSummary};

#[derive(Debug, Clone)]
pub struct GenerationOptions {
    pub output_dir: PathBuf,
    /// Site base path such as `/docs`, stripped from links before checking.
    pub base_path: Option<String>,
    pub verify_links: bool,
    /// Resolve relative links against their page instead of the site root.
    pub resolve_relative_links: bool,
    pub ignore_patterns: Vec<String>,
    /// Static asset folders served by the site itself, copied to the output root.
    pub asset_dirs: Vec<PathBuf>,
    pub fetch: FetchSettings,
}

impl GenerationOptions {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            base_path: None,
            verify_links: true,
            resolve_relative_links: false,
            ignore_patterns: Vec::new(),
            asset_dirs: Vec::new(),
            fetch: FetchSettings::default(),
        }
    }
}

pub struct SiteGenerator {
    options: GenerationOptions,
    providers: Vec<Arc<dyn ContentProvider>>,
    pages: Vec<PageDescriptor>,
    routes: Vec<String>,
    fetcher: Option<Arc<dyn PageFetcher>>,
    cancel: CancellationToken,
}

impl SiteGenerator {
    pub fn new(options: GenerationOptions) -> Self {
        Self {
            options,
            providers: Vec::new(),
            pages: Vec::new(),
            routes: Vec::new(),
            fetcher: None,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_provider(mut self, provider: Arc<dyn ContentProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Pages configured directly rather than through a provider.
    pub fn with_pages(mut self, pages: Vec<PageDescriptor>) -> Self {
        self.pages.extend(pages);
        self
    }

    /// Ad-hoc mapped routes; they are generated after everything else.
    pub fn with_routes(mut self, routes: Vec<String>) -> Self {
        self.routes.extend(routes);
        self
    }

    /// Replaces the HTTP fetcher, e.g. with an in-process renderer.
    pub fn with_fetcher(mut self, fetcher: Arc<dyn PageFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Provider pages, then configured pages, then routes; first output file wins.
    pub async fn collect_pages(&self) -> Result<PageRegistry, GenerationError> {
        let mut registry = PageRegistry::new();
        for provider in &self.providers {
            let pages = provider
                .pages_to_generate()
                .await
                .map_err(|err| provider_error(provider.as_ref(), err))?;
            sitegen_debug!("Provider {} supplied {} page(s)", provider.name(), pages.len());
            registry.extend(pages);
        }
        registry.extend(self.pages.iter().cloned());
        registry.extend(self.routes.iter().map(|route| route_to_page(route)));

        if registry.duplicates() > 0 {
            sitegen_debug!(
                "Dropped {} page(s) with an already claimed output file",
                registry.duplicates()
            );
        }
        Ok(registry)
    }

    /// Asset folders first, then provider copy and create lists. Copy entries
    /// are unique per source and target; created files per target.
    pub async fn collect_assets(&self) -> Result<AssetRegistry, GenerationError> {
        let mut registry = AssetRegistry::new();
        for dir in &self.options.asset_dirs {
            registry.add_copy(AssetCopyEntry::new(dir.clone(), ""));
        }
        for provider in &self.providers {
            let copies = provider
                .content_to_copy()
                .await
                .map_err(|err| provider_error(provider.as_ref(), err))?;
            for entry in copies {
                if !registry.add_copy(entry.clone()) {
                    sitegen_debug!("Duplicate copy entry {:?} skipped", entry.source_path);
                }
            }
            let creates = provider
                .content_to_create()
                .await
                .map_err(|err| provider_error(provider.as_ref(), err))?;
            for entry in creates {
                registry.add_create(entry);
            }
        }
        Ok(registry)
    }

    /// Runs a full generation against the site listening at `app_url`.
    ///
    /// Fetch failures only drop the affected page. Broken links are reported
    /// together once every page has been written.
    pub async fn generate(&self, app_url: &str) -> Result<GenerationSummary, GenerationError> {
        let app_url = validate_app_url(app_url)?;
        let rules = IgnoreRules::new(&self.options.ignore_patterns)?;
        let output_dir = &self.options.output_dir;
        let base = self.options.base_path.as_deref();

        let pages = self.collect_pages().await?;
        let assets = self.collect_assets().await?;
        sitegen_info!(
            "Generating {} page(s) from {} into {:?}",
            pages.len(),
            app_url,
            output_dir
        );

        prepare_output_dir(output_dir)?;

        let copied = AssetCopier::new(rules).copy_all(assets.copies(), output_dir);
        sitegen_info!(
            "Copied {} static file(s) ({} ignored, {} duplicate, {} failed)",
            copied.copied.len(),
            copied.ignored,
            copied.duplicates,
            copied.failed
        );

        let writer = AtomicFileWriter::new(output_dir.clone());
        let mut created = Vec::new();
        for entry in assets.creates() {
            match writer.write(&entry.target_path, &entry.bytes) {
                Ok(_) => created.push(entry.target_key()),
                Err(err) => sitegen_warn!("Failed to create {}: {}", entry.target_path, err),
            }
        }

        let valid = self.options.verify_links.then(|| {
            let targets = copied.copied.iter().chain(created.iter()).map(String::as_str);
            ValidPathSet::build(pages.pages(), targets, base)
        });

        let fetcher = match &self.fetcher {
            Some(fetcher) => fetcher.clone(),
            None => Arc::new(
                ReqwestFetcher::new(self.options.fetch.clone()).map_err(GenerationError::Client)?,
            ),
        };

        let duplicate_pages = pages.duplicates();
        let mut engine = FetchAndWrite::new(fetcher, writer, &app_url)
            .with_cancellation(self.cancel.clone());
        if let Some(valid) = valid {
            let verifier = LinkVerifier::new(self.options.base_path.clone())
                .with_relative_resolution(self.options.resolve_relative_links);
            engine = engine.with_link_check(verifier, valid);
        }
        let report = engine.run(pages.into_buckets()).await?;

        let summary = GenerationSummary {
            pages_written: report.written.len(),
            failed_pages: report.failed,
            duplicate_pages,
            assets_copied: copied.copied.len(),
            assets_ignored: copied.ignored,
            files_created: created.len(),
            broken_links: report.broken_links.len(),
        };
        sitegen_info!(
            "Wrote {} page(s), {} failed",
            summary.pages_written,
            summary.failed_pages.len()
        );

        if !report.broken_links.is_empty() {
            let report = BrokenLinkReport::new(report.broken_links);
            sitegen_error!("{}", report);
            return Err(GenerationError::BrokenLinks {
                report,
                summary: Box::new(summary),
            });
        }
        Ok(summary)
    }
}

fn provider_error(provider: &dyn ContentProvider, err: impl std::fmt::Display) -> GenerationError {
    GenerationError::Provider {
        provider: provider.name().to_string(),
        message: err.to_string(),
    }
}

fn validate_app_url(app_url: &str) -> Result<String, GenerationError> {
    let parsed = url::Url::parse(app_url.trim()).map_err(|err| {
        GenerationError::Client(FetchError::new(FailureKind::InvalidUrl, err.to_string()))
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(GenerationError::Client(FetchError::new(
            FailureKind::InvalidUrl,
            format!("unsupported scheme {}", parsed.scheme()),
        )));
    }
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}
