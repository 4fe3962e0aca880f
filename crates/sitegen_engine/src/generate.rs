use std::collections::BTreeMap;
use std::sync::Arc;

use futures_util::future::join_all;
use sitegen_core::{BrokenLink, PageDescriptor, Priority, ValidPathSet};
use sitegen_logging::{sitegen_debug, sitegen_info, sitegen_warn};
use tokio_util::sync::CancellationToken;

use crate::decode::decode_text;
use crate::fetch::PageFetcher;
use crate::links::LinkVerifier;
use crate::persist::AtomicFileWriter;
use crate::{FailedPage, FailureKind, FetchError, FetchOutput, GenerationError};

/// What happened to every page of a run, merged across buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteReport {
    pub written: Vec<String>,
    pub failed: Vec<FailedPage>,
    pub broken_links: Vec<BrokenLink>,
}

enum PageOutcome {
    Written {
        output_file: String,
        broken_links: Vec<BrokenLink>,
    },
    Failed(FailedPage),
}

struct LinkCheck {
    verifier: LinkVerifier,
    valid: ValidPathSet,
}

/// Fetches pages from the running site and writes them below the output root,
/// one priority bucket at a time.
pub struct FetchAndWrite {
    fetcher: Arc<dyn PageFetcher>,
    writer: AtomicFileWriter,
    app_url: String,
    link_check: Option<Arc<LinkCheck>>,
    cancel: CancellationToken,
}

impl FetchAndWrite {
    pub fn new(fetcher: Arc<dyn PageFetcher>, writer: AtomicFileWriter, app_url: &str) -> Self {
        Self {
            fetcher,
            writer,
            app_url: app_url.trim_end_matches('/').to_string(),
            link_check: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Verify links of every HTML page written during the run.
    pub fn with_link_check(mut self, verifier: LinkVerifier, valid: ValidPathSet) -> Self {
        self.link_check = Some(Arc::new(LinkCheck { verifier, valid }));
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Buckets run in ascending priority; each is fully written before the
    /// next one starts fetching. Order inside a bucket is unspecified.
    /// Fetches overlap on the runtime; decoding, link checks and writes run
    /// on the blocking pool.
    pub async fn run(
        &self,
        buckets: BTreeMap<Priority, Vec<PageDescriptor>>,
    ) -> Result<WriteReport, GenerationError> {
        let mut report = WriteReport::default();

        for (priority, pages) in buckets {
            if self.cancel.is_cancelled() {
                return Err(GenerationError::Cancelled);
            }
            sitegen_info!("Generating {} page(s) with priority {:?}", pages.len(), priority);

            let outcomes = join_all(pages.iter().map(|page| self.process_page(page))).await;
            for outcome in outcomes {
                match outcome {
                    PageOutcome::Written {
                        output_file,
                        broken_links,
                    } => {
                        report.written.push(output_file);
                        report.broken_links.extend(broken_links);
                    }
                    PageOutcome::Failed(failed) => report.failed.push(failed),
                }
            }
        }

        if self.cancel.is_cancelled() {
            return Err(GenerationError::Cancelled);
        }
        Ok(report)
    }

    async fn process_page(&self, page: &PageDescriptor) -> PageOutcome {
        let url = page_url(&self.app_url, &page.url);
        let fetched = tokio::select! {
            _ = self.cancel.cancelled() => Err(FetchError::new(FailureKind::Cancelled, "generation cancelled")),
            result = self.fetcher.fetch(&url) => result,
        };

        let output = match fetched {
            Ok(output) => output,
            Err(err) => {
                sitegen_warn!("Failed to fetch {} ({}): {}", url, err.kind, err.message);
                return failed(page, err.to_string());
            }
        };

        let writer = self.writer.clone();
        let link_check = self.link_check.clone();
        let owned_page = page.clone();
        let written = tokio::task::spawn_blocking(move || {
            let (bytes, broken_links) = if owned_page.is_binary {
                (output.bytes, Vec::new())
            } else {
                prepare_text(&owned_page, output, link_check.as_deref())
            };
            writer
                .write(&owned_page.output_file, &bytes)
                .map(|path| (path, broken_links))
        })
        .await;

        match written {
            Ok(Ok((path, broken_links))) => {
                sitegen_debug!("Wrote {} to {:?}", page.url, path);
                PageOutcome::Written {
                    output_file: page.output_file.clone(),
                    broken_links,
                }
            }
            Ok(Err(err)) => {
                sitegen_warn!("Failed to write {}: {}", page.output_file, err);
                failed(page, err.to_string())
            }
            Err(err) => {
                sitegen_warn!("Write task for {} did not complete: {}", page.output_file, err);
                failed(page, err.to_string())
            }
        }
    }
}

/// Decodes a text page to UTF-8 and checks its links when it is HTML.
/// Malformed bytes are replaced; a page that rendered is always written.
fn prepare_text(
    page: &PageDescriptor,
    output: FetchOutput,
    link_check: Option<&LinkCheck>,
) -> (Vec<u8>, Vec<BrokenLink>) {
    let content_type = output.metadata.content_type.as_deref();
    let decoded = decode_text(&output.bytes, content_type);
    if decoded.had_errors {
        sitegen_warn!(
            "{} contains bytes that are not valid {}; replaced them",
            page.url,
            decoded.encoding_label
        );
    }

    let is_html =
        page.is_html() || content_type.is_some_and(|ct| ct.trim_start().starts_with("text/html"));
    let broken_links = match link_check {
        Some(check) if is_html => check.verifier.verify(&decoded.text, &page.url, &check.valid),
        _ => Vec::new(),
    };
    (decoded.text.into_bytes(), broken_links)
}

fn failed(page: &PageDescriptor, reason: String) -> PageOutcome {
    PageOutcome::Failed(FailedPage {
        url: page.url.clone(),
        reason,
    })
}

fn page_url(app_url: &str, page: &str) -> String {
    let path = page.trim();
    if path.starts_with('/') {
        format!("{app_url}{path}")
    } else {
        format!("{app_url}/{path}")
    }
}
