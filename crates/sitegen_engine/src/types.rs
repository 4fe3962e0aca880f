use std::fmt;

use serde::Serialize;
use sitegen_core::{BrokenLinkReport, GlobError};

use crate::persist::PersistError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub bytes: Vec<u8>,
    pub metadata: FetchMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    pub url: String,
    pub final_url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub byte_len: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for FetchError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    Cancelled,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::Cancelled => write!(f, "cancelled"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// A page that was skipped because it could not be fetched or written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedPage {
    pub url: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationSummary {
    pub pages_written: usize,
    pub failed_pages: Vec<FailedPage>,
    pub duplicate_pages: usize,
    pub assets_copied: usize,
    pub assets_ignored: usize,
    pub files_created: usize,
    pub broken_links: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("output directory error: {0}")]
    OutputDir(#[from] PersistError),
    #[error("content provider {provider} failed: {message}")]
    Provider { provider: String, message: String },
    #[error(transparent)]
    IgnorePattern(#[from] GlobError),
    #[error("failed to create http client: {0}")]
    Client(FetchError),
    #[error("generation cancelled")]
    Cancelled,
    #[error("{report}")]
    BrokenLinks {
        report: BrokenLinkReport,
        summary: Box<GenerationSummary>,
    },
}
