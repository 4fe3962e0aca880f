use sitegen_core::{AssetCopyEntry, ContentToCreate, PageDescriptor, Priority};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ProviderError(pub String);

impl From<std::io::Error> for ProviderError {
    fn from(err: std::io::Error) -> Self {
        Self(err.to_string())
    }
}

/// A source of pages and static content. Lists are returned in the order the
/// provider wants them considered; the generator only aggregates them.
#[async_trait::async_trait]
pub trait ContentProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn pages_to_generate(&self) -> Result<Vec<PageDescriptor>, ProviderError>;

    async fn content_to_copy(&self) -> Result<Vec<AssetCopyEntry>, ProviderError> {
        Ok(Vec::new())
    }

    async fn content_to_create(&self) -> Result<Vec<ContentToCreate>, ProviderError> {
        Ok(Vec::new())
    }
}

/// Provider backed by fixed lists, typically loaded from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticContentProvider {
    name: String,
    pages: Vec<PageDescriptor>,
    copies: Vec<AssetCopyEntry>,
    creates: Vec<ContentToCreate>,
}

impl StaticContentProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_pages(mut self, pages: Vec<PageDescriptor>) -> Self {
        self.pages = pages;
        self
    }

    pub fn with_copies(mut self, copies: Vec<AssetCopyEntry>) -> Self {
        self.copies = copies;
        self
    }

    pub fn with_creates(mut self, creates: Vec<ContentToCreate>) -> Self {
        self.creates = creates;
        self
    }
}

#[async_trait::async_trait]
impl ContentProvider for StaticContentProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn pages_to_generate(&self) -> Result<Vec<PageDescriptor>, ProviderError> {
        Ok(self.pages.clone())
    }

    async fn content_to_copy(&self) -> Result<Vec<AssetCopyEntry>, ProviderError> {
        Ok(self.copies.clone())
    }

    async fn content_to_create(&self) -> Result<Vec<ContentToCreate>, ProviderError> {
        Ok(self.creates.clone())
    }
}

/// Turns an ad-hoc mapped route (e.g. `/styles.css`) into a page generated last.
///
/// Routes whose final segment has an extension are written verbatim; others
/// become `<route>/index.html`.
pub fn route_to_page(route: &str) -> PageDescriptor {
    let trimmed = route.trim().trim_matches('/');
    let last_segment = trimmed.rsplit('/').next().unwrap_or_default();
    let output_file = if trimmed.is_empty() {
        "index.html".to_string()
    } else if last_segment.contains('.') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/index.html")
    };
    PageDescriptor::new(format!("/{trimmed}"), output_file).with_priority(Priority::MustBeLast)
}
