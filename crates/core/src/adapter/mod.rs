// Site Adapters - per-site discovery and extraction rules
//
// Adding a source means one new file under `sites/` implementing the two
// traits below and one registration line in `AdapterRegistry::builtin`.

mod registry;
pub mod sites;

pub use registry::{AdapterRegistry, RegistryError, SourceSummary};

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

use crate::application::constants::DESCRIPTION_SEPARATOR;
use crate::application::dedupe::dedupe;
use crate::application::panic_guard::{execute_guarded_async, PanicGuardResult};
use crate::domain::{DomainError, JobRecord, Link, SourceName};
use crate::port::{RenderError, RenderPage, RenderSession, WaitPolicy};

/// URL shape an extraction adapter claims
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlSignature {
    Contains(&'static str),
    StartsWith(&'static str),
}

impl UrlSignature {
    pub fn matches(&self, url: &str) -> bool {
        match self {
            UrlSignature::Contains(needle) => url.contains(needle),
            UrlSignature::StartsWith(prefix) => url.starts_with(prefix),
        }
    }
}

impl fmt::Display for UrlSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrlSignature::Contains(needle) => write!(f, "contains {}", needle),
            UrlSignature::StartsWith(prefix) => write!(f, "starts with {}", prefix),
        }
    }
}

/// Failure of one link's extraction (never fatal to the run)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Malformed content: {0}")]
    MalformedContent(#[from] DomainError),

    #[error("Adapter panicked: {0}")]
    Panicked(String),
}

/// Turns one job page into a [`JobRecord`]
#[async_trait]
pub trait ExtractionAdapter: Send + Sync {
    fn source(&self) -> SourceName;

    fn signature(&self) -> UrlSignature;

    /// Tags stamped on every record this adapter produces (non-empty)
    fn tags(&self) -> &'static [&'static str];

    /// Read the record from an already opened page
    async fn scrape(&self, page: &dyn RenderPage, url: &Link) -> Result<JobRecord, ExtractionError>;

    /// Open a page, scrape `url`, and close the page on every exit path
    async fn extract(
        &self,
        session: &dyn RenderSession,
        url: &Link,
    ) -> Result<JobRecord, ExtractionError> {
        let page = session.new_page().await?;
        let outcome = execute_guarded_async(self.scrape(page.as_ref(), url)).await;

        if let Err(e) = page.close().await {
            warn!(url = %url, error = %e, "Failed to close page");
        }

        match outcome {
            PanicGuardResult::Success(result) => result,
            PanicGuardResult::Panicked(msg) => Err(ExtractionError::Panicked(msg)),
        }
    }
}

/// Produces candidate job links from a source's listing pages
#[async_trait]
pub trait DiscoveryAdapter: Send + Sync {
    fn source(&self) -> SourceName;

    /// Only anchors starting with this prefix are job links
    fn link_prefix(&self) -> &str;

    async fn discover_links(&self, session: &dyn RenderSession) -> Result<Vec<Link>, RenderError>;
}

/// Text of the first element matching `selector`, waiting for it to appear
pub async fn first_text(page: &dyn RenderPage, selector: &str) -> Result<String, RenderError> {
    let handle = page.wait_for_selector(selector).await?;
    page.evaluate_text(&handle).await
}

/// Texts of every element matching `selector`, one per line
pub async fn joined_text(page: &dyn RenderPage, selector: &str) -> Result<String, RenderError> {
    Ok(page
        .query_all_text(selector)
        .await?
        .join(DESCRIPTION_SEPARATOR))
}

/// Anchors of one listing page that start with `prefix`, deduplicated
pub async fn collect_links(
    session: &dyn RenderSession,
    listing_url: &str,
    prefix: &str,
) -> Result<Vec<Link>, RenderError> {
    let page = session.new_page().await?;
    let hrefs = read_hrefs(page.as_ref(), listing_url).await;

    if let Err(e) = page.close().await {
        warn!(listing_url = %listing_url, error = %e, "Failed to close listing page");
    }

    let links = filter_links(hrefs?, prefix);
    debug!(listing_url = %listing_url, count = links.len(), "Collected listing links");
    Ok(links)
}

async fn read_hrefs(page: &dyn RenderPage, listing_url: &str) -> Result<Vec<String>, RenderError> {
    page.navigate(listing_url, WaitPolicy::NetworkIdle).await?;
    page.query_all_hrefs("a").await
}

/// Keep hrefs starting with `prefix` that parse as links, first occurrence wins
pub fn filter_links(hrefs: Vec<String>, prefix: &str) -> Vec<Link> {
    dedupe(
        hrefs
            .into_iter()
            .filter(|href| href.starts_with(prefix))
            .filter_map(|href| Link::parse(href).ok()),
    )
}
