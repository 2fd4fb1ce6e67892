// rustjobs.dev

use async_trait::async_trait;

use crate::adapter::{
    collect_links, first_text, joined_text, DiscoveryAdapter, ExtractionAdapter, ExtractionError,
    UrlSignature,
};
use crate::domain::{JobRecord, Link, SourceName};
use crate::port::{RenderError, RenderPage, RenderSession, WaitPolicy};

const LISTING_URL: &str = "https://rustjobs.dev/locations/remote/";
const LINK_PREFIX: &str = "https://rustjobs.dev/featured-jobs/";
const TITLE_SELECTOR: &str = "h1";
const DESCRIPTION_SELECTOR: &str = ".markdown-component p";

pub struct Rustjobs;

#[async_trait]
impl ExtractionAdapter for Rustjobs {
    fn source(&self) -> SourceName {
        SourceName::Rustjobs
    }

    fn signature(&self) -> UrlSignature {
        UrlSignature::Contains("rustjobs")
    }

    fn tags(&self) -> &'static [&'static str] {
        &["rust", "rustjobs"]
    }

    async fn scrape(&self, page: &dyn RenderPage, url: &Link) -> Result<JobRecord, ExtractionError> {
        page.navigate(url.as_str(), WaitPolicy::Load).await?;
        let title = first_text(page, TITLE_SELECTOR).await?;
        let description = joined_text(page, DESCRIPTION_SELECTOR).await?;
        Ok(JobRecord::new(title, description, url.clone(), self.tags())?)
    }
}

#[async_trait]
impl DiscoveryAdapter for Rustjobs {
    fn source(&self) -> SourceName {
        SourceName::Rustjobs
    }

    fn link_prefix(&self) -> &str {
        LINK_PREFIX
    }

    async fn discover_links(&self, session: &dyn RenderSession) -> Result<Vec<Link>, RenderError> {
        collect_links(session, LISTING_URL, LINK_PREFIX).await
    }
}
