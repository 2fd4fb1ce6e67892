// functional.works-hub.com

use async_trait::async_trait;
use futures::future::join_all;

use crate::adapter::{
    collect_links, first_text, joined_text, DiscoveryAdapter, ExtractionAdapter, ExtractionError,
    UrlSignature,
};
use crate::application::dedupe::dedupe;
use crate::domain::{JobRecord, Link, SourceName};
use crate::port::{RenderError, RenderPage, RenderSession, WaitPolicy};

const LINK_PREFIX: &str = "https://functional.works-hub.com/jobs/";
const LISTING_PAGES: u32 = 5;
const TITLE_SELECTOR: &str = "h1";
const DESCRIPTION_SELECTOR: &str = "body > div:nth-of-type(1) > div:nth-of-type(2) > div:nth-of-type(2) > div > div:nth-of-type(1) > div:nth-of-type(2)";

fn listing_url(page: u32) -> String {
    format!(
        "https://functional.works-hub.com/jobs/search?page={}&remote=true",
        page
    )
}

pub struct Functionalworks;

#[async_trait]
impl ExtractionAdapter for Functionalworks {
    fn source(&self) -> SourceName {
        SourceName::Functionalworks
    }

    fn signature(&self) -> UrlSignature {
        UrlSignature::StartsWith("https://functional.works-hub.com")
    }

    fn tags(&self) -> &'static [&'static str] {
        &["functionalworks"]
    }

    async fn scrape(&self, page: &dyn RenderPage, url: &Link) -> Result<JobRecord, ExtractionError> {
        page.navigate(url.as_str(), WaitPolicy::Load).await?;
        let title = first_text(page, TITLE_SELECTOR).await?;
        let description = joined_text(page, DESCRIPTION_SELECTOR).await?;
        Ok(JobRecord::new(title, description, url.clone(), self.tags())?)
    }
}

#[async_trait]
impl DiscoveryAdapter for Functionalworks {
    fn source(&self) -> SourceName {
        SourceName::Functionalworks
    }

    fn link_prefix(&self) -> &str {
        LINK_PREFIX
    }

    /// Search result pages 1..=5, fetched concurrently; one failed page fails the source
    async fn discover_links(&self, session: &dyn RenderSession) -> Result<Vec<Link>, RenderError> {
        let urls: Vec<String> = (1..=LISTING_PAGES).map(listing_url).collect();
        let pages = join_all(urls.iter().map(|url| collect_links(session, url, LINK_PREFIX)))
            .await
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?;
        Ok(dedupe(pages.into_iter().flatten()))
    }
}
