// indeed.com

use async_trait::async_trait;
use futures::future::join_all;

use crate::adapter::{
    collect_links, first_text, joined_text, DiscoveryAdapter, ExtractionAdapter, ExtractionError,
    UrlSignature,
};
use crate::application::dedupe::dedupe;
use crate::domain::{JobRecord, Link, SourceName};
use crate::port::{RenderError, RenderPage, RenderSession, WaitPolicy};

const LINK_PREFIX: &str = "https://www.indeed.com/rc/";
const LISTING_PAGES: u32 = 5;
const RESULTS_PER_PAGE: u32 = 10;
const TITLE_SELECTOR: &str = ".jobsearch-JobInfoHeader-title";
const DESCRIPTION_SELECTOR: &str = "#jobDescriptionText p";
// Used when the description has no paragraph markup
const FALLBACK_DESCRIPTION_SELECTOR: &str = ".jobsearch-BodyContainer";

fn listing_url(start: u32) -> String {
    format!(
        "https://www.indeed.com/jobs?q=backend+developer&l=remote&start={}&pp=gQAPAAAAAAAAAAAAAAACMzlOkgAiAQEBBgId8f7_aNT8YvuqBA-6cRMlcbAro5qS6EZtGNYXOgAA",
        start
    )
}

pub struct Indeed;

#[async_trait]
impl ExtractionAdapter for Indeed {
    fn source(&self) -> SourceName {
        SourceName::Indeed
    }

    fn signature(&self) -> UrlSignature {
        UrlSignature::Contains("indeed")
    }

    fn tags(&self) -> &'static [&'static str] {
        &["indeed"]
    }

    async fn scrape(&self, page: &dyn RenderPage, url: &Link) -> Result<JobRecord, ExtractionError> {
        page.navigate(url.as_str(), WaitPolicy::Load).await?;
        let title = first_text(page, TITLE_SELECTOR).await?;

        let mut description = joined_text(page, DESCRIPTION_SELECTOR).await?;
        if description.is_empty() {
            description = joined_text(page, FALLBACK_DESCRIPTION_SELECTOR).await?;
        }

        Ok(JobRecord::new(title, description, url.clone(), self.tags())?)
    }
}

#[async_trait]
impl DiscoveryAdapter for Indeed {
    fn source(&self) -> SourceName {
        SourceName::Indeed
    }

    fn link_prefix(&self) -> &str {
        LINK_PREFIX
    }

    /// First five result pages, fetched concurrently; one failed page fails the source
    async fn discover_links(&self, session: &dyn RenderSession) -> Result<Vec<Link>, RenderError> {
        let urls: Vec<String> = (0..LISTING_PAGES)
            .map(|page| listing_url(page * RESULTS_PER_PAGE))
            .collect();
        let pages = join_all(urls.iter().map(|url| collect_links(session, url, LINK_PREFIX)))
            .await
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?;
        Ok(dedupe(pages.into_iter().flatten()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::renderer::mocks::{MockDocument, MockRenderer};
    use crate::port::{Renderer, SessionOptions};

    const JOB_URL: &str = "https://www.indeed.com/rc/clk?jk=abc123";

    async fn extract(document: MockDocument) -> Result<JobRecord, ExtractionError> {
        let renderer = MockRenderer::new([(JOB_URL.to_string(), document)]);
        let session = renderer.open_session(&SessionOptions::default()).await.unwrap();
        Indeed
            .extract(session.as_ref(), &Link::parse(JOB_URL).unwrap())
            .await
    }

    #[tokio::test]
    async fn test_paragraph_description() {
        let record = extract(
            MockDocument::new()
                .text(TITLE_SELECTOR, &["Backend Developer"])
                .text(DESCRIPTION_SELECTOR, &["Build APIs.", "Remote."])
                .text(FALLBACK_DESCRIPTION_SELECTOR, &["whole body"]),
        )
        .await
        .unwrap();
        assert_eq!(record.description, "Build APIs.\nRemote.");
        assert_eq!(record.tags, vec!["indeed"]);
    }

    #[tokio::test]
    async fn test_falls_back_to_body_container() {
        let record = extract(
            MockDocument::new()
                .text(TITLE_SELECTOR, &["Backend Developer"])
                .text(FALLBACK_DESCRIPTION_SELECTOR, &["Plain text description"]),
        )
        .await
        .unwrap();
        assert_eq!(record.description, "Plain text description");
    }

    #[tokio::test]
    async fn test_discovery_walks_five_pages() {
        let documents: Vec<_> = (0..LISTING_PAGES)
            .map(|page| {
                let start = page * RESULTS_PER_PAGE;
                let job = format!("https://www.indeed.com/rc/clk?jk={}", start);
                (
                    listing_url(start),
                    MockDocument::new().hrefs(
                        "a",
                        &[job.as_str(), "https://www.indeed.com/rc/clk?jk=sponsored", "https://www.indeed.com/career-advice"],
                    ),
                )
            })
            .collect();
        let renderer = MockRenderer::new(documents);
        let session = renderer.open_session(&SessionOptions::default()).await.unwrap();

        let links = Indeed.discover_links(session.as_ref()).await.unwrap();

        assert_eq!(links.len(), 6);
        let mut navigations = renderer.navigations();
        navigations.sort();
        assert!(navigations.iter().all(|u| u.contains("start=")));
        assert_eq!(navigations.len(), 5);
    }
}
