// golangprojects.com

use async_trait::async_trait;

use crate::adapter::{
    collect_links, first_text, DiscoveryAdapter, ExtractionAdapter, ExtractionError, UrlSignature,
};
use crate::domain::{JobRecord, Link, SourceName};
use crate::port::{RenderError, RenderPage, RenderSession, WaitPolicy};

const LISTING_URL: &str = "https://www.golangprojects.com/golang-remote-jobs.html";
const LINK_PREFIX: &str = "https://www.golangprojects.com/golang-go-job";
const TITLE_SELECTOR: &str = "h1";
// First content column of the main container
const DESCRIPTION_SELECTOR: &str = "body > div > div:nth-of-type(1) > div:nth-of-type(1)";

pub struct Golangprojects;

#[async_trait]
impl ExtractionAdapter for Golangprojects {
    fn source(&self) -> SourceName {
        SourceName::Golangprojects
    }

    fn signature(&self) -> UrlSignature {
        UrlSignature::Contains("golangprojects")
    }

    fn tags(&self) -> &'static [&'static str] {
        &["go", "golangprojects"]
    }

    async fn scrape(&self, page: &dyn RenderPage, url: &Link) -> Result<JobRecord, ExtractionError> {
        page.navigate(url.as_str(), WaitPolicy::Load).await?;
        let title = first_text(page, TITLE_SELECTOR).await?;
        let description = first_text(page, DESCRIPTION_SELECTOR).await?;
        Ok(JobRecord::new(title, description, url.clone(), self.tags())?)
    }
}

#[async_trait]
impl DiscoveryAdapter for Golangprojects {
    fn source(&self) -> SourceName {
        SourceName::Golangprojects
    }

    fn link_prefix(&self) -> &str {
        LINK_PREFIX
    }

    async fn discover_links(&self, session: &dyn RenderSession) -> Result<Vec<Link>, RenderError> {
        collect_links(session, LISTING_URL, LINK_PREFIX).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::renderer::mocks::{MockDocument, MockRenderer};
    use crate::port::{Renderer, SessionOptions};

    #[tokio::test]
    async fn test_description_requires_content_column() {
        let url = "https://www.golangprojects.com/golang-go-job/B";
        let renderer = MockRenderer::new([(
            url.to_string(),
            MockDocument::new().text("h1", &["Go Backend Developer"]),
        )]);
        let session = renderer.open_session(&SessionOptions::default()).await.unwrap();

        let err = Golangprojects
            .extract(session.as_ref(), &Link::parse(url).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::Render(RenderError::SelectorNotFound(ref s)) if s == DESCRIPTION_SELECTOR
        ));
    }
}
