// jooble.org (extraction only; no listing page is scraped)

use async_trait::async_trait;

use crate::adapter::{first_text, joined_text, ExtractionAdapter, ExtractionError, UrlSignature};
use crate::domain::{JobRecord, Link, SourceName};
use crate::port::{RenderPage, WaitPolicy};

const TITLE_SELECTOR: &str = "h1";
const DESCRIPTION_SELECTOR: &str = "body > div > div > div:nth-of-type(1) > div > div:nth-of-type(1) > main > div:nth-of-type(1) > div:nth-of-type(2) > div:nth-of-type(1) > div:nth-of-type(2) > div > div > div > div:nth-of-type(2) > div > div";

pub struct Jooble;

#[async_trait]
impl ExtractionAdapter for Jooble {
    fn source(&self) -> SourceName {
        SourceName::Jooble
    }

    fn signature(&self) -> UrlSignature {
        UrlSignature::Contains("jooble")
    }

    fn tags(&self) -> &'static [&'static str] {
        &["jooble"]
    }

    async fn scrape(&self, page: &dyn RenderPage, url: &Link) -> Result<JobRecord, ExtractionError> {
        page.navigate(url.as_str(), WaitPolicy::Load).await?;
        let title = first_text(page, TITLE_SELECTOR).await?;
        let description = joined_text(page, DESCRIPTION_SELECTOR).await?;
        Ok(JobRecord::new(title, description, url.clone(), self.tags())?)
    }
}
