// Batched Extraction Stage

use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::adapter::{AdapterRegistry, ExtractionError};
use crate::domain::{JobRecord, Link};
use crate::port::RenderSession;

/// Result of one link's extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionOutcome {
    Extracted(JobRecord),
    /// No adapter claims the URL
    Skipped(Link),
    Failed { url: Link, error: ExtractionError },
}

/// Accumulated outcomes of a run; `records` keeps batch order
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    pub records: Vec<JobRecord>,
    pub skipped: Vec<Link>,
    pub failed: Vec<(Link, ExtractionError)>,
}

impl ExtractionReport {
    fn absorb(&mut self, outcome: ExtractionOutcome) {
        match outcome {
            ExtractionOutcome::Extracted(record) => self.records.push(record),
            ExtractionOutcome::Skipped(url) => self.skipped.push(url),
            ExtractionOutcome::Failed { url, error } => self.failed.push((url, error)),
        }
    }

    pub fn attempted(&self) -> usize {
        self.records.len() + self.skipped.len() + self.failed.len()
    }
}

/// Extracts links in fixed-size batches.
///
/// Batches run one after another; links of one batch run concurrently, so
/// at most `batch_size` pages are open at any time.
pub struct ExtractionStage {
    registry: Arc<AdapterRegistry>,
    batch_size: usize,
}

impl ExtractionStage {
    pub fn new(registry: Arc<AdapterRegistry>, batch_size: usize) -> Self {
        Self {
            registry,
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub async fn extract_all(&self, session: &dyn RenderSession, links: &[Link]) -> ExtractionReport {
        let batch_count = links.len().div_ceil(self.batch_size);
        let mut report = ExtractionReport::default();

        for (index, batch) in links.chunks(self.batch_size).enumerate() {
            let outcomes = join_all(batch.iter().map(|link| self.extract_one(session, link))).await;

            let (ok, skipped, failed) = (
                report.records.len(),
                report.skipped.len(),
                report.failed.len(),
            );
            for outcome in outcomes {
                report.absorb(outcome);
            }

            info!(
                batch = index + 1,
                batch_count = batch_count,
                ok = report.records.len() - ok,
                skipped = report.skipped.len() - skipped,
                failed = report.failed.len() - failed,
                "Batch complete"
            );
        }

        info!(
            attempted = report.attempted(),
            ok = report.records.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "Extraction complete"
        );
        report
    }

    /// Extract one link; never fails, failures become outcomes
    pub async fn extract_one(&self, session: &dyn RenderSession, link: &Link) -> ExtractionOutcome {
        let Some(adapter) = self.registry.resolve_extraction(link.as_str()) else {
            warn!(url = %link, "No adapter matches URL, skipping");
            return ExtractionOutcome::Skipped(link.clone());
        };

        match adapter.extract(session, link).await {
            Ok(record) => {
                debug!(url = %link, source = %adapter.source(), title = %record.title, "Extracted record");
                ExtractionOutcome::Extracted(record)
            }
            Err(error) => {
                warn!(url = %link, source = %adapter.source(), error = %error, "Extraction failed");
                ExtractionOutcome::Failed {
                    url: link.clone(),
                    error,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::renderer::mocks::{MockDocument, MockRenderer};
    use crate::port::{RenderError, Renderer, SessionOptions};
    use std::time::Duration;

    fn rustjobs_page(title: &str) -> MockDocument {
        MockDocument::new()
            .text("h1", &[title])
            .text(".markdown-component p", &["Remote."])
    }

    fn links(urls: &[&str]) -> Vec<Link> {
        urls.iter().map(|u| Link::parse(*u).unwrap()).collect()
    }

    fn stage(batch_size: usize) -> ExtractionStage {
        ExtractionStage::new(Arc::new(AdapterRegistry::builtin().unwrap()), batch_size)
    }

    #[tokio::test]
    async fn test_mixed_batch_scenario() {
        let renderer = MockRenderer::new([
            (
                "https://rustjobs.dev/featured-jobs/A".to_string(),
                rustjobs_page("A"),
            ),
            (
                "https://www.golangprojects.com/golang-go-job/B".to_string(),
                MockDocument::new()
                    .text("h1", &["B"])
                    .text("body > div > div:nth-of-type(1) > div:nth-of-type(1)", &["Go role"]),
            ),
        ]);
        let session = renderer.open_session(&SessionOptions::default()).await.unwrap();
        let input = links(&[
            "https://rustjobs.dev/featured-jobs/A",
            "https://www.golangprojects.com/golang-go-job/B",
            "https://unknown.example.com/C",
        ]);

        let report = stage(2).extract_all(session.as_ref(), &input).await;

        assert_eq!(report.records.len(), 2);
        assert_eq!(report.records[0].title, "A");
        assert_eq!(report.records[0].tags, vec!["rust", "rustjobs"]);
        assert_eq!(report.records[1].title, "B");
        assert_eq!(report.records[1].tags, vec!["go", "golangprojects"]);
        assert_eq!(report.skipped, links(&["https://unknown.example.com/C"]));
        assert!(report.failed.is_empty());
    }

    #[tokio::test]
    async fn test_failing_link_does_not_abort_its_batch() {
        let renderer = MockRenderer::new([
            ("https://rustjobs.dev/featured-jobs/1".to_string(), rustjobs_page("one")),
            // 2 is missing: navigation fails
            ("https://rustjobs.dev/featured-jobs/3".to_string(), MockDocument::new()),
            ("https://rustjobs.dev/featured-jobs/4".to_string(), rustjobs_page("four")),
        ]);
        let session = renderer.open_session(&SessionOptions::default()).await.unwrap();
        let input = links(&[
            "https://rustjobs.dev/featured-jobs/1",
            "https://rustjobs.dev/featured-jobs/2",
            "https://rustjobs.dev/featured-jobs/3",
            "https://rustjobs.dev/featured-jobs/4",
        ]);

        let report = stage(4).extract_all(session.as_ref(), &input).await;

        let titles: Vec<&str> = report.records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["one", "four"]);
        assert_eq!(report.failed.len(), 2);
        assert!(matches!(
            report.failed[0].1,
            ExtractionError::Render(RenderError::Navigation { .. })
        ));
        assert_eq!(renderer.pages_opened(), 4);
        assert_eq!(renderer.pages_closed(), 4);
    }

    #[tokio::test]
    async fn test_panicking_adapter_is_isolated() {
        let renderer = MockRenderer::new([
            (
                "https://rustjobs.dev/featured-jobs/ok".to_string(),
                rustjobs_page("fine"),
            ),
            (
                "https://rustjobs.dev/featured-jobs/panic".to_string(),
                rustjobs_page("never").panic_on("h1"),
            ),
        ]);
        let session = renderer.open_session(&SessionOptions::default()).await.unwrap();
        let input = links(&[
            "https://rustjobs.dev/featured-jobs/panic",
            "https://rustjobs.dev/featured-jobs/ok",
        ]);

        let report = stage(2).extract_all(session.as_ref(), &input).await;

        assert_eq!(report.records.len(), 1);
        assert!(matches!(report.failed[0].1, ExtractionError::Panicked(_)));
        assert_eq!(renderer.pages_closed(), 2);
    }

    #[tokio::test]
    async fn test_batches_run_sequentially_and_keep_order() {
        // First batch is slow; a concurrent runner would let batch two overtake it
        let urls: Vec<String> = (0..6)
            .map(|i| format!("https://rustjobs.dev/featured-jobs/{}", i))
            .collect();
        let renderer = MockRenderer::new(urls.iter().enumerate().map(|(i, url)| {
            let delay = if i < 2 { 40 } else { 1 };
            (
                url.clone(),
                rustjobs_page(&i.to_string()).delay(Duration::from_millis(delay)),
            )
        }).collect::<Vec<_>>());
        let session = renderer.open_session(&SessionOptions::default()).await.unwrap();
        let input: Vec<Link> = urls.iter().map(|u| Link::parse(u.as_str()).unwrap()).collect();

        let report = stage(2).extract_all(session.as_ref(), &input).await;

        let batch_of = |title: &str| title.parse::<usize>().unwrap() / 2;
        let batches: Vec<usize> = report.records.iter().map(|r| batch_of(&r.title)).collect();
        let mut sorted = batches.clone();
        sorted.sort();
        assert_eq!(batches, sorted);
        assert_eq!(report.records.len(), 6);
        assert_eq!(renderer.max_open_pages(), 2);
    }

    #[tokio::test]
    async fn test_open_pages_bounded_by_batch_size() {
        let urls: Vec<String> = (0..25)
            .map(|i| format!("https://rustjobs.dev/featured-jobs/{}", i))
            .collect();
        let renderer = MockRenderer::new(
            urls.iter()
                .map(|url| (url.clone(), rustjobs_page("t").delay(Duration::from_millis(2))))
                .collect::<Vec<_>>(),
        );
        let session = renderer.open_session(&SessionOptions::default()).await.unwrap();
        let input: Vec<Link> = urls.iter().map(|u| Link::parse(u.as_str()).unwrap()).collect();

        let report = stage(10).extract_all(session.as_ref(), &input).await;

        assert_eq!(report.records.len(), 25);
        assert_eq!(renderer.max_open_pages(), 10);
        assert_eq!(renderer.pages_opened(), renderer.pages_closed());
    }

    #[tokio::test]
    async fn test_empty_input() {
        let renderer = MockRenderer::new(Vec::new());
        let session = renderer.open_session(&SessionOptions::default()).await.unwrap();

        let report = stage(10).extract_all(session.as_ref(), &[]).await;
        assert_eq!(report.attempted(), 0);
        assert_eq!(renderer.pages_opened(), 0);
    }

    #[test]
    fn test_zero_batch_size_is_clamped() {
        assert_eq!(stage(0).batch_size(), 1);
    }
}
