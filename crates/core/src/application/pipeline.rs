// Pipeline Driver - owns the renderer session lifetime

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use super::constants::{DEFAULT_BATCH_SIZE, DEFAULT_OUTPUT_DIR};
use super::discovery::DiscoveryStage;
use super::extraction::{ExtractionReport, ExtractionStage};
use super::output::OutputNamer;
use crate::adapter::AdapterRegistry;
use crate::domain::{Link, SourceName};
use crate::error::{Result, ScoutError};
use crate::port::{RecordWriter, RenderSession, Renderer, SessionOptions};

/// Pipeline settings
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Links extracted concurrently; also the bound on open pages
    pub batch_size: usize,
    pub output_dir: PathBuf,
    pub session: SessionOptions,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            session: SessionOptions::default(),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(ScoutError::Config("batch size must be at least 1".to_string()));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ScoutError::Config("output directory must not be empty".to_string()));
        }
        if self.session.timeout.is_zero() {
            return Err(ScoutError::Config("renderer timeout must be positive".to_string()));
        }
        Ok(())
    }
}

/// Outcome of an extraction run
#[derive(Debug, Clone, Default)]
pub struct ExtractionRun {
    pub report: ExtractionReport,
    /// Files written, in record order
    pub written: Vec<PathBuf>,
}

/// Discovery and extraction runs over one renderer session each
pub struct Pipeline {
    renderer: Arc<dyn Renderer>,
    writer: Arc<dyn RecordWriter>,
    discovery: DiscoveryStage,
    extraction: ExtractionStage,
    config: PipelineConfig,
}

impl Pipeline {
    /// # Errors
    /// - ScoutError::Config if `config` is invalid
    pub fn new(
        config: PipelineConfig,
        registry: Arc<AdapterRegistry>,
        renderer: Arc<dyn Renderer>,
        writer: Arc<dyn RecordWriter>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            renderer,
            writer,
            discovery: DiscoveryStage::new(Arc::clone(&registry)),
            extraction: ExtractionStage::new(registry, config.batch_size),
            config,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Discover links for one source, or all sources when `None`
    pub async fn run_discovery(&self, source: Option<SourceName>) -> Result<Vec<Link>> {
        self.with_session(|session| async move {
            self.discovery.discover(session.as_ref(), source).await
        })
        .await
    }

    /// Extract `links` and persist every record
    pub async fn run_extraction(&self, links: &[Link]) -> Result<ExtractionRun> {
        info!(
            count = links.len(),
            batch_size = self.extraction.batch_size(),
            "Starting extraction"
        );

        let report = self
            .with_session(|session| async move {
                Ok(self.extraction.extract_all(session.as_ref(), links).await)
            })
            .await?;

        let written = self.persist(&report).await;
        info!(
            written = written.len(),
            output_dir = %self.config.output_dir.display(),
            "Records persisted"
        );

        Ok(ExtractionRun { report, written })
    }

    async fn persist(&self, report: &ExtractionReport) -> Vec<PathBuf> {
        let mut namer = OutputNamer::new(&self.config.output_dir);
        let mut written = Vec::with_capacity(report.records.len());

        for record in &report.records {
            let path = namer.path_for(&record.title);
            match self.writer.write_record(&path, record).await {
                Ok(()) => written.push(path),
                Err(e) => {
                    warn!(url = %record.url, path = %path.display(), error = %e, "Failed to persist record");
                }
            }
        }
        written
    }

    /// Run `stage` with a fresh session, releasing it exactly once afterwards
    async fn with_session<T, F, Fut>(&self, stage: F) -> Result<T>
    where
        F: FnOnce(Arc<dyn RenderSession>) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let session = self.renderer.open_session(&self.config.session).await?;
        let result = stage(Arc::clone(&session)).await;

        if let Err(e) = session.close().await {
            warn!(error = %e, "Failed to close renderer session");
        }
        result
    }
}
