// Link Discovery Stage

use futures::future::join_all;
use std::sync::Arc;
use tracing::{info, warn};

use super::dedupe::dedupe;
use super::panic_guard::{execute_guarded_async, PanicGuardResult};
use crate::adapter::{AdapterRegistry, DiscoveryAdapter};
use crate::domain::{Link, SourceName};
use crate::error::{Result, ScoutError};
use crate::port::RenderSession;

/// Runs discovery adapters against an externally owned session
pub struct DiscoveryStage {
    registry: Arc<AdapterRegistry>,
}

impl DiscoveryStage {
    pub fn new(registry: Arc<AdapterRegistry>) -> Self {
        Self { registry }
    }

    /// Discover links for one source, or for every registered source when `None`
    ///
    /// # Errors
    /// - ScoutError::UnknownSource if `source` has no discovery adapter
    /// - ScoutError::DiscoveryFailure if the named source's adapter fails
    ///
    /// Discovering all sources never fails: failing adapters are logged and
    /// contribute nothing.
    pub async fn discover(
        &self,
        session: &dyn RenderSession,
        source: Option<SourceName>,
    ) -> Result<Vec<Link>> {
        match source {
            Some(source) => self.discover_one(session, source).await,
            None => Ok(self.discover_all(session).await),
        }
    }

    async fn discover_one(&self, session: &dyn RenderSession, source: SourceName) -> Result<Vec<Link>> {
        let adapter = self
            .registry
            .resolve_discovery(source)
            .ok_or_else(|| ScoutError::UnknownSource(source.to_string()))?;

        let links = run_adapter(adapter, session)
            .await
            .map_err(|message| ScoutError::DiscoveryFailure {
                source_name: source.to_string(),
                message,
            })?;

        info!(source = %source, count = links.len(), "Discovery complete");
        Ok(links)
    }

    /// Settle-all over every adapter: no failure short-circuits the others
    pub async fn discover_all(&self, session: &dyn RenderSession) -> Vec<Link> {
        let adapters: Vec<&dyn DiscoveryAdapter> = self.registry.discovery_adapters().collect();

        let settled = join_all(
            adapters
                .iter()
                .map(|adapter| async move { (adapter.source(), run_adapter(*adapter, session).await) }),
        )
        .await;

        let mut links = Vec::new();
        let mut failed_sources = 0usize;
        for (source, result) in settled {
            match result {
                Ok(found) => {
                    info!(source = %source, count = found.len(), "Source discovered");
                    links.extend(found);
                }
                Err(message) => {
                    failed_sources += 1;
                    warn!(source = %source, error = %message, "Discovery failed, skipping source");
                }
            }
        }

        let links = dedupe(links);
        info!(
            sources = adapters.len(),
            failed_sources = failed_sources,
            count = links.len(),
            "Discovery of all sources complete"
        );
        links
    }
}

async fn run_adapter(
    adapter: &dyn DiscoveryAdapter,
    session: &dyn RenderSession,
) -> std::result::Result<Vec<Link>, String> {
    match execute_guarded_async(adapter.discover_links(session)).await {
        PanicGuardResult::Success(result) => result.map_err(|e| e.to_string()),
        PanicGuardResult::Panicked(msg) => Err(format!("adapter panicked: {}", msg)),
    }
}
