// Adapter Registry - ordered dispatch table for site adapters

use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use super::sites::{Functionalworks, Golangprojects, Indeed, Jooble, Rustjobs};
use super::{DiscoveryAdapter, ExtractionAdapter, UrlSignature};
use crate::domain::SourceName;

/// Registration errors (caught at startup, never mid-run)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Duplicate {kind} adapter for source {source_name}")]
    DuplicateSource {
        kind: &'static str,
        source_name: SourceName,
    },

    #[error("Duplicate extraction signature '{signature}' ({existing} and {duplicate})")]
    DuplicateSignature {
        signature: String,
        existing: SourceName,
        duplicate: SourceName,
    },

    #[error("Discovery adapter {source_name} emits links under {prefix} which dispatch to {resolved}")]
    Inconsistent {
        source_name: SourceName,
        prefix: String,
        resolved: String,
    },
}

/// One row of the registry overview
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSummary {
    pub source: SourceName,
    pub discovery: bool,
    pub signature: Option<String>,
    pub tags: Vec<String>,
}

/// Ordered adapter table.
///
/// Extraction dispatch walks adapters in registration order and the first
/// matching signature wins, so overlapping signatures must be registered
/// most-specific first.
#[derive(Default)]
pub struct AdapterRegistry {
    extractors: Vec<Arc<dyn ExtractionAdapter>>,
    discoverers: Vec<Arc<dyn DiscoveryAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in site, validated
    pub fn builtin() -> Result<Self, RegistryError> {
        let mut registry = Self::new();

        registry.register_extraction(Arc::new(Rustjobs))?;
        registry.register_extraction(Arc::new(Indeed))?;
        registry.register_extraction(Arc::new(Golangprojects))?;
        registry.register_extraction(Arc::new(Functionalworks))?;
        registry.register_extraction(Arc::new(Jooble))?;

        registry.register_discovery(Arc::new(Golangprojects))?;
        registry.register_discovery(Arc::new(Rustjobs))?;
        registry.register_discovery(Arc::new(Indeed))?;
        registry.register_discovery(Arc::new(Functionalworks))?;

        registry.validate()?;
        Ok(registry)
    }

    pub fn register_extraction(
        &mut self,
        adapter: Arc<dyn ExtractionAdapter>,
    ) -> Result<(), RegistryError> {
        if let Some(existing) = self.extractors.iter().find(|e| e.source() == adapter.source()) {
            return Err(RegistryError::DuplicateSource {
                kind: "extraction",
                source_name: existing.source(),
            });
        }
        if let Some(existing) = self
            .extractors
            .iter()
            .find(|e| e.signature() == adapter.signature())
        {
            return Err(RegistryError::DuplicateSignature {
                signature: adapter.signature().to_string(),
                existing: existing.source(),
                duplicate: adapter.source(),
            });
        }

        debug!(source = %adapter.source(), signature = %adapter.signature(), "Registered extraction adapter");
        self.extractors.push(adapter);
        Ok(())
    }

    pub fn register_discovery(
        &mut self,
        adapter: Arc<dyn DiscoveryAdapter>,
    ) -> Result<(), RegistryError> {
        if self.discoverers.iter().any(|d| d.source() == adapter.source()) {
            return Err(RegistryError::DuplicateSource {
                kind: "discovery",
                source_name: adapter.source(),
            });
        }

        debug!(source = %adapter.source(), prefix = %adapter.link_prefix(), "Registered discovery adapter");
        self.discoverers.push(adapter);
        Ok(())
    }

    /// Every discovered link must be extractable by the same source's adapter
    pub fn validate(&self) -> Result<(), RegistryError> {
        for discoverer in &self.discoverers {
            let prefix = discoverer.link_prefix();
            match self.resolve_extraction(prefix) {
                Some(extractor) if extractor.source() == discoverer.source() => {}
                other => {
                    return Err(RegistryError::Inconsistent {
                        source_name: discoverer.source(),
                        prefix: prefix.to_string(),
                        resolved: other
                            .map(|e| e.source().to_string())
                            .unwrap_or_else(|| "no adapter".to_string()),
                    });
                }
            }
        }
        Ok(())
    }

    /// First extraction adapter (in registration order) whose signature matches
    pub fn resolve_extraction(&self, url: &str) -> Option<&dyn ExtractionAdapter> {
        self.extractors
            .iter()
            .find(|adapter| adapter.signature().matches(url))
            .map(|adapter| adapter.as_ref())
    }

    pub fn resolve_discovery(&self, source: SourceName) -> Option<&dyn DiscoveryAdapter> {
        self.discoverers
            .iter()
            .find(|adapter| adapter.source() == source)
            .map(|adapter| adapter.as_ref())
    }

    /// Discovery adapters in registration order
    pub fn discovery_adapters(&self) -> impl Iterator<Item = &dyn DiscoveryAdapter> {
        self.discoverers.iter().map(|adapter| adapter.as_ref())
    }

    /// One row per source known to either table, in `SourceName` order
    pub fn summaries(&self) -> Vec<SourceSummary> {
        SourceName::ALL
            .into_iter()
            .filter_map(|source| {
                let extractor = self.extractors.iter().find(|e| e.source() == source);
                let discovery = self.resolve_discovery(source).is_some();
                if extractor.is_none() && !discovery {
                    return None;
                }
                Some(SourceSummary {
                    source,
                    discovery,
                    signature: extractor.map(|e| e.signature().to_string()),
                    tags: extractor
                        .map(|e| e.tags().iter().map(|t| t.to_string()).collect())
                        .unwrap_or_default(),
                })
            })
            .collect()
    }
}

impl std::fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let signatures: Vec<UrlSignature> = self.extractors.iter().map(|e| e.signature()).collect();
        let sources: Vec<SourceName> = self.discoverers.iter().map(|d| d.source()).collect();
        f.debug_struct("AdapterRegistry")
            .field("extractors", &signatures)
            .field("discoverers", &sources)
            .finish()
    }
}
