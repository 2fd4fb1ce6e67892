// Central Error Type for the Pipeline

use thiserror::Error;

use crate::adapter::RegistryError;
use crate::domain::DomainError;
use crate::port::RenderError;

/// Invocation-level error type.
///
/// Failures of a single link never reach this type; they are reported as
/// [`crate::application::ExtractionOutcome::Failed`] instead.
#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("Unknown source: {0}")]
    UnknownSource(String),

    #[error("Discovery failed for {source_name}: {message}")]
    DiscoveryFailure {
        source_name: String,
        message: String,
    },

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias using ScoutError
pub type Result<T> = std::result::Result<T, ScoutError>;
