// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid link {link:?}: {reason}")]
    InvalidLink { link: String, reason: String },

    #[error("Record for {0} has an empty title")]
    EmptyTitle(String),

    #[error("Record for {0} has no tags")]
    MissingTags(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
