// Domain Layer - Links, records and source names

pub mod error;
pub mod link;
pub mod record;
pub mod source;

// Re-exports
pub use error::DomainError;
pub use link::Link;
pub use record::JobRecord;
pub use source::SourceName;
