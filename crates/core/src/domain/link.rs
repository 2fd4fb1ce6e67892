// Link Domain Model

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::{DomainError, Result};

/// Absolute http(s) URL of one job posting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Link(String);

impl Link {
    /// Parse and validate an absolute http(s) URL.
    ///
    /// The input string is kept as-is (no normalization), so dedup
    /// compares exactly what the listing page produced.
    pub fn parse(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        let parsed = url::Url::parse(&raw).map_err(|e| DomainError::InvalidLink {
            link: raw.clone(),
            reason: e.to_string(),
        })?;

        match parsed.scheme() {
            "http" | "https" => Ok(Self(raw)),
            other => Err(DomainError::InvalidLink {
                link: raw.clone(),
                reason: format!("unsupported scheme '{}'", other),
            }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Link {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<Link> for String {
    fn from(link: Link) -> Self {
        link.0
    }
}

impl AsRef<str> for Link {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
