// Source Name Domain Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ScoutError;

/// Job-listing site known to the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceName {
    Golangprojects,
    Rustjobs,
    Indeed,
    Functionalworks,
    Jooble,
}

impl SourceName {
    pub const ALL: [SourceName; 5] = [
        SourceName::Golangprojects,
        SourceName::Rustjobs,
        SourceName::Indeed,
        SourceName::Functionalworks,
        SourceName::Jooble,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceName::Golangprojects => "golangprojects",
            SourceName::Rustjobs => "rustjobs",
            SourceName::Indeed => "indeed",
            SourceName::Functionalworks => "functionalworks",
            SourceName::Jooble => "jooble",
        }
    }
}

impl fmt::Display for SourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceName {
    type Err = ScoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        SourceName::ALL
            .into_iter()
            .find(|name| name.as_str() == wanted)
            .ok_or_else(|| ScoutError::UnknownSource(s.to_string()))
    }
}
