// Job Record Domain Model

use serde::{Deserialize, Serialize};

use super::error::{DomainError, Result};
use super::link::Link;

/// Normalized job posting produced by one extraction adapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub title: String,
    pub description: String,
    pub url: Link,
    pub tags: Vec<String>,
}

impl JobRecord {
    /// Build a fully populated record.
    ///
    /// The title is trimmed; an empty title or an empty tag set rejects the
    /// record so a half-scraped page never reaches the output.
    pub fn new(
        title: impl AsRef<str>,
        description: impl Into<String>,
        url: Link,
        tags: &[&str],
    ) -> Result<Self> {
        let title = title.as_ref().trim();
        if title.is_empty() {
            return Err(DomainError::EmptyTitle(url.to_string()));
        }
        if tags.is_empty() {
            return Err(DomainError::MissingTags(url.to_string()));
        }

        Ok(Self {
            title: title.to_string(),
            description: description.into(),
            url,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link() -> Link {
        Link::parse("https://rustjobs.dev/featured-jobs/A").unwrap()
    }

    #[test]
    fn test_new_trims_title_and_copies_tags() {
        let record = JobRecord::new("  Senior Rust Engineer \n", "desc", link(), &["rust", "rustjobs"])
            .unwrap();
        assert_eq!(record.title, "Senior Rust Engineer");
        assert_eq!(record.tags, vec!["rust", "rustjobs"]);
    }

    #[test]
    fn test_new_rejects_blank_title() {
        let err = JobRecord::new(" \t", "desc", link(), &["rust"]).unwrap_err();
        assert!(matches!(err, DomainError::EmptyTitle(_)));
    }

    #[test]
    fn test_new_rejects_empty_tags() {
        let err = JobRecord::new("Title", "desc", link(), &[]).unwrap_err();
        assert!(matches!(err, DomainError::MissingTags(_)));
    }

    #[test]
    fn test_serialized_field_names() {
        let record = JobRecord::new("Title", "desc", link(), &["rust"]).unwrap();
        let value = serde_json::to_value(&record).unwrap();
        let mut keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["description", "tags", "title", "url"]);
    }
}
