// Link list input for the extraction stage

use tracing::debug;

use super::dedupe::dedupe;
use crate::domain::Link;
use crate::error::{Result, ScoutError};

/// Parse a JSON array of URL strings into validated, deduplicated links.
///
/// Any malformed entry rejects the whole list: extraction input is produced
/// by discovery, so a bad entry means the input was not.
pub fn parse_link_list(raw: &str) -> Result<Vec<Link>> {
    let entries: Vec<String> = serde_json::from_str(raw).map_err(|e| {
        ScoutError::MalformedInput(format!("expected a JSON array of URL strings: {}", e))
    })?;

    let total = entries.len();
    let links = entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            Link::parse(entry)
                .map_err(|e| ScoutError::MalformedInput(format!("entry {}: {}", index, e)))
        })
        .collect::<Result<Vec<_>>>()?;

    let links = dedupe(links);
    if links.len() < total {
        debug!(total = total, unique = links.len(), "Dropped duplicate input links");
    }
    Ok(links)
}

/// Serialize links the way `parse_link_list` reads them
pub fn render_link_list(links: &[Link]) -> Result<String> {
    Ok(serde_json::to_string_pretty(links)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_list() {
        let links = parse_link_list(r#"["https://rustjobs.dev/featured-jobs/a", "http://jooble.org/desc/1"]"#)
            .unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(links[1].as_str(), "http://jooble.org/desc/1");
    }

    #[test]
    fn test_parse_empty_list() {
        assert!(parse_link_list("[]").unwrap().is_empty());
    }

    #[test]
    fn test_duplicates_are_dropped() {
        let links = parse_link_list(r#"["https://a.example.com/1", "https://a.example.com/1"]"#).unwrap();
        assert_eq!(links.len(), 1);
    }

    #[test]
    fn test_non_array_is_malformed() {
        let err = parse_link_list(r#"{"url": "https://a.example.com"}"#).unwrap_err();
        assert!(matches!(err, ScoutError::MalformedInput(_)));

        let err = parse_link_list("not json").unwrap_err();
        assert!(matches!(err, ScoutError::MalformedInput(_)));
    }

    #[test]
    fn test_non_string_entry_is_malformed() {
        let err = parse_link_list(r#"["https://a.example.com", 42]"#).unwrap_err();
        assert!(matches!(err, ScoutError::MalformedInput(_)));
    }

    #[test]
    fn test_invalid_url_names_entry() {
        let err = parse_link_list(r#"["https://a.example.com", "ftp://b.example.com"]"#).unwrap_err();
        assert!(err.to_string().contains("entry 1"));
    }

    #[test]
    fn test_render_then_parse() {
        let links = vec![Link::parse("https://a.example.com/x").unwrap()];
        let raw = render_link_list(&links).unwrap();
        assert_eq!(parse_link_list(&raw).unwrap(), links);
    }
}
