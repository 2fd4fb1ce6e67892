// Static DOM queries over a fetched HTML snapshot
//
// `scraper::Html` is not Send, so documents are parsed per query and never
// held across an await point.

use scraper::{Html, Selector};
use url::Url;

use jobscout_core::port::RenderError;

fn selector(raw: &str) -> Result<Selector, RenderError> {
    Selector::parse(raw).map_err(|e| RenderError::InvalidSelector(format!("{}: {}", raw, e)))
}

/// Text content of every element matching `raw_selector`, in document order
pub fn select_texts(html: &str, raw_selector: &str) -> Result<Vec<String>, RenderError> {
    let selector = selector(raw_selector)?;
    let document = Html::parse_document(html);
    Ok(document
        .select(&selector)
        .map(|element| element.text().collect::<String>())
        .collect())
}

/// Number of elements matching `raw_selector`
pub fn count_matches(html: &str, raw_selector: &str) -> Result<usize, RenderError> {
    let selector = selector(raw_selector)?;
    let document = Html::parse_document(html);
    Ok(document.select(&selector).count())
}

/// `href` of every matching element, resolved against `base`.
///
/// Elements without an `href` and hrefs that do not resolve are skipped.
pub fn select_hrefs(html: &str, base: &Url, raw_selector: &str) -> Result<Vec<String>, RenderError> {
    let selector = selector(raw_selector)?;
    let document = Html::parse_document(html);
    Ok(document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| base.join(href.trim()).ok())
        .map(String::from)
        .collect())
}
