use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde_json::Value;

use crate::source::SourceText;

/// One random main-namespace article as a plain-text extract; no wikitext to
/// strip on our side.
const RANDOM_ARTICLE_URL: &str = "https://en.wikipedia.org/w/api.php?format=json&action=query\
     &generator=random&grnnamespace=0&grnlimit=1&prop=extracts&explaintext=1";

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetch a random Wikipedia article for the "feeling lucky" flow.
pub fn fetch_random_article() -> Result<SourceText> {
    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()?;
    let payload: Value = client
        .get(RANDOM_ARTICLE_URL)
        .send()
        .context("could not reach Wikipedia")?
        .error_for_status()
        .context("Wikipedia rejected the request")?
        .json()
        .context("Wikipedia returned malformed JSON")?;

    parse_article(&payload)
}

/// Pull title and extract out of the generator=random response shape:
/// `query.pages` is an object keyed by page id with a single entry.
fn parse_article(payload: &Value) -> Result<SourceText> {
    let pages = payload["query"]["pages"]
        .as_object()
        .context("response has no pages")?;
    let page = pages
        .values()
        .next()
        .context("response contained zero pages")?;

    let title = page["title"].as_str().unwrap_or("Random article");
    let extract = page["extract"].as_str().unwrap_or_default();
    if extract.trim().is_empty() {
        bail!("article {title:?} has no extractable text");
    }

    Ok(SourceText::titled(title, extract.to_string()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_the_single_random_page() {
        let payload = json!({
            "query": {
                "pages": {
                    "12345": {
                        "pageid": 12345,
                        "title": "Lighthouse",
                        "extract": "A lighthouse is a tower with a light.\n\nHistory follows."
                    }
                }
            }
        });
        let source = parse_article(&payload).unwrap();
        assert_eq!(source.title.as_deref(), Some("Lighthouse"));
        assert!(source.body.starts_with("A lighthouse"));
    }

    #[test]
    fn empty_extract_is_an_error() {
        let payload = json!({
            "query": { "pages": { "1": { "title": "Stub", "extract": "" } } }
        });
        assert!(parse_article(&payload).is_err());
    }

    #[test]
    fn missing_pages_is_an_error() {
        let payload = json!({ "batchcomplete": "" });
        assert!(parse_article(&payload).is_err());
    }
}
