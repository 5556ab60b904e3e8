//! Article page download and text extraction.
//!
//! Story links point at arbitrary sites, so extraction stays generic: prefer
//! paragraphs inside `<article>` or `<main>`, otherwise take every `<p>` on
//! the page.

use crate::error::SummaryError;
use crate::utils::squash_whitespace;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, instrument, warn};

static SCOPED_PARAGRAPHS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("article p, main p").unwrap());
static PARAGRAPHS: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());

/// Download `url` and return its readable paragraph text, one paragraph per line.
#[instrument(level = "info", skip(client))]
pub async fn fetch_page_text(client: &reqwest::Client, url: &str) -> Result<String, SummaryError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        warn!(%status, "Article page returned an error status");
        return Err(SummaryError::Status(status));
    }

    let html = response.text().await?;
    let text = extract_text(&html);
    debug!(html_bytes = html.len(), text_bytes = text.len(), "Extracted article text");

    if text.is_empty() {
        return Err(SummaryError::NoContent);
    }
    Ok(text)
}

/// Pull paragraph text out of an HTML document.
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let scoped = paragraphs(&document, &SCOPED_PARAGRAPHS);
    let paragraphs = if scoped.is_empty() {
        paragraphs(&document, &PARAGRAPHS)
    } else {
        scoped
    };
    paragraphs.join("\n")
}

fn paragraphs(document: &Html, selector: &Selector) -> Vec<String> {
    document
        .select(selector)
        .map(|el| squash_whitespace(&el.text().collect::<String>()))
        .filter(|text| !text.is_empty())
        .collect()
}
