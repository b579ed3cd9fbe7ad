/*!
 * HTTP implementation of the page fetcher.
 *
 * Pages are fetched with reqwest and parsed with the scraper crate.
 * Locators are CSS selectors: the content locator picks the chapter text
 * block, the next locator picks the "next chapter" control (the element
 * itself or a descendant must carry an href). Relative hrefs are resolved
 * against the page URL.
 */

use async_trait::async_trait;
use log::{debug, warn};
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use url::Url;

use crate::errors::{ExtractionError, FetchError};

use super::{ChapterPage, PageFetcher};

// Block-level elements that carry readable chapter prose
static BLOCK_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("p, h1, h2, h3, h4, h5, h6, li, blockquote")
        .expect("static block selector is valid")
});

static HREF_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("static href selector is valid"));

const USER_AGENT: &str = concat!("noveltr/", env!("CARGO_PKG_VERSION"));

/// Page fetcher backed by a plain HTTP client
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher with the given request timeout
    pub fn new(timeout_secs: u64) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| FetchError::Unreachable(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_chapter(
        &self,
        url: &str,
        content_locator: &str,
        next_locator: &str,
    ) -> Result<ChapterPage, FetchError> {
        debug!("Fetching page: {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Unreachable(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status_code: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Unreachable(format!("{}: {}", url, e)))?;

        // Parsing is synchronous so the non-Send DOM never crosses an await
        extract_page(&body, url, content_locator, next_locator)
    }
}

/// Extract chapter text and the next-chapter URL from a fetched page.
///
/// Exposed so extraction can be exercised without a network round trip.
pub fn extract_page(
    body: &str,
    page_url: &str,
    content_locator: &str,
    next_locator: &str,
) -> Result<ChapterPage, FetchError> {
    let document = Html::parse_document(body);

    let content_selector = Selector::parse(content_locator)
        .map_err(|_| FetchError::InvalidLocator(content_locator.to_string()))?;
    let next_selector = Selector::parse(next_locator)
        .map_err(|_| FetchError::InvalidLocator(next_locator.to_string()))?;

    let content_el = document
        .select(&content_selector)
        .next()
        .ok_or_else(|| ExtractionError::ElementNotFound(content_locator.to_string()))?;

    let text = element_text(content_el);
    if text.trim().is_empty() {
        return Err(ExtractionError::EmptyContent(page_url.to_string()).into());
    }

    let next_url = document
        .select(&next_selector)
        .next()
        .and_then(|el| find_href(el))
        .and_then(|href| resolve_href(page_url, &href));

    Ok(ChapterPage { text, next_url })
}

// Flatten an element to line-separated prose, one line per block element.
// Falls back to the element's own text when it has no block children.
fn element_text(element: ElementRef) -> String {
    let blocks: Vec<String> = element
        .select(&BLOCK_SELECTOR)
        .map(|block| normalize_whitespace(&block.text().collect::<String>()))
        .filter(|line| !line.is_empty())
        .collect();

    if blocks.is_empty() {
        normalize_whitespace(&element.text().collect::<String>())
    } else {
        blocks.join("\n")
    }
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// The next control may be the anchor itself or wrap one
fn find_href(element: ElementRef) -> Option<String> {
    if let Some(href) = element.value().attr("href") {
        return Some(href.to_string());
    }
    element
        .select(&HREF_SELECTOR)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(|href| href.to_string())
}

fn resolve_href(page_url: &str, href: &str) -> Option<String> {
    let base = match Url::parse(page_url) {
        Ok(base) => base,
        Err(e) => {
            warn!("Cannot resolve next link against '{}': {}", page_url, e);
            return None;
        }
    };
    match base.join(href) {
        Ok(resolved) => {
            // A link back to the same page is not a next chapter
            if resolved.as_str() == page_url {
                None
            } else {
                Some(resolved.into())
            }
        }
        Err(e) => {
            warn!("Discarding unresolvable next link '{}': {}", href, e);
            None
        }
    }
}
