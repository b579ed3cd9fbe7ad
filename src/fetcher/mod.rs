/*!
 * Page fetcher and link-follower capability.
 *
 * The chapter pipeline depends on fetching only through the `PageFetcher`
 * trait: given a URL and two opaque locator strings it returns the page's
 * extracted chapter text and, when discoverable, the URL of the next
 * chapter. Locator syntax is a fetcher concern; the pipeline never
 * inspects it.
 */

use async_trait::async_trait;

use crate::errors::FetchError;

/// Extracted content of one chapter page
#[derive(Debug, Clone)]
pub struct ChapterPage {
    /// Extracted chapter text, non-empty
    pub text: String,
    /// Absolute URL of the next chapter, if a next control was found
    pub next_url: Option<String>,
}

/// Capability for fetching one chapter page and discovering its successor
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the page at `url`, extract its chapter text with
    /// `content_locator` and resolve the next-chapter URL with
    /// `next_locator`.
    ///
    /// # Returns
    /// * `Ok(ChapterPage)` - extracted text plus optional next URL
    /// * `Err(FetchError)` - unreachable page, bad locator or empty content
    async fn fetch_chapter(
        &self,
        url: &str,
        content_locator: &str,
        next_locator: &str,
    ) -> Result<ChapterPage, FetchError>;
}

pub mod http;

pub use http::HttpFetcher;
