/*!
 * Mock capabilities for testing pipeline behavior.
 *
 * - `ScriptedFetcher` - serves a scripted chain of chapter pages
 * - `MockEngine` - simulates a translation engine:
 *   - `MockEngine::working()` - always succeeds with marked-up text
 *   - `MockEngine::failing()` - always fails with an error
 *   - `MockEngine::fail_on_call(n)` - fails the nth translate call only
 */

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use noveltr::errors::{EngineError, FetchError};
use noveltr::fetcher::{ChapterPage, PageFetcher};
use noveltr::translation::MAX_CHARS_PER_BATCH;
use noveltr::TranslationEngine;

/// One scripted page in a fetcher script
#[derive(Debug, Clone)]
pub struct ScriptedPage {
    /// Chapter text the fetcher returns
    pub text: String,
    /// Next-chapter URL, if the page has one
    pub next_url: Option<String>,
}

/// Fetcher that serves pages from a scripted URL map
pub struct ScriptedFetcher {
    pages: HashMap<String, ScriptedPage>,
    fetch_count: AtomicUsize,
}

impl ScriptedFetcher {
    pub fn new(pages: Vec<(&str, ScriptedPage)>) -> Self {
        Self {
            pages: pages
                .into_iter()
                .map(|(url, page)| (url.to_string(), page))
                .collect(),
            fetch_count: AtomicUsize::new(0),
        }
    }

    /// Build a linear chain of `count` chapters at `base/ch-<n>`, where
    /// every page except the last links to its successor
    pub fn chain(base: &str, count: u32) -> Self {
        let mut pages = Vec::new();
        let urls: Vec<String> = (1..=count).map(|n| format!("{}/ch-{}", base, n)).collect();
        for (i, url) in urls.iter().enumerate() {
            pages.push((
                url.clone(),
                ScriptedPage {
                    text: format!("Chapter {} body. It has two sentences.", i + 1),
                    next_url: urls.get(i + 1).cloned(),
                },
            ));
        }
        Self {
            pages: pages.into_iter().collect(),
            fetch_count: AtomicUsize::new(0),
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch_chapter(
        &self,
        url: &str,
        _content_locator: &str,
        _next_locator: &str,
    ) -> Result<ChapterPage, FetchError> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        match self.pages.get(url) {
            Some(page) => Ok(ChapterPage {
                text: page.text.clone(),
                next_url: page.next_url.clone(),
            }),
            None => Err(FetchError::Unreachable(url.to_string())),
        }
    }
}

/// Behavior mode for the mock engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockEngineBehavior {
    /// Always succeeds with a proper translation
    Working,
    /// Always fails with an error
    Failing,
    /// Fails exactly the nth translate call (1-based)
    FailOnCall(usize),
}

/// Mock translation engine; measures text in whitespace words
pub struct MockEngine {
    behavior: MockEngineBehavior,
    max_units: usize,
    max_chars: usize,
    call_count: AtomicUsize,
}

impl MockEngine {
    pub fn new(behavior: MockEngineBehavior, max_units: usize) -> Self {
        Self {
            behavior,
            max_units,
            max_chars: MAX_CHARS_PER_BATCH,
            call_count: AtomicUsize::new(0),
        }
    }

    /// Engine that always succeeds, wrapping its input in a marker
    pub fn working() -> Self {
        Self::new(MockEngineBehavior::Working, 100)
    }

    /// Working engine with a custom per-request character ceiling
    pub fn working_with_max_chars(max_chars: usize) -> Self {
        let mut engine = Self::working();
        engine.max_chars = max_chars;
        engine
    }

    /// Engine that always errors
    pub fn failing() -> Self {
        Self::new(MockEngineBehavior::Failing, 100)
    }

    /// Engine that fails only the nth translate call
    pub fn fail_on_call(n: usize) -> Self {
        Self::new(MockEngineBehavior::FailOnCall(n), 100)
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// The marker a working translation wraps its input with
    pub fn translated(text: &str) -> String {
        format!("[pt] {}", text)
    }
}

#[async_trait]
impl TranslationEngine for MockEngine {
    async fn translate(&self, text: &str) -> Result<String, EngineError> {
        let call = self.call_count.fetch_add(1, Ordering::SeqCst) + 1;
        match self.behavior {
            MockEngineBehavior::Working => Ok(Self::translated(text)),
            MockEngineBehavior::Failing => {
                Err(EngineError::RequestFailed("mock engine down".to_string()))
            }
            MockEngineBehavior::FailOnCall(n) if call == n => {
                Err(EngineError::RequestFailed(format!("mock failure on call {}", n)))
            }
            MockEngineBehavior::FailOnCall(_) => Ok(Self::translated(text)),
        }
    }

    fn measure(&self, text: &str) -> usize {
        text.split_whitespace().count()
    }

    fn max_units(&self) -> usize {
        self.max_units
    }

    fn max_chars(&self) -> usize {
        self.max_chars
    }

    async fn test_connection(&self) -> Result<(), EngineError> {
        match self.behavior {
            MockEngineBehavior::Failing => {
                Err(EngineError::RequestFailed("mock engine down".to_string()))
            }
            _ => Ok(()),
        }
    }
}
