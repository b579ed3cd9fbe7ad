/*!
 * Translation engine capability.
 *
 * The pipeline depends on translation only through this trait: translate
 * a bounded-length string, measure a string's length in the engine's
 * native units, and report the engine's input limit. The batcher in
 * `translation::batcher` uses the measurement to keep every batch within
 * the limit.
 */

use async_trait::async_trait;

use crate::errors::EngineError;

/// Capability for sentence-to-sentence translation
#[async_trait]
pub trait TranslationEngine: Send + Sync {
    /// Translate a bounded-length text
    ///
    /// # Returns
    /// * `Ok(String)` - the translated text
    /// * `Err(EngineError)` - request, parse or overlength failure
    async fn translate(&self, text: &str) -> Result<String, EngineError>;

    /// Length of `text` in the engine's native tokenization units
    fn measure(&self, text: &str) -> usize;

    /// Maximum input length in native units
    fn max_units(&self) -> usize;

    /// Per-request character ceiling, used by the batcher as a cheap
    /// length proxy before the real unit check
    fn max_chars(&self) -> usize;

    /// Test the connection to the engine
    async fn test_connection(&self) -> Result<(), EngineError>;
}

pub mod ollama;

pub use ollama::OllamaEngine;
