/*!
 * # noveltr - resumable web-novel batch translation
 *
 * A Rust library for translating serialized web-published fiction in
 * resumable batches.
 *
 * ## Features
 *
 * - Walk a novel's chapter chain from a per-novel resume cursor
 * - Extract chapter text with opaque CSS locators
 * - Sentence-aware batching within the translation engine's input limit
 * - Per-batch failure tolerance: content is never dropped
 * - Merge a run's chapters into one Markdown or plain-text artifact
 * - Durable per-novel progress so the next run continues where the
 *   last one stopped
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `catalog`: Persistent catalog of novels and their resume state
 * - `fetcher`: Page fetching and next-link discovery
 * - `engine`: Translation engine clients
 * - `translation`: Sentence batching and the chapter translation stage
 * - `pipeline`: Fetch loop, merge stage and the batch orchestrator
 * - `progress`: Progress notification channel
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod catalog;
pub mod engine;
pub mod errors;
pub mod fetcher;
pub mod file_utils;
pub mod pipeline;
pub mod progress;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::{Config, OutputFormat};
pub use catalog::{CatalogStore, JsonCatalog, MemoryCatalog, NewNovel, NovelTarget};
pub use engine::{OllamaEngine, TranslationEngine};
pub use errors::{AppError, CatalogError, EngineError, FetchError, MergeError};
pub use fetcher::{ChapterPage, HttpFetcher, PageFetcher};
pub use pipeline::{Orchestrator, RunOutcome, RunReport};
pub use progress::{CallbackSink, NullSink, ProgressSink};
