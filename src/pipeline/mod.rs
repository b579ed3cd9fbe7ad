/*!
 * The resumable chapter pipeline.
 *
 * One run walks the chapter chain from the novel's resume cursor
 * (`fetch_loop`), translates whatever was fetched
 * (`translation::chapters`), assembles one artifact and persists the new
 * cursor (`merge`), all tied together by the `orchestrator`, which owns
 * the run's scratch storage. Stages execute strictly in sequence; data
 * flows only forward.
 */

use serde::{Deserialize, Serialize};

pub use self::fetch_loop::{fetch_range, FetchOutcome, FetchResult};
pub use self::merge::merge;
pub use self::orchestrator::{Orchestrator, RunOutcome, RunReport};

pub mod fetch_loop;
pub mod merge;
pub mod orchestrator;

/// One fetched, untranslated chapter. Owned by a single pipeline run and
/// discarded after translation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawChapter {
    /// Chapter number in the requested sequence
    pub number: u32,
    /// Extracted page content, non-empty by construction
    pub text: String,
    /// URL the chapter was fetched from
    pub source_url: String,
}

/// One translated chapter, ready for merging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatedChapter {
    /// Chapter number
    pub number: u32,
    /// Post-translation text
    pub text: String,
    /// Whether the merged document gets a chapter-number heading
    pub show_number: bool,
}
