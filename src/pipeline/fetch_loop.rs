/*!
 * Chapter fetch loop.
 *
 * Walks the linked chain of chapter pages from a starting URL, one state
 * per chapter attempt: fetch the page, extract its text, discover the
 * next URL. The loop ends when the batch quota is met, the chain breaks
 * (no next link - the normal end of a serialized work, not a defect) or
 * a fetch fails. All state is carried in the returned `FetchResult`;
 * nothing is threaded through mutable fields.
 */

use log::{info, warn};

use crate::fetcher::PageFetcher;
use crate::progress::ProgressReporter;

use super::RawChapter;

// Progress band allotted to this stage within one run
const STAGE_SPAN_PERCENT: u8 = 30;

/// Terminal state of one fetch loop execution
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The full requested count was fetched and a next link was sought
    Completed,
    /// The chain broke before the quota; the shortfall is reported but
    /// this is not a failure
    CompletedEarly {
        /// Chapters requested but not reachable
        missing: u32,
    },
    /// A fetch or extraction failed; chapters fetched before the break
    /// are kept
    Aborted {
        /// Why the loop stopped
        reason: String,
    },
}

/// Everything one fetch loop execution produced
#[derive(Debug)]
pub struct FetchResult {
    /// Fetched chapters in ascending chapter order, no gaps
    pub chapters: Vec<RawChapter>,
    /// Next chapter number for the resume cursor
    pub resume_chapter: u32,
    /// URL paired with `resume_chapter`
    pub resume_url: String,
    /// How the loop ended
    pub outcome: FetchOutcome,
}

/// Fetch up to `count` chapters starting at `start_url`, numbering them
/// by increment from `start_chapter`.
///
/// Resume position: the discovered next URL when one exists beyond the
/// last kept chapter, otherwise the last kept chapter's own URL, so a
/// future run re-checks that page for a successor instead of silently
/// losing a chapter.
pub async fn fetch_range(
    fetcher: &dyn PageFetcher,
    start_url: &str,
    start_chapter: u32,
    count: u32,
    content_locator: &str,
    next_locator: &str,
    progress: &ProgressReporter,
) -> FetchResult {
    let mut chapters: Vec<RawChapter> = Vec::with_capacity(count as usize);
    let mut current_url = start_url.to_string();
    // URL the next run should fetch, when the loop already knows it: the
    // next link discovered from the last kept chapter, or the page whose
    // fetch failed
    let mut resume_url_hint: Option<String> = None;
    let outcome;

    info!(
        "Fetching up to {} chapter(s) starting at chapter {} ({})",
        count, start_chapter, start_url
    );

    loop {
        let fetched = chapters.len() as u32;
        let number = start_chapter + fetched;

        let percent = (fetched * STAGE_SPAN_PERCENT as u32 / count.max(1)) as u8;
        progress.report(
            percent,
            &format!("Fetching chapter {} ({}/{})", number, fetched + 1, count),
        );

        let page = match fetcher
            .fetch_chapter(&current_url, content_locator, next_locator)
            .await
        {
            Ok(page) => page,
            Err(e) => {
                warn!("Chapter {} failed: {}", number, e);
                resume_url_hint = Some(current_url.clone());
                outcome = FetchOutcome::Aborted {
                    reason: format!("chapter {}: {}", number, e),
                };
                break;
            }
        };

        chapters.push(RawChapter {
            number,
            text: page.text,
            source_url: current_url.clone(),
        });
        resume_url_hint = page.next_url.clone();

        match page.next_url {
            Some(next) => {
                if chapters.len() as u32 == count {
                    outcome = FetchOutcome::Completed;
                    break;
                }
                info!("Next chapter: {}", next);
                current_url = next;
            }
            None => {
                let kept = chapters.len() as u32;
                if kept == count {
                    outcome = FetchOutcome::Completed;
                } else {
                    info!(
                        "No next-chapter link after chapter {}; chain ends here",
                        number
                    );
                    outcome = FetchOutcome::CompletedEarly {
                        missing: count - kept,
                    };
                }
                break;
            }
        }
    }

    let resume_chapter = start_chapter + chapters.len() as u32;
    let resume_url = match resume_url_hint {
        Some(url) => url,
        None => chapters
            .last()
            .map(|c| c.source_url.clone())
            .unwrap_or_else(|| start_url.to_string()),
    };

    info!(
        "Fetch loop done: {} chapter(s), resume at chapter {} ({})",
        chapters.len(),
        resume_chapter,
        resume_url
    );

    FetchResult {
        chapters,
        resume_chapter,
        resume_url,
        outcome,
    }
}
