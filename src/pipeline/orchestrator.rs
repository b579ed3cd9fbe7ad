/*!
 * Batch orchestrator: one resumable unit of work.
 *
 * A run loads the novel from the catalog, walks the fetch loop from the
 * resume cursor, translates what was fetched, merges the result into one
 * artifact and advances the cursor - in that order, each stage fully
 * consuming the previous stage's output. The orchestrator owns the run's
 * scratch storage and releases it on every exit path. The catalog is
 * mutated only after the artifact exists, and the cursor advances only
 * past chapters actually merged.
 */

use log::{error, info, warn};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

use crate::catalog::{CatalogStore, NovelTarget};
use crate::engine::TranslationEngine;
use crate::fetcher::PageFetcher;
use crate::progress::{ProgressReporter, ProgressSink};
use crate::translation::ChapterTranslator;

use super::{fetch_range, merge, FetchOutcome, RawChapter, TranslatedChapter};

/// How a run ended; exactly one of these per run
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Every requested chapter was fetched, translated and merged
    Success,
    /// An artifact was produced but with fewer chapters than requested
    PartialSuccess {
        /// Why the run fell short
        reason: String,
    },
    /// No artifact, or the catalog could not record the new cursor
    Failure {
        /// Stage that failed
        stage: String,
        /// Why it failed
        reason: String,
    },
}

/// Report of one pipeline run
#[derive(Debug)]
pub struct RunReport {
    /// How the run ended
    pub outcome: RunOutcome,
    /// Path of the merged artifact, when one was produced
    pub artifact: Option<PathBuf>,
    /// Chapters fetched by the loop
    pub chapters_fetched: usize,
    /// Chapters that produced translated output
    pub chapters_translated: usize,
    /// Resume cursor after the run
    pub resume_chapter: u32,
}

impl RunReport {
    fn failure(stage: &str, reason: String, resume_chapter: u32) -> Self {
        Self {
            outcome: RunOutcome::Failure {
                stage: stage.to_string(),
                reason,
            },
            artifact: None,
            chapters_fetched: 0,
            chapters_translated: 0,
            resume_chapter,
        }
    }
}

// Scratch working storage for one run: a temp dir with raw/ and
// translated/ chapter files, released explicitly so cleanup failures
// show up in logs instead of vanishing in a destructor.
struct Scratch {
    dir: TempDir,
    raw: PathBuf,
    translated: PathBuf,
}

impl Scratch {
    fn create() -> std::io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("noveltr_").tempdir()?;
        let raw = dir.path().join("raw");
        let translated = dir.path().join("translated");
        fs::create_dir(&raw)?;
        fs::create_dir(&translated)?;
        info!("Scratch storage at {}", dir.path().display());
        Ok(Self {
            dir,
            raw,
            translated,
        })
    }

    fn store_raw(&self, chapter: &RawChapter) {
        let path = self.raw.join(format!("chapter_{}.txt", chapter.number));
        if let Err(e) = fs::write(&path, &chapter.text) {
            warn!("Could not write scratch file {}: {}", path.display(), e);
        }
    }

    fn store_translated(&self, chapter: &TranslatedChapter) {
        let path = self
            .translated
            .join(format!("chapter_{}.txt", chapter.number));
        if let Err(e) = fs::write(&path, &chapter.text) {
            warn!("Could not write scratch file {}: {}", path.display(), e);
        }
    }

    fn release(self) {
        let path = self.dir.path().to_path_buf();
        match self.dir.close() {
            Ok(()) => info!("Scratch storage released"),
            Err(e) => error!("Failed to remove scratch dir {}: {}", path.display(), e),
        }
    }
}

/// Ties the fetch, translation and merge stages into one resumable run
pub struct Orchestrator {
    fetcher: Arc<dyn PageFetcher>,
    engine: Arc<dyn TranslationEngine>,
    catalog: Arc<dyn CatalogStore>,
}

impl Orchestrator {
    /// Create an orchestrator over the injected capabilities
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        engine: Arc<dyn TranslationEngine>,
        catalog: Arc<dyn CatalogStore>,
    ) -> Self {
        Self {
            fetcher,
            engine,
            catalog,
        }
    }

    /// Run one batch for the novel with the given id.
    ///
    /// Every run ends in exactly one `RunOutcome`; errors at any stage are
    /// absorbed here and reported, never propagated as panics or partial
    /// catalog mutations.
    pub async fn run(&self, novel_id: &str, sink: Arc<dyn ProgressSink>) -> RunReport {
        let progress = ProgressReporter::new(sink);
        progress.report(0, "Starting run");

        let target = match self.catalog.get(novel_id) {
            Ok(Some(target)) => target,
            Ok(None) => {
                progress.fail("Novel not found in catalog");
                return RunReport::failure(
                    "catalog",
                    format!("novel not found: {}", novel_id),
                    0,
                );
            }
            Err(e) => {
                progress.fail("Catalog read failed");
                return RunReport::failure("catalog", e.to_string(), 0);
            }
        };

        info!(
            "Run for '{}': chapter {} onward, batch size {}",
            target.name, target.current_chapter, target.batch_size
        );

        let scratch = match Scratch::create() {
            Ok(scratch) => scratch,
            Err(e) => {
                progress.fail("Could not create scratch storage");
                return RunReport::failure("scratch", e.to_string(), target.current_chapter);
            }
        };

        let report = self.run_stages(&target, &scratch, &progress).await;

        let status = match &report.outcome {
            RunOutcome::Success => "Atualizado".to_string(),
            RunOutcome::PartialSuccess { reason } => format!("Parcial: {}", reason),
            RunOutcome::Failure { stage, reason } => format!("Erro ({}): {}", stage, reason),
        };
        if let Err(e) = self.catalog.set_status(&target.id, &status) {
            warn!("Could not update status label for '{}': {}", target.name, e);
        }

        progress.report(95, "Releasing scratch storage");
        scratch.release();

        match &report.outcome {
            RunOutcome::Success => progress.report(100, "Run completed"),
            RunOutcome::PartialSuccess { reason } => {
                progress.report(100, &format!("Run completed early: {}", reason));
            }
            RunOutcome::Failure { stage, reason } => {
                progress.fail(&format!("Run failed at {} stage: {}", stage, reason));
            }
        }

        report
    }

    async fn run_stages(
        &self,
        target: &NovelTarget,
        scratch: &Scratch,
        progress: &ProgressReporter,
    ) -> RunReport {
        // Stage 1: fetch
        let fetch = fetch_range(
            self.fetcher.as_ref(),
            &target.current_url,
            target.current_chapter,
            target.batch_size,
            &target.content_locator,
            &target.next_locator,
            progress,
        )
        .await;

        for chapter in &fetch.chapters {
            scratch.store_raw(chapter);
        }

        if fetch.chapters.is_empty() {
            let reason = match &fetch.outcome {
                FetchOutcome::Aborted { reason } => reason.clone(),
                _ => "no chapters fetched".to_string(),
            };
            error!("Run failed during fetch: {}", reason);
            return RunReport::failure("fetch", reason, target.current_chapter);
        }

        progress.report(30, &format!("{} chapter(s) fetched", fetch.chapters.len()));

        // Stage 2: translate
        let translator = ChapterTranslator::new(self.engine.clone());
        let translated = translator
            .translate_all(&fetch.chapters, target.show_chapter_number, progress)
            .await;

        for chapter in &translated {
            scratch.store_translated(chapter);
        }

        if translated.is_empty() {
            error!("Run failed during translation: no chapter produced output");
            return RunReport::failure(
                "translate",
                "no chapter produced translated output".to_string(),
                target.current_chapter,
            );
        }

        progress.report(70, &format!("{} chapter(s) translated", translated.len()));

        // Stage 3: merge
        let artifact = match merge(
            &translated,
            &target.name,
            target.output_format,
            &target.output_dir,
        ) {
            Ok(path) => path,
            Err(e) => {
                error!("Run failed during merge: {}", e);
                return RunReport::failure("merge", e.to_string(), target.current_chapter);
            }
        };

        progress.report(85, "Artifact assembled");

        // Stage 4: persist the new cursor. The artifact already exists, so
        // a failure here is surfaced distinctly: resume state may be stale.
        if let Err(e) = self
            .catalog
            .advance_cursor(&target.id, fetch.resume_chapter, &fetch.resume_url)
        {
            error!(
                "Artifact {} was written but the catalog could not be updated: {}",
                artifact.display(),
                e
            );
            return RunReport {
                outcome: RunOutcome::Failure {
                    stage: "catalog".to_string(),
                    reason: format!(
                        "translation succeeded but progress tracking may be stale; \
                         verify before re-running: {}",
                        e
                    ),
                },
                artifact: Some(artifact),
                chapters_fetched: fetch.chapters.len(),
                chapters_translated: translated.len(),
                resume_chapter: target.current_chapter,
            };
        }

        progress.report(90, &format!("Resume cursor at chapter {}", fetch.resume_chapter));

        let outcome = match &fetch.outcome {
            FetchOutcome::Completed => RunOutcome::Success,
            FetchOutcome::CompletedEarly { missing } => RunOutcome::PartialSuccess {
                reason: format!(
                    "{} chapter(s) not yet reachable; the chain ends for now",
                    missing
                ),
            },
            FetchOutcome::Aborted { reason } => RunOutcome::PartialSuccess {
                reason: format!("stopped early after a fetch failure: {}", reason),
            },
        };

        RunReport {
            outcome,
            artifact: Some(artifact),
            chapters_fetched: fetch.chapters.len(),
            chapters_translated: translated.len(),
            resume_chapter: fetch.resume_chapter,
        }
    }
}
