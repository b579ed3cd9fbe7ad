/*!
 * Chapter translation stage.
 *
 * Translates fetched chapters independently and in input order. Each
 * chapter is split on line breaks so the original paragraph structure
 * survives translation, each line is packed into engine-sized batches,
 * and a failed batch falls back to its original untranslated text rather
 * than being dropped. A single chapter failure never aborts the stage.
 */

use log::{info, warn};
use std::sync::Arc;

use crate::engine::TranslationEngine;
use crate::pipeline::{RawChapter, TranslatedChapter};
use crate::progress::ProgressReporter;

use super::batcher;

// Progress band allotted to this stage within one run
const STAGE_START_PERCENT: u8 = 30;
const STAGE_SPAN_PERCENT: u8 = 40;

/// Translates chapters through a translation engine
pub struct ChapterTranslator {
    engine: Arc<dyn TranslationEngine>,
}

impl ChapterTranslator {
    /// Create a translator over the given engine
    pub fn new(engine: Arc<dyn TranslationEngine>) -> Self {
        Self { engine }
    }

    /// Translate all chapters, in input order.
    ///
    /// Blank chapters are skipped; they contribute nothing to the output.
    /// The result may therefore hold fewer chapters than the input, with
    /// skipped chapters simply absent.
    pub async fn translate_all(
        &self,
        chapters: &[RawChapter],
        show_number: bool,
        progress: &ProgressReporter,
    ) -> Vec<TranslatedChapter> {
        let total = chapters.len();
        let mut translated = Vec::with_capacity(total);

        info!("Translating {} chapter(s)", total);

        for (index, chapter) in chapters.iter().enumerate() {
            let percent =
                STAGE_START_PERCENT + (index * STAGE_SPAN_PERCENT as usize / total.max(1)) as u8;
            progress.report(
                percent,
                &format!("Translating chapter {} ({}/{})", chapter.number, index + 1, total),
            );

            if chapter.text.trim().is_empty() {
                warn!("Chapter {} is blank, skipping", chapter.number);
                continue;
            }

            let mut text = self.translate_text(&chapter.text).await;
            if show_number {
                text = format!("Capítulo {}\n\n{}", chapter.number, text);
            }

            translated.push(TranslatedChapter {
                number: chapter.number,
                text,
                show_number,
            });

            info!("Chapter {} translated", chapter.number);
        }

        if translated.is_empty() {
            warn!("No chapter produced any translated output");
        } else {
            info!("{} chapter(s) translated", translated.len());
        }

        translated
    }

    // Translate one chapter, preserving its line structure. Lines are
    // rebuilt from their batch translations joined by single spaces.
    async fn translate_text(&self, text: &str) -> String {
        let measure = |s: &str| self.engine.measure(s);
        let max_units = self.engine.max_units();
        let max_chars = self.engine.max_chars();

        let mut lines = Vec::new();
        for line in text.split('\n') {
            if line.trim().is_empty() {
                lines.push(String::new());
                continue;
            }

            let batches = batcher::pack(line, max_chars, max_units, &measure);
            let mut outputs = Vec::with_capacity(batches.len());
            for batch in batches {
                match self.engine.translate(&batch).await {
                    Ok(translated) => outputs.push(translated),
                    Err(e) => {
                        // Keep the original text for this segment only
                        warn!("Batch translation failed, keeping original text: {}", e);
                        outputs.push(batch);
                    }
                }
            }
            lines.push(outputs.join(" "));
        }

        lines.join("\n")
    }
}
