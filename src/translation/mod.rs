/*!
 * Chapter translation stages.
 *
 * This module contains the text-side half of the pipeline:
 *
 * - `batcher`: splits text into engine-sized batches along sentence
 *   boundaries, with a word-level fallback for oversized sentences
 * - `chapters`: translates fetched chapters one by one, tolerating
 *   per-batch failures without losing content
 */

pub use self::batcher::{pack, split_sentences, MAX_CHARS_PER_BATCH};
pub use self::chapters::ChapterTranslator;

pub mod batcher;
pub mod chapters;
