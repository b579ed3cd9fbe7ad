/*!
 * Sentence-aware batching of text for the translation engine.
 *
 * `pack` splits text into sentences, greedily groups them into batches
 * under a character ceiling, then verifies every batch against the
 * engine's real unit limit. A batch that still measures over the limit
 * (a single very long sentence cannot be estimated by characters alone)
 * is re-split word by word. Output preserves input order; no sentence or
 * word is duplicated or dropped.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

// @const: Sentence boundary - terminal punctuation, optional closing
// quotes/brackets, then whitespace
static SENTENCE_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[.!?…]["'”’»)\]]*\s+"#).unwrap());

/// Default per-request character ceiling used as a length proxy before
/// the real unit check
pub const MAX_CHARS_PER_BATCH: usize = 400;

/// Split a line into sentences using a punctuation heuristic.
///
/// A line with no recognizable boundary is one sentence.
pub fn split_sentences(line: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for boundary in SENTENCE_BOUNDARY.find_iter(line) {
        let sentence = line[start..boundary.end()].trim();
        if !sentence.is_empty() {
            sentences.push(sentence.to_string());
        }
        start = boundary.end();
    }

    let tail = line[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }

    sentences
}

/// Pack text into batches of at most `max_chars` characters that each
/// measure at most `max_units` in the engine's native units, as reported
/// by `measure`.
///
/// Empty or whitespace-only input yields zero batches.
pub fn pack(
    text: &str,
    max_chars: usize,
    max_units: usize,
    measure: &dyn Fn(&str) -> usize,
) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let sentences = split_sentences(text);

    // Greedy grouping under the character proxy
    let mut groups: Vec<String> = Vec::new();
    let mut current = String::new();
    for sentence in sentences {
        if current.is_empty() {
            current = sentence;
        } else if current.len() + 1 + sentence.len() <= max_chars {
            current.push(' ');
            current.push_str(&sentence);
        } else {
            groups.push(current);
            current = sentence;
        }
    }
    if !current.is_empty() {
        groups.push(current);
    }

    // Verify each group against the real unit limit
    let mut batches = Vec::with_capacity(groups.len());
    for group in groups {
        if measure(&group) <= max_units {
            batches.push(group);
        } else {
            debug!(
                "Batch of {} chars exceeds {} units, re-splitting by words",
                group.len(),
                max_units
            );
            batches.extend(split_long_sentence(&group, max_units, measure));
        }
    }

    batches
}

// Word-level greedy split for a batch whose true unit count exceeds the
// limit. Re-checks the measurement after each appended word.
fn split_long_sentence(
    sentence: &str,
    max_units: usize,
    measure: &dyn Fn(&str) -> usize,
) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();

    for word in sentence.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };

        if measure(&candidate) <= max_units || current.is_empty() {
            // A single word over the limit still gets its own segment;
            // it cannot be split further
            current = candidate;
        } else {
            segments.push(current);
            current = word.to_string();
        }
    }

    if !current.is_empty() {
        segments.push(current);
    }

    segments
}
