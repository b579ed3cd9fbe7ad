/*!
 * Merge stage: assemble translated chapters into one artifact.
 *
 * The artifact is named deterministically from the sanitized novel name
 * and the first/last chapter numbers present, e.g.
 * `My_Novel_cap12-16.md`. Layout in both formats: novel title, a
 * chapter-range caption, a blank separator, then each chapter with an
 * optional chapter-number heading and a blank separator after its text.
 */

use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_config::OutputFormat;
use crate::errors::MergeError;
use crate::file_utils::FileManager;

use super::TranslatedChapter;

/// Merge translated chapters into a single document on disk.
///
/// Fails with `MergeError::NoChapters` when the input list is empty.
pub fn merge(
    chapters: &[TranslatedChapter],
    novel_name: &str,
    format: OutputFormat,
    output_dir: &Path,
) -> Result<PathBuf, MergeError> {
    let (first, last) = match (chapters.first(), chapters.last()) {
        (Some(first), Some(last)) => (first.number, last.number),
        _ => return Err(MergeError::NoChapters),
    };

    fs::create_dir_all(output_dir)?;

    let path = FileManager::artifact_path(output_dir, novel_name, first, last, format);
    info!("Merging {} chapter(s) into {}", chapters.len(), path.display());

    let document = match format {
        OutputFormat::Markdown => render_markdown(chapters, novel_name, first, last),
        OutputFormat::Text => render_text(chapters, novel_name, first, last),
    };

    fs::write(&path, document)?;
    info!("Artifact written: {}", path.display());

    Ok(path)
}

fn render_markdown(
    chapters: &[TranslatedChapter],
    novel_name: &str,
    first: u32,
    last: u32,
) -> String {
    let mut doc = String::new();
    doc.push_str(&format!("# {}\n\n", novel_name));
    doc.push_str(&format!("Capítulos {} a {}\n\n", first, last));

    for chapter in chapters {
        if chapter.show_number {
            doc.push_str(&format!("## Capítulo {}\n\n", chapter.number));
        }
        doc.push_str(&chapter.text);
        doc.push_str("\n\n");
    }

    doc
}

fn render_text(chapters: &[TranslatedChapter], novel_name: &str, first: u32, last: u32) -> String {
    let mut doc = String::new();
    doc.push_str(&format!("{}\n", novel_name));
    doc.push_str(&format!("Capítulos {} a {}\n\n", first, last));

    for chapter in chapters {
        if chapter.show_number {
            doc.push_str(&format!("Capítulo {}\n\n", chapter.number));
        }
        doc.push_str(&chapter.text);
        doc.push_str("\n\n");
    }

    doc
}
