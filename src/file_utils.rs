use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_config::OutputFormat;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @sanitizes: Novel name for use in a file name
    // Keeps alphanumerics, spaces, hyphens and underscores, then
    // replaces spaces with underscores.
    pub fn sanitize_file_name(name: &str) -> String {
        let kept: String = name
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '-' || *c == '_')
            .collect();
        kept.trim().replace(' ', "_")
    }

    // @generates: Artifact file name for a merged chapter range
    pub fn artifact_file_name(
        novel_name: &str,
        first_chapter: u32,
        last_chapter: u32,
        format: OutputFormat,
    ) -> String {
        format!(
            "{}_cap{}-{}.{}",
            Self::sanitize_file_name(novel_name),
            first_chapter,
            last_chapter,
            format.extension()
        )
    }

    // @generates: Full artifact path inside an output directory
    pub fn artifact_path<P: AsRef<Path>>(
        output_dir: P,
        novel_name: &str,
        first_chapter: u32,
        last_chapter: u32,
        format: OutputFormat,
    ) -> PathBuf {
        output_dir.as_ref().join(Self::artifact_file_name(
            novel_name,
            first_chapter,
            last_chapter,
            format,
        ))
    }
}
