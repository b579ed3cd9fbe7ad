/*!
 * Persistent catalog of novels and their resume state.
 *
 * The catalog is a keyed collection of `NovelTarget` records. Each record
 * carries the resume cursor: the next chapter number to fetch and the URL
 * that yields it. The cursor is advanced only through `advance_cursor`,
 * which is monotonic - it never moves a novel backward.
 *
 * Two implementations are provided: `JsonCatalog`, a pretty-printed JSON
 * file under the platform config dir, and `MemoryCatalog` for tests.
 */

use log::{debug, warn};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::app_config::OutputFormat;
use crate::errors::CatalogError;

/// One serialized work being translated
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NovelTarget {
    /// Stable unique key, generated once on add
    pub id: String,
    /// Human-readable novel name
    pub name: String,
    /// First chapter ever requested
    pub start_chapter: u32,
    /// Next chapter number to fetch (resume cursor)
    pub current_chapter: u32,
    /// URL to fetch to obtain `current_chapter`
    pub current_url: String,
    /// Opaque locator for the chapter content block
    pub content_locator: String,
    /// Opaque locator for the next-chapter control
    pub next_locator: String,
    /// Chapters per run
    pub batch_size: u32,
    /// Output artifact format
    pub output_format: OutputFormat,
    /// Directory where artifacts are written
    pub output_dir: PathBuf,
    /// Whether to inject a chapter-number header
    pub show_chapter_number: bool,
    /// Free-form human-readable state label
    #[serde(default)]
    pub status: String,
    /// Last catalog update timestamp
    #[serde(default)]
    pub updated_at: String,
}

/// Parameters for registering a new novel
#[derive(Debug, Clone)]
pub struct NewNovel {
    /// Novel name
    pub name: String,
    /// URL of the first chapter to fetch
    pub start_url: String,
    /// First chapter number
    pub start_chapter: u32,
    /// Content locator
    pub content_locator: String,
    /// Next-chapter locator
    pub next_locator: String,
    /// Chapters per run
    pub batch_size: u32,
    /// Output format
    pub output_format: OutputFormat,
    /// Output directory
    pub output_dir: PathBuf,
    /// Chapter-number header flag
    pub show_chapter_number: bool,
}

/// Keyed storage of novels and their resume state
pub trait CatalogStore: Send + Sync {
    /// Register a new novel; the catalog assigns its id
    fn add(&self, novel: NewNovel) -> Result<NovelTarget, CatalogError>;

    /// Remove a novel by id
    fn remove(&self, id: &str) -> Result<(), CatalogError>;

    /// Look up a novel by id
    fn get(&self, id: &str) -> Result<Option<NovelTarget>, CatalogError>;

    /// All registered novels
    fn list(&self) -> Result<Vec<NovelTarget>, CatalogError>;

    /// Replace the stored record for `novel.id`
    fn update(&self, novel: &NovelTarget) -> Result<(), CatalogError>;

    /// Advance the resume cursor for a novel.
    ///
    /// The cursor is monotonic: a chapter number lower than the stored one
    /// is ignored, so a stale caller can never move a novel backward.
    fn advance_cursor(&self, id: &str, chapter: u32, url: &str) -> Result<(), CatalogError>;

    /// Set the human-readable status label
    fn set_status(&self, id: &str, status: &str) -> Result<(), CatalogError>;
}

fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn build_target(novel: NewNovel) -> NovelTarget {
    NovelTarget {
        id: Uuid::new_v4().to_string(),
        name: novel.name,
        start_chapter: novel.start_chapter,
        current_chapter: novel.start_chapter,
        current_url: novel.start_url,
        content_locator: novel.content_locator,
        next_locator: novel.next_locator,
        batch_size: novel.batch_size,
        output_format: novel.output_format,
        output_dir: novel.output_dir,
        show_chapter_number: novel.show_chapter_number,
        status: "Pendente".to_string(),
        updated_at: timestamp(),
    }
}

fn advance_in_place(target: &mut NovelTarget, chapter: u32, url: &str) {
    if chapter < target.current_chapter {
        warn!(
            "Ignoring backward cursor move for '{}': {} < {}",
            target.name, chapter, target.current_chapter
        );
        return;
    }
    target.current_chapter = chapter;
    target.current_url = url.to_string();
    target.updated_at = timestamp();
}

/// Catalog persisted as a JSON file keyed by novel id
pub struct JsonCatalog {
    path: PathBuf,
    novels: Mutex<Vec<NovelTarget>>,
}

impl JsonCatalog {
    /// Open a catalog file, creating an empty catalog if it does not exist
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref().to_path_buf();
        let novels: Vec<NovelTarget> = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            Vec::new()
        };
        debug!("Opened catalog at {} ({} novels)", path.display(), novels.len());
        Ok(Self {
            path,
            novels: Mutex::new(novels),
        })
    }

    /// Catalog at the default platform location
    pub fn open_default() -> Result<Self, CatalogError> {
        Self::open(crate::app_config::Config::default_catalog_path())
    }

    fn persist(&self, novels: &[NovelTarget]) -> Result<(), CatalogError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(novels)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl CatalogStore for JsonCatalog {
    fn add(&self, novel: NewNovel) -> Result<NovelTarget, CatalogError> {
        let target = build_target(novel);
        let mut novels = self.novels.lock();
        novels.push(target.clone());
        self.persist(&novels)?;
        Ok(target)
    }

    fn remove(&self, id: &str) -> Result<(), CatalogError> {
        let mut novels = self.novels.lock();
        let before = novels.len();
        novels.retain(|n| n.id != id);
        if novels.len() == before {
            return Err(CatalogError::NotFound(id.to_string()));
        }
        self.persist(&novels)
    }

    fn get(&self, id: &str) -> Result<Option<NovelTarget>, CatalogError> {
        Ok(self.novels.lock().iter().find(|n| n.id == id).cloned())
    }

    fn list(&self) -> Result<Vec<NovelTarget>, CatalogError> {
        Ok(self.novels.lock().clone())
    }

    fn update(&self, novel: &NovelTarget) -> Result<(), CatalogError> {
        let mut novels = self.novels.lock();
        let entry = novels
            .iter_mut()
            .find(|n| n.id == novel.id)
            .ok_or_else(|| CatalogError::NotFound(novel.id.clone()))?;
        *entry = novel.clone();
        entry.updated_at = timestamp();
        self.persist(&novels)
    }

    fn advance_cursor(&self, id: &str, chapter: u32, url: &str) -> Result<(), CatalogError> {
        let mut novels = self.novels.lock();
        let entry = novels
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;
        advance_in_place(entry, chapter, url);
        self.persist(&novels)
    }

    fn set_status(&self, id: &str, status: &str) -> Result<(), CatalogError> {
        let mut novels = self.novels.lock();
        let entry = novels
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;
        entry.status = status.to_string();
        entry.updated_at = timestamp();
        self.persist(&novels)
    }
}

/// In-memory catalog for tests
#[derive(Default)]
pub struct MemoryCatalog {
    novels: Mutex<Vec<NovelTarget>>,
}

impl MemoryCatalog {
    /// Empty in-memory catalog
    pub fn new() -> Self {
        Self::default()
    }
}

impl CatalogStore for MemoryCatalog {
    fn add(&self, novel: NewNovel) -> Result<NovelTarget, CatalogError> {
        let target = build_target(novel);
        self.novels.lock().push(target.clone());
        Ok(target)
    }

    fn remove(&self, id: &str) -> Result<(), CatalogError> {
        let mut novels = self.novels.lock();
        let before = novels.len();
        novels.retain(|n| n.id != id);
        if novels.len() == before {
            return Err(CatalogError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<NovelTarget>, CatalogError> {
        Ok(self.novels.lock().iter().find(|n| n.id == id).cloned())
    }

    fn list(&self) -> Result<Vec<NovelTarget>, CatalogError> {
        Ok(self.novels.lock().clone())
    }

    fn update(&self, novel: &NovelTarget) -> Result<(), CatalogError> {
        let mut novels = self.novels.lock();
        let entry = novels
            .iter_mut()
            .find(|n| n.id == novel.id)
            .ok_or_else(|| CatalogError::NotFound(novel.id.clone()))?;
        *entry = novel.clone();
        Ok(())
    }

    fn advance_cursor(&self, id: &str, chapter: u32, url: &str) -> Result<(), CatalogError> {
        let mut novels = self.novels.lock();
        let entry = novels
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;
        advance_in_place(entry, chapter, url);
        Ok(())
    }

    fn set_status(&self, id: &str, status: &str) -> Result<(), CatalogError> {
        let mut novels = self.novels.lock();
        let entry = novels
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;
        entry.status = status.to_string();
        Ok(())
    }
}
