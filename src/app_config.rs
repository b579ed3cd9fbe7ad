use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs;
use std::path::{Path, PathBuf};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Directory where merged artifacts are written by default
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Default number of chapters per run
    #[serde(default = "default_batch_size")]
    pub default_batch_size: u32,

    /// Default output format for new novels
    #[serde(default)]
    pub default_format: OutputFormat,

    /// Whether new novels get a chapter-number header by default
    #[serde(default = "default_true")]
    pub show_chapter_number: bool,

    /// Translation engine config
    #[serde(default)]
    pub engine: EngineConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Output artifact format
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    // @format: Markdown document with headings
    #[default]
    Markdown,
    // @format: Plain UTF-8 text
    Text,
}

impl OutputFormat {
    // @returns: Capitalized format name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Markdown => "Markdown",
            Self::Text => "Text",
        }
    }

    // @returns: File extension without the dot
    pub fn extension(&self) -> &str {
        match self {
            Self::Markdown => "md",
            Self::Text => "txt",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Markdown => write!(f, "markdown"),
            Self::Text => write!(f, "text"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "text" | "txt" => Ok(Self::Text),
            _ => Err(anyhow!("Invalid output format: {}", s)),
        }
    }
}

/// Translation engine configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EngineConfig {
    // @field: Service URL
    #[serde(default = "default_engine_endpoint")]
    pub endpoint: String,

    // @field: Model name
    #[serde(default = "default_engine_model")]
    pub model: String,

    // @field: Source language code
    #[serde(default = "default_source_language")]
    pub source_language: String,

    // @field: Target language code
    #[serde(default = "default_target_language")]
    pub target_language: String,

    // @field: Engine input limit in native units
    #[serde(default = "default_max_units")]
    pub max_units: usize,

    // @field: Max chars per request (batching proxy)
    #[serde(default = "default_max_chars_per_request")]
    pub max_chars_per_request: usize,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            endpoint: default_engine_endpoint(),
            model: default_engine_model(),
            source_language: default_source_language(),
            target_language: default_target_language(),
            max_units: default_max_units(),
            max_chars_per_request: default_max_chars_per_request(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_output_dir() -> PathBuf {
    dirs::document_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Novels Traduzidas")
}

fn default_batch_size() -> u32 {
    5
}

fn default_true() -> bool {
    true
}

fn default_engine_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_engine_model() -> String {
    "llama3.2:3b".to_string()
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_target_language() -> String {
    "pt".to_string()
}

fn default_max_units() -> usize {
    512
}

fn default_max_chars_per_request() -> usize {
    crate::translation::MAX_CHARS_PER_BATCH
}

fn default_timeout_secs() -> u64 {
    60
}

impl Config {
    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration as pretty-printed JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config dir: {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(self).context("Failed to encode config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.default_batch_size == 0 {
            return Err(anyhow!("default_batch_size must be at least 1"));
        }
        if self.engine.endpoint.is_empty() {
            return Err(anyhow!("Engine endpoint is required"));
        }
        if self.engine.max_units == 0 {
            return Err(anyhow!("Engine max_units must be at least 1"));
        }
        Ok(())
    }

    /// Directory holding the config and catalog files
    pub fn app_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("noveltr")
    }

    /// Default config file location
    pub fn default_config_path() -> PathBuf {
        Self::app_dir().join("config.json")
    }

    /// Default catalog file location
    pub fn default_catalog_path() -> PathBuf {
        Self::app_dir().join("novels.json")
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            output_dir: default_output_dir(),
            default_batch_size: default_batch_size(),
            default_format: OutputFormat::default(),
            show_chapter_number: true,
            engine: EngineConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
