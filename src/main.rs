// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use indicatif::{ProgressBar, ProgressStyle};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use crate::app_config::{Config, LogLevel, OutputFormat};
use crate::catalog::{CatalogStore, JsonCatalog, NewNovel};
use crate::engine::OllamaEngine;
use crate::fetcher::HttpFetcher;
use crate::pipeline::{Orchestrator, RunOutcome};
use crate::progress::CallbackSink;

mod app_config;
mod catalog;
mod engine;
mod errors;
mod fetcher;
mod file_utils;
mod pipeline;
mod progress;
mod translation;

/// CLI Wrapper for OutputFormat to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliOutputFormat {
    Markdown,
    Text,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(cli_format: CliOutputFormat) -> Self {
        match cli_format {
            CliOutputFormat::Markdown => OutputFormat::Markdown,
            CliOutputFormat::Text => OutputFormat::Text,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Register a new novel in the catalog
    Add(AddArgs),

    /// Remove a novel from the catalog
    Remove {
        /// Novel id as shown by `list`
        id: String,
    },

    /// List registered novels with their resume state
    List,

    /// Run one translation batch for a novel, resuming from its cursor
    Run {
        /// Novel id as shown by `list`
        id: String,
    },

    /// Generate shell completions for noveltr
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct AddArgs {
    /// Novel name
    #[arg(short, long)]
    name: String,

    /// URL of the first chapter to fetch
    #[arg(short, long)]
    url: String,

    /// CSS locator of the chapter content block
    #[arg(long)]
    content_locator: String,

    /// CSS locator of the next-chapter control
    #[arg(long)]
    next_locator: String,

    /// First chapter number
    #[arg(long, default_value_t = 1)]
    start_chapter: u32,

    /// Chapters per run (defaults from config)
    #[arg(short, long)]
    batch_size: Option<u32>,

    /// Output format (defaults from config)
    #[arg(short, long, value_enum)]
    format: Option<CliOutputFormat>,

    /// Output directory (defaults from config)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Do not inject chapter-number headers
    #[arg(long)]
    no_chapter_number: bool,
}

/// noveltr - resumable web-novel batch translation
///
/// Fetches chapters of a serialized web novel, translates them and merges
/// each batch into a single document, tracking per-novel progress so the
/// next run picks up where the last one stopped.
#[derive(Parser, Debug)]
#[command(name = "noveltr")]
#[command(version = "0.1.0")]
#[command(about = "Resumable web-novel batch translator")]
#[command(long_about = "noveltr walks a novel's chapter chain, translates each chapter and \
merges every run's output into one document.

EXAMPLES:
    noveltr add -n \"My Novel\" -u https://example.com/ch-1 \\
        --content-locator \"div.chapter-content\" --next-locator \"a.next-chapter\"
    noveltr list                        # Show novels and resume cursors
    noveltr run <id>                    # Translate the next batch of chapters
    noveltr completions bash            # Generate bash completions

CONFIGURATION:
    Configuration and the novel catalog live under the platform config
    directory (noveltr/config.json, noveltr/novels.json). A default config
    file is created on first use.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long)]
    config_path: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::color_for_level(record.level());
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn level_filter_from(level: &LogLevel) -> LevelFilter {
    match level {
        LogLevel::Error => LevelFilter::Error,
        LogLevel::Warn => LevelFilter::Warn,
        LogLevel::Info => LevelFilter::Info,
        LogLevel::Debug => LevelFilter::Debug,
        LogLevel::Trace => LevelFilter::Trace,
    }
}

fn load_or_create_config(path: &PathBuf) -> Result<Config> {
    if path.exists() {
        Config::from_file(path)
    } else {
        let config = Config::default();
        config
            .save_to_file(path)
            .with_context(|| format!("Failed to create default config at {}", path.display()))?;
        // Logger is not installed yet at this point
        eprintln!("Created default config at {}", path.display());
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let options = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &options.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "noveltr", &mut std::io::stdout());
        return Ok(());
    }

    let config_path = options
        .config_path
        .unwrap_or_else(Config::default_config_path);
    let config = load_or_create_config(&config_path)?;

    let log_level = options
        .log_level
        .map(LogLevel::from)
        .unwrap_or_else(|| config.log_level.clone());
    CustomLogger::init(level_filter_from(&log_level))
        .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    let catalog = Arc::new(JsonCatalog::open_default().context("Failed to open novel catalog")?);

    match options.command {
        Commands::Add(args) => {
            let novel = catalog.add(NewNovel {
                name: args.name,
                start_url: args.url,
                start_chapter: args.start_chapter,
                content_locator: args.content_locator,
                next_locator: args.next_locator,
                batch_size: args.batch_size.unwrap_or(config.default_batch_size),
                output_format: args
                    .format
                    .map(OutputFormat::from)
                    .unwrap_or(config.default_format),
                output_dir: args.output_dir.unwrap_or_else(|| config.output_dir.clone()),
                show_chapter_number: !args.no_chapter_number && config.show_chapter_number,
            })?;
            println!("Added '{}' with id {}", novel.name, novel.id);
        }

        Commands::Remove { id } => {
            catalog.remove(&id)?;
            println!("Removed novel {}", id);
        }

        Commands::List => {
            let novels = catalog.list()?;
            if novels.is_empty() {
                println!("No novels registered. Use `noveltr add` to register one.");
            }
            for novel in novels {
                println!(
                    "{}  {}  chapter {}  [{}]  {}",
                    novel.id,
                    novel.name,
                    novel.current_chapter,
                    novel.output_format.display_name(),
                    novel.status
                );
            }
        }

        Commands::Run { id } => {
            let fetcher = Arc::new(HttpFetcher::new(config.engine.timeout_secs)?);
            let engine = Arc::new(OllamaEngine::new(&config.engine)?);
            let orchestrator = Orchestrator::new(fetcher, engine, catalog);

            let bar = ProgressBar::new(100);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos:>3}% {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            let bar_clone = bar.clone();
            let sink = Arc::new(CallbackSink::new(move |percent, message| {
                bar_clone.set_position(percent as u64);
                bar_clone.set_message(message.to_string());
            }));

            let report = orchestrator.run(&id, sink).await;
            bar.finish_and_clear();

            match report.outcome {
                RunOutcome::Success => {
                    println!(
                        "Run completed: {} chapter(s) merged into {}",
                        report.chapters_translated,
                        report
                            .artifact
                            .as_deref()
                            .map(|p| p.display().to_string())
                            .unwrap_or_default()
                    );
                    println!("Next run resumes at chapter {}", report.resume_chapter);
                }
                RunOutcome::PartialSuccess { reason } => {
                    println!(
                        "Run completed early ({}): {} chapter(s) merged into {}",
                        reason,
                        report.chapters_translated,
                        report
                            .artifact
                            .as_deref()
                            .map(|p| p.display().to_string())
                            .unwrap_or_default()
                    );
                    println!("Next run resumes at chapter {}", report.resume_chapter);
                }
                RunOutcome::Failure { stage, reason } => {
                    if let Some(artifact) = &report.artifact {
                        println!("Artifact was written to {}", artifact.display());
                    }
                    anyhow::bail!("Run failed at {} stage: {}", stage, reason);
                }
            }
        }

        Commands::Completions { .. } => unreachable!("handled before config load"),
    }

    Ok(())
}
