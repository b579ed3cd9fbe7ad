/*!
 * End-to-end pipeline run tests.
 *
 * Runs the full orchestrator against scripted fetchers and mock engines,
 * asserting the behaviors that matter: resume monotonicity, chain-break
 * tolerance, no content loss under translation failure, and scratch
 * cleanup.
 */

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use noveltr::catalog::{CatalogStore, MemoryCatalog};
use noveltr::pipeline::{Orchestrator, RunOutcome};
use noveltr::progress::NullSink;

use crate::common::mocks::{MockEngine, ScriptedFetcher, ScriptedPage};
use crate::common::{sample_novel, RecordingSink};

fn orchestrator(
    fetcher: ScriptedFetcher,
    engine: MockEngine,
    catalog: Arc<MemoryCatalog>,
) -> Orchestrator {
    Orchestrator::new(Arc::new(fetcher), Arc::new(engine), catalog)
}

#[tokio::test]
async fn test_run_threeChapterBatch_shouldMergeAndAdvanceCursor() {
    let output = tempfile::tempdir().expect("tempdir");
    let catalog = Arc::new(MemoryCatalog::new());
    let novel = sample_novel(&catalog, output.path(), 3);

    // Three chapters; the first two link onward, the third does not
    let fetcher = ScriptedFetcher::chain("https://example.com", 3);
    let orchestrator = orchestrator(fetcher, MockEngine::working(), catalog.clone());

    let report = orchestrator.run(&novel.id, Arc::new(NullSink)).await;

    assert_eq!(report.outcome, RunOutcome::Success);
    assert_eq!(report.chapters_fetched, 3);
    assert_eq!(report.chapters_translated, 3);

    let artifact = report.artifact.expect("artifact path");
    assert_eq!(
        artifact.file_name().and_then(|n| n.to_str()),
        Some("Test_Novel_cap1-3.md")
    );

    let document = fs::read_to_string(&artifact).expect("artifact readable");
    assert!(document.contains("[pt] Chapter 1 body. It has two sentences."));
    assert!(document.contains("[pt] Chapter 3 body. It has two sentences."));

    // Cursor advanced past exactly what was merged
    let stored = catalog.get(&novel.id).expect("get").expect("exists");
    assert_eq!(stored.current_chapter, 4);
    assert_eq!(stored.current_url, "https://example.com/ch-3");
}

#[tokio::test]
async fn test_run_chainBreak_shouldBePartialSuccessNotFailure() {
    let output = tempfile::tempdir().expect("tempdir");
    let catalog = Arc::new(MemoryCatalog::new());
    let novel = sample_novel(&catalog, output.path(), 5);

    // Only 3 of the requested 5 chapters are published
    let fetcher = ScriptedFetcher::chain("https://example.com", 3);
    let orchestrator = orchestrator(fetcher, MockEngine::working(), catalog.clone());

    let report = orchestrator.run(&novel.id, Arc::new(NullSink)).await;

    assert!(matches!(report.outcome, RunOutcome::PartialSuccess { .. }));
    assert_eq!(report.chapters_translated, 3);
    assert_eq!(
        report
            .artifact
            .as_ref()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str()),
        Some("Test_Novel_cap1-3.md")
    );

    // Cursor points at chapter 4, pending a future re-check of the chain
    let stored = catalog.get(&novel.id).expect("get").expect("exists");
    assert_eq!(stored.current_chapter, 4);
    assert_eq!(stored.current_url, "https://example.com/ch-3");
}

#[tokio::test]
async fn test_run_firstFetchFails_shouldFailAndLeaveCatalogUnchanged() {
    let output = tempfile::tempdir().expect("tempdir");
    let catalog = Arc::new(MemoryCatalog::new());
    let novel = sample_novel(&catalog, output.path(), 3);
    let before = catalog.get(&novel.id).expect("get").expect("exists");

    // No pages scripted at all: the very first fetch fails
    let fetcher = ScriptedFetcher::new(vec![]);
    let orchestrator = orchestrator(fetcher, MockEngine::working(), catalog.clone());

    let report = orchestrator.run(&novel.id, Arc::new(NullSink)).await;

    match report.outcome {
        RunOutcome::Failure { ref stage, .. } => assert_eq!(stage, "fetch"),
        ref other => panic!("expected failure, got {:?}", other),
    }
    assert!(report.artifact.is_none());

    let after = catalog.get(&novel.id).expect("get").expect("exists");
    assert_eq!(after.current_chapter, before.current_chapter);
    assert_eq!(after.current_url, before.current_url);
}

#[tokio::test]
async fn test_run_midChainFetchFailure_shouldKeepEarlierChaptersAsPartial() {
    let output = tempfile::tempdir().expect("tempdir");
    let catalog = Arc::new(MemoryCatalog::new());
    let novel = sample_novel(&catalog, output.path(), 3);

    // Chapter 2's page is unreachable
    let fetcher = ScriptedFetcher::new(vec![(
        "https://example.com/ch-1",
        ScriptedPage {
            text: "Only chapter one.".to_string(),
            next_url: Some("https://example.com/ch-2".to_string()),
        },
    )]);
    let orchestrator = orchestrator(fetcher, MockEngine::working(), catalog.clone());

    let report = orchestrator.run(&novel.id, Arc::new(NullSink)).await;

    assert!(matches!(report.outcome, RunOutcome::PartialSuccess { .. }));
    assert_eq!(report.chapters_translated, 1);

    // Resume retries the page that failed
    let stored = catalog.get(&novel.id).expect("get").expect("exists");
    assert_eq!(stored.current_chapter, 2);
    assert_eq!(stored.current_url, "https://example.com/ch-2");
}

#[tokio::test]
async fn test_run_oneBatchTranslationFails_shouldKeepOriginalTextAndSucceed() {
    let output = tempfile::tempdir().expect("tempdir");
    let catalog = Arc::new(MemoryCatalog::new());
    let novel = sample_novel(&catalog, output.path(), 3);

    let fetcher = ScriptedFetcher::chain("https://example.com", 3);
    // Each chapter is one batch; the second translate call fails
    let orchestrator = orchestrator(fetcher, MockEngine::fail_on_call(2), catalog.clone());

    let report = orchestrator.run(&novel.id, Arc::new(NullSink)).await;

    assert_eq!(report.outcome, RunOutcome::Success, "batch failure is masked");

    let document =
        fs::read_to_string(report.artifact.expect("artifact path")).expect("readable");
    assert!(document.contains("[pt] Chapter 1 body. It has two sentences."));
    // The failed batch's original content is kept verbatim, not dropped
    assert!(document.contains("Chapter 2 body. It has two sentences."));
    assert!(!document.contains("[pt] Chapter 2 body."));
    assert!(document.contains("[pt] Chapter 3 body. It has two sentences."));
}

#[tokio::test]
async fn test_run_engineCompletelyDown_shouldStillProduceArtifact() {
    let output = tempfile::tempdir().expect("tempdir");
    let catalog = Arc::new(MemoryCatalog::new());
    let novel = sample_novel(&catalog, output.path(), 2);

    let fetcher = ScriptedFetcher::chain("https://example.com", 2);
    let orchestrator = orchestrator(fetcher, MockEngine::failing(), catalog.clone());

    let report = orchestrator.run(&novel.id, Arc::new(NullSink)).await;

    // Translation failures are masked per batch; the run itself succeeds
    assert_eq!(report.outcome, RunOutcome::Success);
    let document =
        fs::read_to_string(report.artifact.expect("artifact path")).expect("readable");
    assert!(document.contains("Chapter 1 body. It has two sentences."));
    assert!(document.contains("Chapter 2 body. It has two sentences."));
}

#[tokio::test]
async fn test_run_smallEngineCharCeiling_shouldSplitChaptersIntoMoreRequests() {
    let output = tempfile::tempdir().expect("tempdir");
    let catalog = Arc::new(MemoryCatalog::new());
    let novel = sample_novel(&catalog, output.path(), 1);

    // Each scripted chapter holds two sentences; a 20-char ceiling
    // forces one translate call per sentence instead of one per chapter
    let engine = Arc::new(MockEngine::working_with_max_chars(20));
    let orchestrator = Orchestrator::new(
        Arc::new(ScriptedFetcher::chain("https://example.com", 1)),
        engine.clone(),
        catalog.clone(),
    );

    let report = orchestrator.run(&novel.id, Arc::new(NullSink)).await;

    assert_eq!(report.outcome, RunOutcome::Success);
    assert_eq!(engine.call_count(), 2);

    let document =
        fs::read_to_string(report.artifact.expect("artifact path")).expect("readable");
    assert!(document.contains("[pt] Chapter 1 body. [pt] It has two sentences."));
}

#[tokio::test]
async fn test_run_allChaptersBlank_shouldFailAtTranslateStage() {
    let output = tempfile::tempdir().expect("tempdir");
    let catalog = Arc::new(MemoryCatalog::new());
    let novel = sample_novel(&catalog, output.path(), 1);

    let fetcher = ScriptedFetcher::new(vec![(
        "https://example.com/ch-1",
        ScriptedPage {
            text: "   \n  ".to_string(),
            next_url: None,
        },
    )]);
    let orchestrator = orchestrator(fetcher, MockEngine::working(), catalog.clone());

    let report = orchestrator.run(&novel.id, Arc::new(NullSink)).await;

    match report.outcome {
        RunOutcome::Failure { ref stage, .. } => assert_eq!(stage, "translate"),
        ref other => panic!("expected failure, got {:?}", other),
    }

    // No catalog mutation of the cursor on failure
    let stored = catalog.get(&novel.id).expect("get").expect("exists");
    assert_eq!(stored.current_chapter, 1);
}

#[tokio::test]
async fn test_run_progressEvents_shouldBeMonotonicAndTerminal() {
    let output = tempfile::tempdir().expect("tempdir");
    let catalog = Arc::new(MemoryCatalog::new());
    let novel = sample_novel(&catalog, output.path(), 3);

    let fetcher = ScriptedFetcher::chain("https://example.com", 3);
    let orchestrator = orchestrator(fetcher, MockEngine::working(), catalog.clone());

    let sink = RecordingSink::new();
    let report = orchestrator.run(&novel.id, sink.clone()).await;

    assert_eq!(report.outcome, RunOutcome::Success);
    sink.assert_monotonic();

    let events = sink.events();
    let last = events.last().expect("at least one event");
    assert_eq!(last.0, 100, "a successful run terminates at 100");
}

#[tokio::test]
async fn test_run_anyOutcome_shouldLeaveNoScratchStorageBehind() {
    let scratch_dirs = || -> HashSet<PathBuf> {
        fs::read_dir(std::env::temp_dir())
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .map(|e| e.path())
                    .filter(|p| {
                        p.file_name()
                            .and_then(|n| n.to_str())
                            .is_some_and(|n| n.starts_with("noveltr_"))
                    })
                    .collect()
            })
            .unwrap_or_default()
    };

    let before = scratch_dirs();

    let output = tempfile::tempdir().expect("tempdir");
    let catalog = Arc::new(MemoryCatalog::new());
    let ok_novel = sample_novel(&catalog, output.path(), 2);
    let orchestrator = Orchestrator::new(
        Arc::new(ScriptedFetcher::chain("https://example.com", 2)),
        Arc::new(MockEngine::working()),
        catalog.clone(),
    );
    orchestrator.run(&ok_novel.id, Arc::new(NullSink)).await;

    // A failed run must release scratch too
    let bad_novel = sample_novel(&catalog, output.path(), 2);
    let failing = Orchestrator::new(
        Arc::new(ScriptedFetcher::new(vec![])),
        Arc::new(MockEngine::working()),
        catalog.clone(),
    );
    failing.run(&bad_novel.id, Arc::new(NullSink)).await;

    // Other tests may have runs in flight; give their scratch dirs a
    // moment to drain before deciding anything leaked
    for _ in 0..20 {
        if scratch_dirs().difference(&before).next().is_none() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    let leaked: Vec<PathBuf> = scratch_dirs().difference(&before).cloned().collect();
    assert!(leaked.is_empty(), "scratch storage leaked: {:?}", leaked);
}

#[tokio::test]
async fn test_run_unknownNovelId_shouldFailAtCatalogStage() {
    let catalog = Arc::new(MemoryCatalog::new());
    let orchestrator = Orchestrator::new(
        Arc::new(ScriptedFetcher::new(vec![])),
        Arc::new(MockEngine::working()),
        catalog,
    );

    let report = orchestrator.run("no-such-id", Arc::new(NullSink)).await;

    match report.outcome {
        RunOutcome::Failure { ref stage, .. } => assert_eq!(stage, "catalog"),
        ref other => panic!("expected failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_run_twoConsecutiveRuns_shouldResumeWhereLastStopped() {
    let output = tempfile::tempdir().expect("tempdir");
    let catalog = Arc::new(MemoryCatalog::new());
    let novel = sample_novel(&catalog, output.path(), 2);

    // Five published chapters, two runs of two
    let first = Orchestrator::new(
        Arc::new(ScriptedFetcher::chain("https://example.com", 5)),
        Arc::new(MockEngine::working()),
        catalog.clone(),
    );
    let report = first.run(&novel.id, Arc::new(NullSink)).await;
    assert_eq!(report.outcome, RunOutcome::Success);
    assert_eq!(report.resume_chapter, 3);

    let second = Orchestrator::new(
        Arc::new(ScriptedFetcher::chain("https://example.com", 5)),
        Arc::new(MockEngine::working()),
        catalog.clone(),
    );
    let report = second.run(&novel.id, Arc::new(NullSink)).await;
    assert_eq!(report.outcome, RunOutcome::Success);

    let artifact = report.artifact.expect("artifact path");
    assert_eq!(
        artifact.file_name().and_then(|n| n.to_str()),
        Some("Test_Novel_cap3-4.md")
    );

    let stored = catalog.get(&novel.id).expect("get").expect("exists");
    assert_eq!(stored.current_chapter, 5);
    assert_eq!(stored.current_url, "https://example.com/ch-5");
}
