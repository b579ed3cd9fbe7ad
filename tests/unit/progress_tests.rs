/*!
 * Tests for the progress channel
 */

use std::sync::Arc;

use noveltr::progress::ProgressReporter;

use crate::common::RecordingSink;

#[test]
fn test_reporter_increasingPercents_shouldPassThrough() {
    let sink = RecordingSink::new();
    let reporter = ProgressReporter::new(sink.clone());

    reporter.report(0, "start");
    reporter.report(30, "fetched");
    reporter.report(70, "translated");
    reporter.report(100, "done");

    let events = sink.events();
    assert_eq!(events.len(), 4);
    assert_eq!(events[0], (0, "start".to_string()));
    assert_eq!(events[3], (100, "done".to_string()));
    sink.assert_monotonic();
}

#[test]
fn test_reporter_decreasingPercent_shouldClampToLast() {
    let sink = RecordingSink::new();
    let reporter = ProgressReporter::new(sink.clone());

    reporter.report(50, "halfway");
    reporter.report(30, "stale update");

    let events = sink.events();
    assert_eq!(events[1].0, 50, "percent must never decrease");
    sink.assert_monotonic();
}

#[test]
fn test_reporter_overOneHundred_shouldCapAtHundred() {
    let sink = RecordingSink::new();
    let reporter = ProgressReporter::new(sink.clone());

    reporter.report(250, "overflow");
    assert_eq!(sink.events()[0].0, 100);
}

#[test]
fn test_reporter_fail_shouldEmitAtCurrentPercent() {
    let sink = RecordingSink::new();
    let reporter = ProgressReporter::new(sink.clone());

    reporter.report(40, "working");
    reporter.fail("boom");

    let events = sink.events();
    assert_eq!(events[1], (40, "boom".to_string()));
    assert_eq!(reporter.current(), 40);
}
