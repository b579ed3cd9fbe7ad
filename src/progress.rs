/*!
 * Progress notification channel for pipeline runs.
 *
 * A run emits an ordered stream of `(percent, message)` events. The
 * reporter enforces that the percentage is monotonically non-decreasing
 * within one run, so a subscriber can drive a progress bar directly.
 */

use log::debug;
use parking_lot::Mutex;
use std::sync::Arc;

/// Subscriber side of the progress channel
pub trait ProgressSink: Send + Sync {
    /// Receive one progress event
    fn emit(&self, percent: u8, message: &str);
}

/// Sink that discards all events
pub struct NullSink;

impl ProgressSink for NullSink {
    fn emit(&self, _percent: u8, _message: &str) {}
}

/// Sink backed by a plain callback
pub struct CallbackSink {
    callback: Box<dyn Fn(u8, &str) + Send + Sync>,
}

impl CallbackSink {
    /// Wrap a callback as a progress sink
    pub fn new(callback: impl Fn(u8, &str) + Send + Sync + 'static) -> Self {
        Self {
            callback: Box::new(callback),
        }
    }
}

impl ProgressSink for CallbackSink {
    fn emit(&self, percent: u8, message: &str) {
        (self.callback)(percent, message);
    }
}

/// Producer side of the progress channel for one run
pub struct ProgressReporter {
    sink: Arc<dyn ProgressSink>,
    last_percent: Mutex<u8>,
}

impl ProgressReporter {
    /// Create a reporter emitting into the given sink
    pub fn new(sink: Arc<dyn ProgressSink>) -> Self {
        Self {
            sink,
            last_percent: Mutex::new(0),
        }
    }

    /// Emit a progress event, clamped so percent never decreases
    pub fn report(&self, percent: u8, message: &str) {
        let mut last = self.last_percent.lock();
        let clamped = percent.min(100).max(*last);
        *last = clamped;
        debug!("progress {}%: {}", clamped, message);
        self.sink.emit(clamped, message);
    }

    /// Emit a failure event at the current percentage
    pub fn fail(&self, message: &str) {
        let last = *self.last_percent.lock();
        debug!("progress {}% (failure): {}", last, message);
        self.sink.emit(last, message);
    }

    /// Last percentage emitted
    pub fn current(&self) -> u8 {
        *self.last_percent.lock()
    }
}
