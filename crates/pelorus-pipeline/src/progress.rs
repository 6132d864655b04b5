//! Progress sink implementations
//!
//! The pipeline emits checkpoint events through the `ProgressSink` trait.
//! All implementations here are non-blocking: a slow or absent consumer
//! costs dropped events, never a stalled request.

use pelorus_domain::traits::ProgressSink;
use pelorus_domain::ProgressEvent;
use std::sync::Mutex;
use tokio::sync::mpsc;
use tracing::trace;

/// Sink that discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn emit(&self, _event: ProgressEvent) {}
}

/// Bounded-channel sink for asynchronous consumers
///
/// Events flow through a bounded `tokio` channel consumed by the
/// presentation layer at its own pace. When the channel is full the
/// event is dropped, keeping the pipeline decoupled from consumer speed.
pub struct ChannelSink {
    tx: mpsc::Sender<ProgressEvent>,
}

impl ChannelSink {
    /// Create a sink and its receiving half with the given capacity
    pub fn bounded(capacity: usize) -> (Self, mpsc::Receiver<ProgressEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

impl ProgressSink for ChannelSink {
    fn emit(&self, event: ProgressEvent) {
        if let Err(e) = self.tx.try_send(event) {
            trace!("progress event dropped: {}", e);
        }
    }
}

/// Sink that records every event, for tests
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Mutex<Vec<ProgressEvent>>,
}

impl CollectingSink {
    /// Create an empty collecting sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events seen so far
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ProgressSink for CollectingSink {
    fn emit(&self, event: ProgressEvent) {
        self.events.lock().unwrap().push(event);
    }
}
