//! Progress reporting for long-running query passes.

use tracing::{debug, info};

/// Receives progress from a query pass. The pass calls `advance` once per
/// processed batch and `close` once when it is done.
pub trait ProgressSink {
    fn advance(&mut self, n: usize);
    fn close(&mut self);
}

/// Reports progress through the tracing subscriber.
#[derive(Debug, Clone)]
pub struct LogProgress {
    label: String,
    total: usize,
    done: usize,
}

impl LogProgress {
    pub fn new(label: impl Into<String>, total: usize) -> Self {
        Self {
            label: label.into(),
            total,
            done: 0,
        }
    }

    pub fn done(&self) -> usize {
        self.done
    }
}

impl ProgressSink for LogProgress {
    fn advance(&mut self, n: usize) {
        self.done += n;
        debug!(label = %self.label, done = self.done, total = self.total, "progress");
    }

    fn close(&mut self) {
        info!(label = %self.label, done = self.done, "finished");
    }
}
