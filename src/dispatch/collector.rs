//! Gathers exactly one report per launched task.

use std::time::Instant;

use tokio::sync::mpsc::UnboundedReceiver;

use super::report::{BatchReport, DispatchEvent};

/// Waits for `expected` task reports, in whatever order they complete.
pub struct ResultCollector {
    expected: usize,
    rx: UnboundedReceiver<DispatchEvent>,
    started: Instant,
}

impl ResultCollector {
    /// Create a collector; the batch clock starts now.
    pub fn new(expected: usize, rx: UnboundedReceiver<DispatchEvent>) -> Self {
        Self {
            expected,
            rx,
            started: Instant::now(),
        }
    }

    /// Receive reports until `expected` have arrived.
    ///
    /// `on_event` sees every launch and report as it arrives. Launches do
    /// not count towards `expected`. Returns early, with an incomplete
    /// batch, only if every sender is gone first.
    pub async fn collect<F>(mut self, mut on_event: F) -> BatchReport
    where
        F: FnMut(&DispatchEvent),
    {
        let mut reports = Vec::with_capacity(self.expected.min(4096));

        while reports.len() < self.expected {
            match self.rx.recv().await {
                Some(event) => {
                    on_event(&event);
                    if let DispatchEvent::Reported(report) = event {
                        reports.push(report);
                    }
                }
                None => {
                    tracing::warn!(
                        target: "async_trapgen::dispatch",
                        expected = self.expected,
                        received = reports.len(),
                        "report channel closed before batch completed"
                    );
                    break;
                }
            }
        }

        BatchReport {
            expected: self.expected,
            reports,
            elapsed: self.started.elapsed(),
        }
    }
}
