//! Per-task and per-batch reports.

use std::time::{Duration, Instant};

use tokio::sync::mpsc::UnboundedSender;

use crate::sender::{DispatchOutcome, SendStage};

/// Outcome of one launched task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReport {
    /// Launch index, starting at 0.
    pub task: usize,
    /// What happened.
    pub outcome: DispatchOutcome,
    /// Time from task start to report.
    pub latency: Duration,
}

/// Everything a batch produced, in completion order.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Number of tasks launched.
    pub expected: usize,
    /// Reports in the order they arrived.
    pub reports: Vec<TaskReport>,
    /// Wall-clock time for the whole batch.
    pub elapsed: Duration,
}

impl BatchReport {
    /// Number of successful sends.
    pub fn successes(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| r.outcome.is_success())
            .count()
    }

    /// Number of failed sends.
    pub fn failures(&self) -> usize {
        self.reports.len() - self.successes()
    }

    /// Whether every launched task reported.
    pub fn is_complete(&self) -> bool {
        self.reports.len() == self.expected
    }
}

/// Progress of a batch, in the order the collector sees it.
///
/// A task's `Launched` event always arrives before its `Reported` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchEvent {
    /// Task `task` was spawned.
    Launched { task: usize },
    /// A task finished.
    Reported(TaskReport),
}

/// Delivers exactly one report for a task.
///
/// If the task ends without calling [`report`](Self::report), dropping the
/// guard sends an [`SendStage::Aborted`] failure instead.
pub(crate) struct ReportGuard {
    task: usize,
    started: Instant,
    tx: Option<UnboundedSender<DispatchEvent>>,
}

impl ReportGuard {
    pub(crate) fn new(task: usize, tx: UnboundedSender<DispatchEvent>) -> Self {
        Self {
            task,
            started: Instant::now(),
            tx: Some(tx),
        }
    }

    /// Restart the latency clock, e.g. once the task actually begins.
    pub(crate) fn start(&mut self) {
        self.started = Instant::now();
    }

    /// Announce that the task has been spawned.
    pub(crate) fn launched(&self) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(DispatchEvent::Launched { task: self.task });
        }
    }

    pub(crate) fn report(mut self, outcome: DispatchOutcome) {
        self.deliver(outcome);
    }

    fn deliver(&mut self, outcome: DispatchOutcome) {
        if let Some(tx) = self.tx.take() {
            let report = TaskReport {
                task: self.task,
                outcome,
                latency: self.started.elapsed(),
            };
            // Receiver gone means nobody is waiting any more
            let _ = tx.send(DispatchEvent::Reported(report));
        }
    }
}

impl Drop for ReportGuard {
    fn drop(&mut self) {
        if self.tx.is_some() {
            tracing::warn!(target: "async_trapgen::dispatch", { snmp.task = self.task }, "send task ended without reporting");
            self.deliver(DispatchOutcome::Failure {
                stage: SendStage::Aborted,
                reason: "task ended before reporting".into(),
            });
        }
    }
}
