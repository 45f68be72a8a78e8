//! Concurrent trap dispatch.
//!
//! A [`Dispatcher`] launches `count` independent send tasks one after
//! another, optionally pausing between launches, while a
//! [`ResultCollector`] gathers their reports. Outstanding tasks are bounded
//! by a semaphore, so a large count never means unbounded open sockets.
//!
//! # Example
//!
//! ```rust
//! use async_trapgen::dispatch::{DispatchPlan, Dispatcher};
//! use async_trapgen::transport::MockConnector;
//! use async_trapgen::{SenderConfig, TrapDefinition, TrapSender};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let parsed = TrapDefinition::parse_str("Enterprise => 1.3.6.1.4.1.9\n");
//! let sender = TrapSender::with_connector(&SenderConfig::default(), MockConnector::new());
//! let plan = DispatchPlan { count: 3, ..Default::default() };
//!
//! let batch = Dispatcher::new(sender, plan)
//!     .run(Arc::new(parsed.definition), |report| println!("{:?}", report))
//!     .await;
//! assert_eq!(batch.successes(), 3);
//! # }
//! ```

mod collector;
mod report;

pub use collector::ResultCollector;
pub use report::{BatchReport, DispatchEvent, TaskReport};

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc};
use tracing::Instrument;

use crate::definition::TrapDefinition;
use crate::sender::{DispatchOutcome, SendStage, TrapSender};
use crate::transport::{Connector, UdpConnector};
use report::ReportGuard;

/// Default bound on concurrently outstanding sends.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 256;

/// What to launch and how fast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchPlan {
    /// Number of traps to send.
    pub count: usize,
    /// Pause between successive launches (not after the last one).
    pub launch_interval: Duration,
    /// Maximum tasks in flight at once; `None` or `Some(0)` means unbounded.
    pub max_in_flight: Option<usize>,
}

impl Default for DispatchPlan {
    fn default() -> Self {
        Self {
            count: 1,
            launch_interval: Duration::ZERO,
            max_in_flight: Some(DEFAULT_MAX_IN_FLIGHT),
        }
    }
}

/// Launches a batch of send tasks and collects their outcomes.
pub struct Dispatcher<C: Connector = UdpConnector> {
    sender: Arc<TrapSender<C>>,
    plan: DispatchPlan,
}

impl<C: Connector> Dispatcher<C> {
    /// Create a dispatcher for `plan` using `sender` for every task.
    pub fn new(sender: TrapSender<C>, plan: DispatchPlan) -> Self {
        Self {
            sender: Arc::new(sender),
            plan,
        }
    }

    /// The plan this dispatcher runs.
    pub fn plan(&self) -> &DispatchPlan {
        &self.plan
    }

    /// Run the batch.
    ///
    /// Returns once every launched task has reported. `on_report` is called
    /// for each report as it arrives, in completion order.
    pub async fn run<F>(&self, definition: Arc<TrapDefinition>, mut on_report: F) -> BatchReport
    where
        F: FnMut(&TaskReport),
    {
        self.run_with_events(definition, |event| {
            if let DispatchEvent::Reported(report) = event {
                on_report(report);
            }
        })
        .await
    }

    /// Run the batch, observing launches as well as reports.
    ///
    /// `on_event` sees a [`DispatchEvent::Launched`] as each task is spawned
    /// and a [`DispatchEvent::Reported`] as each one finishes.
    pub async fn run_with_events<F>(
        &self,
        definition: Arc<TrapDefinition>,
        on_event: F,
    ) -> BatchReport
    where
        F: FnMut(&DispatchEvent),
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let collector = ResultCollector::new(self.plan.count, rx);

        tracing::debug!(
            target: "async_trapgen::dispatch",
            count = self.plan.count,
            interval_ms = self.plan.launch_interval.as_millis() as u64,
            max_in_flight = ?self.plan.max_in_flight,
            "starting dispatch"
        );

        let ((), batch) = tokio::join!(self.launch(definition, tx), collector.collect(on_event));

        tracing::debug!(
            target: "async_trapgen::dispatch",
            successes = batch.successes(),
            failures = batch.failures(),
            elapsed_ms = batch.elapsed.as_millis() as u64,
            "dispatch complete"
        );
        batch
    }

    async fn launch(
        &self,
        definition: Arc<TrapDefinition>,
        tx: mpsc::UnboundedSender<DispatchEvent>,
    ) {
        let limit = self
            .plan
            .max_in_flight
            .filter(|&n| n > 0)
            .map(|n| Arc::new(Semaphore::new(n.min(Semaphore::MAX_PERMITS))));

        for task in 0..self.plan.count {
            if task > 0 && !self.plan.launch_interval.is_zero() {
                tokio::time::sleep(self.plan.launch_interval).await;
            }

            let mut guard = ReportGuard::new(task, tx.clone());

            let permit = match &limit {
                Some(sem) => match Arc::clone(sem).acquire_owned().await {
                    Ok(permit) => Some(permit),
                    Err(_) => {
                        guard.report(DispatchOutcome::Failure {
                            stage: SendStage::Aborted,
                            reason: "concurrency limiter closed".into(),
                        });
                        continue;
                    }
                },
                None => None,
            };

            tracing::trace!(target: "async_trapgen::dispatch", { snmp.task = task }, "launching send task");
            guard.launched();

            let sender = Arc::clone(&self.sender);
            let definition = Arc::clone(&definition);
            let span = tracing::debug_span!(target: "async_trapgen::dispatch", "send_task", snmp.task = task);

            tokio::spawn(
                async move {
                    let _permit = permit;
                    guard.start();
                    let outcome = sender.send(&definition).await;
                    guard.report(outcome);
                }
                .instrument(span),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sender::SenderConfig;
    use crate::transport::MockConnector;

    fn definition() -> Arc<TrapDefinition> {
        let text = "Enterprise => 1.3.6.1.4.1.9\nGeneric => 6\nSpecific => 1\nVarbinds\n1.3.6.1.4.1.9.9.1 => hello\n";
        Arc::new(TrapDefinition::parse_str(text).definition)
    }

    fn dispatcher(mock: &MockConnector, plan: DispatchPlan) -> Dispatcher<MockConnector> {
        Dispatcher::new(
            TrapSender::with_connector(&SenderConfig::default(), mock.clone()),
            plan,
        )
    }

    #[test]
    fn test_plan_defaults() {
        let plan = DispatchPlan::default();
        assert_eq!(plan.count, 1);
        assert_eq!(plan.launch_interval, Duration::ZERO);
        assert_eq!(plan.max_in_flight, Some(DEFAULT_MAX_IN_FLIGHT));
    }

    #[tokio::test]
    async fn test_every_task_reports_once() {
        let mock = MockConnector::new();
        let plan = DispatchPlan {
            count: 10,
            ..Default::default()
        };

        let mut seen = Vec::new();
        let batch = dispatcher(&mock, plan)
            .run(definition(), |r| seen.push(r.task))
            .await;

        seen.sort_unstable();
        assert_eq!(seen, (0..10).collect::<Vec<_>>());
        assert_eq!(batch.successes(), 10);
        assert_eq!(mock.sent().len(), 10);
    }

    #[tokio::test]
    async fn test_zero_count() {
        let mock = MockConnector::new();
        let plan = DispatchPlan {
            count: 0,
            launch_interval: Duration::from_secs(10),
            ..Default::default()
        };
        let batch = dispatcher(&mock, plan).run(definition(), |_| {}).await;
        assert!(batch.reports.is_empty());
        assert_eq!(mock.connect_attempts(), 0);
    }

    #[tokio::test]
    async fn test_semaphore_bounds_in_flight() {
        let mock = MockConnector::new();
        mock.set_send_delay(Duration::from_millis(20));
        let plan = DispatchPlan {
            count: 12,
            launch_interval: Duration::ZERO,
            max_in_flight: Some(3),
        };

        let batch = dispatcher(&mock, plan).run(definition(), |_| {}).await;
        assert_eq!(batch.successes(), 12);
        assert!(mock.max_in_flight() <= 3);
    }

    #[tokio::test]
    async fn test_zero_limit_is_unbounded() {
        let mock = MockConnector::new();
        mock.set_send_delay(Duration::from_millis(20));
        let plan = DispatchPlan {
            count: 6,
            launch_interval: Duration::ZERO,
            max_in_flight: Some(0),
        };

        let batch = dispatcher(&mock, plan).run(definition(), |_| {}).await;
        assert_eq!(batch.successes(), 6);
        assert_eq!(mock.max_in_flight(), 6);
    }

    #[tokio::test]
    async fn test_each_launch_precedes_its_report() {
        let mock = MockConnector::new();
        let plan = DispatchPlan {
            count: 4,
            ..Default::default()
        };

        let mut launched = Vec::new();
        let mut reported_before_launch = false;
        let batch = dispatcher(&mock, plan)
            .run_with_events(definition(), |event| match event {
                DispatchEvent::Launched { task } => launched.push(*task),
                DispatchEvent::Reported(r) => {
                    reported_before_launch |= !launched.contains(&r.task);
                }
            })
            .await;

        assert_eq!(launched, vec![0, 1, 2, 3]);
        assert!(!reported_before_launch);
        assert_eq!(batch.successes(), 4);
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_batch() {
        let mock = MockConnector::new();
        mock.fail_all_connects("host unreachable");
        let plan = DispatchPlan {
            count: 3,
            ..Default::default()
        };

        let batch = dispatcher(&mock, plan).run(definition(), |_| {}).await;
        assert_eq!(batch.reports.len(), 3);
        assert_eq!(batch.failures(), 3);
    }
}
