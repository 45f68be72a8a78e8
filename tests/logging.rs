//! Structured logging emitted while sending traps.
//!
//! Installs a trace-level subscriber for the duration of a batch and checks
//! the `snmp.*` fields come out on every layer: dispatch, sender, client and
//! transport.
//!
//! Run with: `cargo test --test logging`

mod common;

use async_trapgen::dispatch::{DispatchPlan, Dispatcher};
use async_trapgen::transport::MockConnector;
use async_trapgen::TrapSender;
use common::*;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

/// In-memory log sink shared with the subscriber.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn trace_subscriber(logs: &CapturedLogs) -> impl tracing::Subscriber + Send + Sync {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("async_trapgen=trace"))
        .with_writer(logs.clone())
        .with_ansi(false)
        .finish()
}

#[tokio::test]
async fn test_udp_batch_logs_target_fields() {
    let logs = CapturedLogs::default();
    let _guard = tracing::subscriber::set_default(trace_subscriber(&logs));

    let receiver = TrapReceiver::bind().await;
    let sender = TrapSender::new(&loopback_config(receiver.port()));
    let plan = DispatchPlan {
        count: 2,
        ..Default::default()
    };

    let batch = Dispatcher::new(sender, plan)
        .run(cisco_definition(), |_| {})
        .await;
    assert_eq!(batch.successes(), 2);
    assert_eq!(receiver.receive(2, Duration::from_secs(2)).await.len(), 2);

    let text = logs.text();
    let target = format!("snmp.target={}", receiver.addr());
    assert!(text.contains("connecting UDP transport"));
    assert!(text.contains("UDP transport connected"));
    assert!(text.contains("UDP send"));
    assert!(text.contains("closing connection"));
    assert!(text.contains(&target));
    assert!(text.contains("snmp.local_addr="));
    assert!(text.contains("snmp.bytes="));
    assert!(text.contains("launching send task"));
    assert!(text.contains("snmp.task=1"));
}

#[tokio::test]
async fn test_failed_send_logs_stage_and_target() {
    let logs = CapturedLogs::default();
    let _guard = tracing::subscriber::set_default(trace_subscriber(&logs));

    let mock = MockConnector::new();
    mock.fail_all_connects("host unreachable");
    let sender = TrapSender::with_connector(&loopback_config(10162), mock);

    let batch = Dispatcher::new(sender, DispatchPlan::default())
        .run(cisco_definition(), |_| {})
        .await;
    assert_eq!(batch.failures(), 1);

    let text = logs.text();
    assert!(text.contains("trap send failed"));
    assert!(text.contains("snmp.target=127.0.0.1"));
    assert!(text.contains("stage=connect"));
    assert!(text.contains("host unreachable"));
}
