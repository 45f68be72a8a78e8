//! Mock transport for testing.
//!
//! Provides a programmable connector that can simulate unreachable targets,
//! failing sends and slow sends without touching the network.

use super::{Connector, Transport};
use crate::error::{Error, Result};
use bytes::Bytes;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// A scripted result for one connect or send.
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// Succeed.
    Ok,
    /// Simulate an IO error with this message.
    IoError(String),
}

/// A datagram sent through a mock transport.
#[derive(Clone, Debug)]
pub struct RecordedSend {
    /// Destination address.
    pub target: SocketAddr,
    /// Raw datagram bytes.
    pub data: Bytes,
}

/// Mock state shared between the connector and every transport it opens.
struct MockInner {
    /// Scripted connect outcomes, consumed in order.
    connects: VecDeque<MockResponse>,
    /// Scripted send outcomes, consumed in order.
    sends: VecDeque<MockResponse>,
    /// Outcome used when a queue is empty.
    default_connect: MockResponse,
    default_send: MockResponse,
    /// Delay applied to each send before it completes.
    send_delay: Duration,
    /// Successfully sent datagrams.
    sent: Vec<RecordedSend>,
    /// Connect attempts seen, successful or not.
    connect_attempts: usize,
    /// Transports closed (dropped).
    closed: usize,
}

/// Mock connector for testing trap dispatch.
///
/// Clones share state, so a test can keep one handle for assertions while the
/// dispatcher owns another.
///
/// # Example
///
/// ```rust
/// use async_trapgen::transport::MockConnector;
///
/// let mock = MockConnector::new();
/// mock.fail_all_connects("host unreachable");
/// assert!(mock.sent().is_empty());
/// ```
#[derive(Clone)]
pub struct MockConnector {
    inner: Arc<Mutex<MockInner>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl MockConnector {
    /// Create a connector whose connects and sends all succeed.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockInner {
                connects: VecDeque::new(),
                sends: VecDeque::new(),
                default_connect: MockResponse::Ok,
                default_send: MockResponse::Ok,
                send_delay: Duration::ZERO,
                sent: Vec::new(),
                connect_attempts: 0,
                closed: 0,
            })),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockInner> {
        // A panicking test thread must not hide the state from the assertions
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Queue the outcome of the next connect.
    pub fn queue_connect(&self, response: MockResponse) {
        self.lock().connects.push_back(response);
    }

    /// Queue the outcome of the next send.
    pub fn queue_send(&self, response: MockResponse) {
        self.lock().sends.push_back(response);
    }

    /// Make every connect fail, as for an unreachable target.
    pub fn fail_all_connects(&self, msg: impl Into<String>) {
        self.lock().default_connect = MockResponse::IoError(msg.into());
    }

    /// Make every send fail.
    pub fn fail_all_sends(&self, msg: impl Into<String>) {
        self.lock().default_send = MockResponse::IoError(msg.into());
    }

    /// Delay each send by `delay`, keeping the transport in flight meanwhile.
    pub fn set_send_delay(&self, delay: Duration) {
        self.lock().send_delay = delay;
    }

    /// Datagrams sent so far, in completion order.
    pub fn sent(&self) -> Vec<RecordedSend> {
        self.lock().sent.clone()
    }

    /// Number of connect attempts.
    pub fn connect_attempts(&self) -> usize {
        self.lock().connect_attempts
    }

    /// Number of transports that have been closed.
    pub fn closed(&self) -> usize {
        self.lock().closed
    }

    /// Highest number of transports open at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl Connector for MockConnector {
    type Transport = MockTransport;

    async fn connect(&self, target: SocketAddr) -> Result<MockTransport> {
        let response = {
            let mut inner = self.lock();
            inner.connect_attempts += 1;
            inner
                .connects
                .pop_front()
                .unwrap_or_else(|| inner.default_connect.clone())
        };

        if let MockResponse::IoError(msg) = response {
            return Err(Error::Io {
                target: Some(target),
                source: std::io::Error::new(std::io::ErrorKind::HostUnreachable, msg),
            });
        }

        let open = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(open, Ordering::SeqCst);

        Ok(MockTransport {
            connector: self.clone(),
            target,
            local_addr: SocketAddr::from(([127, 0, 0, 1], 40000)),
        })
    }
}

/// Transport opened by a [`MockConnector`].
pub struct MockTransport {
    connector: MockConnector,
    target: SocketAddr,
    local_addr: SocketAddr,
}

impl Transport for MockTransport {
    async fn send(&self, data: &[u8]) -> Result<()> {
        let (response, delay) = {
            let mut inner = self.connector.lock();
            let response = inner
                .sends
                .pop_front()
                .unwrap_or_else(|| inner.default_send.clone());
            (response, inner.send_delay)
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match response {
            MockResponse::Ok => {
                self.connector.lock().sent.push(RecordedSend {
                    target: self.target,
                    data: Bytes::copy_from_slice(data),
                });
                Ok(())
            }
            MockResponse::IoError(msg) => Err(Error::Io {
                target: Some(self.target),
                source: std::io::Error::other(msg),
            }),
        }
    }

    fn peer_addr(&self) -> SocketAddr {
        self.target
    }

    fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

impl Drop for MockTransport {
    fn drop(&mut self) {
        self.connector.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.connector.lock().closed += 1;
    }
}
