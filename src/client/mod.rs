//! SNMPv1 trap client.
//!
//! A [`TrapClient`] holds the per-sender configuration (target, port,
//! community) and opens one [`TrapConnection`] per send through its
//! [`Connector`].

mod builder;

pub use builder::TrapClientBuilder;

use crate::definition::TrapDefinition;
use crate::error::{Error, Result};
use crate::message::{MAX_MESSAGE_SIZE, TrapMessage};
use crate::pdu::TrapV1Pdu;
use crate::transport::{Connector, Transport, UdpConnector};
use crate::version::Version;
use bytes::Bytes;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;

/// Standard SNMP trap port.
pub const DEFAULT_TRAP_PORT: u16 = 162;

/// Client configuration.
///
/// Most users should use [`TrapClientBuilder`] rather than constructing this directly.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Receiver host name or IP address, without port.
    pub target: String,
    /// Receiver UDP port (default: 162)
    pub port: u16,
    /// SNMP version (always V1)
    pub version: Version,
    /// Community string (default: "public")
    pub community: Bytes,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            target: "127.0.0.1".into(),
            port: DEFAULT_TRAP_PORT,
            version: Version::V1,
            community: Bytes::from_static(b"public"),
        }
    }
}

/// SNMPv1 trap client.
///
/// Generic over the connector, with [`UdpConnector`] as default. Cloning is
/// cheap and clones share configuration and uptime epoch.
pub struct TrapClient<C: Connector = UdpConnector> {
    inner: Arc<ClientInner<C>>,
}

struct ClientInner<C> {
    connector: C,
    config: ClientConfig,
    /// Reference point for the trap time-stamp.
    epoch: Instant,
}

impl<C: Connector> Clone for TrapClient<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl TrapClient<UdpConnector> {
    /// Start building an SNMPv1 trap client for `target` (host or IP, no port).
    ///
    /// # Example
    ///
    /// ```rust
    /// use async_trapgen::TrapClient;
    ///
    /// let client = TrapClient::v1("127.0.0.1")
    ///     .port(10162)
    ///     .community(b"private")
    ///     .build();
    /// assert_eq!(client.config().port, 10162);
    /// ```
    pub fn v1(target: impl Into<String>) -> TrapClientBuilder<UdpConnector> {
        TrapClientBuilder::new(target)
    }
}

impl<C: Connector> TrapClient<C> {
    /// Create a client from a connector and config.
    pub fn new(connector: C, config: ClientConfig) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                connector,
                config,
                epoch: Instant::now(),
            }),
        }
    }

    /// Client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Resolve the configured target and port to a socket address.
    ///
    /// IP literals are used as is; host names go through the system resolver
    /// and the first address returned wins.
    pub async fn resolve(&self) -> Result<SocketAddr> {
        let config = &self.inner.config;

        if let Ok(ip) = config.target.parse::<IpAddr>() {
            return Ok(SocketAddr::new(ip, config.port));
        }

        let display = format!("{}:{}", config.target, config.port);
        let mut addrs = tokio::net::lookup_host((config.target.as_str(), config.port))
            .await
            .map_err(|e| Error::Resolve {
                target: display.clone(),
                source: Some(e),
            })?;

        addrs.next().ok_or(Error::Resolve {
            target: display,
            source: None,
        })
    }

    /// Open a connection to an already resolved address.
    pub async fn connect_to(&self, addr: SocketAddr) -> Result<TrapConnection<C::Transport>> {
        let transport = self.inner.connector.connect(addr).await?;
        Ok(TrapConnection {
            transport,
            version: self.inner.config.version,
            community: self.inner.config.community.clone(),
            epoch: self.inner.epoch,
        })
    }

    /// Resolve the target and open a connection to it.
    pub async fn connect(&self) -> Result<TrapConnection<C::Transport>> {
        let addr = self.resolve().await?;
        self.connect_to(addr).await
    }
}

/// One open connection to a trap receiver.
///
/// Dropping the connection releases its transport; [`close`](Self::close)
/// makes that explicit at call sites.
pub struct TrapConnection<T: Transport> {
    transport: T,
    version: Version,
    community: Bytes,
    epoch: Instant,
}

impl<T: Transport> TrapConnection<T> {
    /// The receiver address.
    pub fn peer_addr(&self) -> SocketAddr {
        self.transport.peer_addr()
    }

    /// The local address traps are sent from.
    pub fn local_addr(&self) -> SocketAddr {
        self.transport.local_addr()
    }

    /// Hundredths of a second since the owning client was created.
    fn uptime_ticks(&self) -> u32 {
        // TimeTicks wraps at 2^32, as sysUpTime does
        (self.epoch.elapsed().as_millis() / 10) as u32
    }

    /// Encode a trap message for `definition` without sending it.
    pub fn encode_trap(&self, definition: &TrapDefinition) -> Result<Bytes> {
        let pdu = TrapV1Pdu::from_definition(definition, self.uptime_ticks())?;
        let message = TrapMessage {
            version: self.version,
            community: self.community.clone(),
            pdu,
        };
        let data = message.encode();

        if data.len() > MAX_MESSAGE_SIZE {
            return Err(Error::MessageTooLarge {
                size: data.len(),
                max: MAX_MESSAGE_SIZE,
            });
        }
        Ok(data)
    }

    /// Send an already encoded message.
    #[instrument(
        level = "debug",
        skip(self, data),
        fields(snmp.target = %self.peer_addr(), snmp.bytes = data.len())
    )]
    pub async fn send_encoded(&self, data: &[u8]) -> Result<()> {
        self.transport.send(data).await
    }

    /// Encode and send a trap for `definition`.
    pub async fn send_trap(&self, definition: &TrapDefinition) -> Result<()> {
        let data = self.encode_trap(definition)?;
        self.send_encoded(&data).await
    }

    /// Close the connection.
    pub fn close(self) {
        tracing::trace!(target: "async_trapgen::client", { snmp.target = %self.peer_addr() }, "closing connection");
    }
}
