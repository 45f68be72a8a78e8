//! Builder for trap clients.
//!
//! # Examples
//!
//! ```rust
//! # use async_trapgen::TrapClient;
//! # use async_trapgen::transport::MockConnector;
//! let client = TrapClient::v1("192.0.2.1")
//!     .community(b"public")
//!     .connector(MockConnector::new())
//!     .build();
//! assert_eq!(client.config().port, 162);
//! ```

use bytes::Bytes;

use crate::transport::{Connector, UdpConnector};
use crate::version::Version;

use super::{ClientConfig, DEFAULT_TRAP_PORT, TrapClient};

/// Builder for SNMPv1 trap clients.
///
/// Created via [`TrapClient::v1()`].
pub struct TrapClientBuilder<C: Connector = UdpConnector> {
    target: String,
    port: u16,
    community: Bytes,
    connector: C,
}

impl TrapClientBuilder<UdpConnector> {
    pub(crate) fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            port: DEFAULT_TRAP_PORT,
            community: Bytes::from_static(b"public"),
            connector: UdpConnector,
        }
    }
}

impl<C: Connector> TrapClientBuilder<C> {
    /// Set the receiver port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the community string.
    pub fn community(mut self, community: &[u8]) -> Self {
        self.community = Bytes::copy_from_slice(community);
        self
    }

    /// Use a different connector, e.g. a mock for tests.
    pub fn connector<D: Connector>(self, connector: D) -> TrapClientBuilder<D> {
        TrapClientBuilder {
            target: self.target,
            port: self.port,
            community: self.community,
            connector,
        }
    }

    /// Build the client. No network activity happens until a connect.
    pub fn build(self) -> TrapClient<C> {
        let config = ClientConfig {
            target: self.target,
            port: self.port,
            version: Version::V1,
            community: self.community,
        };
        TrapClient::new(self.connector, config)
    }
}
