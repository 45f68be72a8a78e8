//! UDP transport implementation.

use super::{Connector, Transport};
use crate::error::{Error, Result};
use crate::util::bind_ephemeral_udp_socket;
use std::net::SocketAddr;
use tokio::net::UdpSocket;

/// Connector producing [`UdpTransport`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct UdpConnector;

impl Connector for UdpConnector {
    type Transport = UdpTransport;

    async fn connect(&self, target: SocketAddr) -> Result<UdpTransport> {
        UdpTransport::connect(target).await
    }
}

/// UDP transport for a single target.
///
/// Owns a connected UDP socket; dropping the transport closes it.
pub struct UdpTransport {
    socket: UdpSocket,
    target: SocketAddr,
    local_addr: SocketAddr,
}

impl UdpTransport {
    /// Connect to a target address.
    ///
    /// Creates an ephemeral UDP socket bound to the appropriate address family.
    pub async fn connect(target: SocketAddr) -> Result<Self> {
        tracing::debug!(target: "async_trapgen::transport", { snmp.target = %target }, "connecting UDP transport");

        let socket = bind_ephemeral_udp_socket(target).map_err(|e| Error::Io {
            target: Some(target),
            source: e,
        })?;

        socket.connect(target).await.map_err(|e| Error::Io {
            target: Some(target),
            source: e,
        })?;

        let local_addr = socket.local_addr().map_err(|e| Error::Io {
            target: Some(target),
            source: e,
        })?;

        tracing::debug!(
            target: "async_trapgen::transport",
            { snmp.target = %target, snmp.local_addr = %local_addr },
            "UDP transport connected"
        );

        Ok(Self {
            socket,
            target,
            local_addr,
        })
    }
}

impl Transport for UdpTransport {
    async fn send(&self, data: &[u8]) -> Result<()> {
        tracing::trace!(
            target: "async_trapgen::transport",
            { snmp.target = %self.target, snmp.bytes = data.len() },
            "UDP send"
        );
        self.socket.send(data).await.map_err(|e| Error::Io {
            target: Some(self.target),
            source: e,
        })?;
        Ok(())
    }

    fn peer_addr(&self) -> SocketAddr {
        self.target
    }

    fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_udp_transport_delivers_datagram() {
        let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let target = receiver.local_addr().unwrap();

        let transport = UdpConnector.connect(target).await.unwrap();
        assert_eq!(transport.peer_addr(), target);
        assert!(transport.local_addr().is_ipv4());

        transport.send(b"trap").await.unwrap();

        let mut buf = [0u8; 16];
        let (len, from) = receiver.recv_from(&mut buf).await.unwrap();
        assert_eq!(&buf[..len], b"trap");
        assert_eq!(from.port(), transport.local_addr().port());
    }
}
