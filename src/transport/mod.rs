//! Transport layer abstraction.
//!
//! A [`Connector`] opens one [`Transport`] per trap send. Traps are
//! unconfirmed, so a transport only needs to push bytes at its peer.
//!
//! Implementations: [`UdpConnector`]/[`UdpTransport`] for real traffic and
//! [`MockConnector`]/[`MockTransport`] for exercising the dispatch engine
//! without a network.

mod mock;
mod udp;

pub use mock::*;
pub use udp::*;

use crate::error::Result;
use std::future::Future;
use std::net::SocketAddr;

/// Client-side transport abstraction.
pub trait Transport: Send + Sync {
    /// Send one datagram to the peer.
    fn send(&self, data: &[u8]) -> impl Future<Output = Result<()>> + Send;

    /// The peer address for this transport.
    ///
    /// Named to match [`std::net::TcpStream::peer_addr()`].
    fn peer_addr(&self) -> SocketAddr;

    /// Local bind address.
    fn local_addr(&self) -> SocketAddr;
}

/// Opens transports to a resolved target address.
///
/// Every send gets its own transport, so nothing done on one connection can
/// leak into another.
pub trait Connector: Send + Sync + 'static {
    /// Transport produced by this connector.
    type Transport: Transport + 'static;

    /// Open a transport to `target`.
    fn connect(&self, target: SocketAddr) -> impl Future<Output = Result<Self::Transport>> + Send;
}
