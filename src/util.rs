//! Internal utilities.

use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;

/// Create a UDP socket on an ephemeral port matching the target's address family.
///
/// For IPv6 targets the socket is bound to `[::]:0` with `IPV6_V6ONLY = true`,
/// so it never picks up IPv4-mapped traffic.
pub(crate) fn bind_ephemeral_udp_socket(target: SocketAddr) -> io::Result<UdpSocket> {
    let (domain, bind_addr) = if target.is_ipv6() {
        (
            Domain::IPV6,
            SocketAddr::new(Ipv6Addr::UNSPECIFIED.into(), 0),
        )
    } else {
        (
            Domain::IPV4,
            SocketAddr::new(Ipv4Addr::UNSPECIFIED.into(), 0),
        )
    };

    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;

    if target.is_ipv6() {
        socket.set_only_v6(true)?;
    }

    // Set non-blocking before converting to tokio socket
    socket.set_nonblocking(true)?;

    socket.bind(&bind_addr.into())?;

    UdpSocket::from_std(socket.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_ephemeral_ipv4() {
        let target: SocketAddr = "127.0.0.1:162".parse().unwrap();
        let socket = bind_ephemeral_udp_socket(target).unwrap();
        let local = socket.local_addr().unwrap();
        assert!(local.is_ipv4());
        assert_ne!(local.port(), 0);
    }

    #[tokio::test]
    async fn test_bind_ephemeral_ipv6() {
        let target: SocketAddr = "[::1]:162".parse().unwrap();
        let socket = bind_ephemeral_udp_socket(target).unwrap();
        let local = socket.local_addr().unwrap();
        assert!(local.is_ipv6());
        assert_ne!(local.port(), 0);
    }
}
