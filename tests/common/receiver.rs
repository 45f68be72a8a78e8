//! Loopback trap receiver for end-to-end tests.

use std::net::SocketAddr;
use std::time::Duration;

use bytes::Bytes;
use tokio::net::UdpSocket;

/// UDP socket on an ephemeral loopback port that records raw trap datagrams.
pub struct TrapReceiver {
    socket: UdpSocket,
}

impl TrapReceiver {
    pub async fn bind() -> Self {
        let socket = UdpSocket::bind("127.0.0.1:0")
            .await
            .expect("bind receiver");
        Self { socket }
    }

    pub fn addr(&self) -> SocketAddr {
        self.socket.local_addr().expect("receiver local addr")
    }

    pub fn port(&self) -> u16 {
        self.addr().port()
    }

    /// Receive up to `count` datagrams, giving up after `wait` of silence.
    pub async fn receive(&self, count: usize, wait: Duration) -> Vec<Bytes> {
        let mut datagrams = Vec::with_capacity(count);
        let mut buf = vec![0u8; 65_535];

        while datagrams.len() < count {
            match tokio::time::timeout(wait, self.socket.recv_from(&mut buf)).await {
                Ok(Ok((len, _from))) => datagrams.push(Bytes::copy_from_slice(&buf[..len])),
                Ok(Err(e)) => panic!("receiver error: {}", e),
                Err(_) => break,
            }
        }
        datagrams
    }
}
