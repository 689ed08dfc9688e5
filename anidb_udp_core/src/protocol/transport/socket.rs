//! Low-level UDP socket operations
//!
//! This module provides a wrapper around Tokio's UdpSocket connected to the
//! AniDB API endpoint.

use crate::protocol::MAX_PACKET_SIZE;
use crate::protocol::error::{ProtocolError, Result};
use crate::protocol::transport::Datagram;
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use log::{debug, trace, warn};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use tokio::net::{UdpSocket, lookup_host};

/// Largest payload a UDP datagram can carry
const RECV_BUFFER_SIZE: usize = 65_507;

/// UDP transport connected to a single server
#[derive(Debug)]
pub struct UdpTransport {
    socket: UdpSocket,
}

impl UdpTransport {
    /// Resolve `server:port`, bind `local_port` and connect
    ///
    /// A `local_port` of 0 binds an ephemeral port.
    pub async fn connect(server: &str, port: u16, local_port: u16) -> Result<Self> {
        debug!("Resolving server address: {server}:{port}");
        let server_addr = lookup_host((server, port))
            .await
            .map_err(|e| {
                warn!("Failed to resolve server address '{server}': {e}");
                ProtocolError::resolve(server, e)
            })?
            .next()
            .ok_or_else(|| {
                warn!("No addresses found for '{server}'");
                ProtocolError::resolve(server, "no addresses found")
            })?;

        let bind_ip = if server_addr.is_ipv4() {
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        } else {
            IpAddr::V6(Ipv6Addr::UNSPECIFIED)
        };

        Self::bind(SocketAddr::new(bind_ip, local_port), server_addr).await
    }

    /// Bind to `bind_addr` and connect to an already resolved server
    pub async fn bind(bind_addr: SocketAddr, server_addr: SocketAddr) -> Result<Self> {
        let socket = UdpSocket::bind(bind_addr).await?;
        debug!("Socket bound to {}", socket.local_addr()?);

        socket.connect(server_addr).await?;
        debug!("Socket connected to server: {server_addr}");

        Ok(Self { socket })
    }

    /// Get the local address
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Get the peer address
    pub fn peer_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.peer_addr()?)
    }
}

#[async_trait]
impl Datagram for UdpTransport {
    async fn send(&self, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Err(ProtocolError::encoding("Empty packet"));
        }

        if data.len() > MAX_PACKET_SIZE {
            return Err(ProtocolError::encoding(format!(
                "Packet too large: {} bytes (max: {MAX_PACKET_SIZE})",
                data.len()
            )));
        }

        let sent = self.socket.send(data).await?;
        if sent != data.len() {
            return Err(ProtocolError::encoding(format!(
                "Partial send: {sent} of {} bytes",
                data.len()
            )));
        }

        trace!("Sent {sent} bytes");
        Ok(())
    }

    async fn recv(&self) -> Result<Bytes> {
        let mut buffer = BytesMut::zeroed(RECV_BUFFER_SIZE);
        let size = self.socket.recv(&mut buffer).await?;
        buffer.truncate(size);

        trace!("Received {size} bytes");
        Ok(buffer.freeze())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_transport_creation() {
        let server = match UdpSocket::bind("127.0.0.1:0").await {
            Ok(socket) => socket,
            Err(e) => {
                eprintln!("Skipping test_transport_creation due to network sandbox: {e:?}");
                return;
            }
        };
        let server_addr = server.local_addr().unwrap();

        let transport = UdpTransport::connect("127.0.0.1", server_addr.port(), 0)
            .await
            .unwrap();
        assert_eq!(transport.peer_addr().unwrap(), server_addr);
        assert_ne!(transport.local_addr().unwrap().port(), 0);
    }

    #[tokio::test]
    async fn test_send_and_receive() {
        let server = match UdpSocket::bind("127.0.0.1:0").await {
            Ok(socket) => socket,
            Err(e) => {
                eprintln!("Skipping test_send_and_receive due to network sandbox: {e:?}");
                return;
            }
        };
        let transport = UdpTransport::bind(
            "127.0.0.1:0".parse().unwrap(),
            server.local_addr().unwrap(),
        )
        .await
        .unwrap();

        transport.send(b"PING\r\n").await.unwrap();
        let mut buffer = [0u8; 64];
        let (size, peer) = server.recv_from(&mut buffer).await.unwrap();
        assert_eq!(&buffer[..size], b"PING\r\n");

        server.send_to(b"AAAAA 300 PONG\n", peer).await.unwrap();
        let reply = transport.recv().await.unwrap();
        assert_eq!(&reply[..], b"AAAAA 300 PONG\n");
    }

    #[tokio::test]
    async fn test_packet_size_validation() {
        let transport = match UdpTransport::bind(
            "127.0.0.1:0".parse().unwrap(),
            "127.0.0.1:9999".parse().unwrap(),
        )
        .await
        {
            Ok(t) => t,
            Err(e) => {
                eprintln!("Skipping test_packet_size_validation due to network sandbox: {e:?}");
                return;
            }
        };

        let result = transport.send(&[]).await;
        assert!(matches!(result, Err(ProtocolError::Encoding { .. })));

        let large_data = vec![0u8; MAX_PACKET_SIZE + 1];
        let result = transport.send(&large_data).await;
        assert!(matches!(result, Err(ProtocolError::Encoding { .. })));
    }

    #[tokio::test]
    async fn test_unresolvable_server() {
        let result = UdpTransport::connect("host.invalid", 9000, 0).await;
        assert!(matches!(result, Err(ProtocolError::Resolve { .. })));
    }
}
