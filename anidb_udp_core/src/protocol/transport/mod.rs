//! Transport layer for UDP communication
//!
//! The correlator talks to the network only through [`Datagram`], so the
//! production socket and the in-memory fakes used in tests are
//! interchangeable.

mod socket;

pub use socket::UdpTransport;

use crate::protocol::error::Result;
use async_trait::async_trait;
use bytes::Bytes;

/// A connected, message-oriented endpoint
///
/// `send` and `recv` may be called concurrently from different tasks.
#[async_trait]
pub trait Datagram: Send + Sync {
    /// Send one datagram to the peer
    async fn send(&self, data: &[u8]) -> Result<()>;

    /// Wait for the next datagram from the peer
    async fn recv(&self) -> Result<Bytes>;
}
