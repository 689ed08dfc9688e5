//! AniDB UDP Protocol Implementation
//!
//! This module implements the AniDB UDP API protocol with a modular architecture:
//! - `schema`: Field descriptor tables per record kind
//! - `codec`: Field-mask encoding and positional payload decoding
//! - `messages`: Command lines and reply parsing
//! - `transport`: Datagram endpoint abstraction and the UDP socket
//! - `correlator`: Request tagging, pacing and reply matching
//! - `client`: High-level protocol client with one method per command

pub mod client;
pub mod codec;
pub mod correlator;
pub mod error;
pub mod messages;
pub mod schema;
pub mod session;
pub mod transport;

// Re-export main types
pub use client::{AniDbClient, FileLookup, FileRecord, ProtocolConfig};
pub use codec::{Record, Value};
pub use correlator::Correlator;
pub use error::{ProtocolError, ResponseCode, Result};
pub use messages::{AnimeRef, CommandLine, EpisodeQuery, FileQuery, GroupRef, Reply};
pub use schema::{FieldSelection, RecordKind};
pub use session::SessionState;
pub use transport::{Datagram, UdpTransport};

use std::time::Duration;

/// Protocol version supported by this implementation
pub const PROTOCOL_VERSION: &str = "3";

/// Maximum UDP packet size (considering PPPoE)
pub const MAX_PACKET_SIZE: usize = 1400;

/// Default AniDB server address
pub const DEFAULT_SERVER: &str = "api.anidb.net";

/// Default AniDB UDP port
pub const DEFAULT_PORT: u16 = 9000;

/// Delay between two outgoing datagrams
pub const DEFAULT_PACING: Duration = Duration::from_secs(4);

/// Shortest pacing period the dispatch task accepts
pub const MIN_PACING: Duration = Duration::from_millis(1);

/// Length of a request tag
pub const TAG_LENGTH: usize = 5;

/// Characters a request tag is drawn from
pub const TAG_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_constants() {
        assert_eq!(PROTOCOL_VERSION, "3");
        assert_eq!(MAX_PACKET_SIZE, 1400);
        assert_eq!(DEFAULT_SERVER, "api.anidb.net");
        assert_eq!(DEFAULT_PORT, 9000);
        assert_eq!(DEFAULT_PACING, Duration::from_secs(4));
        assert_eq!(TAG_ALPHABET.len(), 36);
    }
}
