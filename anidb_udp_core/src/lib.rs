//! AniDB UDP Client Core Library
//!
//! This is the core library for the AniDB UDP client, providing request
//! correlation, field-mask encoding and decoding, the protocol operations and
//! ed2k hashing.

pub mod ed2k;
pub mod protocol;

// Re-export main types
pub use protocol::{
    AniDbClient, FileLookup, FileRecord, ProtocolConfig, ProtocolError, Record, Result, Value,
};
