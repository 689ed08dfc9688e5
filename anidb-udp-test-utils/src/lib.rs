//! Test utilities for the AniDB UDP client
//!
//! This crate provides fake endpoints, a scripted UDP server and reply
//! builders for testing the client without the real AniDB server.

pub mod builders;
pub mod mocks;

// Re-export commonly used types
pub use builders::ReplyBuilder;
pub use mocks::{MemoryDatagram, MockServer, Responder, SentCommand};
