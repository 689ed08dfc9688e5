//! AniDB UDP command line client
//!
//! The binary is a thin layer over these modules; they live in a library so
//! integration tests can reach them.

pub mod config;
pub mod lookup;
pub mod output;
pub mod session;
pub mod shell;
