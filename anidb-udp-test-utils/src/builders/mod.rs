//! Builders for server replies

mod reply;

pub use reply::ReplyBuilder;
