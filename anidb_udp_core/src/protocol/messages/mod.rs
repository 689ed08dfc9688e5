//! Command lines and reply parsing for the AniDB protocol
//!
//! This module builds the `NAME key=value&key=value` text sent to the server
//! and splits the raw reply datagram into header and payload lines.

mod command;
mod reply;

pub use command::{AnimeRef, CommandLine, EpisodeQuery, FileQuery, GroupRef};
pub use reply::{Reply, peek_tag};

/// Newline encoding for multiline values
pub const ENCODED_NEWLINE: &str = "<br />";

/// Parameters whose values are masked in logs
pub const SENSITIVE_PARAMS: &[&str] = &["pass"];

/// Encode a value for AniDB protocol transmission
///
/// Option values use html form encoding plus newline encoding. Only `&`
/// needs the entity form; everything else is sent as UTF-8 as-is.
pub fn encode_value(value: &str) -> String {
    let mut result = String::with_capacity(value.len() + 10);

    for ch in value.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '\n' => result.push_str(ENCODED_NEWLINE),
            '\r' => continue,
            _ => result.push(ch),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_value() {
        assert_eq!(encode_value("simple"), "simple");
        assert_eq!(encode_value("with&ampersand"), "with&amp;ampersand");
        assert_eq!(
            encode_value("line1\r\nline2"),
            format!("line1{ENCODED_NEWLINE}line2")
        );
        assert_eq!(encode_value("user@example.com"), "user@example.com");
        assert_eq!(encode_value("space test"), "space test");
        assert_eq!(encode_value("P@ssw0rd!#2024"), "P@ssw0rd!#2024");
    }
}
