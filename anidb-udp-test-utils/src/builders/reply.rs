//! Reply text builder

use anidb_udp_core::protocol::codec::{Record, encode_line};
use anidb_udp_core::protocol::schema::FieldSelection;
use std::fmt;

/// Builds the untagged part of a reply: status line plus payload lines
///
/// # Examples
///
/// ```rust
/// use anidb_udp_test_utils::ReplyBuilder;
///
/// let body = ReplyBuilder::new(230, "ANIME").line("1|2008").build();
/// assert_eq!(body, "230 ANIME\n1|2008\n");
/// ```
#[derive(Debug, Clone)]
pub struct ReplyBuilder {
    code: u16,
    message: String,
    lines: Vec<String>,
}

impl ReplyBuilder {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            lines: Vec::new(),
        }
    }

    /// `200 {session} LOGIN ACCEPTED`
    pub fn login_accepted(session: &str) -> Self {
        Self::new(200, format!("{session} LOGIN ACCEPTED"))
    }

    /// Status line only
    pub fn status(code: u16, message: impl Into<String>) -> String {
        Self::new(code, message).build()
    }

    /// Append a raw payload line
    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    /// Append a record rendered in wire form
    pub fn record(self, selection: &FieldSelection, record: &Record) -> Self {
        let line = encode_line(selection, record).unwrap();
        self.line(line)
    }

    pub fn build(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ReplyBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.code, self.message)?;
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
