//! Reply datagram parsing
//!
//! Every reply to a tagged command starts with `TTTTT CCC message`: the
//! 5-character tag, a space, the 3-digit status code, a space and the rest of
//! the header. Payload lines follow, each terminated by `\n`.

use crate::protocol::TAG_LENGTH;
use crate::protocol::error::{ProtocolError, ResponseCode, Result};

const CODE_START: usize = TAG_LENGTH + 1;
const CODE_END: usize = CODE_START + 3;

/// Leading tag of a raw datagram, if it has one
pub fn peek_tag(data: &[u8]) -> Option<&str> {
    data.get(..TAG_LENGTH)
        .and_then(|tag| std::str::from_utf8(tag).ok())
}

/// A parsed reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    raw: String,
    tag: String,
    code: ResponseCode,
    message: String,
    lines: Vec<String>,
}

impl Reply {
    /// Parse a raw reply datagram
    pub fn parse(data: &[u8]) -> Result<Self> {
        let raw = std::str::from_utf8(data)
            .map_err(|e| ProtocolError::invalid_reply(format!("reply is not UTF-8: {e}")))?;

        let (header, body) = raw.split_once('\n').unwrap_or((raw, ""));
        let header = header.trim_end_matches('\r');

        let tag = header
            .get(..TAG_LENGTH)
            .ok_or_else(|| ProtocolError::invalid_reply(format!("header too short: '{header}'")))?;

        let code = header
            .get(CODE_START..CODE_END)
            .and_then(|code| code.parse::<u16>().ok())
            .ok_or_else(|| {
                ProtocolError::invalid_reply(format!("no status code in header: '{header}'"))
            })?;

        let message = header.get(CODE_END + 1..).unwrap_or_default();

        let mut lines: Vec<String> = body
            .split('\n')
            .map(|line| line.trim_end_matches('\r').to_string())
            .collect();
        if lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }

        Ok(Self {
            raw: raw.to_string(),
            tag: tag.to_string(),
            code: ResponseCode(code),
            message: message.to_string(),
            lines,
        })
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn code(&self) -> ResponseCode {
        self.code
    }

    /// Header text after the status code
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Session key of a login-accepted reply
    ///
    /// The key is the first word after the status code.
    pub fn session_key(&self) -> Option<&str> {
        self.message
            .split(' ')
            .next()
            .filter(|session| !session.is_empty())
    }

    /// Payload lines following the header
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// First payload line
    pub fn first_line(&self) -> Result<&str> {
        self.lines.first().map(String::as_str).ok_or_else(|| {
            ProtocolError::invalid_reply(format!("{} reply carries no payload", self.code))
        })
    }

    /// The whole reply text
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Turn an unexpected reply into an error carrying the raw text
    pub fn into_status_error(self) -> ProtocolError {
        ProtocolError::status(self.code.0, self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_login_reply() {
        let reply = Reply::parse(b"AB12C 200 ABCDEF01 LOGIN ACCEPTED\n").unwrap();
        assert_eq!(reply.tag(), "AB12C");
        assert_eq!(reply.code(), ResponseCode::LOGIN_ACCEPTED);
        assert_eq!(reply.session_key(), Some("ABCDEF01"));
        assert_eq!(reply.message(), "ABCDEF01 LOGIN ACCEPTED");
        assert!(reply.lines().is_empty());
    }

    #[test]
    fn test_parse_payload_lines() {
        let reply = Reply::parse(b"Q0000 225 GROUPSTATUS\n1|A|2|12|800|10|1-12\n2|B|1|5|700|3|1-5\n")
            .unwrap();
        assert_eq!(reply.code(), ResponseCode::GROUP_STATUS);
        assert_eq!(reply.lines().len(), 2);
        assert_eq!(reply.first_line().unwrap(), "1|A|2|12|800|10|1-12");
    }

    #[test]
    fn test_payload_without_trailing_newline() {
        let reply = Reply::parse(b"Q0000 230 ANIME\n1|2008").unwrap();
        assert_eq!(reply.lines(), &["1|2008".to_string()]);
    }

    #[test]
    fn test_empty_payload_line_is_kept() {
        let reply = Reply::parse(b"Q0000 230 ANIME\n\n").unwrap();
        assert_eq!(reply.lines(), &[String::new()]);
    }

    #[test]
    fn test_parse_rejects_malformed_header() {
        assert!(matches!(
            Reply::parse(b"AB1"),
            Err(ProtocolError::InvalidReply { .. })
        ));
        assert!(matches!(
            Reply::parse(b"AB12C XYZ nope\n"),
            Err(ProtocolError::InvalidReply { .. })
        ));
        assert!(Reply::parse(&[0xff, 0xfe, 0xfd, 0xfc, 0xfb, 0x20]).is_err());
    }

    #[test]
    fn test_status_error_keeps_raw_text() {
        let reply = Reply::parse(b"AB12C 598 UNKNOWN COMMAND\n").unwrap();
        match reply.into_status_error() {
            ProtocolError::Status { code, raw } => {
                assert_eq!(code, 598);
                assert_eq!(raw, "AB12C 598 UNKNOWN COMMAND\n");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_peek_tag() {
        assert_eq!(peek_tag(b"ZZ9ZZ 230 ANIME\n"), Some("ZZ9ZZ"));
        assert_eq!(peek_tag(b"ZZ"), None);
    }
}
