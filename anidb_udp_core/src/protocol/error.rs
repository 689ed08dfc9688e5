//! Protocol-specific error types
//!
//! This module defines error types for the AniDB UDP client. Absent records
//! ("no such anime" and friends) are not errors; operations return `Ok(None)`
//! for those.

use std::fmt;
use thiserror::Error;

/// Result type alias for protocol operations
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Protocol-specific error types
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Network I/O error on bind, connect, send or receive
    #[error("Network I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Server hostname could not be resolved
    #[error("Failed to resolve server address '{server}': {reason}")]
    Resolve { server: String, reason: String },

    /// The correlator has shut down; no further requests can be correlated
    #[error("Connection to AniDB server is closed")]
    Closed,

    /// The request was still pending when the correlator shut down
    #[error("Request {tag} was abandoned before a reply arrived")]
    Abandoned { tag: String },

    /// A data operation was invoked without an active session
    #[error("Not authenticated: call authenticate() first")]
    NotAuthenticated,

    /// AUTH was rejected by the server
    #[error("Authentication failed: {code} - {raw}")]
    AuthenticationFailed { code: u16, raw: String },

    /// Reply carried a status code the operation does not model
    #[error("Unexpected status {code}: {raw}")]
    Status { code: u16, raw: String },

    /// Reply header did not follow the tagged layout
    #[error("Invalid reply: {message}")]
    InvalidReply { message: String },

    /// Payload slot could not be decoded
    #[error("Decoding error: {message}")]
    Decoding { message: String },

    /// Requested a field the record schema does not define
    #[error("Unknown field '{field}' for {kind} records")]
    UnknownField { kind: String, field: String },

    /// Command text is empty or would not fit in one datagram
    #[error("Encoding error: {message}")]
    Encoding { message: String },
}

impl ProtocolError {
    /// Create a resolve error
    pub fn resolve(server: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::Resolve {
            server: server.into(),
            reason: reason.to_string(),
        }
    }

    /// Create an abandoned-request error
    pub fn abandoned(tag: impl Into<String>) -> Self {
        Self::Abandoned { tag: tag.into() }
    }

    /// Create an authentication failed error
    pub fn authentication_failed(code: u16, raw: impl Into<String>) -> Self {
        Self::AuthenticationFailed {
            code,
            raw: raw.into(),
        }
    }

    /// Create an unexpected status error
    pub fn status(code: u16, raw: impl Into<String>) -> Self {
        Self::Status {
            code,
            raw: raw.into(),
        }
    }

    /// Create an invalid reply error
    pub fn invalid_reply(message: impl Into<String>) -> Self {
        Self::InvalidReply {
            message: message.into(),
        }
    }

    /// Create a decoding error
    pub fn decoding(message: impl Into<String>) -> Self {
        Self::Decoding {
            message: message.into(),
        }
    }

    /// Create an unknown field error
    pub fn unknown_field(kind: impl fmt::Display, field: impl Into<String>) -> Self {
        Self::UnknownField {
            kind: kind.to_string(),
            field: field.into(),
        }
    }

    /// Create an encoding error
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding {
            message: message.into(),
        }
    }

    /// Transport failures end the correlator; everything else is per call
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Io(_) | Self::Resolve { .. } | Self::Closed | Self::Abandoned { .. }
        )
    }

    /// Status code carried by the error, if any
    pub fn code(&self) -> Option<u16> {
        match self {
            Self::Status { code, .. } | Self::AuthenticationFailed { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Status code returned by the AniDB server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResponseCode(pub u16);

impl ResponseCode {
    pub const LOGIN_ACCEPTED: Self = Self(200);
    pub const LOGIN_ACCEPTED_NEW_VERSION: Self = Self(201);
    pub const LOGGED_OUT: Self = Self(203);
    pub const FILE: Self = Self(220);
    pub const GROUP_STATUS: Self = Self(225);
    pub const ANIME: Self = Self(230);
    pub const ANIME_DESCRIPTION: Self = Self(233);
    pub const CHARACTER: Self = Self(235);
    pub const EPISODE: Self = Self(240);
    pub const CREATOR: Self = Self(245);
    pub const GROUP: Self = Self(250);
    pub const NO_SUCH_FILE: Self = Self(320);
    pub const MULTIPLE_FILES_FOUND: Self = Self(322);
    pub const NO_GROUPS_FOUND: Self = Self(325);
    pub const NO_SUCH_ANIME: Self = Self(330);
    pub const NO_SUCH_DESCRIPTION: Self = Self(333);
    pub const NO_SUCH_CHARACTER: Self = Self(335);
    pub const NO_SUCH_EPISODE: Self = Self(340);
    pub const NO_SUCH_CREATOR: Self = Self(345);
    pub const NO_SUCH_GROUP: Self = Self(350);
    pub const NOT_LOGGED_IN: Self = Self(403);

    /// Check if the response code indicates success
    pub fn is_success(&self) -> bool {
        matches!(self.0, 200..=299)
    }

    /// Check if the response code indicates an error
    pub fn is_error(&self) -> bool {
        self.0 >= 500
    }

    /// Get a human-readable description of the response code
    pub fn description(&self) -> &'static str {
        match self.0 {
            200 => "LOGIN ACCEPTED",
            201 => "LOGIN ACCEPTED - NEW VERSION AVAILABLE",
            203 => "LOGGED OUT",
            220 => "FILE",
            225 => "GROUPSTATUS",
            230 => "ANIME",
            233 => "ANIMEDESC",
            235 => "CHARACTER",
            240 => "EPISODE",
            245 => "CREATOR",
            250 => "GROUP",

            320 => "NO SUCH FILE",
            322 => "MULTIPLE FILES FOUND",
            325 => "NO GROUPS FOUND",
            330 => "NO SUCH ANIME",
            333 => "NO SUCH DESCRIPTION",
            335 => "NO SUCH CHARACTER",
            340 => "NO SUCH EPISODE",
            345 => "NO SUCH CREATOR",
            350 => "NO SUCH GROUP",

            403 => "NOT LOGGED IN",

            500 => "LOGIN FAILED",
            501 => "LOGIN FIRST",
            502 => "ACCESS DENIED",
            503 => "CLIENT VERSION OUTDATED",
            504 => "CLIENT BANNED",
            505 => "ILLEGAL INPUT OR ACCESS DENIED",
            506 => "INVALID SESSION",
            555 => "BANNED",
            598 => "UNKNOWN COMMAND",
            600 => "INTERNAL SERVER ERROR",
            601 => "ANIDB OUT OF SERVICE",
            602 => "SERVER BUSY",
            604 => "TIMEOUT - DELAY AND RESUBMIT",

            _ => "UNKNOWN RESPONSE CODE",
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.0, self.description())
    }
}
