//! Fake endpoints for testing

mod datagram;
mod server;

pub use datagram::MemoryDatagram;
pub use server::MockServer;

use std::sync::Arc;

/// Produces the reply text (status line onward, without the tag) for a command
///
/// Returning `None` leaves the command unanswered.
pub type Responder = Arc<dyn Fn(&SentCommand) -> Option<String> + Send + Sync>;

/// A command as it arrived at the fake server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentCommand {
    pub name: String,
    pub params: Vec<(String, String)>,
    pub raw: String,
}

impl SentCommand {
    /// Parse `NAME key=value&key=value\r\n`
    pub fn parse(raw: &str) -> Self {
        let line = raw.trim_end_matches(['\r', '\n']);
        let (name, rest) = line.split_once(' ').unwrap_or((line, ""));

        let params = rest
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (key.to_string(), value.to_string())
            })
            .collect();

        Self {
            name: name.to_string(),
            params,
            raw: raw.to_string(),
        }
    }

    /// Value of a parameter
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// The request tag
    pub fn tag(&self) -> &str {
        self.param("tag").unwrap_or_default()
    }

    /// Prefix a reply body with this command's tag
    pub fn tagged(&self, body: &str) -> String {
        format!("{} {body}", self.tag())
    }
}
