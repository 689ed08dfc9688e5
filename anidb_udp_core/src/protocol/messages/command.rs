//! Command line builder and lookup keys
//!
//! Parameters keep insertion order so the wire text is deterministic.

use crate::protocol::messages::{SENSITIVE_PARAMS, encode_value};
use std::fmt;
use zeroize::Zeroize;

/// One AniDB command, before the tag is attached
#[derive(Clone, PartialEq, Eq)]
pub struct CommandLine {
    name: String,
    params: Vec<(String, String)>,
}

impl CommandLine {
    /// Create a command with no parameters
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }

    /// Add a parameter
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    /// Attach the session key
    pub fn with_session(self, session: &str) -> Self {
        self.param("s", session)
    }

    /// Get the command name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value of a parameter, if present
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// Render the command for transmission
    pub fn encode(&self) -> String {
        self.render(false)
    }

    /// Render the command with sensitive values masked
    pub fn redacted(&self) -> String {
        self.render(true)
    }

    fn render(&self, mask: bool) -> String {
        if self.params.is_empty() {
            return self.name.clone();
        }

        let params: Vec<String> = self
            .params
            .iter()
            .map(|(key, value)| {
                if mask && SENSITIVE_PARAMS.contains(&key.as_str()) {
                    format!("{key}=***")
                } else {
                    format!("{key}={}", encode_value(value))
                }
            })
            .collect();

        format!("{} {}", self.name, params.join("&"))
    }
}

// Never log passwords
impl fmt::Debug for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CommandLine").field(&self.redacted()).finish()
    }
}

impl Drop for CommandLine {
    fn drop(&mut self) {
        for (key, value) in &mut self.params {
            if SENSITIVE_PARAMS.contains(&key.as_str()) {
                value.zeroize();
            }
        }
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

/// Anime looked up by id or by name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnimeRef {
    Id(u64),
    Name(String),
}

impl AnimeRef {
    pub(crate) fn apply(&self, command: CommandLine) -> CommandLine {
        match self {
            AnimeRef::Id(aid) => command.param("aid", aid),
            AnimeRef::Name(name) => command.param("aname", name),
        }
    }
}

impl From<u64> for AnimeRef {
    fn from(aid: u64) -> Self {
        AnimeRef::Id(aid)
    }
}

impl From<&str> for AnimeRef {
    fn from(name: &str) -> Self {
        AnimeRef::Name(name.to_string())
    }
}

impl From<String> for AnimeRef {
    fn from(name: String) -> Self {
        AnimeRef::Name(name)
    }
}

/// Group looked up by id or by name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupRef {
    Id(u64),
    Name(String),
}

impl GroupRef {
    pub(crate) fn apply(&self, command: CommandLine) -> CommandLine {
        match self {
            GroupRef::Id(gid) => command.param("gid", gid),
            GroupRef::Name(name) => command.param("gname", name),
        }
    }
}

impl From<u64> for GroupRef {
    fn from(gid: u64) -> Self {
        GroupRef::Id(gid)
    }
}

impl From<&str> for GroupRef {
    fn from(name: &str) -> Self {
        GroupRef::Name(name.to_string())
    }
}

/// Ways to address an EPISODE
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EpisodeQuery {
    Id(u64),
    /// Episode number within an anime; specials use prefixes like `S1`
    Number { anime: AnimeRef, epno: String },
}

impl EpisodeQuery {
    pub(crate) fn apply(&self, command: CommandLine) -> CommandLine {
        match self {
            EpisodeQuery::Id(eid) => command.param("eid", eid),
            EpisodeQuery::Number { anime, epno } => anime.apply(command).param("epno", epno),
        }
    }
}

impl From<u64> for EpisodeQuery {
    fn from(eid: u64) -> Self {
        EpisodeQuery::Id(eid)
    }
}

/// Ways to address a FILE
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileQuery {
    Id(u64),
    /// Size in bytes plus ed2k digest
    Hash { size: u64, ed2k: String },
    Episode {
        anime: AnimeRef,
        group: GroupRef,
        epno: String,
    },
}

impl FileQuery {
    pub(crate) fn apply(&self, command: CommandLine) -> CommandLine {
        match self {
            FileQuery::Id(fid) => command.param("fid", fid),
            FileQuery::Hash { size, ed2k } => command.param("size", size).param("ed2k", ed2k),
            FileQuery::Episode { anime, group, epno } => {
                group.apply(anime.apply(command)).param("epno", epno)
            }
        }
    }
}

impl From<u64> for FileQuery {
    fn from(fid: u64) -> Self {
        FileQuery::Id(fid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_keeps_param_order() {
        let command = CommandLine::new("ANIME")
            .param("aid", 1)
            .param("amask", "80000000000000")
            .with_session("ABCDEF01");
        assert_eq!(command.encode(), "ANIME aid=1&amask=80000000000000&s=ABCDEF01");
        assert_eq!(command.get("s"), Some("ABCDEF01"));
    }

    #[test]
    fn test_encode_without_params() {
        assert_eq!(CommandLine::new("PING").encode(), "PING");
    }

    #[test]
    fn test_values_are_form_encoded() {
        let command = CommandLine::new("ANIME").param("aname", "Tom & Jerry");
        assert_eq!(command.encode(), "ANIME aname=Tom &amp; Jerry");
    }

    #[test]
    fn test_password_masked_in_logs() {
        let command = CommandLine::new("AUTH")
            .param("user", "alice")
            .param("pass", "secret");
        assert_eq!(command.redacted(), "AUTH user=alice&pass=***");
        assert!(!format!("{command:?}").contains("secret"));
        assert!(!command.to_string().contains("secret"));
        assert!(command.encode().contains("pass=secret"));
    }

    #[test]
    fn test_episode_query_params() {
        let by_id = EpisodeQuery::Id(3).apply(CommandLine::new("EPISODE"));
        assert_eq!(by_id.encode(), "EPISODE eid=3");

        let by_number = EpisodeQuery::Number {
            anime: AnimeRef::from("Index"),
            epno: "S1".to_string(),
        }
        .apply(CommandLine::new("EPISODE"));
        assert_eq!(by_number.encode(), "EPISODE aname=Index&epno=S1");
    }

    #[test]
    fn test_file_query_params() {
        let by_hash = FileQuery::Hash {
            size: 175244080,
            ed2k: "0123abcd".to_string(),
        }
        .apply(CommandLine::new("FILE"));
        assert_eq!(by_hash.encode(), "FILE size=175244080&ed2k=0123abcd");

        let by_episode = FileQuery::Episode {
            anime: AnimeRef::Id(5975),
            group: GroupRef::from("Chihiro"),
            epno: "1".to_string(),
        }
        .apply(CommandLine::new("FILE"));
        assert_eq!(by_episode.encode(), "FILE aid=5975&gname=Chihiro&epno=1");
    }
}
