//! High-level protocol client
//!
//! This module provides the main interface for interacting with the AniDB UDP
//! API: one method per remote command, each returning decoded records.

use crate::protocol::codec::{Record, decode_joined, decode_record, encode_mask};
use crate::protocol::correlator::Correlator;
use crate::protocol::error::{ProtocolError, ResponseCode, Result};
use crate::protocol::messages::{AnimeRef, CommandLine, EpisodeQuery, FileQuery, Reply};
use crate::protocol::schema::{
    ANIME, ANIME_DESCRIPTION, CHARACTER, CREATOR, EPISODE, FILE, FILE_ANIME, FieldSelection, GROUP,
    GROUP_STATUS,
};
use crate::protocol::session::SessionState;
use crate::protocol::transport::{Datagram, UdpTransport};
use crate::protocol::{DEFAULT_PACING, DEFAULT_PORT, DEFAULT_SERVER, MIN_PACING, PROTOCOL_VERSION};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Pacing periods `close` waits for the LOGOUT reply
const CLOSE_LOGOUT_PERIODS: u32 = 3;

/// Shortest wait for the LOGOUT reply during `close`
const CLOSE_LOGOUT_MIN_WAIT: Duration = Duration::from_secs(1);

/// Protocol client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    /// Server hostname or address
    pub server: String,
    /// Server UDP port
    pub port: u16,
    /// Local UDP port, 0 for an ephemeral one
    pub local_port: u16,
    /// Registered client name sent with AUTH
    pub client_name: String,
    /// Registered client version sent with AUTH
    pub client_version: String,
    /// Minimum delay between two datagrams, in milliseconds
    pub pacing_ms: u64,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            port: DEFAULT_PORT,
            local_port: 0,
            client_name: "anidbudp".to_string(),
            client_version: "1".to_string(),
            pacing_ms: DEFAULT_PACING.as_millis() as u64,
        }
    }
}

impl ProtocolConfig {
    /// Pacing period between datagrams, never below [`MIN_PACING`]
    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms).max(MIN_PACING)
    }
}

/// A FILE reply: the file fields and the anime fields from the same line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileRecord {
    pub file: Record,
    pub anime: Record,
}

/// Outcome of a FILE lookup
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileLookup {
    Found(FileRecord),
    /// The query matched several files; their ids
    Multiple(Vec<String>),
    NotFound,
}

/// High-level AniDB UDP client
pub struct AniDbClient {
    config: ProtocolConfig,
    correlator: Correlator,
    state: RwLock<SessionState>,
}

impl AniDbClient {
    /// Connect to the configured server
    pub async fn open(config: ProtocolConfig) -> Result<Self> {
        debug!("Opening AniDB client with config: {config:?}");
        let transport =
            UdpTransport::connect(&config.server, config.port, config.local_port).await?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Build a client over an existing endpoint
    pub fn with_transport(config: ProtocolConfig, transport: Arc<dyn Datagram>) -> Self {
        let correlator = Correlator::start(transport, config.pacing());
        Self {
            config,
            correlator,
            state: RwLock::new(SessionState::Unauthenticated),
        }
    }

    /// Get the client configuration
    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    /// Get the current session state
    pub async fn state(&self) -> SessionState {
        self.state.read().await.clone()
    }

    /// Check if a session is active
    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_authenticated()
    }

    async fn set_state(&self, next: SessionState) -> Result<()> {
        let mut state = self.state.write().await;
        if !state.can_transition_to(&next) {
            warn!("Invalid session transition: {state} -> {next}");
            return Err(ProtocolError::Closed);
        }
        debug!("Session state: {state} -> {next}");
        *state = next;
        Ok(())
    }

    async fn session_key(&self) -> Result<String> {
        let state = self.state.read().await;
        match &*state {
            SessionState::Authenticated { session, .. } => Ok(session.clone()),
            SessionState::Closed => Err(ProtocolError::Closed),
            SessionState::Unauthenticated => Err(ProtocolError::NotAuthenticated),
        }
    }

    async fn request(&self, command: &CommandLine) -> Result<Reply> {
        let data = self.correlator.submit(command).await?;
        let reply = Reply::parse(&data)?;
        debug!("{} -> {} {}", command.name(), reply.code(), reply.message());
        Ok(reply)
    }

    /// Authenticate and return the session key
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<String> {
        debug!(
            "Client name: {}, version: {}",
            self.config.client_name, self.config.client_version
        );

        let command = CommandLine::new("AUTH")
            .param("user", username)
            .param("pass", password)
            .param("protover", PROTOCOL_VERSION)
            .param("client", &self.config.client_name)
            .param("clientver", &self.config.client_version)
            .param("enc", "UTF-8");

        let reply = self.request(&command).await?;
        match reply.code() {
            ResponseCode::LOGIN_ACCEPTED | ResponseCode::LOGIN_ACCEPTED_NEW_VERSION => {
                if reply.code() == ResponseCode::LOGIN_ACCEPTED_NEW_VERSION {
                    warn!("A newer version of this client is available");
                }

                let session = reply
                    .session_key()
                    .ok_or_else(|| ProtocolError::invalid_reply("login reply has no session key"))?
                    .to_string();

                self.set_state(SessionState::Authenticated {
                    session: session.clone(),
                    username: username.to_string(),
                })
                .await?;
                info!("Logged in as {username}");
                Ok(session)
            }
            code if matches!(code.0, 500 | 503 | 504) => {
                warn!("Authentication failed: {code} {}", reply.message());
                Err(ProtocolError::authentication_failed(
                    code.0,
                    reply.raw().to_string(),
                ))
            }
            _ => Err(reply.into_status_error()),
        }
    }

    /// End the session; a no-op when not authenticated
    pub async fn logout(&self) -> Result<()> {
        let session = match self.session_key().await {
            Ok(session) => session,
            Err(ProtocolError::NotAuthenticated) => return Ok(()),
            Err(e) => return Err(e),
        };

        let reply = self
            .request(&CommandLine::new("LOGOUT").with_session(&session))
            .await?;
        match reply.code() {
            ResponseCode::LOGGED_OUT | ResponseCode::NOT_LOGGED_IN => {
                self.set_state(SessionState::Unauthenticated).await?;
                info!("Logged out");
                Ok(())
            }
            _ => Err(reply.into_status_error()),
        }
    }

    /// Fetch an anime by id or name
    ///
    /// An empty field list requests every field.
    pub async fn anime(&self, anime: impl Into<AnimeRef>, fields: &[&str]) -> Result<Option<Record>> {
        let session = self.session_key().await?;
        let selection = FieldSelection::from_names(&ANIME, fields)?;

        let anime: AnimeRef = anime.into();
        let command = anime
            .apply(CommandLine::new("ANIME"))
            .param("amask", encode_mask(&selection))
            .with_session(&session);

        let reply = self.request(&command).await?;
        match reply.code() {
            ResponseCode::ANIME => decode_record(&selection, reply.first_line()?).map(Some),
            ResponseCode::NO_SUCH_ANIME => Ok(None),
            _ => Err(reply.into_status_error()),
        }
    }

    /// Fetch the full description of an anime, following every page
    pub async fn anime_description(&self, aid: u64) -> Result<Option<String>> {
        let session = self.session_key().await?;
        let selection = FieldSelection::all(&ANIME_DESCRIPTION);
        let mut description = String::new();
        let mut part = 0;

        loop {
            let command = CommandLine::new("ANIMEDESC")
                .param("aid", aid)
                .param("part", part)
                .with_session(&session);

            let reply = self.request(&command).await?;
            let page = match reply.code() {
                ResponseCode::ANIME_DESCRIPTION => decode_record(&selection, reply.first_line()?)?,
                ResponseCode::NO_SUCH_ANIME | ResponseCode::NO_SUCH_DESCRIPTION => return Ok(None),
                _ => return Err(reply.into_status_error()),
            };

            let current = page.get_i64("current_part").unwrap_or_default();
            let total = page.get_i64("max_parts").unwrap_or_default();
            description.push_str(page.get_str("description").unwrap_or_default());

            let next = current + 1;
            if next >= total {
                break;
            }
            if next <= part {
                warn!("Description page {current} of {total} does not advance, stopping");
                break;
            }
            debug!("Fetching description page {next} of {total}");
            part = next;
        }

        Ok(Some(description))
    }

    /// Fetch an episode by id or by anime and episode number
    pub async fn episode(&self, query: impl Into<EpisodeQuery>) -> Result<Option<Record>> {
        let session = self.session_key().await?;
        let query: EpisodeQuery = query.into();
        let command = query
            .apply(CommandLine::new("EPISODE"))
            .with_session(&session);

        self.fetch_fixed(
            &command,
            &FieldSelection::all(&EPISODE),
            ResponseCode::EPISODE,
            &[ResponseCode::NO_SUCH_EPISODE],
        )
        .await
    }

    /// Fetch the release status of every group for an anime
    pub async fn group_status(&self, aid: u64) -> Result<Option<Vec<Record>>> {
        let session = self.session_key().await?;
        let selection = FieldSelection::all(&GROUP_STATUS);
        let command = CommandLine::new("GROUPSTATUS")
            .param("aid", aid)
            .with_session(&session);

        let reply = self.request(&command).await?;
        match reply.code() {
            ResponseCode::GROUP_STATUS => reply
                .lines()
                .iter()
                .filter(|line| !line.is_empty())
                .map(|line| decode_record(&selection, line))
                .collect::<Result<Vec<_>>>()
                .map(Some),
            ResponseCode::NO_GROUPS_FOUND | ResponseCode::NO_SUCH_ANIME => Ok(None),
            _ => Err(reply.into_status_error()),
        }
    }

    /// Fetch a file together with its anime fields
    ///
    /// Empty field lists request every field of that half.
    pub async fn file(
        &self,
        query: impl Into<FileQuery>,
        file_fields: &[&str],
        anime_fields: &[&str],
    ) -> Result<FileLookup> {
        let session = self.session_key().await?;
        let file_selection = FieldSelection::from_names(&FILE, file_fields)?;
        let anime_selection = FieldSelection::from_names(&FILE_ANIME, anime_fields)?;

        let query: FileQuery = query.into();
        let command = query
            .apply(CommandLine::new("FILE"))
            .param("fmask", encode_mask(&file_selection))
            .param("amask", encode_mask(&anime_selection))
            .with_session(&session);

        let reply = self.request(&command).await?;
        match reply.code() {
            ResponseCode::FILE => {
                let mut records =
                    decode_joined(&[&file_selection, &anime_selection], reply.first_line()?)?
                        .into_iter();
                match (records.next(), records.next()) {
                    (Some(file), Some(anime)) => Ok(FileLookup::Found(FileRecord { file, anime })),
                    _ => Err(ProtocolError::decoding("FILE reply did not yield two records")),
                }
            }
            ResponseCode::MULTIPLE_FILES_FOUND => Ok(FileLookup::Multiple(
                reply
                    .first_line()?
                    .split('|')
                    .filter(|fid| !fid.is_empty())
                    .map(str::to_string)
                    .collect(),
            )),
            ResponseCode::NO_SUCH_FILE => Ok(FileLookup::NotFound),
            _ => Err(reply.into_status_error()),
        }
    }

    /// Fetch a character
    pub async fn character(&self, charid: u64) -> Result<Option<Record>> {
        let session = self.session_key().await?;
        let command = CommandLine::new("CHARACTER")
            .param("charid", charid)
            .with_session(&session);

        self.fetch_fixed(
            &command,
            &FieldSelection::all(&CHARACTER),
            ResponseCode::CHARACTER,
            &[ResponseCode::NO_SUCH_CHARACTER],
        )
        .await
    }

    /// Fetch a creator
    pub async fn creator(&self, creatorid: u64) -> Result<Option<Record>> {
        let session = self.session_key().await?;
        let command = CommandLine::new("CREATOR")
            .param("creatorid", creatorid)
            .with_session(&session);

        self.fetch_fixed(
            &command,
            &FieldSelection::all(&CREATOR),
            ResponseCode::CREATOR,
            &[ResponseCode::NO_SUCH_CREATOR],
        )
        .await
    }

    /// Fetch a group
    pub async fn group(&self, gid: u64) -> Result<Option<Record>> {
        let session = self.session_key().await?;
        let command = CommandLine::new("GROUP")
            .param("gid", gid)
            .with_session(&session);

        self.fetch_fixed(
            &command,
            &FieldSelection::all(&GROUP),
            ResponseCode::GROUP,
            &[ResponseCode::NO_SUCH_GROUP],
        )
        .await
    }

    async fn fetch_fixed(
        &self,
        command: &CommandLine,
        selection: &FieldSelection,
        success: ResponseCode,
        absent: &[ResponseCode],
    ) -> Result<Option<Record>> {
        let reply = self.request(command).await?;
        if reply.code() == success {
            decode_record(selection, reply.first_line()?).map(Some)
        } else if absent.contains(&reply.code()) {
            Ok(None)
        } else {
            Err(reply.into_status_error())
        }
    }

    /// Send a hand-written command line and return the reply text
    ///
    /// The line is sent as typed; no session key is added.
    pub async fn submit_raw(&self, line: &str) -> Result<String> {
        let data = self.correlator.submit_raw(line).await?;
        Ok(String::from_utf8_lossy(&data).into_owned())
    }

    /// Log out if needed, then stop the correlator
    ///
    /// The LOGOUT reply is awaited for a few pacing periods at most.
    pub async fn close(&self) -> Result<()> {
        if self.is_authenticated().await {
            let wait = (self.config.pacing() * CLOSE_LOGOUT_PERIODS).max(CLOSE_LOGOUT_MIN_WAIT);
            match tokio::time::timeout(wait, self.logout()).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!("Logout during close failed: {e}"),
                Err(_) => warn!("No LOGOUT reply within {wait:?}, closing anyway"),
            }
        }

        self.correlator.close().await;
        *self.state.write().await = SessionState::Closed;
        debug!("Client closed");
        Ok(())
    }
}
