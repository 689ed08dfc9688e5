//! In-memory datagram endpoint

use super::{Responder, SentCommand};
use anidb_udp_core::protocol::{Datagram, ProtocolError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

/// A [`Datagram`] that never touches the network
///
/// Every sent command is recorded. With a responder, replies are produced
/// as commands arrive; without one, the test pushes replies itself, in
/// whatever order it likes.
pub struct MemoryDatagram {
    responder: Option<Responder>,
    sent: Mutex<Vec<SentCommand>>,
    inbox_tx: mpsc::UnboundedSender<Bytes>,
    inbox_rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<Bytes>>,
}

impl MemoryDatagram {
    /// Endpoint that only answers what the test pushes
    pub fn new() -> Arc<Self> {
        Arc::new(Self::build(None))
    }

    /// Endpoint that answers every command through `responder`
    pub fn with_responder(
        responder: impl Fn(&SentCommand) -> Option<String> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self::build(Some(Arc::new(responder))))
    }

    fn build(responder: Option<Responder>) -> Self {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        Self {
            responder,
            sent: Mutex::new(Vec::new()),
            inbox_tx,
            inbox_rx: tokio::sync::Mutex::new(inbox_rx),
        }
    }

    /// Deliver a raw datagram to the client
    pub fn push_reply(&self, data: impl Into<Bytes>) {
        let _ = self.inbox_tx.send(data.into());
    }

    /// Deliver a reply body tagged for `command`
    pub fn reply_to(&self, command: &SentCommand, body: &str) {
        self.push_reply(command.tagged(body));
    }

    /// Commands sent so far
    pub fn sent(&self) -> Vec<SentCommand> {
        self.sent.lock().unwrap().clone()
    }

    /// Wait until at least `count` commands were sent
    ///
    /// Panics after ten seconds.
    pub async fn wait_for_sent(&self, count: usize) -> Vec<SentCommand> {
        for _ in 0..2000 {
            let sent = self.sent();
            if sent.len() >= count {
                return sent;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("expected {count} sent commands, got {:?}", self.sent());
    }
}

#[async_trait]
impl Datagram for MemoryDatagram {
    async fn send(&self, data: &[u8]) -> Result<()> {
        let command = SentCommand::parse(&String::from_utf8_lossy(data));
        self.sent.lock().unwrap().push(command.clone());

        if let Some(body) = self.responder.as_ref().and_then(|respond| respond(&command)) {
            self.reply_to(&command, &body);
        }
        Ok(())
    }

    async fn recv(&self) -> Result<Bytes> {
        self.inbox_rx
            .lock()
            .await
            .recv()
            .await
            .ok_or(ProtocolError::Closed)
    }
}
