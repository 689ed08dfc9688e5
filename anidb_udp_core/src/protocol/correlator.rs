//! Request/response correlation over an unordered datagram endpoint
//!
//! Every outgoing command gets a random tag the server echoes at the start of
//! its reply. Commands are queued and a single dispatch task sends at most one
//! per pacing period; a single receive task matches replies back to the
//! waiting caller by tag. Replies may arrive in any order, or not at all.

use crate::protocol::error::{ProtocolError, Result};
use crate::protocol::messages::{CommandLine, peek_tag};
use crate::protocol::transport::Datagram;
use crate::protocol::{MAX_PACKET_SIZE, MIN_PACING, TAG_ALPHABET, TAG_LENGTH};
use bytes::Bytes;
use log::{debug, error, trace, warn};
use rand::Rng;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use zeroize::Zeroizing;

/// Request tag echoed by the server
pub type Tag = String;

/// Produces candidate tags; candidates already pending are drawn again
pub type TagSource = Box<dyn FnMut() -> Tag + Send>;

/// Generate a random tag from the protocol alphabet
pub fn generate_tag<R: Rng + ?Sized>(rng: &mut R) -> Tag {
    (0..TAG_LENGTH)
        .map(|_| TAG_ALPHABET[rng.random_range(0..TAG_ALPHABET.len())] as char)
        .collect()
}

/// Append the tag parameter and the line terminator
///
/// Commands that already carry parameters get `&tag=`; bare commands get the
/// tag as their first parameter.
pub fn tag_command(command: &str, tag: &str) -> String {
    if command.contains('=') {
        format!("{command}&tag={tag}\r\n")
    } else {
        format!("{command} tag={tag}\r\n")
    }
}

struct Outgoing {
    tag: Tag,
    datagram: Bytes,
}

/// State shared between the handle and its two tasks
struct Shared {
    pending: Mutex<HashMap<Tag, oneshot::Sender<Bytes>>>,
    tags: std::sync::Mutex<TagSource>,
    closed: AtomicBool,
    shutdown: watch::Sender<bool>,
}

impl Shared {
    /// Stop both tasks and abandon every pending request
    async fn shut_down(&self) {
        let mut pending = self.pending.lock().await;
        self.closed.store(true, Ordering::SeqCst);
        self.shutdown.send_replace(true);

        if !pending.is_empty() {
            debug!("Abandoning {} pending requests", pending.len());
        }
        // Dropping the senders wakes every waiting caller
        pending.clear();
    }

    async fn resolve(&self, data: Bytes) {
        let Some(tag) = peek_tag(&data).map(str::to_owned) else {
            debug!("Dropping {} byte datagram without a tag", data.len());
            return;
        };

        let sender = self.pending.lock().await.remove(&tag);
        match sender {
            Some(sender) => {
                trace!("Resolved {tag} with {} bytes", data.len());
                if sender.send(data).is_err() {
                    debug!("Caller for {tag} is no longer waiting");
                }
            }
            None => debug!("Dropping reply for unknown tag {tag}"),
        }
    }
}

/// Tags, paces and correlates commands over one [`Datagram`] endpoint
pub struct Correlator {
    shared: Arc<Shared>,
    queue: mpsc::UnboundedSender<Outgoing>,
    dispatcher: std::sync::Mutex<Option<JoinHandle<()>>>,
    receiver: std::sync::Mutex<Option<JoinHandle<()>>>,
}

impl Correlator {
    /// Start the dispatch and receive tasks on the current runtime
    ///
    /// A pacing period below [`MIN_PACING`] is raised to it.
    pub fn start(transport: Arc<dyn Datagram>, pacing: Duration) -> Self {
        Self::start_with_tags(transport, pacing, || generate_tag(&mut rand::rng()))
    }

    /// Like [`Correlator::start`], drawing tags from `tags`
    pub fn start_with_tags(
        transport: Arc<dyn Datagram>,
        pacing: Duration,
        tags: impl FnMut() -> Tag + Send + 'static,
    ) -> Self {
        let pacing = if pacing < MIN_PACING {
            warn!("Pacing of {pacing:?} is too short, using {MIN_PACING:?}");
            MIN_PACING
        } else {
            pacing
        };

        let (shutdown, _) = watch::channel(false);
        let shared = Arc::new(Shared {
            pending: Mutex::new(HashMap::new()),
            tags: std::sync::Mutex::new(Box::new(tags)),
            closed: AtomicBool::new(false),
            shutdown,
        });
        let (queue, outgoing) = mpsc::unbounded_channel();

        debug!("Starting correlator with {pacing:?} pacing");
        let dispatcher = tokio::spawn(dispatch_loop(
            Arc::clone(&transport),
            outgoing,
            pacing,
            Arc::clone(&shared),
        ));
        let receiver = tokio::spawn(receive_loop(transport, Arc::clone(&shared)));

        Self {
            shared,
            queue,
            dispatcher: std::sync::Mutex::new(Some(dispatcher)),
            receiver: std::sync::Mutex::new(Some(receiver)),
        }
    }

    /// Submit a command and wait for its reply
    ///
    /// The returned bytes are the whole reply datagram, tag included.
    pub async fn submit(&self, command: &CommandLine) -> Result<Bytes> {
        let text = Zeroizing::new(command.encode());
        self.enqueue(&text, command.redacted()).await
    }

    /// Submit a command line typed by hand
    pub async fn submit_raw(&self, line: &str) -> Result<Bytes> {
        let line = line.trim();
        self.enqueue(line, line.to_string()).await
    }

    async fn enqueue(&self, command: &str, shown: String) -> Result<Bytes> {
        if command.is_empty() {
            return Err(ProtocolError::encoding("Empty command"));
        }

        let (sender, reply) = oneshot::channel();
        let (tag, datagram) = {
            let mut pending = self.shared.pending.lock().await;
            if self.shared.closed.load(Ordering::SeqCst) {
                return Err(ProtocolError::Closed);
            }

            let tag = {
                let mut next_tag = self
                    .shared
                    .tags
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                loop {
                    let tag = next_tag();
                    if !pending.contains_key(&tag) {
                        break tag;
                    }
                    trace!("Tag {tag} already pending, regenerating");
                }
            };

            let datagram = tag_command(command, &tag);
            if datagram.len() > MAX_PACKET_SIZE {
                return Err(ProtocolError::encoding(format!(
                    "Command too large: {} bytes (max: {MAX_PACKET_SIZE})",
                    datagram.len()
                )));
            }

            pending.insert(tag.clone(), sender);
            (tag, Bytes::from(datagram))
        };

        debug!("Queued {tag}: {shown}");
        let outgoing = Outgoing {
            tag: tag.clone(),
            datagram,
        };
        if self.queue.send(outgoing).is_err() {
            self.shared.pending.lock().await.remove(&tag);
            return Err(ProtocolError::Closed);
        }

        reply.await.map_err(|_| ProtocolError::abandoned(tag))
    }

    /// Number of requests still waiting for a reply
    pub async fn pending_count(&self) -> usize {
        self.shared.pending.lock().await.len()
    }

    /// Whether the correlator has shut down
    pub fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::SeqCst)
    }

    /// Stop both tasks and release the endpoint
    ///
    /// Requests still pending complete with [`ProtocolError::Abandoned`].
    /// Calling this more than once is harmless.
    pub async fn close(&self) {
        self.shared.shut_down().await;

        let dispatcher = take_handle(&self.dispatcher);
        let receiver = take_handle(&self.receiver);

        for (name, handle) in [("dispatch", dispatcher), ("receive", receiver)] {
            if let Some(handle) = handle
                && let Err(e) = handle.await
            {
                warn!("Correlator {name} task ended abnormally: {e}");
            }
        }
        debug!("Correlator closed");
    }
}

impl Drop for Correlator {
    fn drop(&mut self) {
        self.shared.closed.store(true, Ordering::SeqCst);
        self.shared.shutdown.send_replace(true);
    }
}

fn take_handle(slot: &std::sync::Mutex<Option<JoinHandle<()>>>) -> Option<JoinHandle<()>> {
    match slot.lock() {
        Ok(mut handle) => handle.take(),
        Err(poisoned) => poisoned.into_inner().take(),
    }
}

/// Resolve once shutdown has been requested, including before the call
async fn stopped(shutdown: &mut watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}

/// Send queued datagrams in FIFO order, at most one per pacing period
async fn dispatch_loop(
    transport: Arc<dyn Datagram>,
    mut outgoing: mpsc::UnboundedReceiver<Outgoing>,
    pacing: Duration,
    shared: Arc<Shared>,
) {
    let mut shutdown = shared.shutdown.subscribe();
    let mut ticker = interval(pacing);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let next = tokio::select! {
            _ = stopped(&mut shutdown) => break,
            next = outgoing.recv() => next,
        };
        let Some(next) = next else { break };

        tokio::select! {
            _ = stopped(&mut shutdown) => break,
            _ = ticker.tick() => {}
        }

        trace!("Sending {}: {} bytes", next.tag, next.datagram.len());
        if let Err(e) = transport.send(&next.datagram).await {
            error!("Failed to send {}: {e}", next.tag);
            shared.shut_down().await;
            break;
        }
    }

    debug!("Dispatch task stopped");
}

/// Route every incoming datagram to the request carrying its tag
async fn receive_loop(transport: Arc<dyn Datagram>, shared: Arc<Shared>) {
    let mut shutdown = shared.shutdown.subscribe();

    loop {
        let received = tokio::select! {
            _ = stopped(&mut shutdown) => break,
            received = transport.recv() => received,
        };

        match received {
            Ok(data) => shared.resolve(data).await,
            Err(e) => {
                error!("Failed to receive: {e}");
                shared.shut_down().await;
                break;
            }
        }
    }

    debug!("Receive task stopped");
}
