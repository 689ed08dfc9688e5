//! Scripted UDP server on the loopback interface

use super::{Responder, SentCommand};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;

/// A UDP server answering through a responder
///
/// Used where the client under test opens its own socket, such as the CLI
/// binary.
pub struct MockServer {
    addr: SocketAddr,
    received: Arc<Mutex<Vec<SentCommand>>>,
    task: JoinHandle<()>,
}

impl MockServer {
    /// Bind to an ephemeral loopback port and start answering
    pub async fn start(
        responder: impl Fn(&SentCommand) -> Option<String> + Send + Sync + 'static,
    ) -> std::io::Result<Self> {
        let socket = UdpSocket::bind("127.0.0.1:0").await?;
        let addr = socket.local_addr()?;
        let received = Arc::new(Mutex::new(Vec::new()));
        let responder: Responder = Arc::new(responder);

        let task = tokio::spawn({
            let received = Arc::clone(&received);
            async move {
                let mut buffer = vec![0u8; 65_507];
                while let Ok((size, peer)) = socket.recv_from(&mut buffer).await {
                    let command = SentCommand::parse(&String::from_utf8_lossy(&buffer[..size]));
                    received.lock().unwrap().push(command.clone());

                    if let Some(body) = responder(&command) {
                        let _ = socket.send_to(command.tagged(&body).as_bytes(), peer).await;
                    }
                }
            }
        });

        Ok(Self {
            addr,
            received,
            task,
        })
    }

    /// Address the server listens on
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Commands received so far
    pub fn received(&self) -> Vec<SentCommand> {
        self.received.lock().unwrap().clone()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
