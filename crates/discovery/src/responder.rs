use std::{io, net::SocketAddr};

use tokio::{net::UdpSocket, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    config::DiscoveryConfig,
    error::DiscoveryError,
    wire::{self, DiscoveryMessage},
    RECV_BUFFER_SIZE,
};

/// Answers discovery probes with this host's display name.
///
/// The name is captured when the responder is bound and never re-read, so a
/// later `register` only takes effect after a restart.
pub struct Responder {
    socket: UdpSocket,
    reply: Vec<u8>,
}

impl Responder {
    /// Bind the well-known discovery port and join the group.
    ///
    /// Must be called from inside a tokio runtime.
    pub fn bind(config: &DiscoveryConfig, display_name: &str) -> Result<Self, DiscoveryError> {
        let socket = crate::socket::responder_socket(config)?;
        info!(
            "Discovery responder bound to {} (group {})",
            socket.local_addr()?,
            config.group
        );

        Ok(Self {
            socket,
            reply: wire::encode_reply(display_name),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Run the receive loop on a background task until `shutdown` fires.
    pub fn spawn(self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }

    /// Receive loop. Returns, dropping the socket, once `shutdown` is cancelled.
    pub async fn run(self, shutdown: CancellationToken) {
        let mut buf = [0u8; RECV_BUFFER_SIZE];

        loop {
            let (len, from) = tokio::select! {
                _ = shutdown.cancelled() => break,
                received = self.socket.recv_from(&mut buf) => match received {
                    Ok(received) => received,
                    Err(e) => {
                        warn!("Discovery recv error: {:?}", e);
                        continue;
                    }
                },
            };

            if let Some(reply) = self.answer(&buf[..len]) {
                debug!("Probe from {}, replying", from);
                if let Err(e) = self.socket.send_to(reply, from).await {
                    warn!("Failed to reply to {}: {}", from, e);
                }
            } else {
                debug!("Ignoring {} byte datagram from {}", len, from);
            }
        }

        info!("Discovery responder stopped");
    }

    /// The reply owed for `payload`, if any.
    fn answer(&self, payload: &[u8]) -> Option<&[u8]> {
        match DiscoveryMessage::parse(payload) {
            DiscoveryMessage::Probe => Some(&self.reply),
            _ => None,
        }
    }
}
