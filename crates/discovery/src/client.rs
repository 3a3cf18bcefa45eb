use std::{fmt, net::SocketAddr};

use serde::Serialize;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info};

use crate::{
    config::DiscoveryConfig,
    error::DiscoveryError,
    wire::{self, DiscoveryMessage},
    RECV_BUFFER_SIZE,
};

/// A responder heard during one discovery round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeerRecord {
    /// Name the responder announced, if it sent one.
    pub name: Option<String>,
    /// Source address of the reply datagram. Never taken from the payload.
    pub addr: SocketAddr,
}

impl PeerRecord {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed")
    }
}

impl fmt::Display for PeerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name(), self.addr.ip())
    }
}

/// Multicast one probe and collect every reply that arrives within
/// `config.timeout`.
///
/// Always waits out the whole window. Replies are kept in arrival order and
/// duplicates are not collapsed.
pub async fn discover(config: &DiscoveryConfig) -> Result<Vec<PeerRecord>, DiscoveryError> {
    // 1. Bind the reply port first so a port conflict fails before anything is sent
    let socket = crate::socket::client_socket(config)?;
    let deadline = Instant::now() + config.timeout;

    // 2. Probe the group
    let target = SocketAddr::from((config.group, config.multicast_port));
    socket.send_to(wire::PROBE, target).await?;
    info!("Sent discovery probe to {}", target);

    // 3. Collect replies until the window closes
    let mut peers = Vec::new();
    let mut buf = [0u8; RECV_BUFFER_SIZE];
    while let Ok(received) = timeout_at(deadline, socket.recv_from(&mut buf)).await {
        let (len, addr) = match received {
            Ok(received) => received,
            Err(e) => {
                debug!("Discovery recv error: {:?}", e);
                continue;
            }
        };

        match DiscoveryMessage::parse(&buf[..len]) {
            DiscoveryMessage::Reply { name } => {
                debug!("Reply from {}: {:?}", addr, name);
                peers.push(PeerRecord { name, addr });
            }
            other => debug!("Dropping {:?} from {}", other, addr),
        }
    }

    info!("Discovery finished with {} replies", peers.len());
    Ok(peers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unnamed_peer_display() {
        let peer = PeerRecord {
            name: None,
            addr: "192.168.1.20:5008".parse().unwrap(),
        };
        assert_eq!(peer.to_string(), "unnamed (192.168.1.20)");
    }

    #[test]
    fn named_peer_display() {
        let peer = PeerRecord {
            name: Some("attic".into()),
            addr: "10.0.0.7:5008".parse().unwrap(),
        };
        assert_eq!(peer.display_name(), "attic");
        assert_eq!(peer.to_string(), "attic (10.0.0.7)");
    }
}
