use std::{net::Ipv4Addr, time::Duration};

pub const DEFAULT_GROUP: Ipv4Addr = Ipv4Addr::new(224, 1, 1, 2);
pub const DEFAULT_MULTICAST_PORT: u16 = 5008;
pub const DEFAULT_DISCOVERY_PORT: u16 = 5009;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Where probes go and how long a client waits for replies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryConfig {
    /// Multicast group probes are sent to and responders join.
    pub group: Ipv4Addr,
    /// Port responders listen on.
    pub multicast_port: u16,
    /// Local port a client sends probes from and receives replies on.
    pub unicast_port: u16,
    /// Length of the collection window.
    pub timeout: Duration,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            group: DEFAULT_GROUP,
            multicast_port: DEFAULT_MULTICAST_PORT,
            unicast_port: DEFAULT_DISCOVERY_PORT,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}
