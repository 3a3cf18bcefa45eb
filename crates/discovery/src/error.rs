use std::{
    io,
    net::{Ipv4Addr, SocketAddr},
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("failed to bind discovery socket on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("failed to join multicast group {group}: {source}")]
    JoinMulticast {
        group: Ipv4Addr,
        #[source]
        source: io::Error,
    },

    #[error("discovery socket error: {0}")]
    Io(#[from] io::Error),
}
