use std::net::{Ipv4Addr, SocketAddr};

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;
use tracing::debug;

use crate::{config::DiscoveryConfig, error::DiscoveryError};

/// Socket a responder listens on: `0.0.0.0:<multicast_port>`, shared with
/// other responders on the host, member of the discovery group.
pub(crate) fn responder_socket(config: &DiscoveryConfig) -> Result<UdpSocket, DiscoveryError> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.multicast_port));
    let socket = new_udp_socket()?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;

    bind(&socket, addr)?;
    join_group(&socket, config.group)?;
    into_tokio(socket)
}

/// Socket a client probes from: `0.0.0.0:<unicast_port>`. No address reuse,
/// so a port held by another process fails here instead of silently sharing.
pub(crate) fn client_socket(config: &DiscoveryConfig) -> Result<UdpSocket, DiscoveryError> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.unicast_port));
    let socket = new_udp_socket()?;

    bind(&socket, addr)?;
    join_group(&socket, config.group)?;
    into_tokio(socket)
}

fn new_udp_socket() -> Result<Socket, DiscoveryError> {
    Ok(Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?)
}

fn bind(socket: &Socket, addr: SocketAddr) -> Result<(), DiscoveryError> {
    socket
        .bind(&addr.into())
        .map_err(|source| DiscoveryError::Bind { addr, source })
}

fn join_group(socket: &Socket, group: Ipv4Addr) -> Result<(), DiscoveryError> {
    if !group.is_multicast() {
        debug!("{} is not a multicast group, skipping membership", group);
        return Ok(());
    }

    socket
        .join_multicast_v4(&group, &Ipv4Addr::UNSPECIFIED)
        .map_err(|source| DiscoveryError::JoinMulticast { group, source })
}

fn into_tokio(socket: Socket) -> Result<UdpSocket, DiscoveryError> {
    // tokio requires non-blocking mode
    socket.set_nonblocking(true)?;
    Ok(UdpSocket::from_std(socket.into())?)
}
