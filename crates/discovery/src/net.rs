use std::{
    io,
    net::{IpAddr, Ipv4Addr, SocketAddr, UdpSocket},
};

use tracing::debug;

/// Never contacted: connecting a UDP socket only asks the kernel for a route.
const ROUTE_PROBE: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::new(10, 255, 255, 255)), 1);

/// Best guess at this host's LAN address, for display only.
///
/// Falls back to loopback when the host has no usable route.
pub fn local_ip() -> IpAddr {
    route_source_ip().unwrap_or_else(|e| {
        debug!("Local address lookup failed, using loopback: {}", e);
        IpAddr::V4(Ipv4Addr::LOCALHOST)
    })
}

fn route_source_ip() -> io::Result<IpAddr> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))?;
    socket.connect(ROUTE_PROBE)?;
    Ok(socket.local_addr()?.ip())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_ip_is_ipv4_and_concrete() {
        let ip = local_ip();
        assert!(ip.is_ipv4());
        assert!(!ip.is_unspecified());
    }
}
