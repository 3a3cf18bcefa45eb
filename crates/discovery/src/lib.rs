//! Zero-configuration peer discovery.
//!
//! A [`Responder`] sits on the well-known multicast group and answers probes
//! with its display name; [`discover`] sends one probe and gathers the
//! replies for a fixed window.

pub mod client;
pub mod config;
pub mod error;
pub mod net;
pub mod responder;
mod socket;
pub mod wire;

pub use client::{discover, PeerRecord};
pub use config::DiscoveryConfig;
pub use error::DiscoveryError;
pub use net::local_ip;
pub use responder::Responder;
pub use wire::DiscoveryMessage;

pub(crate) const RECV_BUFFER_SIZE: usize = 1024;
