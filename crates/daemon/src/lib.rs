//! The long-running side of mounty.
//!
//! [`ListenDaemon`] owns the discovery responder and the transfer server for
//! one `listen` invocation; [`Registry`] holds the announced display name.

mod core;
pub mod registry;

pub use crate::core::{ListenConfig, ListenDaemon, SHUTDOWN_GRACE};
pub use registry::Registry;
