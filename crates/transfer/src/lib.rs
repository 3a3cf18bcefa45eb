//! File push over HTTP.
//!
//! The receiver ([`TransferManager`]) accepts one `POST /` per file, asks the
//! operator before reading the body and writes it under its base name. The
//! sender side is [`send_file`].

pub mod display;
pub mod endpoint;
pub mod error;
pub mod event;
pub mod manager;
pub mod protocol;
pub mod receive;
pub mod send;

pub use error::TransferError;
pub use event::TransferEvent;
pub use manager::{ServerConfig, TransferManager};
pub use protocol::{MetadataError, TransferMetadata};
pub use receive::ReceiveOutcome;
pub use send::{send_file, Payload, ShareResponse};
