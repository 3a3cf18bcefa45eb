use std::{net::SocketAddr, path::PathBuf, time::Duration};

/// What happened to one inbound request.
#[derive(Debug, Clone)]
pub enum TransferEvent {
    FileReceived {
        file_name: String,
        file_size: u64,
        file_path: PathBuf,
        elapsed: Duration,
        sender: String,
    },

    Rejected {
        file_name: String,
        sender: String,
    },

    NotSaved {
        file_name: String,
        sender: String,
    },

    BadRequest {
        reason: String,
        sender_addr: SocketAddr,
    },

    ReceiveFailed {
        error: String,
        sender_addr: SocketAddr,
    },
}
