use std::{io, net::SocketAddr, path::PathBuf};

use session::SessionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransferError {
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("failed to bind transfer server on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("invalid value for header {0}")]
    InvalidHeader(&'static str),

    #[error("failed to read request body: {0}")]
    Body(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Io(#[from] io::Error),
}
