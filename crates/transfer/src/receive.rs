use std::{
    io,
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use session::{ActiveSession, SessionManager};
use tokio::{
    fs::OpenOptions,
    io::{AsyncWriteExt, BufWriter},
    sync::mpsc,
};
use tracing::{debug, warn};

use crate::{
    display,
    error::TransferError,
    event::TransferEvent,
    protocol::{self, MetadataError, CHUNK_SIZE},
};

/// Shared by every request the server handles.
pub(crate) struct ReceiveContext {
    pub(crate) sessions: SessionManager,
    pub(crate) download_dir: PathBuf,
    pub(crate) event_tx: mpsc::Sender<TransferEvent>,
    pub(crate) port: u16,
}

/// How one request ended.
#[derive(Debug)]
pub enum ReceiveOutcome {
    Saved {
        file_name: String,
        file_path: PathBuf,
        bytes: u64,
        elapsed: Duration,
        sender: String,
    },
    BadRequest(MetadataError),
    Rejected {
        file_name: String,
        sender: String,
    },
    NotSaved {
        file_name: String,
        sender: String,
    },
    Failed(TransferError),
}

impl ReceiveOutcome {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Saved { .. } => protocol::STATUS_SAVED,
            Self::BadRequest(_) => protocol::STATUS_BAD_REQUEST,
            Self::Rejected { .. } => protocol::STATUS_REJECTED,
            Self::NotSaved { .. } => protocol::STATUS_NOT_SAVED,
            Self::Failed(TransferError::Body(_)) => StatusCode::BAD_REQUEST,
            Self::Failed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Saved { .. } => "File received".to_string(),
            Self::BadRequest(e) => e.to_string(),
            Self::Rejected { .. } => "Transfer rejected".to_string(),
            Self::NotSaved { .. } => "File not saved".to_string(),
            Self::Failed(e) => e.to_string(),
        }
    }

    fn into_event(self, sender_addr: SocketAddr) -> TransferEvent {
        match self {
            Self::Saved {
                file_name,
                file_path,
                bytes,
                elapsed,
                sender,
            } => TransferEvent::FileReceived {
                file_name,
                file_size: bytes,
                file_path,
                elapsed,
                sender,
            },
            Self::BadRequest(e) => TransferEvent::BadRequest {
                reason: e.to_string(),
                sender_addr,
            },
            Self::Rejected { file_name, sender } => TransferEvent::Rejected { file_name, sender },
            Self::NotSaved { file_name, sender } => TransferEvent::NotSaved { file_name, sender },
            Self::Failed(e) => TransferEvent::ReceiveFailed {
                error: e.to_string(),
                sender_addr,
            },
        }
    }
}

/// `POST /` handler.
pub(crate) async fn handle_push(
    State(ctx): State<Arc<ReceiveContext>>,
    ConnectInfo(sender_addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Body,
) -> Response {
    let outcome = receive(&ctx, sender_addr, &headers, body).await;
    let response = (outcome.status(), outcome.message()).into_response();

    let _ = ctx.event_tx.send(outcome.into_event(sender_addr)).await;

    // Every response path leaves the operator with the banner again
    display::print_listening(SocketAddr::new(discovery::local_ip(), ctx.port));
    response
}

async fn receive(
    ctx: &ReceiveContext,
    sender_addr: SocketAddr,
    headers: &HeaderMap,
    body: Body,
) -> ReceiveOutcome {
    // 1. Metadata
    let metadata = match protocol::metadata_from_headers(headers) {
        Ok(metadata) => metadata,
        Err(e) => return ReceiveOutcome::BadRequest(e),
    };

    // 2. Wait for our turn at the terminal
    let mut session = ctx.sessions.begin(metadata).await;
    match run_session(ctx, &mut session, sender_addr, body).await {
        Ok(outcome) => outcome,
        Err(e) => {
            session.abort();
            ReceiveOutcome::Failed(e)
        }
    }
}

async fn run_session(
    ctx: &ReceiveContext,
    session: &mut ActiveSession<'_>,
    sender_addr: SocketAddr,
    body: Body,
) -> Result<ReceiveOutcome, TransferError> {
    let file_name = session.metadata().filename.clone();
    let declared_size = session.metadata().file_size;
    let sender = session
        .metadata()
        .sender
        .clone()
        .unwrap_or_else(|| sender_addr.to_string());

    // 3. Summary and accept gate
    display::print_incoming(&file_name, declared_size, &sender);
    if !session.confirm_receive().await? {
        return Ok(ReceiveOutcome::Rejected { file_name, sender });
    }

    // 4. Collision check. Only decides which prompt to show; the write below
    //    refuses to clobber a file that was not confirmed for overwrite.
    let file_path = ctx.download_dir.join(&file_name);
    let overwrite = if tokio::fs::try_exists(&file_path).await.unwrap_or(false) {
        if !session.confirm_overwrite().await? {
            return Ok(ReceiveOutcome::NotSaved { file_name, sender });
        }
        true
    } else {
        false
    };

    // 5. Buffer the whole body, then write it out in chunks
    let started = Instant::now();
    let data = axum::body::to_bytes(body, usize::MAX)
        .await
        .map_err(|e| TransferError::Body(e.to_string()))?;
    if data.len() as u64 != declared_size {
        warn!(
            "{} declared {} bytes but sent {}",
            file_name,
            declared_size,
            data.len()
        );
    }

    session.begin_write()?;
    match write_chunks(&file_path, &data, overwrite).await {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            warn!("{} appeared before it could be written", file_path.display());
            session.abort();
            return Ok(ReceiveOutcome::NotSaved { file_name, sender });
        }
        Err(e) => return Err(e.into()),
    }
    let elapsed = started.elapsed();
    session.complete()?;

    let bytes = data.len() as u64;
    display::print_download_stats(bytes, elapsed);

    Ok(ReceiveOutcome::Saved {
        file_name,
        file_path,
        bytes,
        elapsed,
        sender,
    })
}

/// Write `data` to `path` in [`CHUNK_SIZE`] pieces, ticking a progress bar.
///
/// Without `overwrite` the file is created exclusively and an existing one
/// yields `AlreadyExists`.
async fn write_chunks(path: &Path, data: &[u8], overwrite: bool) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true);
    if overwrite {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }

    let mut writer = BufWriter::new(options.open(path).await?);
    let progress = display::chunk_progress(data.len().div_ceil(CHUNK_SIZE) as u64);

    for chunk in data.chunks(CHUNK_SIZE) {
        writer.write_all(chunk).await?;
        progress.inc(1);
    }
    writer.flush().await?;
    progress.finish();

    debug!("Wrote {} bytes to {}", data.len(), path.display());
    Ok(())
}
