use std::{
    io,
    net::{Ipv4Addr, SocketAddr},
    path::PathBuf,
    sync::Arc,
};

use axum::Router;
use session::{Confirm, SessionManager};
use tokio::{net::TcpListener, sync::mpsc};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::{
    endpoint,
    error::TransferError,
    event::TransferEvent,
    protocol::DEFAULT_PORT,
    receive::ReceiveContext,
};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Where received files land. Defaults to the working directory.
    pub download_dir: PathBuf,
    /// Skip the accept prompt. Overwrites are still confirmed.
    pub auto_confirm: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            download_dir: PathBuf::from("."),
            auto_confirm: false,
        }
    }
}

/// The receiving side: an HTTP listener handling one session at a time.
pub struct TransferManager {
    listener: TcpListener,
    router: Router,
}

impl TransferManager {
    /// Bind the listener. Outcomes of every request are sent on `event_tx`.
    pub async fn bind(
        config: ServerConfig,
        confirm: Arc<dyn Confirm>,
        event_tx: mpsc::Sender<TransferEvent>,
    ) -> Result<Self, TransferError> {
        // 1. Make sure the download directory exists
        if !config.download_dir.exists() {
            tokio::fs::create_dir_all(&config.download_dir).await?;
        }

        // 2. Bind
        let listener = endpoint::make_server_listener(config.bind_addr).await?;
        let port = listener.local_addr()?.port();

        let ctx = Arc::new(ReceiveContext {
            sessions: SessionManager::new(confirm, config.auto_confirm),
            download_dir: config.download_dir,
            event_tx,
            port,
        });

        info!("Transfer server bound to {}", listener.local_addr()?);
        Ok(Self {
            listener,
            router: endpoint::make_server_router(ctx),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serve until `shutdown` fires, then let the in-flight request finish.
    pub async fn serve(self, shutdown: CancellationToken) -> Result<(), TransferError> {
        let service = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(self.listener, service)
            .with_graceful_shutdown(shutdown.cancelled_owned())
            .await?;

        info!("Transfer server stopped");
        Ok(())
    }
}
