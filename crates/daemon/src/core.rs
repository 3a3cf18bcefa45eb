use std::{io, net::SocketAddr, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use discovery::{DiscoveryConfig, Responder};
use session::Confirm;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use transfer::{
    display::{self, Color},
    ServerConfig, TransferEvent, TransferManager,
};

/// How long an interrupted listener waits for an in-flight request.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Default)]
pub struct ListenConfig {
    pub discovery: DiscoveryConfig,
    pub server: ServerConfig,
}

/// The `listen` process: a discovery responder and a transfer server sharing
/// one lifetime.
pub struct ListenDaemon {
    responder: Responder,
    transfer: TransferManager,
    transfer_rx: mpsc::Receiver<TransferEvent>,
    device_name: String,
}

impl ListenDaemon {
    /// Bind both sockets. Either failing is fatal to `listen`.
    ///
    /// `device_name` is announced for the whole process lifetime.
    pub async fn bind(
        config: ListenConfig,
        device_name: String,
        confirm: Arc<dyn Confirm>,
    ) -> Result<Self> {
        info!("Device name: {}", device_name);
        info!("Download dir: {}", config.server.download_dir.display());

        // 1. Discovery responder
        let responder = Responder::bind(&config.discovery, &device_name)
            .context("failed to start discovery responder")?;

        // 2. Transfer server
        let (transfer_tx, transfer_rx) = mpsc::channel(100);
        let transfer = TransferManager::bind(config.server, confirm, transfer_tx)
            .await
            .context("failed to start transfer server")?;

        Ok(Self {
            responder,
            transfer,
            transfer_rx,
            device_name,
        })
    }

    pub fn transfer_addr(&self) -> io::Result<SocketAddr> {
        self.transfer.local_addr()
    }

    pub fn discovery_addr(&self) -> io::Result<SocketAddr> {
        self.responder.local_addr()
    }

    /// Serve until `shutdown` fires or the server stops on its own. The
    /// responder is stopped and its socket closed before this returns.
    pub async fn run(self, shutdown: CancellationToken) -> Result<()> {
        let port = self.transfer.local_addr()?.port();
        println!(
            "🗻 {} {} {}",
            display::bold("Mounty is listening on:"),
            display::colored(SocketAddr::new(discovery::local_ip(), port), Color::Green),
            display::colored(format!("as {}", self.device_name), Color::Blue),
        );

        let responder = self.responder.spawn(shutdown.child_token());
        let mut server = tokio::spawn(self.transfer.serve(shutdown.clone()));
        let mut transfer_rx = self.transfer_rx;

        let joined = loop {
            tokio::select! {
                Some(event) = transfer_rx.recv() => log_event(&event),
                joined = &mut server => break joined,
            }
        };

        // the server may have stopped on its own; take the responder down too
        shutdown.cancel();
        if let Err(e) = responder.await {
            warn!("Discovery responder task failed: {}", e);
        }

        joined
            .context("transfer server task failed")?
            .context("transfer server stopped with an error")?;
        Ok(())
    }

    /// [`run`](Self::run) until Ctrl-C, then shut down within
    /// [`SHUTDOWN_GRACE`]. A request stuck on an operator prompt is abandoned.
    pub async fn run_until_interrupted(self) -> Result<()> {
        let shutdown = CancellationToken::new();
        let mut run = tokio::spawn(self.run(shutdown.clone()));

        tokio::select! {
            joined = &mut run => return joined.context("listener task failed")?,
            signal = tokio::signal::ctrl_c() => {
                signal.context("failed to listen for Ctrl-C")?;
            }
        }

        println!("\nShutting down...");
        shutdown.cancel();
        match tokio::time::timeout(SHUTDOWN_GRACE, run).await {
            Ok(joined) => joined.context("listener task failed")?,
            Err(_) => {
                warn!("Listener did not stop within {:?}", SHUTDOWN_GRACE);
                Ok(())
            }
        }
    }
}

fn log_event(event: &TransferEvent) {
    match event {
        TransferEvent::FileReceived {
            file_name,
            file_size,
            file_path,
            elapsed,
            sender,
        } => {
            info!(
                "📥 Received {} ({} bytes) from {} in {:?} -> {}",
                file_name,
                file_size,
                sender,
                elapsed,
                file_path.display()
            );
        }
        TransferEvent::Rejected { file_name, sender } => {
            info!("🚫 Rejected {} from {}", file_name, sender);
        }
        TransferEvent::NotSaved { file_name, sender } => {
            info!("📄 Kept existing {}, declined copy from {}", file_name, sender);
        }
        TransferEvent::BadRequest {
            reason,
            sender_addr,
        } => {
            warn!("Bad request from {}: {}", sender_addr, reason);
        }
        TransferEvent::ReceiveFailed { error, sender_addr } => {
            error!("❌ Receive from {} failed: {}", sender_addr, error);
        }
    }
}
