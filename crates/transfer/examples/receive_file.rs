use std::sync::Arc;

use session::TerminalConfirm;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use transfer::{ServerConfig, TransferManager};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (event_tx, mut event_rx) = mpsc::channel(16);
    let manager =
        TransferManager::bind(ServerConfig::default(), Arc::new(TerminalConfirm), event_tx).await?;
    println!("listening on {}", manager.local_addr()?);

    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            println!("event: {:?}", event);
        }
    });

    manager.serve(CancellationToken::new()).await?;
    Ok(())
}

// cargo run --example receive_file -p transfer
