use std::sync::Arc;

use session::{SessionManager, TerminalConfirm, TransferMetadata};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let manager = SessionManager::new(Arc::new(TerminalConfirm), false);

    let mut session = manager
        .begin(TransferMetadata {
            filename: "holiday.jpg".into(),
            file_size: 3 * 1024 * 1024,
            sender: Some("demo (127.0.0.1)".into()),
        })
        .await;

    println!("📥 Incoming: {:?}", session.metadata());
    if session.confirm_receive().await? {
        session.begin_write()?;
        session.complete()?;
    }
    println!("Final state: {:?}", session.state());
    Ok(())
}

// cargo run --example confirm_session -p session
