use discovery::{discover, local_ip, DiscoveryConfig, Responder};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("🚀 Discovery demo on {}\n", local_ip());

    let config = DiscoveryConfig::default();

    // Answer our own probe as well so a single machine shows one peer
    let shutdown = CancellationToken::new();
    Responder::bind(&config, "demo-device")?.spawn(shutdown.clone());

    let peers = discover(&config).await?;
    println!("🔍 {} replies", peers.len());
    for peer in &peers {
        println!("   {}", peer);
    }

    shutdown.cancel();
    Ok(())
}

// cargo run --example discover_peers -p discovery
