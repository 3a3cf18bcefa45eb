use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};

use anyhow::{Context, Result};
use daemon::{ListenConfig, ListenDaemon, Registry};
use discovery::{discover, DiscoveryConfig, PeerRecord};
use session::TerminalConfirm;
use tracing::info;
use transfer::{
    display::{self, bold, colored, Color},
    endpoint::make_client,
    protocol::sender_descriptor,
    send_file, Payload, ServerConfig, TransferError,
};

use crate::{
    select::{select_device, Selection},
    Cli, Commands, NetworkArgs,
};

/// Everything resolved once at startup and handed to the command.
struct CommandContext {
    discovery: DiscoveryConfig,
    registry: Registry,
}

impl CommandContext {
    fn from_args(network: NetworkArgs) -> Self {
        Self {
            discovery: DiscoveryConfig {
                group: network.group,
                multicast_port: network.mcast_port,
                unicast_port: network.discovery_port,
                timeout: network.timeout,
            },
            registry: Registry::new(network.registry.unwrap_or_else(Registry::default_path)),
        }
    }
}

pub async fn run(cli: Cli) -> Result<ExitCode> {
    let ctx = CommandContext::from_args(cli.network);

    match cli.command {
        Commands::Listen { port, yes } => listen(&ctx, port, yes).await,
        Commands::Share { filename, port, to } => share(&ctx, filename.as_deref(), port, to).await,
        Commands::Discover { json } => discover_devices(&ctx, json).await,
        Commands::Register { name } => register(&ctx, &name),
    }
}

async fn listen(ctx: &CommandContext, port: u16, auto_confirm: bool) -> Result<ExitCode> {
    let config = ListenConfig {
        discovery: ctx.discovery.clone(),
        server: ServerConfig {
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)),
            download_dir: PathBuf::from("."),
            auto_confirm,
        },
    };

    let daemon = ListenDaemon::bind(
        config,
        ctx.registry.display_name(),
        Arc::new(TerminalConfirm),
    )
    .await?;
    daemon.run_until_interrupted().await?;
    Ok(ExitCode::SUCCESS)
}

async fn share(
    ctx: &CommandContext,
    filename: Option<&Path>,
    port: u16,
    to: Option<IpAddr>,
) -> Result<ExitCode> {
    // 1. Payload first, so a missing file fails before any network activity
    let payload = match filename {
        Some(path) => match Payload::from_path(path).await {
            Ok(payload) => payload,
            Err(TransferError::FileNotFound(_)) => {
                display::print_error("File not found.");
                return Ok(ExitCode::FAILURE);
            }
            Err(e) => return Err(e).context("failed to open file"),
        },
        None => Payload::from_stdin()
            .await
            .context("failed to read standard input")?,
    };
    println!(
        "🗻 {} {}",
        bold("Mounty is sharing:"),
        colored(payload.file_name(), Color::Green)
    );

    // 2. Destination
    let ip = match to {
        Some(ip) => ip,
        None => {
            let peers = discover(&ctx.discovery).await.context("discovery failed")?;
            match select_device(&peers)? {
                Selection::Chosen(peer) => peer.addr.ip(),
                Selection::NoDevices => {
                    display::print_error("No devices found.");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
    };
    let target = SocketAddr::new(ip, port);
    display::print_outgoing(payload.file_name(), payload.len(), target);

    // 3. Push. Transport failures are reported, not propagated.
    let client = make_client()?;
    let sender = sender_descriptor(&ctx.registry.display_name());
    match send_file(&client, target, payload, &sender).await {
        Ok(response) => {
            info!("Share to {} finished with {}", target, response.status);
            println!(
                "{} {} {}",
                bold("Response:"),
                colored(response.status.as_u16(), Color::Blue),
                colored(response.reason(), Color::Blue)
            );
        }
        Err(e) => display::print_error(e),
    }
    Ok(ExitCode::SUCCESS)
}

async fn discover_devices(ctx: &CommandContext, json: bool) -> Result<ExitCode> {
    let peers = discover(&ctx.discovery).await.context("discovery failed")?;

    if json {
        println!("{}", peers_json(&peers)?);
    } else if peers.is_empty() {
        println!("{}", bold("No devices found."));
    } else {
        println!("{}", bold("Devices:"));
        for peer in &peers {
            println!("  {}", peer);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn peers_json(peers: &[PeerRecord]) -> Result<String> {
    serde_json::to_string_pretty(peers).context("failed to encode discovery results")
}

fn register(ctx: &CommandContext, name: &str) -> Result<ExitCode> {
    ctx.registry.register(name)?;
    println!(
        "{} {}",
        bold("Registered as:"),
        colored(name.trim(), Color::Green)
    );
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peers_json_keeps_order_and_unnamed_peers() {
        let peers = [
            PeerRecord {
                name: Some("attic".into()),
                addr: "10.0.0.7:5008".parse().unwrap(),
            },
            PeerRecord {
                name: None,
                addr: "10.0.0.9:5008".parse().unwrap(),
            },
        ];

        let value: serde_json::Value = serde_json::from_str(&peers_json(&peers).unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!([
                { "name": "attic", "addr": "10.0.0.7:5008" },
                { "name": null, "addr": "10.0.0.9:5008" }
            ])
        );
    }

    #[test]
    fn no_peers_is_an_empty_array() {
        assert_eq!(peers_json(&[]).unwrap(), "[]");
    }
}
