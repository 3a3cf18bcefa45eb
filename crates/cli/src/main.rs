//! `mounty`: find devices on the local network and push files to them.

mod commands;
mod select;

use std::{
    net::{IpAddr, Ipv4Addr},
    path::PathBuf,
    process::ExitCode,
    time::Duration,
};

use clap::{Args, Parser, Subcommand};
use discovery::config::{DEFAULT_DISCOVERY_PORT, DEFAULT_GROUP, DEFAULT_MULTICAST_PORT};
use transfer::{display, protocol::DEFAULT_PORT};

#[derive(Parser, Debug)]
#[command(name = "mounty", version)]
#[command(about = "Mounty: simple file sharing over the local network", long_about = None)]
struct Cli {
    #[command(flatten)]
    network: NetworkArgs,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone)]
struct NetworkArgs {
    /// Multicast group used for discovery
    #[arg(long, global = true, env = "MOUNTY_MCAST_GROUP", default_value_t = DEFAULT_GROUP)]
    group: Ipv4Addr,

    /// Port listeners answer discovery probes on
    #[arg(long, global = true, env = "MOUNTY_DISCOVERY_MCAST_PORT", default_value_t = DEFAULT_MULTICAST_PORT)]
    mcast_port: u16,

    /// Local port discovery replies arrive on
    #[arg(long, global = true, env = "MOUNTY_DISCOVERY_PORT", default_value_t = DEFAULT_DISCOVERY_PORT)]
    discovery_port: u16,

    /// Seconds to wait for discovery replies
    #[arg(long, global = true, env = "MOUNTY_DISCOVERY_TIMEOUT", default_value = "1", value_parser = parse_timeout)]
    timeout: Duration,

    /// File holding this device's registered name
    #[arg(long, global = true, env = "MOUNTY_REGISTRY")]
    registry: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Listen for incoming files
    Listen {
        /// Port to listen on
        #[arg(default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Automatically accept incoming files
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },

    /// Share a file with another device (reads standard input without a filename)
    Share {
        /// File to share
        filename: Option<PathBuf>,

        /// Port the receiver listens on
        #[arg(default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Skip discovery and send to this address
        #[arg(long)]
        to: Option<IpAddr>,
    },

    /// Discover devices on the local network
    Discover {
        /// Print the replies as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Register the name this device is announced under
    Register {
        /// Display name
        name: String,
    },
}

fn parse_timeout(s: &str) -> Result<Duration, String> {
    let secs: f64 = s.parse().map_err(|_| format!("not a number: {s}"))?;
    Duration::try_from_secs_f64(secs).map_err(|e| e.to_string())
}

fn init_tracing(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            display::print_error(format!("failed to start runtime: {e}"));
            return ExitCode::FAILURE;
        }
    };

    let result = runtime.block_on(commands::run(cli));
    // An abandoned terminal prompt must not keep the process alive
    runtime.shutdown_timeout(Duration::from_millis(100));

    match result {
        Ok(code) => code,
        Err(e) => {
            display::print_error(format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
