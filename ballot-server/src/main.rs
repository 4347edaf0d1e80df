//! Ballot vote server binary.
//!
//! ```bash
//! # Defaults: port 5050, ./audit.log, options A,B,C
//! ballot-server
//!
//! # Explicit port and audit log (positional, in that order):
//! ballot-server 6000 /var/lib/ballot/audit.log --options YES,NO,ABSTAIN
//! ```

#![deny(unsafe_code)]

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use ballot_core::OptionSet;
use ballot_server::{ServerConfig, VoteServer};

/// Ballot vote-recording server.
#[derive(Parser, Debug)]
#[command(name = "ballot-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on.
    #[arg(default_value_t = 5050)]
    port: u16,

    /// Path of the append-only audit log.
    #[arg(default_value = "audit.log")]
    audit_log: PathBuf,

    /// Address to bind to.
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    host: IpAddr,

    /// Ballot options as a comma-separated list.
    #[arg(long, default_value = "A,B,C")]
    options: OptionSet,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = ServerConfig::new(SocketAddr::new(args.host, args.port))
        .with_audit_path(args.audit_log)
        .with_options(args.options);

    VoteServer::new(config).run().await?;
    Ok(())
}
