//! Ballot HTTP gateway binary.
//!
//! ```bash
//! # Single backend on the default address:
//! ballot-gateway
//!
//! # Prioritized failover chain:
//! ballot-gateway --backend vote1:5050 --backend vote2:5050 --listen 0.0.0.0:8080
//! ```

#![deny(unsafe_code)]

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use ballot_gateway::{router, FailoverClient};

/// HTTP-to-TCP gateway for the ballot voting system.
#[derive(Parser, Debug)]
#[command(name = "ballot-gateway")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to serve HTTP on.
    #[arg(long, default_value = "0.0.0.0:8080")]
    listen: SocketAddr,

    /// Backend vote server address (`host:port`), highest priority first.
    /// Can be repeated.
    #[arg(long = "backend", default_value = "127.0.0.1:5050")]
    backends: Vec<String>,

    /// Connect/read timeout per backend, in milliseconds.
    #[arg(long, default_value_t = 3000)]
    timeout_ms: u64,

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

    let client = FailoverClient::new(args.backends)
        .with_timeout(Duration::from_millis(args.timeout_ms));
    info!(
        listen = %args.listen,
        backends = ?client.backends(),
        "gateway starting"
    );

    let listener = tokio::net::TcpListener::bind(args.listen).await?;
    axum::serve(listener, router(client)).await?;
    Ok(())
}
