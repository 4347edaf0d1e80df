//! Interactive line-protocol client.
//!
//! ```bash
//! ballot-client 127.0.0.1 5050 alice
//! ```

#![deny(unsafe_code)]

use bytes::BytesMut;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;

use ballot_gateway::wire;

/// Interactive client for the ballot vote server.
#[derive(Parser, Debug)]
#[command(name = "ballot-client")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server host.
    host: String,

    /// Server port.
    port: u16,

    /// User identifier to log in as.
    user_id: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut stream = TcpStream::connect((args.host.as_str(), args.port)).await?;
    let mut buf = BytesMut::with_capacity(4096);

    if let Some(welcome) = wire::read_line(&mut stream, &mut buf).await? {
        println!("{welcome}");
    }

    wire::send_line(&mut stream, &format!("HELLO {}", args.user_id)).await?;
    match wire::read_line(&mut stream, &mut buf).await? {
        Some(response) => println!("{response}"),
        None => {
            println!("[client] Disconnected");
            return Ok(());
        }
    }

    println!("Commands: vote <option> | results | ping | quit");

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    while let Some(input) = stdin.next_line().await? {
        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let lowered = input.to_ascii_lowercase();
        let command = if let Some(option) = lowered.strip_prefix("vote ") {
            format!("VOTE {}", option.trim())
        } else {
            match lowered.as_str() {
                "results" => "RESULTS".to_string(),
                "ping" => "PING".to_string(),
                "quit" => "QUIT".to_string(),
                _ => {
                    println!("Unknown. Use: vote <option> | results | ping | quit");
                    continue;
                }
            }
        };

        wire::send_line(&mut stream, &command).await?;
        match wire::read_line(&mut stream, &mut buf).await? {
            Some(response) => println!("{response}"),
            None => {
                println!("[client] Disconnected");
                break;
            }
        }

        if lowered == "quit" {
            break;
        }
    }

    Ok(())
}
