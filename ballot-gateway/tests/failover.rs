//! Integration tests for backend failover.
//!
//! Each test stands up mock vote-server backends speaking just enough of
//! the line protocol, and drives the real client over real sockets.

use std::time::Duration;

use bytes::BytesMut;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

use ballot_gateway::{wire, FailoverClient, GatewayError};

/// Spawns a protocol-complete mock backend whose `RESULTS` line is
/// `results_line`, so tests can tell backends apart.
async fn spawn_backend(results_line: &'static str) -> (String, tokio::task::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    let handle = tokio::spawn(async move {
        loop {
            let Ok((mut stream, _peer)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let mut buf = BytesMut::with_capacity(1024);
                let _ = stream.write_all(b"OK Welcome. Use: HELLO <userId>\n").await;
                while let Ok(Some(line)) = wire::read_line(&mut stream, &mut buf).await {
                    let response = if line.starts_with("HELLO ") {
                        "OK Hello tester. Options: A,B,C"
                    } else if line.starts_with("VOTE ") {
                        "OK vote_recorded"
                    } else if line == "RESULTS" {
                        results_line
                    } else {
                        "ERR unknown_command"
                    };
                    if wire::send_line(&mut stream, response).await.is_err() {
                        break;
                    }
                }
            });
        }
    });

    (addr, handle)
}

/// An address nothing is listening on.
async fn dead_addr() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    drop(listener);
    addr
}

/// A backend that greets and then immediately hangs up.
async fn spawn_flaky_backend() -> (String, tokio::task::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    let handle = tokio::spawn(async move {
        loop {
            let Ok((mut stream, _peer)) = listener.accept().await else {
                break;
            };
            let _ = stream.write_all(b"OK Welcome. Use: HELLO <userId>\n").await;
            drop(stream);
        }
    });

    (addr, handle)
}

fn commands(list: &[&str]) -> Vec<String> {
    list.iter().map(|c| (*c).to_string()).collect()
}

#[tokio::test]
async fn test_empty_backend_list_is_a_configuration_error() {
    let client = FailoverClient::new(Vec::new());
    let err = client.send(&commands(&["RESULTS"])).await.unwrap_err();
    assert!(matches!(err, GatewayError::NoBackends));
}

#[tokio::test]
async fn test_single_backend_responses_in_order() {
    let (addr, backend) = spawn_backend("RESULTS A=1 B=0 C=0").await;

    let client = FailoverClient::new(vec![addr]);
    let responses = client
        .send(&commands(&["HELLO alice", "VOTE A", "RESULTS"]))
        .await
        .unwrap();
    assert_eq!(
        responses,
        vec![
            "OK Hello tester. Options: A,B,C",
            "OK vote_recorded",
            "RESULTS A=1 B=0 C=0",
        ]
    );

    backend.abort();
}

#[tokio::test]
async fn test_failover_skips_dead_primary() {
    let primary = dead_addr().await;
    let (secondary, backend) = spawn_backend("RESULTS A=7 B=0 C=0").await;

    let client = FailoverClient::new(vec![primary, secondary]);
    // The caller sees the secondary's answer, not the primary's failure.
    let responses = client.send(&commands(&["RESULTS"])).await.unwrap();
    assert_eq!(responses, vec!["RESULTS A=7 B=0 C=0"]);

    backend.abort();
}

#[tokio::test]
async fn test_all_backends_failing_surfaces_last_failure() {
    let first = dead_addr().await;
    let second = dead_addr().await;

    let client = FailoverClient::new(vec![first, second.clone()])
        .with_timeout(Duration::from_millis(500));
    let err = client.send(&commands(&["RESULTS"])).await.unwrap_err();
    match err {
        GatewayError::ConnectFailed { backend, .. } | GatewayError::Timeout { backend, .. } => {
            assert_eq!(backend, second);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_mid_sequence_failure_abandons_backend_entirely() {
    let (flaky, flaky_handle) = spawn_flaky_backend().await;
    let (healthy, healthy_handle) = spawn_backend("RESULTS A=0 B=2 C=0").await;

    let client = FailoverClient::new(vec![flaky, healthy]);
    // The flaky backend greets and dies; every response must still come
    // from the healthy one, never a mix.
    let responses = client
        .send(&commands(&["HELLO bob", "VOTE B", "RESULTS"]))
        .await
        .unwrap();
    assert_eq!(
        responses,
        vec![
            "OK Hello tester. Options: A,B,C",
            "OK vote_recorded",
            "RESULTS A=0 B=2 C=0",
        ]
    );

    flaky_handle.abort();
    healthy_handle.abort();
}

#[tokio::test]
async fn test_silent_backend_times_out() {
    // Accepts but never sends the welcome line.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    let silent = tokio::spawn(async move {
        let mut connections = Vec::new();
        while let Ok((stream, _peer)) = listener.accept().await {
            connections.push(stream);
        }
    });

    let client =
        FailoverClient::new(vec![addr.clone()]).with_timeout(Duration::from_millis(100));
    let err = client.send(&commands(&["RESULTS"])).await.unwrap_err();
    match err {
        GatewayError::Timeout { backend, operation } => {
            assert_eq!(backend, addr);
            assert_eq!(operation, "read");
        }
        other => panic!("unexpected error: {other}"),
    }

    silent.abort();
}
