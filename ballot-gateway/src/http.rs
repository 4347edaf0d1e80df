//! HTTP surface: translates web requests into protocol command sequences.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;
use tracing::warn;

use crate::error::GatewayError;
use crate::failover::FailoverClient;

/// Shared state for the HTTP handlers.
#[derive(Debug, Clone)]
struct GatewayState {
    client: FailoverClient,
}

/// Builds the gateway router over a failover client.
#[must_use]
pub fn router(client: FailoverClient) -> Router {
    Router::new()
        .route("/results", get(results))
        .route("/vote", post(vote))
        .with_state(GatewayState { client })
}

/// `GET /results`: issue `RESULTS` against the first healthy backend.
async fn results(State(state): State<GatewayState>) -> impl IntoResponse {
    match state.client.send(&["RESULTS".to_string()]).await {
        Ok(responses) => (StatusCode::OK, format!("{}\n", responses.join("\n"))),
        Err(e) => gateway_failure(&e),
    }
}

/// Form body of `POST /vote`.
#[derive(Debug, Deserialize)]
struct VoteForm {
    #[serde(rename = "userId", default)]
    user_id: String,
    #[serde(default)]
    option: String,
}

/// `POST /vote`: `HELLO` then `VOTE` sequentially on one backend
/// connection, so both responses come from the same instance.
async fn vote(State(state): State<GatewayState>, Form(form): Form<VoteForm>) -> impl IntoResponse {
    let user_id = form.user_id.trim();
    let option = form.option.trim().to_ascii_uppercase();
    if user_id.is_empty() || option.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            "ERR usage: userId and option required\n".to_string(),
        );
    }

    let commands = vec![format!("HELLO {user_id}"), format!("VOTE {option}")];
    match state.client.send(&commands).await {
        Ok(responses) => (StatusCode::OK, format!("{}\n", responses.join("\n"))),
        Err(e) => gateway_failure(&e),
    }
}

/// All backends exhausted: surface the last failure to the HTTP caller.
fn gateway_failure(error: &GatewayError) -> (StatusCode, String) {
    warn!(error = %error, "request failed against every backend");
    (
        StatusCode::BAD_GATEWAY,
        format!("ERR gateway_failure {error}\n"),
    )
}
