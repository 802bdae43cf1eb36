use std::future::Future;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tracing::info;

use crate::{application::state::SharedState, domain::error::RelayError, interfaces::webhooks};

pub fn build_router(state: SharedState) -> Router {
    let max_body_bytes = state.config().max_body_bytes;

    Router::new()
        .route("/healthz", get(healthz_handler))
        .route("/webhooks/{route}", post(webhooks::issue_webhook_handler))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

pub async fn serve(
    listener: TcpListener,
    state: SharedState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), RelayError> {
    let local_addr = listener.local_addr().map_err(|error| {
        RelayError::Unavailable(format!("failed to read listener address: {error}"))
    })?;

    info!(
        "issue-relay listening on http://{}:{}",
        local_addr.ip(),
        local_addr.port(),
    );

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|error| RelayError::Unavailable(format!("server runtime error: {error}")))
}

async fn healthz_handler(State(state): State<SharedState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.health_payload()))
}
