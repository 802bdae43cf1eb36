use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{debug, error, info, warn};

use crate::{
    application::state::SharedState,
    domain::{
        error::RelayError,
        event::EventKind,
        notification::{build_notification, response_summary},
        payload::decode_payload,
    },
    security::auth::{self, AuthFailureReason},
};

/// One inbound route. A fixed kind serves a single Jira webhook; `None`
/// resolves the kind from the payload's event name.
#[derive(Clone, Copy)]
struct IssueWebhookAdapter {
    route: &'static str,
    kind: Option<EventKind>,
}

const ADAPTERS: &[IssueWebhookAdapter] = &[
    IssueWebhookAdapter {
        route: EventKind::Commented.slug(),
        kind: Some(EventKind::Commented),
    },
    IssueWebhookAdapter {
        route: EventKind::Created.slug(),
        kind: Some(EventKind::Created),
    },
    IssueWebhookAdapter {
        route: EventKind::Updated.slug(),
        kind: Some(EventKind::Updated),
    },
    IssueWebhookAdapter {
        route: EventKind::Deleted.slug(),
        kind: Some(EventKind::Deleted),
    },
    IssueWebhookAdapter {
        route: "jira",
        kind: None,
    },
];

pub async fn issue_webhook_handler(
    Path(route): Path<String>,
    State(state): State<SharedState>,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Response {
    let Some(adapter) = adapter_for(&route) else {
        return (StatusCode::NOT_FOUND, "unknown webhook adapter").into_response();
    };

    match relay_event(&state, adapter, &query, &body).await {
        Ok(summary) => (StatusCode::OK, summary).into_response(),
        Err(error) => error.into_response(),
    }
}

fn adapter_for(route: &str) -> Option<&'static IssueWebhookAdapter> {
    ADAPTERS.iter().find(|adapter| adapter.route == route)
}

async fn relay_event(
    state: &SharedState,
    adapter: &IssueWebhookAdapter,
    query: &HashMap<String, String>,
    body: &[u8],
) -> Result<String, RelayError> {
    if body.is_empty() {
        warn!("Empty JSON data route={}", adapter.route);
        return Err(RelayError::EmptyPayload);
    }

    if let Err(reason) = auth::authorize(query, &state.config().shared_secret) {
        match reason {
            AuthFailureReason::SecretNotConfigured => {
                error!(
                    "shared secret is not configured; rejecting webhook route={}",
                    adapter.route
                );
            }
            AuthFailureReason::MissingCredentials | AuthFailureReason::InvalidCredentials => {
                warn!("webhook rejected route={} reason={reason:?}", adapter.route);
            }
        }
        return Err(RelayError::AuthRejected);
    }

    let envelope = decode_payload(body).inspect_err(|error| {
        warn!("webhook payload rejected route={}: {error}", adapter.route);
    })?;

    let kind = match adapter.kind {
        Some(kind) => {
            if let Some(announced) = envelope.resolve_kind().filter(|found| *found != kind) {
                debug!(
                    "route {} received a {announced} event; handling as {kind}",
                    adapter.route
                );
            }
            kind
        }
        None => envelope.resolve_kind().ok_or_else(|| {
            let name = envelope.event_name().to_owned();
            warn!("unsupported webhook event {name:?}");
            RelayError::UnsupportedEvent(name)
        })?,
    };

    let facts = envelope.extract(kind);
    let config = state.config();
    let notification = build_notification(kind, &facts, &config.jira_url, &config.card_style);

    match state.dispatcher().send(&notification).await {
        Ok(()) => info!("relayed {kind} event issue_key={}", facts.issue_key),
        Err(error) => warn!(
            "cliq notification not delivered for {kind} event issue_key={}: {error}",
            facts.issue_key
        ),
    }

    Ok(response_summary(kind, &facts))
}
