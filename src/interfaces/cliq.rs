use std::time::Duration;

use reqwest::Url;

use crate::domain::{error::RelayError, notification::Notification};

const API_KEY_PARAM: &str = "zapikey";
const LOGGED_BODY_LIMIT: usize = 256;

/// Posts notifications to a single Cliq channel endpoint.
#[derive(Clone)]
pub struct CliqDispatcher {
    client: reqwest::Client,
    url: Url,
}

impl CliqDispatcher {
    pub fn new(endpoint: &str, api_token: &str, timeout: Duration) -> Result<Self, RelayError> {
        let url = channel_url(endpoint, api_token).map_err(RelayError::ConfigInvalid)?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| {
                RelayError::Unavailable(format!("failed to construct http client: {error}"))
            })?;

        Ok(Self { client, url })
    }

    /// Sends one notification. No retries; a timeout counts as a failure.
    pub async fn send(&self, notification: &Notification) -> Result<(), RelayError> {
        let response = self
            .client
            .post(self.url.clone())
            .json(notification)
            .send()
            .await
            .map_err(|error| {
                let kind = if error.is_timeout() { "timed out" } else { "failed" };
                RelayError::DispatchFailed(format!("cliq request {kind}: {}", error.without_url()))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RelayError::DispatchFailed(format!(
                "cliq send failed with {status}: {}",
                truncate_body(&body)
            )));
        }

        Ok(())
    }
}

/// Appends the API key to the channel endpoint, whatever separator the
/// configured endpoint already ends with.
pub fn channel_url(endpoint: &str, api_token: &str) -> Result<Url, String> {
    let trimmed = endpoint.trim_end_matches(['?', '&']);
    let mut url = Url::parse(trimmed)
        .map_err(|error| format!("CHANNEL_ENDPOINT is not a valid URL: {error}"))?;
    url.query_pairs_mut().append_pair(API_KEY_PARAM, api_token);
    Ok(url)
}

fn truncate_body(body: &str) -> &str {
    match body.char_indices().nth(LOGGED_BODY_LIMIT) {
        Some((end, _)) => &body[..end],
        None => body,
    }
}
