use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

pub const AUTH_REJECTED_MESSAGE: &str =
    "The 'Authentication' query parameter is missing or has an invalid value.";
pub const UNSUPPORTED_EVENT_MESSAGE: &str = "Unsupported webhook event";

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("configuration missing: {0}")]
    ConfigMissing(String),
    #[error("configuration invalid: {0}")]
    ConfigInvalid(String),
    #[error("authentication rejected")]
    AuthRejected,
    #[error("empty payload")]
    EmptyPayload,
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
    #[error("unsupported webhook event: {0}")]
    UnsupportedEvent(String),
    #[error("dispatch failed: {0}")]
    DispatchFailed(String),
    #[error("unavailable: {0}")]
    Unavailable(String),
}

impl RelayError {
    /// Status returned to the webhook sender when this error ends a request.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::AuthRejected | Self::EmptyPayload | Self::UnsupportedEvent(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::ConfigMissing(_)
            | Self::ConfigInvalid(_)
            | Self::InvalidPayload(_)
            | Self::DispatchFailed(_)
            | Self::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn caller_body(&self) -> &'static str {
        match self {
            Self::AuthRejected => AUTH_REJECTED_MESSAGE,
            Self::UnsupportedEvent(_) => UNSUPPORTED_EVENT_MESSAGE,
            _ => "",
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status(), self.caller_body()).into_response()
    }
}
