use std::{sync::Arc, time::Instant};

use serde_json::{Value, json};

use crate::{
    application::config::RuntimeConfig, domain::error::RelayError, interfaces::cliq::CliqDispatcher,
};

/// Read-only state shared by every request handler.
#[derive(Clone)]
pub struct SharedState {
    inner: Arc<InnerState>,
}

struct InnerState {
    config: RuntimeConfig,
    dispatcher: CliqDispatcher,
    started_at: Instant,
}

impl SharedState {
    pub fn new(config: RuntimeConfig) -> Result<Self, RelayError> {
        let dispatcher = CliqDispatcher::new(
            &config.channel_endpoint,
            &config.cliq_api_token,
            config.dispatch_timeout,
        )?;

        Ok(Self {
            inner: Arc::new(InnerState {
                config,
                dispatcher,
                started_at: Instant::now(),
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &RuntimeConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn dispatcher(&self) -> &CliqDispatcher {
        &self.inner.dispatcher
    }

    #[must_use]
    pub fn uptime_ms(&self) -> u64 {
        u64::try_from(self.inner.started_at.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    #[must_use]
    pub fn health_payload(&self) -> Value {
        json!({
            "ok": true,
            "version": self.inner.config.runtime_version,
            "uptimeMs": self.uptime_ms(),
        })
    }
}
