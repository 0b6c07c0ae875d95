//! HTTP access to the upstream status endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use thiserror::Error;
use tracing::debug;

use crate::models::StatusSnapshot;

/// Why a poll produced no snapshot.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("status request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("status endpoint answered {0}")]
    Status(StatusCode),
    #[error("malformed status payload: {0}")]
    Decode(#[from] serde_json::Error),
}

// ---

/// Source of status snapshots.
#[async_trait]
pub trait StatusClient: Send + Sync {
    async fn fetch_status(&self) -> Result<StatusSnapshot, PollError>;
}

/// [`StatusClient`] backed by a `reqwest` connection pool.
#[derive(Debug, Clone)]
pub struct HttpStatusClient {
    client: reqwest::Client,
    url: Url,
}

impl HttpStatusClient {
    // ---
    pub fn new(url: Url, timeout: Duration) -> Result<Self, PollError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl StatusClient for HttpStatusClient {
    async fn fetch_status(&self) -> Result<StatusSnapshot, PollError> {
        // ---
        let response = self.client.get(self.url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PollError::Status(status));
        }

        let body = response.bytes().await?;
        let snapshot: StatusSnapshot = serde_json::from_slice(&body)?;
        debug!(
            "Fetched status: alarm_active={}, {} log entries",
            snapshot.alarm_active,
            snapshot.full_log.len()
        );
        Ok(snapshot)
    }
}
