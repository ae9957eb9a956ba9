//! # RSI Feed API Client
//!
//! A dedicated client for the upstream RSI endpoint. One invocation issues
//! exactly one GET: there is no retry loop, no backoff, and no
//! authentication. Transport failures and non-2xx statuses surface as
//! [`FeedError`]s for the invocation boundary to handle; the shape of the
//! payload is the concern of the indicator model, not of this client.

use serde_json::Value;
use thiserror::Error;
use tracing::{error, info};

use crate::retrieve::ky_http::ApiClient;

#[derive(Debug, Error)]
pub enum FeedError {
    /// Network failure, or a 2xx body that is not JSON.
    #[error("Indicator fetch failed: {0}")]
    Transport(String),

    /// The endpoint answered with a non-2xx status.
    #[error("Indicator endpoint returned HTTP {status}")]
    Status { status: u16 },
}

/// A specialized client for the RSI indicator endpoint.
pub struct ApiCallRsi {
    /// The underlying HTTP client, bound to the configured endpoint URL.
    client: ApiClient,
}

impl ApiCallRsi {
    /// Initializes the client for the given absolute endpoint URL.
    pub fn new(endpoint: &str) -> anyhow::Result<Self> {
        Ok(Self {
            client: ApiClient::new(endpoint)?,
        })
    }

    /// Fetches the latest payload from the RSI endpoint.
    ///
    /// The raw JSON payload is logged on every successful fetch so the
    /// exact upstream response is reconstructible from the logs.
    pub async fn fetch(&self) -> Result<Value, FeedError> {
        let response = self
            .client
            .get_json::<Value>("")
            .await
            .map_err(|e| FeedError::Transport(e.to_string()))?;

        if !response.success {
            error!(
                status = response.status,
                body = response.error_body.as_deref().unwrap_or(""),
                "RSI endpoint returned an error status"
            );
            return Err(FeedError::Status {
                status: response.status,
            });
        }

        let body = response
            .data
            .ok_or_else(|| FeedError::Transport("empty response body".to_string()))?;

        info!(payload = %body, "RSI API response");
        Ok(body)
    }
}
