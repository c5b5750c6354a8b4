//! Client for the Workers AI `responses` endpoint.

use std::time::Duration;

use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};
use crate::translate::workers_types::{ResponsesRequest, ResponsesResult};

/// A decoded backend result together with the body it was decoded from.
#[derive(Debug, Clone)]
pub struct BackendReply {
    pub result: ResponsesResult,
    pub raw: String,
}

#[derive(Debug, Clone)]
pub struct WorkersAiClient {
    http: reqwest::Client,
    url: String,
    auth_token: String,
}

impl WorkersAiClient {
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(GatewayError::Transport)?;

        Ok(Self {
            http,
            url: config.responses_url(),
            auth_token: config.auth_token.clone(),
        })
    }

    /// Perform one call to the backend.
    ///
    /// The raw body is returned on success and carried inside
    /// [`GatewayError::Backend`] / [`GatewayError::Decode`] on failure, so the
    /// caller can always log what the backend actually said. Dropping the
    /// returned future abandons the in-flight request.
    pub async fn respond(&self, req: &ResponsesRequest) -> Result<BackendReply> {
        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.auth_token)
            .json(req)
            .send()
            .await
            .map_err(GatewayError::Transport)?;

        let status = response.status();
        let raw = response.text().await.map_err(GatewayError::Transport)?;

        tracing::debug!(status = status.as_u16(), body_len = raw.len(), "backend responded");

        if !status.is_success() {
            return Err(GatewayError::Backend {
                status: status.as_u16(),
                body: raw,
            });
        }

        match serde_json::from_str::<ResponsesResult>(&raw) {
            Ok(result) => Ok(BackendReply { result, raw }),
            Err(source) => Err(GatewayError::Decode { source, body: raw }),
        }
    }
}
