//! Upstream HTTP client for the speech API.
//!
//! # Responsibilities
//! - Issue the token exchange and synthesis calls
//! - Enforce connect and exchange timeouts
//! - Apply the configured upstream status policy
//!
//! # Design Decisions
//! - One pooled `reqwest::Client`, cloned into every handler
//! - Response bodies are buffered whole before anything reaches the client
//! - Upstream content type is never copied; callers choose their own

use std::time::Duration;

use axum::body::Bytes;
use axum::http::{header, StatusCode};

use crate::config::{TimeoutConfig, UpstreamConfig, UpstreamStatusPolicy};
use crate::relay::credentials::Credentials;
use crate::relay::error::RelayError;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Buffered result of a successful upstream exchange.
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    /// Status to send to the client, after the status policy.
    pub status: StatusCode,
    pub body: Bytes,
}

/// Client for the two fixed upstream endpoints.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    token_url: String,
    tts_url: String,
    status_policy: UpstreamStatusPolicy,
}

impl UpstreamClient {
    /// Build the client from upstream and timeout settings.
    pub fn new(upstream: &UpstreamConfig, timeouts: &TimeoutConfig) -> reqwest::Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("speech-relay/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .timeout(Duration::from_secs(timeouts.upstream_secs));
        if !upstream.use_system_proxy {
            builder = builder.no_proxy();
        }

        Ok(Self {
            http: builder.build()?,
            token_url: upstream.token_url.clone(),
            tts_url: upstream.tts_url.clone(),
            status_policy: upstream.status_policy,
        })
    }

    /// POST the client-credentials grant with an empty body.
    pub async fn exchange_token(&self, credentials: &Credentials) -> Result<UpstreamReply, RelayError> {
        let url = credentials.token_url(&self.token_url)?;
        tracing::debug!(
            has_api_key = !credentials.api_key.is_empty(),
            has_secret_key = !credentials.secret_key.is_empty(),
            "Requesting access token"
        );

        let response = self.http.post(url).send().await?;
        self.finish(response).await
    }

    /// Forward a synthesis form body unmodified.
    pub async fn synthesize(&self, form: Bytes) -> Result<UpstreamReply, RelayError> {
        tracing::debug!(body_bytes = form.len(), "Requesting speech synthesis");

        let response = self
            .http
            .post(&self.tts_url)
            .header(header::CONTENT_TYPE, FORM_CONTENT_TYPE)
            .header(header::ACCEPT, "*/*")
            .body(form)
            .send()
            .await?;
        self.finish(response).await
    }

    async fn finish(&self, response: reqwest::Response) -> Result<UpstreamReply, RelayError> {
        let upstream_status = response.status();
        if !upstream_status.is_success() {
            tracing::warn!(
                status = %upstream_status,
                policy = ?self.status_policy,
                "Upstream returned non-success status"
            );
            if self.status_policy == UpstreamStatusPolicy::Error {
                return Err(RelayError::UpstreamStatus(upstream_status));
            }
        }

        let body = response.bytes().await?;
        let status = match self.status_policy {
            UpstreamStatusPolicy::Mirror => upstream_status,
            UpstreamStatusPolicy::Error | UpstreamStatusPolicy::PassThrough => StatusCode::OK,
        };

        Ok(UpstreamReply { status, body })
    }
}
