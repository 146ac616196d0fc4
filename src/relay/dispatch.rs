//! Proxy sub-path dispatch.
//!
//! Maps the part of the path after the proxy prefix to an endpoint, runs the
//! upstream exchange, and converts the outcome into exactly one response.

use std::time::Instant;

use axum::body::Bytes;
use axum::extract::Request;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::http::request::request_id;
use crate::observability::metrics;
use crate::relay::credentials::Credentials;
use crate::relay::error::RelayError;
use crate::relay::upstream::{UpstreamClient, UpstreamReply};

/// The relay endpoints reachable under the proxy prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// OAuth client-credentials exchange.
    Token,
    /// Text-to-speech synthesis.
    Speech,
}

impl Endpoint {
    /// Resolve the sub-path left after stripping the proxy prefix.
    pub fn from_sub_path(sub_path: &str) -> Option<Self> {
        match sub_path {
            "baidu-token" => Some(Self::Token),
            "baidu-tts" => Some(Self::Speech),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Token => "baidu-token",
            Self::Speech => "baidu-tts",
        }
    }

    /// Content type sent to the client, whatever upstream declared.
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Token => "application/json",
            Self::Speech => "audio/mpeg",
        }
    }
}

/// Relay one POST whose path carried the proxy prefix.
///
/// Unknown sub-paths are a 404; every failure past that point is a 500 built
/// from the error text.
pub async fn relay(upstream: &UpstreamClient, sub_path: &str, request: Request) -> Response {
    let request_id = request_id(request.headers()).to_owned();

    let Some(endpoint) = Endpoint::from_sub_path(sub_path) else {
        tracing::warn!(request_id = %request_id, sub_path = %sub_path, "Unknown proxy endpoint");
        metrics::record_relay("unknown", StatusCode::NOT_FOUND);
        return (StatusCode::NOT_FOUND, "Proxy endpoint not found").into_response();
    };

    let start_time = Instant::now();
    match forward(upstream, endpoint, request).await {
        Ok(reply) => {
            tracing::info!(
                request_id = %request_id,
                endpoint = endpoint.name(),
                status = %reply.status,
                body_bytes = reply.body.len(),
                "Relayed upstream response"
            );
            metrics::record_relay(endpoint.name(), reply.status);
            metrics::record_upstream_duration(endpoint.name(), start_time);
            (
                reply.status,
                [(header::CONTENT_TYPE, endpoint.content_type())],
                reply.body,
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                endpoint = endpoint.name(),
                error = %e,
                "Proxy request failed"
            );
            metrics::record_relay(endpoint.name(), StatusCode::INTERNAL_SERVER_ERROR);
            metrics::record_upstream_duration(endpoint.name(), start_time);
            e.into_response()
        }
    }
}

async fn forward(
    upstream: &UpstreamClient,
    endpoint: Endpoint,
    request: Request,
) -> Result<UpstreamReply, RelayError> {
    let (parts, body) = request.into_parts();
    let length = content_length(&parts.headers)?;
    let body: Bytes = axum::body::to_bytes(body, length)
        .await
        .map_err(RelayError::Body)?;

    match endpoint {
        Endpoint::Token => {
            let credentials = Credentials::from_form(&body)?;
            upstream.exchange_token(&credentials).await
        }
        Endpoint::Speech => upstream.synthesize(body).await,
    }
}

/// The declared body length. Relay calls must carry one.
fn content_length(headers: &HeaderMap) -> Result<usize, RelayError> {
    let value = headers
        .get(header::CONTENT_LENGTH)
        .ok_or(RelayError::MissingContentLength)?;

    value
        .to_str()
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .ok_or_else(|| {
            RelayError::InvalidContentLength(String::from_utf8_lossy(value.as_bytes()).into_owned())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{TimeoutConfig, UpstreamConfig};
    use axum::body::Body;
    use axum::http::HeaderValue;

    fn offline_client() -> UpstreamClient {
        UpstreamClient::new(&UpstreamConfig::default(), &TimeoutConfig::default()).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_endpoint_lookup() {
        assert_eq!(Endpoint::from_sub_path("baidu-token"), Some(Endpoint::Token));
        assert_eq!(Endpoint::from_sub_path("baidu-tts"), Some(Endpoint::Speech));
        assert_eq!(Endpoint::from_sub_path(""), None);
        assert_eq!(Endpoint::from_sub_path("baidu-tts/extra"), None);
        assert_eq!(Endpoint::Token.content_type(), "application/json");
        assert_eq!(Endpoint::Speech.content_type(), "audio/mpeg");
    }

    #[test]
    fn test_content_length_parsing() {
        let mut headers = HeaderMap::new();
        assert!(matches!(
            content_length(&headers),
            Err(RelayError::MissingContentLength)
        ));

        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("12"));
        assert_eq!(content_length(&headers).unwrap(), 12);

        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("twelve"));
        assert!(matches!(
            content_length(&headers),
            Err(RelayError::InvalidContentLength(ref v)) if v == "twelve"
        ));
    }

    #[tokio::test]
    async fn test_unknown_endpoint_is_404() {
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/proxy/unknown-thing")
            .body(Body::empty())
            .unwrap();

        let response = relay(&offline_client(), "unknown-thing", request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(response).await, "Proxy endpoint not found");
    }

    #[tokio::test]
    async fn test_missing_content_length_is_500() {
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/proxy/baidu-token")
            .body(Body::from("ak=AK1&sk=SK1"))
            .unwrap();

        let response = relay(&offline_client(), "baidu-token", request).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_text(response).await,
            "Proxy error: missing Content-Length header"
        );
    }
}
