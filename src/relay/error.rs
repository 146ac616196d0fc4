//! Relay error type and its HTTP mapping.

use std::error::Error as StdError;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Everything that can go wrong while relaying one request.
///
/// All variants map to a 500 carrying the error text; the client never sees a
/// partial upstream response.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("missing Content-Length header")]
    MissingContentLength,

    #[error("invalid Content-Length header: {0:?}")]
    InvalidContentLength(String),

    #[error("failed to read request body: {0}")]
    Body(#[source] axum::Error),

    #[error("request body is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("invalid upstream URL: {0}")]
    UpstreamUrl(#[from] url::ParseError),

    #[error("{}", error_chain(.0))]
    Upstream(#[from] reqwest::Error),

    #[error("upstream returned HTTP {0}")]
    UpstreamStatus(StatusCode),
}

/// Render an error followed by its sources, `outer: inner: root`.
///
/// reqwest keeps the interesting part (connection refused, timeout) in the
/// source chain rather than in its own message.
fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            format!("Proxy error: {self}"),
        )
            .into_response()
    }
}
