//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the relay and static file handlers
//! - Wire up middleware (CORS, preflight, request ID, tracing, limits, timeout)
//! - Bind server to listener
//! - Dispatch proxy POSTs to the relay, everything else to static files
//! - Stop accepting on shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Request, State};
use axum::http::Method;
use axum::response::{IntoResponse, Response};
use axum::{middleware, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceExt;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::RelayConfig;
use crate::http::cors;
use crate::http::request::{make_request_span, MakeRelayRequestId};
use crate::relay::{self, UpstreamClient};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub upstream: UpstreamClient,
    pub static_files: ServeDir,
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
    config: Arc<RelayConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// Fails only if the upstream HTTP client cannot be built.
    pub fn new(config: RelayConfig) -> Result<Self, reqwest::Error> {
        let upstream = UpstreamClient::new(&config.upstream, &config.timeouts)?;
        let static_files = ServeDir::new(&config.static_files.root);
        let config = Arc::new(config);

        let state = AppState {
            config: config.clone(),
            upstream,
            static_files,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layers listed later wrap the earlier ones, so the CORS headers are set
    /// on the outermost response, timeouts and body limit rejections included.
    #[allow(deprecated)]
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        let router = Router::new()
            .fallback(route_request)
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.proxy.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(middleware::from_fn(cors::answer_preflight))
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRelayRequestId));

        cors::with_cors_headers(router)
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            root = %self.config.static_files.root.display(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server received shutdown signal");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The fully layered router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Single entry point behind the middleware stack.
///
/// POSTs under the proxy prefix go to the relay; everything else, unmatched
/// POSTs included, goes to static file serving. Only the path is matched, so a
/// query string never changes the endpoint.
async fn route_request(State(state): State<AppState>, request: Request) -> Response {
    if request.method() == Method::POST {
        let sub_path = request
            .uri()
            .path()
            .strip_prefix(state.config.proxy.prefix.as_str())
            .map(ToOwned::to_owned);
        if let Some(sub_path) = sub_path {
            return relay::relay(&state.upstream, &sub_path, request).await;
        }
    }

    match state.static_files.oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header::ACCESS_CONTROL_ALLOW_ORIGIN;
    use axum::http::StatusCode;

    fn server_with_root(root: &std::path::Path) -> HttpServer {
        let mut config = RelayConfig::default();
        config.static_files.root = root.to_path_buf();
        config.static_files.open_browser = false;
        HttpServer::new(config).unwrap()
    }

    async fn send(server: &HttpServer, request: axum::http::Request<Body>) -> Response {
        server.router().oneshot(request).await.unwrap()
    }

    #[tokio::test]
    async fn test_serves_existing_file_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("standalone-tts-debug.html"), b"<html>debug</html>").unwrap();
        let server = server_with_root(dir.path());

        let response = send(
            &server,
            axum::http::Request::get("/standalone-tts-debug.html")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert!(response.headers().contains_key("x-request-id"));
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"<html>debug</html>");
    }

    #[tokio::test]
    async fn test_missing_file_is_404_with_cors() {
        let dir = tempfile::tempdir().unwrap();
        let server = server_with_root(dir.path());

        let response = send(
            &server,
            axum::http::Request::get("/absent.html").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_unknown_proxy_path_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let server = server_with_root(dir.path());

        let response = send(
            &server,
            axum::http::Request::post("/proxy/unknown-thing")
                .header("content-length", "0")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_post_outside_prefix_goes_to_static_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), b"home").unwrap();
        let server = server_with_root(dir.path());

        let response = send(
            &server,
            axum::http::Request::post("/index.html").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_oversized_body_is_413_with_cors() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = RelayConfig::default();
        config.static_files.root = dir.path().to_path_buf();
        config.proxy.max_body_size = 4;
        let server = HttpServer::new(config).unwrap();

        let response = send(
            &server,
            axum::http::Request::post("/proxy/baidu-tts")
                .header("content-length", "10")
                .body(Body::from("0123456789"))
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_client_request_id_is_echoed() {
        let dir = tempfile::tempdir().unwrap();
        let server = server_with_root(dir.path());

        let response = send(
            &server,
            axum::http::Request::options("/anything")
                .header("x-request-id", "trace-me")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-request-id"], "trace-me");
    }
}
