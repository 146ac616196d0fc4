//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::Request;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Router;
use speech_relay::config::{RelayConfig, UpstreamStatusPolicy};
use speech_relay::http::HttpServer;
use speech_relay::lifecycle::Shutdown;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// What a stub upstream saw.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path_and_query: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// A programmable upstream answering every request with a fixed reply.
pub struct StubUpstream {
    pub addr: SocketAddr,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl StubUpstream {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.captured.lock().unwrap().clone()
    }
}

/// Start a stub upstream on an ephemeral port.
pub async fn start_stub_upstream(status: u16, body: &'static [u8]) -> StubUpstream {
    start_slow_upstream(Duration::ZERO, status, body).await
}

/// Stub upstream that waits `delay` after reading the request before replying.
pub async fn start_slow_upstream(
    delay: Duration,
    status: u16,
    body: &'static [u8],
) -> StubUpstream {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let captured = Arc::new(Mutex::new(Vec::new()));
    let sink = captured.clone();

    let app: Router = Router::new().fallback(move |request: Request| {
        let sink = sink.clone();
        async move {
            let (parts, incoming) = request.into_parts();
            let received = axum::body::to_bytes(incoming, usize::MAX).await.unwrap();
            sink.lock().unwrap().push(CapturedRequest {
                method: parts.method.to_string(),
                path_and_query: parts
                    .uri
                    .path_and_query()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
                headers: parts.headers,
                body: received,
            });
            tokio::time::sleep(delay).await;
            (
                StatusCode::from_u16(status).unwrap(),
                [("content-type", "text/plain")],
                Bytes::from_static(body),
            )
                .into_response()
        }
    });

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    StubUpstream { addr, captured }
}

/// An address nothing listens on.
pub async fn refused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Relay config pointing both endpoints at `upstream_base`.
pub fn relay_config(upstream_base: &str, root: &Path) -> RelayConfig {
    let mut config = RelayConfig::default();
    config.static_files.root = root.to_path_buf();
    config.static_files.open_browser = false;
    config.upstream.token_url = format!("{upstream_base}/oauth/2.0/token");
    config.upstream.tts_url = format!("{upstream_base}/text2audio");
    config.upstream.use_system_proxy = false;
    config.upstream.status_policy = UpstreamStatusPolicy::Error;
    config
}

/// A relay running on an ephemeral port.
pub struct RunningRelay {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<std::io::Result<()>>,
}

impl RunningRelay {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

pub async fn start_relay(config: RelayConfig) -> RunningRelay {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));

    RunningRelay {
        addr,
        shutdown,
        handle,
    }
}

/// Client that never goes through an environment proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
