//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files, and
//! every section falls back to the reference values when omitted.

use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Port the relay listens on unless told otherwise.
pub const DEFAULT_PORT: u16 = 8000;

/// Baidu OAuth token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://aip.baidubce.com/oauth/2.0/token";

/// Baidu text-to-speech endpoint.
pub const DEFAULT_TTS_URL: &str = "https://tsn.baidu.com/text2audio";

/// Root configuration for the relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Static file serving settings.
    pub static_files: StaticFilesConfig,

    /// Proxy prefix and body limits.
    pub proxy: ProxyConfig,

    /// Upstream speech API endpoints.
    pub upstream: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,
}

impl ListenerConfig {
    /// Parse the bind address.
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.bind_address.parse()
    }

    /// Keep the bind host, replace the port.
    pub fn set_port(&mut self, port: u16) -> Result<(), AddrParseError> {
        let mut addr = self.socket_addr()?;
        addr.set_port(port);
        self.bind_address = addr.to_string();
        Ok(())
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: format!("0.0.0.0:{DEFAULT_PORT}"),
        }
    }
}

/// Static file serving configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Document root. Relative paths resolve against the startup directory.
    pub root: PathBuf,

    /// Debug page opened in the browser at startup, relative to `root`.
    pub debug_page: String,

    /// Try to open the debug page in the default browser at startup.
    pub open_browser: bool,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            debug_page: "standalone-tts-debug.html".to_string(),
            open_browser: true,
        }
    }
}

/// Proxy routing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Path prefix marking relay calls. Must start and end with '/'.
    pub prefix: String,

    /// Maximum request body size in bytes.
    pub max_body_size: usize,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            prefix: "/proxy/".to_string(),
            max_body_size: 10 * 1024 * 1024, // 10MB
        }
    }
}

/// How a non-2xx status from upstream is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UpstreamStatusPolicy {
    /// Non-2xx is an upstream failure and surfaces as a 500.
    #[default]
    Error,
    /// Relay the upstream body with a 200 regardless of upstream status.
    PassThrough,
    /// Relay the upstream body with the upstream status code.
    Mirror,
}

/// Upstream endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Token exchange URL (query parameters are appended).
    pub token_url: String,

    /// Speech synthesis URL.
    pub tts_url: String,

    /// Treatment of non-2xx upstream responses.
    pub status_policy: UpstreamStatusPolicy,

    /// Honour HTTP(S)_PROXY / NO_PROXY from the environment.
    pub use_system_proxy: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            token_url: DEFAULT_TOKEN_URL.to_string(),
            tts_url: DEFAULT_TTS_URL.to_string(),
            status_policy: UpstreamStatusPolicy::default(),
            use_system_proxy: true,
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Upstream exchange timeout (request sent to body read) in seconds.
    pub upstream_secs: u64,

    /// Total time allowed to handle one client request in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 10,
            upstream_secs: 30,
            request_secs: 60,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
