use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use speech_relay::config::{self, ConfigError, RelayConfig};
use speech_relay::http::HttpServer;
use speech_relay::lifecycle::{startup, Shutdown};
use speech_relay::observability;

#[derive(Parser, Debug)]
#[command(name = "speech-relay", version)]
#[command(about = "Local CORS relay for the Baidu speech API with a static debug page server", long_about = None)]
struct Cli {
    /// TOML configuration file. Built-in defaults apply without one.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides the config file).
    #[arg(short, long)]
    port: Option<u16>,

    /// Document root for static files (overrides the config file).
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Do not try to open the debug page in a browser.
    #[arg(long)]
    no_browser: bool,
}

impl Cli {
    fn into_config(self) -> Result<RelayConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => config::load_config(path)?,
            None => RelayConfig::default(),
        };

        if let Some(port) = self.port {
            config.listener.set_port(port)?;
        }
        if let Some(root) = self.root {
            config.static_files.root = root;
        }
        if self.no_browser {
            config.static_files.open_browser = false;
        }

        config::validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Cli::parse().into_config()?;

    observability::logging::init_logging(&config.observability);
    tracing::info!("speech-relay v{} starting", env!("CARGO_PKG_VERSION"));

    config.static_files.root = startup::resolve_document_root(&config.static_files.root)?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream_policy = ?config.upstream.status_policy,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => observability::metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    startup::announce(&config, local_addr);
    if config.static_files.open_browser {
        startup::open_browser(&startup::page_url(local_addr, &config.static_files.debug_page));
    }

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    shutdown.trigger_on_termination();

    let server = HttpServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
