//! Startup orchestration.
//!
//! # Responsibilities
//! - Resolve the document root before anything is bound
//! - Announce where the relay and its debug pages live
//! - Open the debug page in the default browser (best effort)
//!
//! # Design Decisions
//! - Fail fast: a missing document root is fatal
//! - The browser launch never blocks or fails startup

use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;

use crate::config::RelayConfig;

/// Older debug page some checkouts still ship, announced alongside the default.
pub const LEGACY_DEBUG_PAGE: &str = "debug-baidu-tts.html";

/// Canonicalize the document root; it must be an existing directory.
pub fn resolve_document_root(root: &Path) -> io::Result<PathBuf> {
    let root = root.canonicalize()?;
    if !root.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("document root {} is not a directory", root.display()),
        ));
    }
    Ok(root)
}

/// Browser-facing base URL for the bound address.
pub fn base_url(addr: SocketAddr) -> String {
    format!("http://localhost:{}", addr.port())
}

/// URL of a page under the document root.
pub fn page_url(addr: SocketAddr, page: &str) -> String {
    format!("{}/{}", base_url(addr), page.trim_start_matches('/'))
}

/// Log the startup banner.
pub fn announce(config: &RelayConfig, addr: SocketAddr) {
    let prefix = config.proxy.prefix.as_str();
    tracing::info!(address = %addr, "Relay server started");
    tracing::info!(root = %config.static_files.root.display(), "Serving directory");
    tracing::info!(url = %base_url(addr), "Open in browser");
    tracing::info!(url = %page_url(addr, &config.static_files.debug_page), "TTS debug page");
    tracing::info!(url = %page_url(addr, LEGACY_DEBUG_PAGE), "Legacy debug page");
    tracing::info!(
        token = %format!("{}{}baidu-token", base_url(addr), prefix),
        tts = %format!("{}{}baidu-tts", base_url(addr), prefix),
        "Proxy endpoints"
    );
    tracing::info!("Press Ctrl+C to stop the server");
}

/// Try to open `url` in the default browser. Failures are logged only.
pub fn open_browser(url: &str) {
    let spawned = browser_command(url).and_then(|mut command| {
        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
    });

    match spawned {
        Ok(_) => tracing::info!(url = %url, "Opened browser"),
        Err(e) => tracing::warn!(url = %url, error = %e, "Could not open browser, visit the URL manually"),
    }
}

#[cfg(target_os = "macos")]
fn browser_command(url: &str) -> io::Result<Command> {
    let mut command = Command::new("open");
    command.arg(url);
    Ok(command)
}

#[cfg(windows)]
fn browser_command(url: &str) -> io::Result<Command> {
    let mut command = Command::new("cmd");
    command.args(["/C", "start", "", url]);
    Ok(command)
}

#[cfg(all(unix, not(target_os = "macos")))]
fn browser_command(url: &str) -> io::Result<Command> {
    let mut command = Command::new("xdg-open");
    command.arg(url);
    Ok(command)
}

#[cfg(not(any(unix, windows)))]
fn browser_command(_url: &str) -> io::Result<Command> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "no browser launcher for this platform",
    ))
}
