//! Stop signal shared by the relay server and whoever embeds it.

use tokio::sync::broadcast;

use crate::lifecycle::signals;

/// Handle that tells a running relay to stop accepting connections.
///
/// `main` wires it to SIGINT/SIGTERM; integration tests fire it directly.
#[derive(Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver to hand to [`HttpServer::run`](crate::http::HttpServer::run).
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Ask every subscribed server to stop. A no-op when none is running.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Fire [`trigger`](Self::trigger) once the process is asked to terminate.
    pub fn trigger_on_termination(&self) {
        let shutdown = self.clone();
        tokio::spawn(async move {
            signals::wait_for_termination().await;
            shutdown.trigger();
        });
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
