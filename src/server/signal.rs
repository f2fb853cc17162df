// Signal handling module
//
// Supported signals:
// - SIGTERM: Graceful shutdown
// - SIGINT:  Graceful shutdown (Ctrl+C)

use tokio::sync::watch;

/// Process-wide shutdown flag
///
/// Receivers see the flag flip once; late subscribers still observe it.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve once shutdown has been triggered
pub async fn wait_for_shutdown(rx: &mut watch::Receiver<bool>) {
    // An error means every sender is gone; treat it as shutdown
    let _ = rx.wait_for(|triggered| *triggered).await;
}

/// Start signal handlers
///
/// Spawns a background task that triggers `shutdown` on the first SIGINT or
/// SIGTERM.
pub fn start_signal_handler(shutdown: Shutdown) {
    tokio::spawn(async move {
        let name = wait_for_signal().await;
        tracing::info!("[SIGNAL] {name} received, initiating graceful shutdown");
        shutdown.trigger();
    });
}

#[cfg(unix)]
async fn wait_for_signal() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to register SIGTERM handler: {e}");
            let _ = tokio::signal::ctrl_c().await;
            return "SIGINT";
        }
    };

    tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = tokio::signal::ctrl_c() => "SIGINT",
    }
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
async fn wait_for_signal() -> &'static str {
    let _ = tokio::signal::ctrl_c().await;
    "Ctrl+C"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_late_subscriber_sees_trigger() {
        let shutdown = Shutdown::new();
        let mut early = shutdown.subscribe();
        shutdown.trigger();
        let mut late = shutdown.subscribe();

        wait_for_shutdown(&mut early).await;
        wait_for_shutdown(&mut late).await;
        assert!(shutdown.is_triggered());
    }
}
