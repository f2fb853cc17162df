// Server loop module
// Accepts connections until shutdown, then drains the active ones

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::signal::{self, Shutdown};
use crate::config::AppState;
use crate::logger;

/// How long active connections may take to finish after shutdown
pub const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Run the accept loop until `shutdown` is triggered.
///
/// Accept errors are logged and the loop keeps going. After shutdown the
/// listener is dropped and active connections get [`DRAIN_TIMEOUT`] to finish.
#[allow(clippy::ignored_unit_patterns)]
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: Shutdown,
) -> std::io::Result<()> {
    let active_connections = Arc::new(AtomicUsize::new(0));
    let mut shutdown_rx = shutdown.subscribe();

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(
                            stream,
                            peer_addr,
                            &state,
                            &active_connections,
                            shutdown.subscribe(),
                        );
                    }
                    Err(e) => tracing::error!("Failed to accept connection: {e}"),
                }
            }

            _ = signal::wait_for_shutdown(&mut shutdown_rx) => break,
        }
    }

    drop(listener);
    logger::log_shutdown(active_connections.load(Ordering::SeqCst) as u64);
    drain(&active_connections, DRAIN_TIMEOUT).await;
    Ok(())
}

/// Wait for the active connection count to reach zero, up to `limit`
async fn drain(active_connections: &AtomicUsize, limit: Duration) {
    let drained = tokio::time::timeout(limit, async {
        while active_connections.load(Ordering::SeqCst) > 0 {
            tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
        }
    })
    .await;

    match drained {
        Ok(()) => tracing::info!("All connections closed"),
        Err(_) => tracing::warn!(
            "Drain timed out with {} connection(s) still open",
            active_connections.load(Ordering::SeqCst)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::router::tests::make_site;
    use crate::server::create_reusable_listener;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn test_drain_returns_when_idle() {
        let counter = AtomicUsize::new(0);
        tokio::time::timeout(Duration::from_secs(1), drain(&counter, DRAIN_TIMEOUT))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_serves_until_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        let state = make_site(dir.path());

        let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Shutdown::new();
        let server = tokio::spawn(start_server_loop(listener, state, shutdown.clone()));

        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET / HTTP/1.1\r\nHost: vastsilicon.com\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        assert!(response.starts_with("HTTP/1.1 200 OK"));
        assert!(response.ends_with("<h1>home</h1>"));

        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
    }
}
