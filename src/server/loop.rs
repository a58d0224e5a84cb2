// Server loop module
// Accepts connections until shutdown, then drains the ones still open

use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::time::Instant;

use super::connection::accept_connection;
use super::signal::wait_for_shutdown;
use crate::config::AppState;
use crate::logger;

/// How often the drain phase re-checks the active connection count
const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Accept connections until `shutdown` flips to `true`.
///
/// After the listener closes, open connections get up to `connection_timeout`
/// to finish before this returns.
pub async fn run(listener: TcpListener, state: Arc<AppState>, mut shutdown: watch::Receiver<bool>) {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, shutdown.clone());
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = wait_for_shutdown(&mut shutdown) => {
                break;
            }
        }
    }

    // Stop accepting before draining
    drop(listener);
    drain_connections(&state).await;
}

/// Wait for active connections to reach zero, bounded by `connection_timeout`
async fn drain_connections(state: &AppState) {
    let window = Duration::from_secs(state.config.performance.connection_timeout);
    let deadline = Instant::now() + window;

    while state.connection_count() > 0 && Instant::now() < deadline {
        tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
    }

    logger::log_shutdown_complete(state.connection_count());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::handler::service_routes;
    use crate::server::{create_listener, ShutdownSignal};
    use std::net::SocketAddr;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    fn test_config() -> Config {
        let mut cfg = Config::load_from("does-not-exist/products-config", None).unwrap();
        cfg.logging.access_log = false;
        cfg.performance.connection_timeout = 5;
        cfg
    }

    async fn start(cfg: Config) -> (SocketAddr, Arc<AppState>, ShutdownSignal, tokio::task::JoinHandle<()>) {
        let state = Arc::new(AppState::new(cfg, service_routes().unwrap()));
        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = ShutdownSignal::new();
        let server = tokio::spawn(run(listener, Arc::clone(&state), shutdown.subscribe()));
        (addr, state, shutdown, server)
    }

    async fn fetch(addr: SocketAddr, raw_request: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(raw_request.as_bytes()).await.unwrap();
        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).await.unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn get(path: &str) -> String {
        format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
    }

    #[tokio::test]
    async fn test_serves_routes_over_tcp() {
        let (addr, state, shutdown, server) = start(test_config()).await;

        let response = fetch(addr, &get("/")).await;
        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"), "{response}");
        assert!(response.contains("content-type: text/plain\r\n"), "{response}");
        assert!(response.ends_with("\r\n\r\nJava Products Service is running!"));

        let response = fetch(addr, &get("/health")).await;
        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(response.contains("content-type: application/json\r\n"));
        assert!(response.ends_with(r#"{"status": "healthy", "service": "java-service"}"#));

        let response = fetch(addr, &get("/api/products")).await;
        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(response.contains("server: products-service\r\n"));
        assert!(response.ends_with(r#"[{"id":1,"name":"Test Product","price":99.99}]"#));

        shutdown.trigger();
        server.await.unwrap();
        assert_eq!(state.connection_count(), 0);
    }

    #[tokio::test]
    async fn test_unmatched_requests_get_404_over_tcp() {
        let (addr, _state, shutdown, server) = start(test_config()).await;

        let response = fetch(addr, &get("/unknown")).await;
        assert!(response.starts_with("HTTP/1.1 404 Not Found\r\n"), "{response}");
        assert!(response.ends_with("404 Not Found"));

        let post = "POST / HTTP/1.1\r\nHost: localhost\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";
        let response = fetch(addr, post).await;
        assert!(response.starts_with("HTTP/1.1 404 Not Found\r\n"), "{response}");

        shutdown.trigger();
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_connection_limit_rejects() {
        let mut cfg = test_config();
        cfg.performance.max_connections = Some(0);
        let (addr, state, shutdown, server) = start(cfg).await;

        let mut stream = TcpStream::connect(addr).await.unwrap();
        let _ = stream.write_all(get("/").as_bytes()).await;
        let mut buf = Vec::new();
        let _ = stream.read_to_end(&mut buf).await;
        assert!(buf.is_empty());

        shutdown.trigger();
        server.await.unwrap();
        assert_eq!(state.connection_count(), 0);
    }

    #[tokio::test]
    async fn test_shutdown_closes_idle_keep_alive_connection() {
        let (addr, state, shutdown, server) = start(test_config()).await;

        // Keep-alive request: the server holds the connection open afterwards
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\n\r\n")
            .await
            .unwrap();
        let mut buf = [0u8; 1024];
        let n = stream.read(&mut buf).await.unwrap();
        assert!(String::from_utf8_lossy(&buf[..n]).starts_with("HTTP/1.1 200 OK"));

        shutdown.trigger();
        server.await.unwrap();
        assert_eq!(state.connection_count(), 0);

        // The server side has closed; the client sees EOF
        let mut rest = Vec::new();
        let _ = stream.read_to_end(&mut rest).await;
    }
}
