//! Shared utilities for gateway integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use httpmux::config::{MuxConfig, RouteAction, RouteConfig};
use httpmux::http::HttpServer;
use httpmux::lifecycle::Shutdown;

/// Start a mock upstream that answers every request with its own request
/// line, followed by ` id=true` when an `x-request-id` header was received.
pub async fn start_echo_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = vec![0u8; 8192];
                        let mut read = 0;
                        loop {
                            let n = socket.read(&mut buf[read..]).await.unwrap_or(0);
                            if n == 0 {
                                break;
                            }
                            read += n;
                            if buf[..read].windows(4).any(|w| w == b"\r\n\r\n") || read == buf.len() {
                                break;
                            }
                        }

                        let head = String::from_utf8_lossy(&buf[..read]);
                        let request_line = head.lines().next().unwrap_or("").to_string();
                        let has_id = head
                            .lines()
                            .any(|l| l.to_ascii_lowercase().starts_with("x-request-id:"));
                        let body = format!("{request_line} id={has_id}");

                        let response = format!(
                            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// An address nothing listens on.
pub async fn closed_address() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// A `respond` route.
pub fn respond_route(name: &str, methods: &[&str], pattern: &str, body: &str) -> RouteConfig {
    RouteConfig {
        name: name.to_string(),
        methods: methods.iter().map(|m| m.to_string()).collect(),
        pattern: pattern.to_string(),
        action: RouteAction::Respond {
            status: 200,
            body: body.to_string(),
            content_type: "text/plain; charset=utf-8".to_string(),
        },
    }
}

/// A `proxy` route.
pub fn proxy_route(name: &str, pattern: &str, upstream: SocketAddr) -> RouteConfig {
    RouteConfig {
        name: name.to_string(),
        methods: Vec::new(),
        pattern: pattern.to_string(),
        action: RouteAction::Proxy {
            upstream: upstream.to_string(),
        },
    }
}

/// A running gateway.
pub struct Gateway {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub config_updates: mpsc::UnboundedSender<MuxConfig>,
}

impl Gateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start the gateway on an ephemeral port with `routes`.
pub async fn start_gateway(routes: Vec<RouteConfig>) -> Gateway {
    let config = MuxConfig {
        routes,
        ..Default::default()
    };

    let shutdown = Shutdown::new();
    let (config_updates, updates_rx) = mpsc::unbounded_channel();
    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, updates_rx, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(100)).await;

    Gateway {
        addr,
        shutdown,
        config_updates,
    }
}
