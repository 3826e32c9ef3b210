//! httpmux: config-driven HTTP multiplexer gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server ──▶ path::normalize ──▶ routing::Router
//!                     (request ID,                          (literal > {part} > {*end},
//!                      trace, timeout)                       method → handler)
//!                                                                  │
//!                         ┌────────────────────────────────────────┤
//!                         ▼                                        ▼
//!                  respond (body template)                 proxy (upstream)
//!
//!     config (TOML) ──▶ validation ──▶ route table ◀── watcher (hot reload)
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use httpmux::config::watcher::ConfigWatcher;
use httpmux::config::{load_config, MuxConfig};
use httpmux::http::HttpServer;
use httpmux::lifecycle::{signals, Shutdown};
use httpmux::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "httpmux")]
#[command(about = "Method-aware HTTP request multiplexer", long_about = None)]
struct Args {
    /// Path to the TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reload routes when the configuration file changes.
    #[arg(short, long, requires = "config")]
    watch: bool,

    /// Validate the configuration, print the route table and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => MuxConfig::default(),
    };

    if args.check {
        let server = HttpServer::new(config)?;
        for route in server.routes().routes() {
            let methods = if route.methods.is_empty() {
                "*".to_string()
            } else {
                route.methods.join(",")
            };
            let fallback = if route.has_default && !route.methods.is_empty() {
                " (+ default)"
            } else {
                ""
            };
            println!("{methods:<16} {}{fallback}", route.pattern);
        }
        return Ok(());
    }

    logging::init_logging(&config.observability);
    tracing::info!("httpmux v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        routes = config.routes.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let bind_address = config.listener.bind_address.clone();
    let server = HttpServer::new(config)?;
    for route in server.routes().routes() {
        tracing::info!(pattern = %route.pattern, methods = ?route.methods, default = route.has_default, "Route registered");
    }

    // The watcher must stay alive for the lifetime of the server.
    let (_watcher, config_updates) = match (&args.config, args.watch) {
        (Some(path), true) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), updates)
        }
        _ => {
            let (_, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(signals::shutdown_on_signal(shutdown));

    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
