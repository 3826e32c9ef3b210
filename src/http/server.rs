//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create the Axum app with a single fallback dispatcher
//! - Wire up middleware (request ID, tracing, timeout)
//! - Resolve each request through the active route table
//! - Run the configured action (respond or proxy)
//! - Swap in new route tables on config reload
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{MuxConfig, RouteAction};
use crate::http::proxy::{self, HttpClient};
use crate::http::request::{request_id, UuidRequestId};
use crate::http::response;
use crate::http::table::{build_route_table, RouteTable};
use crate::lifecycle::shutdown;
use crate::observability::metrics;
use crate::path::normalize;
use crate::path::PatternError;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<ArcSwap<RouteTable>>,
    pub client: HttpClient,
}

/// HTTP server for the multiplexer gateway.
pub struct HttpServer {
    app: Router,
    routes: Arc<ArcSwap<RouteTable>>,
}

impl HttpServer {
    /// Create a new HTTP server, compiling the configured routes.
    pub fn new(config: MuxConfig) -> Result<Self, PatternError> {
        let table = build_route_table(&config.routes)?;
        metrics::record_route_table_size(table.routes().len());
        let routes = Arc::new(ArcSwap::from_pointee(table));

        let state = AppState {
            routes: routes.clone(),
            client: proxy::new_client(),
        };

        let app = Self::build_app(&config, state);
        Ok(Self { app, routes })
    }

    /// Build the Axum app with all middleware layers.
    #[allow(deprecated)]
    fn build_app(config: &MuxConfig, state: AppState) -> Router {
        Router::new().fallback(dispatch).with_state(state).layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Configs arriving on `config_updates` replace the route table; listener
    /// and timeout changes need a restart.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<MuxConfig>,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let routes = self.routes.clone();
        tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                apply_reload(&routes, &config);
            }
        });

        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown::wait(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Snapshot of the active route table.
    pub fn routes(&self) -> Arc<RouteTable> {
        self.routes.load_full()
    }
}

/// Compile `config` and swap it in. The current table is kept when the new
/// routes fail to compile.
pub fn apply_reload(routes: &ArcSwap<RouteTable>, config: &MuxConfig) -> bool {
    match build_route_table(&config.routes) {
        Ok(table) => {
            let size = table.routes().len();
            routes.store(Arc::new(table));
            metrics::record_route_table_size(size);
            metrics::record_reload("applied");
            tracing::info!(routes = size, "Route table reloaded");
            true
        }
        Err(e) => {
            metrics::record_reload("rejected");
            tracing::error!(error = %e, "Reload rejected, keeping current route table");
            false
        }
    }
}

/// Fallback handler: every request lands here.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let request_id = request_id(&request).to_string();
    let method = request.method().clone();
    let path = normalize(request.uri().path());

    let resolved = {
        let table = state.routes.load();
        table
            .resolve(&path, method.as_str())
            .map(|found| (found.handler.clone(), found.params.to_owned_pairs()))
    };

    let (target, params) = match resolved {
        Ok(found) => found,
        Err(err) => {
            tracing::debug!(request_id = %request_id, method = %method, path = %path, error = %err, "Dispatch failed");
            let response = response::dispatch_error(&err);
            metrics::record_request(method.as_str(), response.status().as_u16(), "none", start);
            return response;
        }
    };

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        route = %target.name,
        "Route matched"
    );

    let mut response = match &target.action {
        RouteAction::Respond {
            status,
            body,
            content_type,
        } => response::respond(*status, body, content_type, &params),
        RouteAction::Proxy { upstream } => {
            proxy::forward(&state.client, upstream, request, &request_id).await
        }
    };

    response::tag_route(&mut response, &target.name);
    metrics::record_request(method.as_str(), response.status().as_u16(), &target.name, start);
    response
}
