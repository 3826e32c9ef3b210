//! HTTP gateway subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → path::normalize
//!     → table.rs (route table: Router<Arc<RouteTarget>>)
//!     → respond: response.rs (render body)
//!       proxy:   proxy.rs (forward upstream)
//!     → response.rs (404 / 405 + Allow, x-mux-route)
//!     → Send to client
//! ```

pub mod proxy;
pub mod request;
pub mod response;
pub mod server;
pub mod table;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
pub use table::{build_route_table, RouteTable, RouteTarget};
