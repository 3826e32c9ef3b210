//! Method-aware HTTP request multiplexer.
//!
//! The core is a radix-trie [`routing::Router`] generic over its handler
//! type; [`http::HttpServer`] serves a config-driven route table on top of it.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod path;
pub mod routing;

pub use config::schema::MuxConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use path::PatternError;
pub use routing::{DispatchError, Match, Params, Router, Scope};
