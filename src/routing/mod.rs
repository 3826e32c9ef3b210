//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route registration (at startup):
//!     (methods, pattern, handler)
//!     → path::split_pattern (token sequence)
//!     → node.rs (trie insertion, edge splitting)
//!     → handler.rs (registry attached at the terminal node)
//!
//! Incoming Request (normalized path, method)
//!     → node.rs (lookup: literal > {part} > {*end})
//!     → handler.rs (method → handler, or default)
//!     → Return: Match { handler, params } | NotFound | MethodNotAllowed
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path
//! - Deterministic: same input always matches same route
//! - Exact literal text beats a variable at the same position

pub mod handler;
pub mod node;
pub mod params;
pub mod router;
pub mod types;

pub use handler::HandlerRegistry;
pub use node::{Node, NodeKind};
pub use params::Params;
pub use router::{Router, Scope};
pub use types::{DispatchError, Match, RouteInfo};
