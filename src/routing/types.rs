//! Dispatch outcome types.

use thiserror::Error;

use crate::routing::params::Params;

/// Why a request could not be dispatched to a handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// No registered pattern consumes the full request path.
    #[error("not found")]
    NotFound,

    /// The path matched, but neither the method nor a default handler is
    /// registered there. Carries the registered methods, sorted ascending.
    #[error("method not allowed (allowed: {})", .0.join(", "))]
    MethodNotAllowed(Vec<String>),
}

/// A resolved handler together with the variables captured on the way.
#[derive(Debug)]
pub struct Match<'a, H> {
    pub handler: &'a H,
    pub params: Params<'a>,
}

/// One registered pattern, as listed by [`crate::routing::Router::routes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteInfo {
    /// Full pattern text, variables included.
    pub pattern: String,
    /// Methods with an explicit handler, sorted ascending.
    pub methods: Vec<String>,
    /// Whether a method-agnostic handler is registered.
    pub has_default: bool,
}
