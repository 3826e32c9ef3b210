//! Compiled route table.
//!
//! Turns the `routes` section of a [`MuxConfig`](crate::config::MuxConfig)
//! into a [`Router`] whose handlers are the configured actions.

use std::sync::Arc;

use crate::config::{RouteAction, RouteConfig};
use crate::path::PatternError;
use crate::routing::Router;

/// What a matched route does, plus its name for logs and metrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTarget {
    pub name: String,
    pub action: RouteAction,
}

/// The router type served by the gateway.
pub type RouteTable = Router<Arc<RouteTarget>>;

/// Compile `routes` in order. Later routes replace earlier handlers for the
/// same (pattern, method).
pub fn build_route_table(routes: &[RouteConfig]) -> Result<RouteTable, PatternError> {
    let mut table = RouteTable::new();
    for route in routes {
        let target = Arc::new(RouteTarget {
            name: route.name.clone(),
            action: route.action.clone(),
        });
        table.register(route.methods.iter().cloned(), &route.pattern, target)?;
    }
    Ok(table)
}
