//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check every route pattern parses
//! - Validate value ranges (timeouts > 0, addresses and status codes valid)
//! - Detect conflicting routes, comparing patterns with variable names erased
//! - Reject a variable renamed at a position an earlier route already binds
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: MuxConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::{HashMap, HashSet};
use std::net::{SocketAddr, ToSocketAddrs};

use axum::http::{Method, StatusCode};
use thiserror::Error;

use crate::config::schema::{MuxConfig, RouteAction};
use crate::path::{normalize, split_pattern, PatternError, PatternToken};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid {field} address {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,

    #[error("route #{index} has an empty name")]
    EmptyRouteName { index: usize },

    #[error("route {route:?}: invalid method {method:?}")]
    InvalidMethod { route: String, method: String },

    #[error("route {route:?}: {source}")]
    InvalidPattern {
        route: String,
        #[source]
        source: PatternError,
    },

    #[error("route {route:?}: invalid status code {status}")]
    InvalidStatus { route: String, status: u16 },

    #[error("route {route:?}: invalid upstream {upstream:?}")]
    InvalidUpstream { route: String, upstream: String },

    #[error("route {route:?}: variable {{{name}}} conflicts with {{{existing}}} from route {existing_route:?} at the same position")]
    VariableNameConflict {
        route: String,
        name: String,
        existing: String,
        existing_route: String,
    },

    #[error("route {route:?}: {method} {pattern} is already handled by another route")]
    DuplicateRoute {
        route: String,
        method: String,
        pattern: String,
    },
}

/// Validate a parsed configuration.
pub fn validate_config(config: &MuxConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    // (route shape, method); "*" stands for the default handler.
    let mut claimed: HashSet<(String, String)> = HashSet::new();
    // Variable position in the trie → (name, route that introduced it).
    let mut variables: HashMap<String, (String, String)> = HashMap::new();

    for (index, route) in config.routes.iter().enumerate() {
        if route.name.trim().is_empty() {
            errors.push(ValidationError::EmptyRouteName { index });
        }

        for method in &route.methods {
            if method.is_empty() || Method::from_bytes(method.as_bytes()).is_err() {
                errors.push(ValidationError::InvalidMethod {
                    route: route.name.clone(),
                    method: method.clone(),
                });
            }
        }

        match &route.action {
            RouteAction::Respond { status, .. } => {
                if StatusCode::from_u16(*status).is_err() {
                    errors.push(ValidationError::InvalidStatus {
                        route: route.name.clone(),
                        status: *status,
                    });
                }
            }
            RouteAction::Proxy { upstream } => {
                let resolvable = upstream
                    .to_socket_addrs()
                    .map(|mut addrs| addrs.next().is_some())
                    .unwrap_or(false);
                if !resolvable {
                    errors.push(ValidationError::InvalidUpstream {
                        route: route.name.clone(),
                        upstream: upstream.clone(),
                    });
                }
            }
        }

        let pattern = normalize(&route.pattern);
        let tokens = match split_pattern(&pattern) {
            Ok(tokens) => tokens,
            Err(source) => {
                errors.push(ValidationError::InvalidPattern {
                    route: route.name.clone(),
                    source,
                });
                continue;
            }
        };

        // Two patterns reach the same trie node exactly when their text
        // matches with variable names erased.
        let mut shape = String::with_capacity(pattern.len());
        for token in &tokens {
            let (marker, name) = match *token {
                PatternToken::Literal(text) => (text, None),
                PatternToken::PartVariable(name) => ("{}", Some(name)),
                PatternToken::EndVariable(name) => ("{*}", Some(name)),
            };
            shape.push_str(marker);
            let Some(name) = name else {
                continue;
            };

            match variables.get(&shape) {
                Some((existing, owner)) if existing != name => {
                    errors.push(ValidationError::VariableNameConflict {
                        route: route.name.clone(),
                        name: name.to_string(),
                        existing: existing.clone(),
                        existing_route: owner.clone(),
                    });
                }
                Some(_) => {}
                None => {
                    variables.insert(shape.clone(), (name.to_string(), route.name.clone()));
                }
            }
        }

        let methods: Vec<&str> = if route.methods.is_empty() {
            vec!["*"]
        } else {
            route.methods.iter().map(String::as_str).collect()
        };
        for method in methods {
            if !claimed.insert((shape.clone(), method.to_string())) {
                errors.push(ValidationError::DuplicateRoute {
                    route: route.name.clone(),
                    method: method.to_string(),
                    pattern: pattern.clone(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
