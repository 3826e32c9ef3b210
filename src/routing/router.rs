//! Route registration and dispatch.
//!
//! # Responsibilities
//! - Own the trie root
//! - Register (methods, pattern, handler) triples, at the root or below a
//!   shared prefix
//! - Resolve a request path and method to a handler plus captured variables
//!
//! # Design Decisions
//! - Built once, then shared read-only (`Arc<Router<H>>`); no locking on dispatch
//! - Registration errors are returned to the caller and should abort startup
//! - Dispatch failures are plain values, never panics
//! - A [`Scope`] holds the trie node of its prefix, so grouped routes insert
//!   below it without walking the prefix again

use crate::path::{normalize, split_pattern, PatternError};
use crate::routing::handler::HandlerRegistry;
use crate::routing::node::Node;
use crate::routing::params::Params;
use crate::routing::types::{DispatchError, Match, RouteInfo};

/// A method-aware path multiplexer over handlers of type `H`.
#[derive(Debug, Clone)]
pub struct Router<H> {
    root: Node<H>,
}

impl<H> Default for Router<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Router<H> {
    pub fn new() -> Self {
        Self { root: Node::root() }
    }

    /// Register `handler` for `pattern`.
    ///
    /// An empty `methods` list installs the default handler for the pattern;
    /// otherwise one entry per method is set, replacing earlier handlers for
    /// the same method. The pattern is normalized before it is split.
    pub fn register<I, S>(&mut self, methods: I, pattern: &str, handler: H) -> Result<(), PatternError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        H: Clone,
    {
        self.scope("")?.register(methods, pattern, handler)
    }

    /// Open a registration scope below `prefix`.
    ///
    /// Patterns registered through the scope are appended to the prefix as
    /// plain text, so `scope("/api/")` + `"users"` is `/api/users` and
    /// `scope("/ma")` + `"th"` is `/math`. An empty prefix scopes the root.
    /// The prefix itself is not registered.
    pub fn scope(&mut self, prefix: &str) -> Result<Scope<'_, H>, PatternError> {
        if prefix.is_empty() {
            return Ok(Scope {
                node: &mut self.root,
                prefix: String::new(),
            });
        }

        let prefix = normalize(prefix);
        let node = {
            let tokens = split_pattern(&prefix)?;
            self.root.insert_tokens(&tokens)
        };
        Ok(Scope { node, prefix })
    }

    /// Find the registry that fully matches `path`, without looking at the
    /// method.
    pub fn lookup<'a>(&'a self, path: &'a str) -> Option<(&'a HandlerRegistry<H>, Params<'a>)> {
        let (node, params) = self.root.lookup(path)?;
        Some((node.registry()?, params))
    }

    /// Resolve `path` and `method` to a handler.
    ///
    /// `path` is expected to be normalized already (see
    /// [`crate::path::normalize`]).
    pub fn resolve<'a>(&'a self, path: &'a str, method: &str) -> Result<Match<'a, H>, DispatchError> {
        let (registry, params) = self.lookup(path).ok_or(DispatchError::NotFound)?;
        let handler = registry.resolve(method)?;
        Ok(Match { handler, params })
    }

    /// Every registered pattern with its methods, in trie order.
    pub fn routes(&self) -> Vec<RouteInfo> {
        let mut routes = Vec::new();
        self.root.for_each_registered(|pattern, registry| {
            routes.push(RouteInfo {
                pattern: String::from_utf8_lossy(pattern).into_owned(),
                methods: registry.methods(),
                has_default: registry.has_default(),
            });
        });
        routes
    }
}

/// Registration handle for the routes below one prefix.
///
/// Borrows the router mutably; drop it before dispatching.
#[derive(Debug)]
pub struct Scope<'r, H> {
    node: &'r mut Node<H>,
    prefix: String,
}

impl<'r, H> Scope<'r, H> {
    /// The normalized prefix this scope registers under.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Register `handler` for `prefix + pattern`. See [`Router::register`].
    pub fn register<I, S>(&mut self, methods: I, pattern: &str, handler: H) -> Result<(), PatternError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        H: Clone,
    {
        let relative = self.relative(pattern)?;
        let tokens = split_pattern(&relative)?;
        let methods: Vec<String> = methods.into_iter().map(Into::into).collect();

        tracing::debug!(prefix = %self.prefix, pattern = %relative, methods = ?methods, "Registering route");
        self.node
            .insert_tokens(&tokens)
            .registry_mut()
            .handle(methods, handler);
        Ok(())
    }

    /// Open a nested scope at `prefix + sub`. An empty `sub` returns a scope
    /// on the same node.
    pub fn scope(&mut self, sub: &str) -> Result<Scope<'_, H>, PatternError> {
        let relative = if sub.is_empty() {
            String::new()
        } else {
            self.relative(sub)?
        };
        let node = {
            let tokens = split_pattern(&relative)?;
            self.node.insert_tokens(&tokens)
        };
        Ok(Scope {
            node,
            prefix: format!("{}{relative}", self.prefix),
        })
    }

    /// Normalize `prefix + pattern`, check the whole pattern, and return the
    /// part below the prefix.
    fn relative(&self, pattern: &str) -> Result<String, PatternError> {
        let full = normalize(&format!("{}{pattern}", self.prefix));
        split_pattern(&full)?;
        full.strip_prefix(self.prefix.as_str())
            .map(str::to_string)
            .ok_or_else(|| PatternError::OutsidePrefix {
                prefix: self.prefix.clone(),
                pattern: pattern.to_string(),
            })
    }
}
