//! Per-node handler registry.
//!
//! # Responsibilities
//! - Hold the default (any-method) handler for a registered pattern
//! - Hold one handler per method name (case-sensitive)
//! - Resolve a request method to a handler or a dispatch error
//!
//! # Design Decisions
//! - Methods kept in a `BTreeMap` so the allowed list comes out sorted
//! - Later registrations for the same method overwrite earlier ones

use std::collections::BTreeMap;

use crate::routing::types::DispatchError;

/// Handlers attached to a single trie node.
#[derive(Debug, Clone)]
pub struct HandlerRegistry<H> {
    default: Option<H>,
    methods: BTreeMap<String, H>,
}

impl<H> Default for HandlerRegistry<H> {
    fn default() -> Self {
        Self {
            default: None,
            methods: BTreeMap::new(),
        }
    }
}

impl<H> HandlerRegistry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for every method in `methods`, or as the default
    /// handler when `methods` is empty.
    pub fn handle<I, S>(&mut self, methods: I, handler: H)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        H: Clone,
    {
        let methods: Vec<String> = methods.into_iter().map(Into::into).collect();
        let Some((last, rest)) = methods.split_last() else {
            self.set_default(handler);
            return;
        };
        for method in rest {
            self.set_method(method.clone(), handler.clone());
        }
        self.set_method(last.clone(), handler);
    }

    pub fn set_default(&mut self, handler: H) {
        self.default = Some(handler);
    }

    pub fn set_method(&mut self, method: impl Into<String>, handler: H) {
        self.methods.insert(method.into(), handler);
    }

    /// Pick the handler for `method`.
    ///
    /// An explicit method handler wins over the default one. Without either,
    /// the outcome is `MethodNotAllowed` carrying the registered methods, or
    /// `NotFound` when nothing at all is registered.
    pub fn resolve(&self, method: &str) -> Result<&H, DispatchError> {
        if let Some(handler) = self.methods.get(method) {
            return Ok(handler);
        }
        if let Some(handler) = &self.default {
            return Ok(handler);
        }
        if self.is_empty() {
            return Err(DispatchError::NotFound);
        }
        Err(DispatchError::MethodNotAllowed(self.methods()))
    }

    /// Methods with an explicit handler, sorted ascending.
    pub fn methods(&self) -> Vec<String> {
        self.methods.keys().cloned().collect()
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.default.is_none() && self.methods.is_empty()
    }
}
