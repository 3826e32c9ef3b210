//! Compressed path trie.
//!
//! # Responsibilities
//! - Store registered patterns with shared-prefix compression
//! - Split edges when a new literal diverges inside an existing label
//! - Resolve a request path with literal > part-variable > end-variable priority
//!
//! # Design Decisions
//! - Labels are bytes; splits may land inside a UTF-8 sequence
//! - Literal children sorted by label and pairwise first-byte disjoint, so a
//!   child is found by binary search on one byte
//! - Variable children live in two dedicated slots, one per kind
//! - Only a parent replaces a child's slot; a node never rewrites itself
//! - Immutable after construction; lookup takes `&self` only

use crate::path::{capture, compare_ignoring_shared_prefix, PatternToken, TokenKind};
use crate::routing::handler::HandlerRegistry;
use crate::routing::params::Params;

/// What a node consumes when it is traversed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The label bytes, verbatim.
    Literal,
    /// One non-empty path segment, bound to `name`.
    PartVariable { name: String },
    /// The remainder of the path, bound to `name`.
    EndVariable { name: String },
}

impl NodeKind {
    fn token_kind(&self) -> TokenKind {
        match self {
            NodeKind::Literal => TokenKind::Literal,
            NodeKind::PartVariable { .. } => TokenKind::PartVariable,
            NodeKind::EndVariable { .. } => TokenKind::EndVariable,
        }
    }

    fn name(&self) -> &str {
        match self {
            NodeKind::Literal => "",
            NodeKind::PartVariable { name } | NodeKind::EndVariable { name } => name,
        }
    }
}

/// A trie node.
#[derive(Debug, Clone)]
pub struct Node<H> {
    /// Bytes consumed travelling from the parent to this node. Variable
    /// nodes hold their token text (`{id}`, `{*rest}`) for display.
    label: Vec<u8>,
    kind: NodeKind,
    /// Literal children, sorted ascending by label.
    children: Vec<Node<H>>,
    part_variable: Option<Box<Node<H>>>,
    end_variable: Option<Box<Node<H>>>,
    registry: Option<HandlerRegistry<H>>,
}

impl<H> Default for Node<H> {
    fn default() -> Self {
        Self::root()
    }
}

impl<H> Node<H> {
    /// An empty node with an empty label.
    pub fn root() -> Self {
        Self::literal(Vec::new())
    }

    fn literal(label: Vec<u8>) -> Self {
        Self::with_kind(label, NodeKind::Literal)
    }

    fn with_kind(label: Vec<u8>, kind: NodeKind) -> Self {
        Self {
            label,
            kind,
            children: Vec::new(),
            part_variable: None,
            end_variable: None,
            registry: None,
        }
    }

    pub fn label(&self) -> &[u8] {
        &self.label
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn children(&self) -> &[Node<H>] {
        &self.children
    }

    pub fn part_variable(&self) -> Option<&Node<H>> {
        self.part_variable.as_deref()
    }

    pub fn end_variable(&self) -> Option<&Node<H>> {
        self.end_variable.as_deref()
    }

    pub fn registry(&self) -> Option<&HandlerRegistry<H>> {
        self.registry.as_ref()
    }

    /// Registry of this node, created on first use.
    pub fn registry_mut(&mut self) -> &mut HandlerRegistry<H> {
        self.registry.get_or_insert_with(HandlerRegistry::new)
    }

    /// Binary search the literal children on the first byte of `suffix`.
    ///
    /// `Ok` holds the only candidate that can share a prefix with `suffix`;
    /// `Err` holds the position that keeps the children sorted.
    fn child_index(&self, suffix: &[u8]) -> Result<usize, usize> {
        let first = suffix.first();
        self.children
            .binary_search_by(|child| child.label.first().cmp(&first))
    }

    /// Insert the literal `suffix` below this node and return the node that
    /// represents it. Idempotent: inserting the same text again returns the
    /// same node and leaves the trie shape untouched.
    pub fn insert(&mut self, suffix: &str) -> &mut Node<H> {
        self.insert_bytes(suffix.as_bytes())
    }

    fn insert_bytes(&mut self, suffix: &[u8]) -> &mut Node<H> {
        if suffix.is_empty() {
            return self;
        }

        let index = match self.child_index(suffix) {
            Ok(index) => index,
            Err(position) => {
                self.children.insert(position, Node::literal(suffix.to_vec()));
                return &mut self.children[position];
            }
        };

        let label_len = self.children[index].label.len();
        let (order, shared) = compare_ignoring_shared_prefix(&self.children[index].label, suffix);
        let shared = shared.len();

        if order == 0 && shared == label_len {
            // Label equals or prefixes the suffix.
            return self.children[index].insert_bytes(&suffix[shared..]);
        }

        self.split_child(index, shared);
        self.children[index].insert_bytes(&suffix[shared..])
    }

    /// Replace child `index` with a new node labelled with the first `at`
    /// bytes of the child's label; the shortened child moves below it.
    fn split_child(&mut self, index: usize, at: usize) {
        let slot = &mut self.children[index];
        let prefix = slot.label[..at].to_vec();
        let mut lower = std::mem::replace(&mut *slot, Node::literal(prefix));
        lower.label = lower.label.split_off(at);

        tracing::trace!(
            prefix = %String::from_utf8_lossy(&slot.label),
            remainder = %String::from_utf8_lossy(&lower.label),
            "Splitting trie edge"
        );
        slot.children.push(lower);
    }

    /// Consume one pattern token and return the node it leads to.
    ///
    /// Variable tokens reuse the existing child of the same kind; a differing
    /// name keeps the first registered one.
    pub fn insert_token(&mut self, token: &PatternToken<'_>) -> &mut Node<H> {
        let (slot, kind, text) = match *token {
            PatternToken::Literal(text) => return self.insert(text),
            PatternToken::PartVariable(name) => (
                &mut self.part_variable,
                NodeKind::PartVariable { name: name.to_string() },
                format!("{{{name}}}"),
            ),
            PatternToken::EndVariable(name) => (
                &mut self.end_variable,
                NodeKind::EndVariable { name: name.to_string() },
                format!("{{*{name}}}"),
            ),
        };

        let child = slot.get_or_insert_with(|| Box::new(Node::with_kind(text.into_bytes(), kind.clone())));
        if child.kind != kind {
            tracing::warn!(
                registered = %child.kind.name(),
                requested = %kind.name(),
                "Variable already registered under another name at this position, keeping the first"
            );
        }
        child
    }

    /// Walk a full token sequence, creating nodes as needed.
    pub fn insert_tokens(&mut self, tokens: &[PatternToken<'_>]) -> &mut Node<H> {
        let mut node = self;
        for token in tokens {
            node = node.insert_token(token);
        }
        node
    }

    /// Find the node that fully consumes `path` and carries a registry,
    /// together with the captured variables.
    pub fn lookup<'a>(&'a self, path: &'a str) -> Option<(&'a Node<H>, Params<'a>)> {
        let mut params = Params::new();
        let node = self.walk(path, 0, &mut params)?;
        Some((node, params))
    }

    fn walk<'a>(&'a self, path: &'a str, pos: usize, params: &mut Params<'a>) -> Option<&'a Node<H>> {
        let rest = &path.as_bytes()[pos..];
        if rest.is_empty() && self.registry.is_some() {
            return Some(self);
        }

        if !rest.is_empty() {
            if let Ok(index) = self.child_index(rest) {
                let child = &self.children[index];
                if rest.starts_with(&child.label) {
                    if let Some(found) = child.walk(path, pos + child.label.len(), params) {
                        return Some(found);
                    }
                }
            }
        }

        let remainder = path.get(pos..)?;
        let mark = params.len();

        if let Some(child) = self.part_variable.as_deref() {
            let (value, _) = capture(child.kind.token_kind(), remainder);
            if !value.is_empty() {
                params.push(child.kind.name(), value);
                if let Some(found) = child.walk(path, pos + value.len(), params) {
                    return Some(found);
                }
                params.truncate(mark);
            }
        }

        if let Some(child) = self.end_variable.as_deref() {
            if child.registry.is_some() {
                let (value, _) = capture(child.kind.token_kind(), remainder);
                params.push(child.kind.name(), value);
                return Some(child);
            }
        }

        None
    }

    /// Visit every node that carries a registry, depth first, with the full
    /// root-to-node label concatenation.
    pub fn for_each_registered<F>(&self, mut visit: F)
    where
        F: FnMut(&[u8], &HandlerRegistry<H>),
    {
        let mut prefix = Vec::new();
        self.visit_registered(&mut prefix, &mut visit);
    }

    fn visit_registered<F>(&self, prefix: &mut Vec<u8>, visit: &mut F)
    where
        F: FnMut(&[u8], &HandlerRegistry<H>),
    {
        let mark = prefix.len();
        prefix.extend_from_slice(&self.label);
        if let Some(registry) = &self.registry {
            visit(prefix.as_slice(), registry);
        }
        for child in self
            .children
            .iter()
            .chain(self.part_variable.as_deref())
            .chain(self.end_variable.as_deref())
        {
            child.visit_registered(prefix, visit);
        }
        prefix.truncate(mark);
    }
}
