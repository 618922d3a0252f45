//! Segment nodes of the per-method routing trie.
//!
//! # Responsibilities
//! - Turn one pattern segment into a node (static, parameter, wildcard)
//! - Decide whether a node accepts a request segment
//! - Write captured parameters into the request's `PathParams`
//!
//! # Design Decisions
//! - Matching is a single `match` over `SegmentKind`, no per-node closures
//! - `NodeType` ordering is the matching priority: Static > Param > Any
//! - Children keep insertion order; priority is applied at lookup time

use axum::http::Method;

use crate::routing::params::PathParams;
use crate::routing::pattern::{PARAM_PREFIX, PATTERN_ANY};

/// Node classification, ordered by matching priority (greater wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeType {
    /// Per-method anchor at depth 0.
    Root,
    /// `*`
    Any,
    /// `:name`
    Param,
    /// Reserved for regex segments; never constructed.
    Regex,
    /// Exact literal.
    Static,
}

/// What a node matches against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentKind {
    Root(Method),
    Any,
    Param(String),
    Static(String),
}

impl SegmentKind {
    pub fn node_type(&self) -> NodeType {
        match self {
            SegmentKind::Root(_) => NodeType::Root,
            SegmentKind::Any => NodeType::Any,
            SegmentKind::Param(_) => NodeType::Param,
            SegmentKind::Static(_) => NodeType::Static,
        }
    }
}

/// One node of a routing tree.
#[derive(Debug, Clone)]
pub struct Node<H> {
    pattern: String,
    kind: SegmentKind,
    children: Vec<Node<H>>,
    handler: Option<H>,
}

impl<H> Node<H> {
    /// Create the root node for `method`.
    pub fn root(method: Method) -> Self {
        Self {
            pattern: method.as_str().to_string(),
            kind: SegmentKind::Root(method),
            children: Vec::with_capacity(2),
            handler: None,
        }
    }

    /// Create a node from one pattern segment.
    pub fn from_segment(segment: &str) -> Self {
        let kind = if segment == PATTERN_ANY {
            SegmentKind::Any
        } else if let Some(name) = segment.strip_prefix(PARAM_PREFIX) {
            SegmentKind::Param(name.to_string())
        } else {
            SegmentKind::Static(segment.to_string())
        };

        Self {
            pattern: segment.to_string(),
            kind,
            // wildcards never get children
            children: Vec::new(),
            handler: None,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn kind(&self) -> &SegmentKind {
        &self.kind
    }

    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    pub fn children(&self) -> &[Node<H>] {
        &self.children
    }

    pub fn handler(&self) -> Option<&H> {
        self.handler.as_ref()
    }

    /// Attach a handler, replacing any existing one.
    pub fn set_handler(&mut self, handler: H) {
        self.handler = Some(handler);
    }

    /// Test `segment` against this node.
    ///
    /// Parameter nodes record the segment under their name whenever a sink is
    /// given, before deciding; they refuse the literal `*`.
    ///
    /// # Panics
    /// Root nodes are never matched against; calling this on one is a routing bug.
    pub fn matches(&self, segment: &str, params: Option<&mut PathParams>) -> bool {
        match &self.kind {
            SegmentKind::Root(method) => {
                unreachable!("root node for {method} must never be matched against a segment")
            }
            SegmentKind::Any => true,
            SegmentKind::Param(name) => {
                if let Some(params) = params {
                    params.insert(name.as_str(), segment);
                }
                segment != PATTERN_ANY
            }
            SegmentKind::Static(literal) => literal == segment && segment != PATTERN_ANY,
        }
    }

    /// Index of the highest-priority child accepting `segment`.
    ///
    /// Every child is evaluated, so parameter children write into `params` even
    /// when they lose. Ties on `NodeType` go to the child appended last.
    pub fn match_child(&self, segment: &str, mut params: Option<&mut PathParams>) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (idx, child) in self.children.iter().enumerate() {
            if !child.matches(segment, params.as_deref_mut()) {
                continue;
            }
            let wins = best.map_or(true, |b| child.node_type() >= self.children[b].node_type());
            if wins {
                best = Some(idx);
            }
        }
        best
    }

    pub fn child(&self, idx: usize) -> &Node<H> {
        &self.children[idx]
    }

    pub fn child_mut(&mut self, idx: usize) -> &mut Node<H> {
        &mut self.children[idx]
    }

    /// Append a linear chain of nodes for `segments` and put `handler` on its last node.
    ///
    /// `segments` must not be empty.
    pub fn append_chain(&mut self, segments: &[&str], handler: H) {
        let mut cur = self;
        for segment in segments {
            cur.children.push(Node::from_segment(segment));
            let last = cur.children.len() - 1;
            cur = &mut cur.children[last];
        }
        cur.set_handler(handler);
    }

    /// Number of handler-bearing nodes in this subtree.
    pub fn handler_count(&self) -> usize {
        let own = usize::from(self.handler.is_some());
        own + self.children.iter().map(Node::handler_count).sum::<usize>()
    }
}
