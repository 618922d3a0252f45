//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (at startup):
//!     (method, pattern, handler)
//!     → pattern.rs (validate wildcard placement, split into segments)
//!     → tree.rs (descend existing nodes, append chain for the rest)
//!     → node.rs (static / :param / * nodes)
//!
//! Lookup (per request):
//!     (method, path)
//!     → tree.rs (pick the method's root, split path)
//!     → node.rs (best child per segment: Static > Param > Any)
//!     → router.rs (invoke handler, or 404 "Not Found")
//! ```
//!
//! # Design Decisions
//! - Routes registered at startup, immutable while serving
//! - No regex matching
//! - Deterministic: same tree and path always match the same handler

pub mod node;
pub mod params;
pub mod pattern;
pub mod router;
pub mod tree;

pub use node::{Node, NodeType, SegmentKind};
pub use params::PathParams;
pub use pattern::validate_pattern;
pub use router::{handler_fn, HandlerFunc, Routable, TreeRouter};
pub use tree::{RouteTree, SUPPORTED_METHODS};
