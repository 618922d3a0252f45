//! Per-method routing trees.
//!
//! # Responsibilities
//! - Own one root node per supported method
//! - Grow the tree as patterns are registered (insert-or-extend)
//! - Descend the tree for a request path, choosing the best child per level
//!
//! # Design Decisions
//! - The supported method set is fixed at construction
//! - A wildcard node is never reused as an insertion point, so `/order/*`
//!   and `/order/:id` become siblings and the parameter keeps precedence
//! - Lookup never mutates the tree; only the caller's `PathParams` is written

use std::collections::HashMap;

use axum::http::Method;

use crate::error::RouteError;
use crate::routing::node::{Node, NodeType};
use crate::routing::params::PathParams;
use crate::routing::pattern::{split_segments, validate_pattern};

/// Methods that get a routing tree.
pub const SUPPORTED_METHODS: [Method; 4] = [Method::GET, Method::POST, Method::PUT, Method::DELETE];

/// A forest of routing tries, one per supported method.
#[derive(Debug, Clone)]
pub struct RouteTree<H> {
    forest: HashMap<Method, Node<H>>,
}

impl<H> RouteTree<H> {
    /// Create an empty forest with a root for every supported method.
    pub fn new() -> Self {
        let forest = SUPPORTED_METHODS
            .iter()
            .map(|m| (m.clone(), Node::root(m.clone())))
            .collect();
        Self { forest }
    }

    /// Register `handler` for `pattern` under `method`.
    ///
    /// Re-registering an existing pattern replaces its handler. Nothing is
    /// changed when an error is returned.
    pub fn insert(&mut self, method: &Method, pattern: &str, handler: H) -> Result<(), RouteError> {
        validate_pattern(pattern)?;

        let mut cur = self
            .forest
            .get_mut(method)
            .ok_or_else(|| RouteError::InvalidMethod {
                method: method.to_string(),
            })?;

        let segments = split_segments(pattern);
        for (idx, segment) in segments.iter().enumerate() {
            match cur.match_child(segment, None) {
                Some(child) if cur.child(child).node_type() != NodeType::Any => {
                    cur = cur.child_mut(child);
                }
                _ => {
                    cur.append_chain(&segments[idx..], handler);
                    return Ok(());
                }
            }
        }

        // every segment already had a node: re-registration, or a shorter
        // pattern under an existing prefix
        cur.set_handler(handler);
        Ok(())
    }

    /// Find the handler for `path` under `method`.
    ///
    /// Captured parameters are written into `params`. Returns `None` for an
    /// unsupported method, an unmatched segment, or a node without a handler.
    pub fn find(&self, method: &Method, path: &str, params: &mut PathParams) -> Option<&H> {
        let mut cur = self.forest.get(method)?;

        for segment in split_segments(path) {
            let child = cur.match_child(segment, Some(&mut *params))?;
            cur = cur.child(child);
        }

        cur.handler()
    }

    /// Root node for `method`, if supported.
    pub fn root(&self, method: &Method) -> Option<&Node<H>> {
        self.forest.get(method)
    }

    /// Number of registered routes across all methods.
    pub fn len(&self) -> usize {
        self.forest.values().map(Node::handler_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All registered routes as `(method, pattern)` pairs, in tree order.
    pub fn routes(&self) -> Vec<(Method, String)> {
        let mut out = Vec::new();
        for method in SUPPORTED_METHODS.iter() {
            if let Some(root) = self.forest.get(method) {
                for child in root.children() {
                    collect_routes(method, child, String::new(), &mut out);
                }
            }
        }
        out
    }
}

impl<H> Default for RouteTree<H> {
    fn default() -> Self {
        Self::new()
    }
}

fn collect_routes<H>(method: &Method, node: &Node<H>, prefix: String, out: &mut Vec<(Method, String)>) {
    let path = format!("{}/{}", prefix, node.pattern());
    if node.handler().is_some() {
        out.push((method.clone(), path.clone()));
    }
    for child in node.children() {
        collect_routes(method, child, path.clone(), out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_root<'a>(tree: &'a RouteTree<&'static str>) -> &'a Node<&'static str> {
        tree.root(&Method::POST).unwrap()
    }

    #[test]
    fn test_forest_has_supported_methods() {
        let tree: RouteTree<()> = RouteTree::new();
        for m in SUPPORTED_METHODS.iter() {
            let root = tree.root(m).unwrap();
            assert_eq!(root.node_type(), NodeType::Root);
            assert_eq!(root.pattern(), m.as_str());
            assert!(root.children().is_empty());
        }
        assert!(tree.root(&Method::CONNECT).is_none());
        assert!(tree.is_empty());
    }

    #[test]
    fn test_insert_grows_tree() {
        let mut tree = RouteTree::new();

        tree.insert(&Method::POST, "/user", "user").unwrap();
        assert_eq!(post_root(&tree).children().len(), 1);
        let user = post_root(&tree).child(0);
        assert_eq!(user.pattern(), "user");
        assert_eq!(user.handler(), Some(&"user"));
        assert!(user.children().is_empty());

        tree.insert(&Method::POST, "/user/profile", "profile").unwrap();
        let user = post_root(&tree).child(0);
        assert_eq!(user.children().len(), 1);
        let profile = user.child(0);
        assert_eq!(profile.pattern(), "profile");
        assert_eq!(profile.handler(), Some(&"profile"));

        // re-registering keeps the shape
        tree.insert(&Method::POST, "/user", "user2").unwrap();
        let user = post_root(&tree).child(0);
        assert_eq!(post_root(&tree).children().len(), 1);
        assert_eq!(user.handler(), Some(&"user2"));
        assert_eq!(user.children().len(), 1);

        tree.insert(&Method::POST, "/user/home", "home").unwrap();
        let user = post_root(&tree).child(0);
        assert_eq!(user.children().len(), 2);
        assert_eq!(user.child(1).pattern(), "home");
        assert_eq!(user.child(1).handler(), Some(&"home"));

        tree.insert(&Method::POST, "/order/detail", "detail").unwrap();
        assert_eq!(post_root(&tree).children().len(), 2);
        let order = post_root(&tree).child(1);
        assert_eq!(order.pattern(), "order");
        assert!(order.handler().is_none());
        assert_eq!(order.children().len(), 1);
        assert_eq!(order.child(0).pattern(), "detail");
        assert_eq!(order.child(0).handler(), Some(&"detail"));

        tree.insert(&Method::POST, "/order", "order").unwrap();
        assert_eq!(post_root(&tree).children().len(), 2);
        let order = post_root(&tree).child(1);
        assert_eq!(order.handler(), Some(&"order"));

        tree.insert(&Method::POST, "/order/*", "any").unwrap();
        let order = post_root(&tree).child(1);
        assert_eq!(order.children().len(), 2);
        assert_eq!(order.child(1).pattern(), "*");
        assert_eq!(order.child(1).handler(), Some(&"any"));

        let err = tree.insert(&Method::POST, "/order/*/checkout", "bad");
        assert!(matches!(err, Err(RouteError::InvalidPattern { .. })));

        let err = tree.insert(&Method::CONNECT, "/order/checkout", "bad");
        assert_eq!(
            err,
            Err(RouteError::InvalidMethod {
                method: "CONNECT".into()
            })
        );

        tree.insert(&Method::POST, "/order/:id", "param").unwrap();
        let order = post_root(&tree).child(1);
        assert_eq!(order.children().len(), 3);
        assert_eq!(order.child(2).pattern(), ":id");
    }

    #[test]
    fn test_reregistration_replaces_handler() {
        let mut tree = RouteTree::new();
        tree.insert(&Method::GET, "/a/b", "first").unwrap();
        tree.insert(&Method::GET, "/a/b", "second").unwrap();

        let a = tree.root(&Method::GET).unwrap().child(0);
        assert_eq!(a.children().len(), 1);
        assert_eq!(tree.len(), 1);

        let mut params = PathParams::new();
        assert_eq!(tree.find(&Method::GET, "/a/b", &mut params), Some(&"second"));
    }

    #[test]
    fn test_prefix_independence() {
        let mut long_first = RouteTree::new();
        long_first.insert(&Method::GET, "/a/b", "ab").unwrap();
        long_first.insert(&Method::GET, "/a", "a").unwrap();

        let mut short_first = RouteTree::new();
        short_first.insert(&Method::GET, "/a", "a").unwrap();
        short_first.insert(&Method::GET, "/a/b", "ab").unwrap();

        for tree in [&long_first, &short_first] {
            let root = tree.root(&Method::GET).unwrap();
            assert_eq!(root.children().len(), 1);
            let a = root.child(0);
            assert_eq!(a.handler(), Some(&"a"));
            assert_eq!(a.children().len(), 1);
            assert_eq!(a.child(0).handler(), Some(&"ab"));
        }
    }

    #[test]
    fn test_lookup_priority() {
        let mut tree = RouteTree::new();
        tree.insert(&Method::GET, "/order/*", "any").unwrap();
        tree.insert(&Method::GET, "/order/new", "static").unwrap();
        tree.insert(&Method::GET, "/order/:id", "param").unwrap();
        assert_eq!(tree.root(&Method::GET).unwrap().child(0).children().len(), 3);

        let mut params = PathParams::new();
        assert_eq!(tree.find(&Method::GET, "/order/42", &mut params), Some(&"param"));
        assert_eq!(params.get("id"), Some("42"));

        let mut params = PathParams::new();
        assert_eq!(tree.find(&Method::GET, "/order/new", &mut params), Some(&"static"));
        assert_eq!(tree.find(&Method::GET, "/order/77", &mut params), Some(&"param"));

        // only the wildcard accepts a literal star
        let mut params = PathParams::new();
        assert_eq!(tree.find(&Method::GET, "/order/*", &mut params), Some(&"any"));
    }

    #[test]
    fn test_wildcard_not_reused_for_insertion() {
        let mut tree = RouteTree::new();
        tree.insert(&Method::GET, "/order/*", "any").unwrap();
        tree.insert(&Method::GET, "/order/:id", "param").unwrap();
        tree.insert(&Method::GET, "/order/:id/items", "items").unwrap();

        let order = tree.root(&Method::GET).unwrap().child(0);
        assert_eq!(order.children().len(), 2);
        assert_eq!(order.child(0).pattern(), "*");
        assert!(order.child(0).children().is_empty());
        assert_eq!(order.child(1).pattern(), ":id");
        assert_eq!(order.child(1).children().len(), 1);

        let mut params = PathParams::new();
        assert_eq!(tree.find(&Method::GET, "/order/9/items", &mut params), Some(&"items"));
        assert_eq!(params.get("id"), Some("9"));
    }

    #[test]
    fn test_wildcard_matches_single_segment() {
        let mut tree = RouteTree::new();
        tree.insert(&Method::GET, "/static/*", "files").unwrap();

        let mut params = PathParams::new();
        assert_eq!(tree.find(&Method::GET, "/static/app.js", &mut params), Some(&"files"));
        assert_eq!(tree.find(&Method::GET, "/static/js/app.js", &mut params), None);
        assert_eq!(tree.find(&Method::GET, "/static", &mut params), None);
    }

    #[test]
    fn test_static_after_param_descends_into_param() {
        let mut tree = RouteTree::new();
        tree.insert(&Method::GET, "/user/:id", "param").unwrap();
        tree.insert(&Method::GET, "/user/me", "static").unwrap();

        let user = tree.root(&Method::GET).unwrap().child(0);
        assert_eq!(user.children().len(), 1);

        let mut params = PathParams::new();
        assert_eq!(tree.find(&Method::GET, "/user/42", &mut params), Some(&"static"));
        assert_eq!(params.get("id"), Some("42"));
    }

    #[test]
    fn test_unsupported_method() {
        let mut tree = RouteTree::new();
        tree.insert(&Method::GET, "/user", "user").unwrap();
        for pattern in ["/user", "/", "/order/:id", "/a/*"] {
            let err = tree.insert(&Method::CONNECT, pattern, "x").unwrap_err();
            assert!(matches!(err, RouteError::InvalidMethod { .. }));
            let mut params = PathParams::new();
            assert!(tree.find(&Method::CONNECT, pattern, &mut params).is_none());
        }
    }

    #[test]
    fn test_invalid_pattern_leaves_tree_untouched() {
        let mut tree: RouteTree<&str> = RouteTree::new();
        assert!(tree.insert(&Method::GET, "/*order", "x").is_err());
        assert!(tree.insert(&Method::GET, "/order/*/checkout", "x").is_err());
        assert!(tree.root(&Method::GET).unwrap().children().is_empty());
    }

    #[test]
    fn test_end_to_end_scenario() {
        let mut tree = RouteTree::new();
        tree.insert(&Method::POST, "/user", "h1").unwrap();
        tree.insert(&Method::POST, "/user/profile", "h2").unwrap();
        tree.insert(&Method::POST, "/order/detail", "h3").unwrap();

        let mut params = PathParams::new();
        assert_eq!(tree.find(&Method::POST, "/user", &mut params), Some(&"h1"));
        assert!(params.is_empty());
        assert_eq!(tree.find(&Method::POST, "/user/profile", &mut params), Some(&"h2"));
        assert_eq!(tree.find(&Method::POST, "/order/detail", &mut params), Some(&"h3"));
        assert_eq!(tree.find(&Method::POST, "/order", &mut params), None);
        assert_eq!(tree.find(&Method::GET, "/user", &mut params), None);
        assert_eq!(tree.find(&Method::POST, "/nothing", &mut params), None);
    }

    #[test]
    fn test_trailing_separators_ignored() {
        let mut tree = RouteTree::new();
        tree.insert(&Method::DELETE, "user/:id/", "del").unwrap();

        let mut params = PathParams::new();
        assert_eq!(tree.find(&Method::DELETE, "/user/5", &mut params), Some(&"del"));
        assert_eq!(tree.find(&Method::DELETE, "//user/5//", &mut params), Some(&"del"));
    }

    #[test]
    fn test_root_pattern() {
        let mut tree = RouteTree::new();
        tree.insert(&Method::GET, "/", "index").unwrap();

        let mut params = PathParams::new();
        assert_eq!(tree.find(&Method::GET, "/", &mut params), Some(&"index"));
        assert_eq!(tree.find(&Method::GET, "", &mut params), Some(&"index"));
    }

    #[test]
    fn test_routes_listing() {
        let mut tree = RouteTree::new();
        tree.insert(&Method::GET, "/user/:id", 1).unwrap();
        tree.insert(&Method::GET, "/user", 2).unwrap();
        tree.insert(&Method::DELETE, "/user/:id", 3).unwrap();

        let routes = tree.routes();
        assert_eq!(
            routes,
            vec![
                (Method::GET, "/user".to_string()),
                (Method::GET, "/user/:id".to_string()),
                (Method::DELETE, "/user/:id".to_string()),
            ]
        );
        assert_eq!(tree.len(), 3);
    }
}
