//! Tree-based dispatch handler.
//!
//! # Responsibilities
//! - Register handlers against method + pattern
//! - Look up the handler for a request context
//! - Answer 404 "Not Found" when nothing matches
//!
//! # Design Decisions
//! - Mutable during setup, shared immutably (`Arc`) once serving starts
//! - Unsupported methods collapse into "not found" at dispatch time
//! - Explicit not-found response rather than silent default

use std::sync::Arc;

use axum::http::{Method, StatusCode};

use crate::error::RouteError;
use crate::http::context::Context;
use crate::routing::tree::RouteTree;

/// A request handler.
pub type HandlerFunc = Arc<dyn Fn(&mut Context) + Send + Sync>;

/// Wrap a closure as a [`HandlerFunc`].
pub fn handler_fn<F>(f: F) -> HandlerFunc
where
    F: Fn(&mut Context) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Something routes can be registered on.
pub trait Routable {
    /// Route `method` requests matching `pattern` to `handler`.
    fn route(&mut self, method: Method, pattern: &str, handler: HandlerFunc) -> Result<(), RouteError>;
}

/// The routing tree plus the HTTP-facing dispatch entry point.
#[derive(Clone, Default)]
pub struct TreeRouter {
    tree: RouteTree<HandlerFunc>,
}

impl TreeRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the handler for the context's method and path.
    ///
    /// Captured parameters are written into the context.
    pub fn find_handler(&self, ctx: &mut Context) -> Option<HandlerFunc> {
        let (method, path, params) = ctx.route_parts();
        self.tree.find(method, path, params).cloned()
    }

    /// Dispatch the request held by `ctx`.
    pub fn serve_http(&self, ctx: &mut Context) {
        match self.find_handler(ctx) {
            Some(handler) => handler(ctx),
            None => {
                tracing::debug!(method = %ctx.method(), path = %ctx.path(), "No route matched");
                ctx.response_mut().write_header(StatusCode::NOT_FOUND);
                ctx.response_mut().write("Not Found");
            }
        }
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Registered `(method, pattern)` pairs.
    pub fn routes(&self) -> Vec<(Method, String)> {
        self.tree.routes()
    }

    /// The underlying tree, for inspection.
    pub fn tree(&self) -> &RouteTree<HandlerFunc> {
        &self.tree
    }
}

impl Routable for TreeRouter {
    fn route(&mut self, method: Method, pattern: &str, handler: HandlerFunc) -> Result<(), RouteError> {
        match self.tree.insert(&method, pattern, handler) {
            Ok(()) => {
                tracing::debug!(method = %method, pattern = %pattern, "Route registered");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(method = %method, pattern = %pattern, error = %e, "Route rejected");
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for TreeRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeRouter")
            .field("routes", &self.routes())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(body: &'static str) -> HandlerFunc {
        handler_fn(move |ctx| ctx.response_mut().write(body))
    }

    fn dispatch(router: &TreeRouter, method: Method, path: &str) -> Context {
        let mut ctx = Context::new(method, path);
        router.serve_http(&mut ctx);
        ctx
    }

    #[test]
    fn test_serve_http_not_found() {
        let router = TreeRouter::new();
        let ctx = dispatch(&router, Method::GET, "/missing");
        assert_eq!(ctx.response().status(), StatusCode::NOT_FOUND);
        assert_eq!(ctx.response().body(), b"Not Found");
    }

    #[test]
    fn test_serve_http_invokes_handler_with_params() {
        let mut router = TreeRouter::new();
        router
            .route(
                Method::GET,
                "/user/:id",
                handler_fn(|ctx| {
                    let id = ctx.param("id").unwrap_or_default().to_string();
                    ctx.text(StatusCode::OK, format!("user {id}"));
                }),
            )
            .unwrap();

        let ctx = dispatch(&router, Method::GET, "/user/42");
        assert_eq!(ctx.response().status(), StatusCode::OK);
        assert_eq!(ctx.response().body(), b"user 42");
        assert_eq!(ctx.param("id"), Some("42"));
    }

    #[test]
    fn test_second_registration_wins() {
        let mut router = TreeRouter::new();
        router.route(Method::PUT, "/item", reply("first")).unwrap();
        router.route(Method::PUT, "/item", reply("second")).unwrap();
        assert_eq!(router.len(), 1);

        let ctx = dispatch(&router, Method::PUT, "/item");
        assert_eq!(ctx.response().body(), b"second");
    }

    #[test]
    fn test_end_to_end_dispatch() {
        let mut router = TreeRouter::new();
        router.route(Method::POST, "/user", reply("h1")).unwrap();
        router.route(Method::POST, "/user/profile", reply("h2")).unwrap();
        router.route(Method::POST, "/order/detail", reply("h3")).unwrap();

        let ctx = dispatch(&router, Method::POST, "/user");
        assert_eq!(ctx.response().body(), b"h1");
        assert!(ctx.path_params().is_empty());

        let ctx = dispatch(&router, Method::POST, "/user/profile");
        assert_eq!(ctx.response().body(), b"h2");

        let ctx = dispatch(&router, Method::POST, "/order");
        assert_eq!(ctx.response().status(), StatusCode::NOT_FOUND);

        let ctx = dispatch(&router, Method::GET, "/user");
        assert_eq!(ctx.response().status(), StatusCode::NOT_FOUND);

        let ctx = dispatch(&router, Method::CONNECT, "/user");
        assert_eq!(ctx.response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_route_errors() {
        let mut router = TreeRouter::new();
        assert!(matches!(
            router.route(Method::PATCH, "/user", reply("x")),
            Err(RouteError::InvalidMethod { .. })
        ));
        assert!(matches!(
            router.route(Method::GET, "/order/*/checkout", reply("x")),
            Err(RouteError::InvalidPattern { .. })
        ));
        assert!(router.is_empty());
    }
}
