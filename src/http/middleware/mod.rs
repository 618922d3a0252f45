//! Filter chain around the tree router.
//!
//! # Data Flow
//! ```text
//! request context
//!     → middleware[0] (outermost, runs first)
//!     → middleware[1]
//!     → ...
//!     → TreeRouter::serve_http (innermost)
//! ```
//!
//! # Design Decisions
//! - The chain is folded once when the server is built, not per request
//! - Each middleware decides whether and when to call `next`
//! - Plain closures `Fn(Filter) -> Filter` are middlewares too

pub mod access_log;
pub mod metrics;

use std::sync::Arc;

use crate::http::context::Context;
use crate::routing::TreeRouter;

pub use access_log::AccessLog;
pub use metrics::DispatchMetrics;

/// One link of the chain: a handler for the rest of the request.
pub type Filter = Arc<dyn Fn(&mut Context) + Send + Sync>;

/// Wraps the next filter in the chain.
pub trait Middleware: Send + Sync {
    fn wrap(&self, next: Filter) -> Filter;
}

impl<F> Middleware for F
where
    F: Fn(Filter) -> Filter + Send + Sync,
{
    fn wrap(&self, next: Filter) -> Filter {
        self(next)
    }
}

/// Fold `middlewares` around `terminal`, first middleware outermost.
pub fn build_chain(middlewares: &[Arc<dyn Middleware>], terminal: Filter) -> Filter {
    middlewares
        .iter()
        .rev()
        .fold(terminal, |next, middleware| middleware.wrap(next))
}

/// Terminal filter dispatching into `router`.
pub fn router_filter(router: Arc<TreeRouter>) -> Filter {
    Arc::new(move |ctx: &mut Context| router.serve_http(ctx))
}
