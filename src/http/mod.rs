//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum fallback, tower layers, request ID)
//!     → pool.rs (reuse a Context for the request)
//!     → middleware/ (filter chain, first registered runs first)
//!     → routing::TreeRouter (handler or 404)
//!     → response.rs (buffered status, headers, body)
//!     → Send to client
//! ```

pub mod context;
pub mod middleware;
pub mod pool;
pub mod request;
pub mod responder;
pub mod response;
pub mod server;

pub use context::Context;
pub use middleware::{build_chain, Filter, Middleware};
pub use pool::{ContextPool, PooledContext};
pub use request::{UuidRequestId, X_REQUEST_ID};
pub use response::ResponseWriter;
pub use server::{HttpServer, ServerBuilder};
